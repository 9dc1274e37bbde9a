// Fixed Italian label set printed in the report.

use crate::report::model::{Condition, StructureType};

pub const NOT_AVAILABLE: &str = "n/a";
pub const HEADER_SUBTITLE: &str = "Report di Stima";

// ── property facts ──────────────────────────────────────────────────────────
pub const PROPERTY_HEADING: &str = "INFORMAZIONI PROPRIETÀ";
pub const ADDRESS: &str = "Indirizzo:";
pub const BEDROOMS: &str = "Camere da letto:";
pub const BATHS: &str = "Bagni:";
pub const GUESTS: &str = "Ospiti:";
pub const STRUCTURE_TYPE: &str = "Tipo struttura:";
pub const CONDITION: &str = "Stato immobile:";

// ── kpi ─────────────────────────────────────────────────────────────────────
pub const KPI_HEADING: &str = "METRICHE PRINCIPALI";
pub const OCCUPANCY: &str = "Tasso di Occupazione:";
pub const AVERAGE_DAILY_RATE: &str = "Tariffa Media Giornaliera:";
pub const ANNUAL_GROSS_YIELD: &str = "Rendimento Annuo Lordo:";

// ── competitors ─────────────────────────────────────────────────────────────
pub const COMPETITOR_HEADING: &str = "ANALISI COMPETITOR";
pub const CARD_GUESTS: &str = "ospiti";
pub const CARD_BEDROOMS: &str = "camere";
pub const CARD_BATHS: &str = "bagni";
pub const CARD_RATE: &str = "Tariffa";
pub const CARD_OCCUPANCY: &str = "Occupazione";
pub const CARD_REVIEWS: &str = "Recensioni";
pub const CARD_AMENITIES: &str = "Servizi";
pub const CARD_RATING_MISSING: &str = "N/A";
pub const BADGE_INSTANT_BOOK: &str = "Prenotazione Istantanea";
pub const BADGE_REGISTERED: &str = "Registrato";
pub const SEPARATOR: &str = " • ";

pub fn min_nights_badge(nights: u32) -> String {
    format!("Min {nights} notti")
}

// ── chart / footer ──────────────────────────────────────────────────────────
pub const CHART_HEADING: &str = "DISTRIBUZIONE RICAVI MENSILI";
pub const MONTHS: [&str; 12] = [
    "Gen", "Feb", "Mar", "Apr", "Mag", "Giu", "Lug", "Ago", "Set", "Ott", "Nov", "Dic",
];

pub fn footer(date: &str, time: &str, platform: &str) -> String {
    format!("Report generato il {date} alle {time} | {platform}")
}

pub fn structure_type(value: StructureType) -> &'static str {
    match value {
        StructureType::Apartment => "Appartamento",
        StructureType::Guesthouse => "Affittacamere",
        StructureType::BedAndBreakfast => "B&B",
    }
}

pub fn condition(value: Condition) -> &'static str {
    match value {
        Condition::Excellent => "Ottimo",
        Condition::Good => "Buono",
        Condition::Fair => "Discreto",
        Condition::Poor => "Mediocre",
    }
}
