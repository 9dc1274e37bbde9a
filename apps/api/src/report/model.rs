//! Report input data model: the immutable description of one valuation report.

use serde::{Deserialize, Serialize};

use crate::report::images::ResolvedImage;

// ────────────────────────────────────────────────────────────────────────────
// Property classification
// ────────────────────────────────────────────────────────────────────────────

/// Structure type of the valued property. Drives the yield multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureType {
    #[serde(alias = "Appartamento")]
    Apartment,
    #[serde(alias = "Affittacamere")]
    Guesthouse,
    #[serde(rename = "B&B", alias = "BedAndBreakfast")]
    BedAndBreakfast,
}

impl StructureType {
    pub fn yield_factor(&self) -> f64 {
        match self {
            StructureType::Apartment => 1.3,
            StructureType::Guesthouse => 2.2,
            StructureType::BedAndBreakfast => 2.2,
        }
    }
}

/// Physical condition of the valued property. Drives the yield multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(alias = "Ottimo")]
    Excellent,
    #[serde(alias = "Buono")]
    Good,
    #[serde(alias = "Discreto")]
    Fair,
    #[serde(alias = "Mediocre")]
    Poor,
}

impl Condition {
    pub fn yield_factor(&self) -> f64 {
        match self {
            Condition::Excellent => 1.1,
            Condition::Good => 1.0,
            Condition::Fair => 0.95,
            Condition::Poor => 0.5,
        }
    }
}

/// Currency used for every amount in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// Listing-native currency, shown as euro.
    #[default]
    Native,
    Usd,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Native => "€",
            Currency::Usd => "$",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Input records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFacts {
    pub address: String,
    pub bedrooms: u32,
    pub baths: u32,
    pub guests: u32,
    pub structure_type: StructureType,
    pub condition: Condition,
}

/// Estimate figures computed upstream. Either may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValuationMetrics {
    /// Fraction of nights booked, in [0, 1].
    pub occupancy: Option<f64>,
    /// Average daily rate.
    pub average_daily_rate: Option<f64>,
}

/// A comparable listing, already ranked by the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitorRecord {
    pub listing_id: Option<u64>,
    pub title: String,
    pub listing_type: String,
    pub guests: u32,
    pub bedrooms: u32,
    pub baths: f32,
    pub average_rate: Option<f64>,
    pub occupancy: Option<f64>,
    pub revenue: Option<f64>,
    pub review_count: u32,
    pub rating: Option<f64>,
    pub amenities: Vec<String>,
    pub instant_book: bool,
    pub min_nights: u32,
    pub registered: bool,
    pub image_url: Option<String>,
}

impl CompetitorRecord {
    /// Listing id, or the record's position in the list when the id is absent.
    pub fn identity(&self, position: usize) -> u64 {
        self.listing_id.unwrap_or(position as u64)
    }
}

/// Chart content for the revenue-distribution section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSource {
    /// A previously rendered chart bitmap.
    pub bitmap: Option<ResolvedImage>,
    /// Twelve monthly revenue fractions, January first.
    pub monthly_distribution: Option<Vec<Option<f64>>>,
}

impl ChartSource {
    pub fn is_empty(&self) -> bool {
        self.bitmap.is_none() && self.monthly_values().is_none()
    }

    /// Monthly values with gaps as zero, only when exactly twelve are present.
    pub fn monthly_values(&self) -> Option<[f64; 12]> {
        let dist = self.monthly_distribution.as_ref()?;
        if dist.len() != 12 {
            return None;
        }
        let mut values = [0.0; 12];
        for (slot, value) in values.iter_mut().zip(dist) {
            *slot = value.unwrap_or(0.0).max(0.0);
        }
        Some(values)
    }
}

/// Everything one report generation run consumes. Never mutated during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportInput {
    pub property: PropertyFacts,
    pub metrics: ValuationMetrics,
    pub currency: Currency,
    /// Caller-ranked order; the engine never re-sorts.
    pub competitors: Vec<CompetitorRecord>,
    pub chart: ChartSource,
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_type_accepts_italian_aliases() {
        let t: StructureType = serde_json::from_str("\"Appartamento\"").unwrap();
        assert_eq!(t, StructureType::Apartment);
        let t: StructureType = serde_json::from_str("\"Affittacamere\"").unwrap();
        assert_eq!(t, StructureType::Guesthouse);
        let t: StructureType = serde_json::from_str("\"B&B\"").unwrap();
        assert_eq!(t, StructureType::BedAndBreakfast);
    }

    #[test]
    fn test_condition_accepts_italian_aliases() {
        let c: Condition = serde_json::from_str("\"Buono\"").unwrap();
        assert_eq!(c, Condition::Good);
        let c: Condition = serde_json::from_str("\"Mediocre\"").unwrap();
        assert_eq!(c, Condition::Poor);
    }

    #[test]
    fn test_yield_factors() {
        assert_eq!(Condition::Excellent.yield_factor(), 1.1);
        assert_eq!(Condition::Fair.yield_factor(), 0.95);
        assert_eq!(StructureType::Apartment.yield_factor(), 1.3);
        assert_eq!(StructureType::BedAndBreakfast.yield_factor(), 2.2);
    }

    #[test]
    fn test_competitor_identity_falls_back_to_position() {
        let with_id = CompetitorRecord {
            listing_id: Some(42),
            ..Default::default()
        };
        assert_eq!(with_id.identity(3), 42);
        assert_eq!(CompetitorRecord::default().identity(3), 3);
    }

    #[test]
    fn test_competitor_deserializes_with_missing_fields() {
        let c: CompetitorRecord =
            serde_json::from_str(r#"{"title": "Bilocale", "min_nights": 2}"#).unwrap();
        assert_eq!(c.title, "Bilocale");
        assert_eq!(c.min_nights, 2);
        assert!(c.amenities.is_empty());
        assert!(c.image_url.is_none());
    }

    #[test]
    fn test_monthly_values_requires_twelve_entries() {
        let chart = ChartSource {
            bitmap: None,
            monthly_distribution: Some(vec![Some(0.1); 11]),
        };
        assert!(chart.monthly_values().is_none());
        assert!(chart.is_empty());
    }

    #[test]
    fn test_monthly_values_fills_gaps_with_zero() {
        let mut dist = vec![Some(0.08); 12];
        dist[3] = None;
        let chart = ChartSource {
            bitmap: None,
            monthly_distribution: Some(dist),
        };
        let values = chart.monthly_values().unwrap();
        assert_eq!(values[3], 0.0);
        assert_eq!(values[0], 0.08);
        assert!(!chart.is_empty());
    }
}
