// Value formatting shared by the composers.

use crate::report::labels::NOT_AVAILABLE;
use crate::report::model::Currency;

/// `€1234.50`, `$99.00`, or the n/a label when the amount is missing.
pub fn currency(amount: Option<f64>, currency: Currency) -> String {
    match amount {
        Some(v) if v.is_finite() => format!("{}{:.2}", currency.symbol(), v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// A fraction rendered as a percentage: `percent(0.7512, 2)` → `75.12%`.
pub fn percent(fraction: Option<f64>, decimals: usize) -> String {
    match fraction {
        Some(v) if v.is_finite() => format!("{:.*}%", decimals, v * 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// First character upper case, the rest lower case.
pub fn sentence_case(text: &str) -> String {
    let mut chars = text.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Bath counts come as halves (`1.5`); whole numbers print without decimals.
pub fn count(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
