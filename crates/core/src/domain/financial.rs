use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum Currency {
    #[default]
    #[serde(rename = "$")]
    Dollar,
    #[serde(rename = "€")]
    Euro,
    #[serde(rename = "£")]
    Pound,
}

impl Currency {
    pub const ALL: [Self; 3] = [Self::Dollar, Self::Euro, Self::Pound];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Dollar => "$",
            Self::Euro => "€",
            Self::Pound => "£",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "$" | "USD" => Some(Self::Dollar),
            "€" | "EUR" => Some(Self::Euro),
            "£" | "GBP" => Some(Self::Pound),
            _ => None,
        }
    }
}

/// Starting unit economics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct UnitMetrics {
    /// Monthly or per-unit price
    pub price: f64,
    /// Customer acquisition cost
    pub cac: f64,
    /// Cost of goods (or serving) per user
    pub cogs: f64,
    /// Realistic month-12 user count
    pub users: f64,
}

/// "Napkin math" estimate of a business's economics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct FinancialModel {
    pub pricing_model: String,
    pub currency: Currency,
    pub metrics: UnitMetrics,
    pub insight: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_symbols() {
        assert_eq!(serde_json::to_string(&Currency::Euro).unwrap(), "\"€\"");
        let parsed: Currency = serde_json::from_str("\"£\"").unwrap();
        assert_eq!(parsed, Currency::Pound);
        assert_eq!(Currency::parse("usd"), Some(Currency::Dollar));
        assert_eq!(Currency::parse("¥"), None);
    }
}
