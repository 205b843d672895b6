use serde::{Deserialize, Serialize};

/// Flaws and mitigations each hold exactly this many entries
pub const RISK_ITEMS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    pub fatal_flaws: Vec<String>,
    pub mitigations: Vec<String>,
    /// 0-100
    pub viability_score: u8,
}

impl RiskAnalysis {
    pub fn tier(&self) -> ViabilityTier {
        ViabilityTier::from_score(self.viability_score)
    }
}

/// Dashboard verdict band for a viability score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViabilityTier {
    /// Score above 80
    Promising,
    /// Score above 50
    Caution,
    HighRisk,
}

impl ViabilityTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            81..=u8::MAX => Self::Promising,
            51..=80 => Self::Caution,
            _ => Self::HighRisk,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Self::Promising => "Venture Looks Promising",
            Self::Caution => "Proceed with Caution",
            Self::HighRisk => "High Risk Detected",
        }
    }
}
