use serde::{Deserialize, Serialize};

/// Number of points in a trend sparkline
pub const TREND_POINTS: usize = 7;

/// Maximum number of key facts kept from a research call
pub const MAX_FACTS: usize = 5;

/// Series used when the model does not return trend data
pub const DEFAULT_TREND_SERIES: [f64; TREND_POINTS] = [40.0, 45.0, 50.0, 55.0, 50.0, 45.0, 40.0];

/// Overall direction of a market trend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    #[default]
    Neutral,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "neutral" | "flat" => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Sparkline describing market interest over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct TrendData {
    pub label: String,
    pub value: String,
    /// Always [`TREND_POINTS`] values in `0..=100`
    pub data: Vec<f64>,
    pub direction: TrendDirection,
}

impl Default for TrendData {
    fn default() -> Self {
        Self {
            label: "Market Activity".to_string(),
            value: "Stable".to_string(),
            data: DEFAULT_TREND_SERIES.to_vec(),
            direction: TrendDirection::Neutral,
        }
    }
}

/// Web source that grounded a research answer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct SearchResultItem {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Swot {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub threats: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct BusinessInsight {
    #[serde(default)]
    pub swot: Swot,
    /// Short alternative business ideas
    #[serde(default)]
    pub pivots: Vec<String>,
}

/// Output of the research orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ResearchResult {
    pub image_prompt: String,
    pub facts: Vec<String>,
    pub search_results: Vec<SearchResultItem>,
    pub insights: BusinessInsight,
    pub trend: TrendData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_trend_shape() {
        let trend = TrendData::default();
        assert_eq!(trend.label, "Market Activity");
        assert_eq!(trend.value, "Stable");
        assert_eq!(trend.data, vec![40.0, 45.0, 50.0, 55.0, 50.0, 45.0, 40.0]);
        assert_eq!(trend.direction, TrendDirection::Neutral);
    }

    #[test]
    fn test_research_result_uses_camel_case() {
        let result = ResearchResult {
            image_prompt: "prompt".to_string(),
            facts: vec![],
            search_results: vec![],
            insights: BusinessInsight::default(),
            trend: TrendData::default(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("imagePrompt").is_some());
        assert!(json.get("searchResults").is_some());
        assert_eq!(json["trend"]["direction"], "neutral");
    }
}
