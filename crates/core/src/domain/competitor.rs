use serde::{Deserialize, Serialize};

/// Competitor scans always name exactly this many companies
pub const COMPETITOR_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub name: String,
    pub description: String,
    /// What the incumbent does best
    pub their_edge: String,
    /// How a solo founder could beat them
    pub your_edge: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CompetitorAnalysis {
    pub competitors: Vec<Competitor>,
    pub market_gap: String,
}
