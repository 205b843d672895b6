use serde::{Deserialize, Serialize};

/// Copywriting assets tailored to a stage and focus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct PitchKit {
    /// Landing-page hook
    pub one_liner: String,
    pub value_proposition: String,
    /// 30-second Problem-Agitate-Solution script
    pub elevator_pitch: String,
    pub email_template: String,
    pub social_post: String,
}
