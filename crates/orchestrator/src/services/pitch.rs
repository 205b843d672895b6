use gemini::{ModelGateway, StructuredRequest};
use lens_core::{PitchKit, RequestConfiguration};
use serde::Deserialize;
use tracing::info;

use super::normalize::{decode, text_or_empty};
use crate::error::Result;
use crate::{prompts, schemas};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawPitchKit {
    one_liner: Option<String>,
    value_proposition: Option<String>,
    elevator_pitch: Option<String>,
    email_template: Option<String>,
    social_post: Option<String>,
}

impl From<RawPitchKit> for PitchKit {
    fn from(raw: RawPitchKit) -> Self {
        Self {
            one_liner: text_or_empty(raw.one_liner),
            value_proposition: text_or_empty(raw.value_proposition),
            elevator_pitch: text_or_empty(raw.elevator_pitch),
            email_template: text_or_empty(raw.email_template),
            social_post: text_or_empty(raw.social_post),
        }
    }
}

/// Launch copy tailored to the configured stage and focus
pub async fn generate_pitch_kit<G>(gateway: &G, config: &RequestConfiguration) -> Result<PitchKit>
where
    G: ModelGateway + ?Sized,
{
    config.validate()?;

    let request = StructuredRequest::new(
        prompts::pitch_kit_prompt(config.topic(), config.stage, config.focus),
        schemas::pitch_kit_schema(),
    );
    let response = gateway.generate_structured(request).await?;
    let raw: RawPitchKit = decode(response.value, "pitch kit")?;

    info!(stage = config.stage.as_str(), focus = config.focus.as_str(), "Pitch kit generated");
    Ok(raw.into())
}
