//! Gemini model gateway for SoloPreneur Lens
//!
//! # Architecture
//!
//! - **Client**: raw `generateContent` calls over reqwest
//! - **Gateway**: the [`ModelGateway`] capabilities (structured JSON, text,
//!   image, speech) with model selection per capability
//! - **Schema**: typed builder for `responseSchema` descriptors
//! - **Credentials**: API key resolved on every call

pub mod api;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod schema;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use api::GeminiClient;
pub use credentials::{CredentialSource, EnvCredentials, StaticCredentials};
pub use error::{classify, FailureKind, GeminiError, GeminiResult};
pub use gateway::{
    Blob, GeminiGateway, GroundingCitation, ModelGateway, StructuredRequest, StructuredResponse,
};
pub use schema::{Schema, SchemaType};

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_VOICE: &str = "Kore";

/// Models and endpoint used by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Gemini REST base URL
    pub api_base_url: String,

    /// Web-grounded structured generation
    pub text_model: String,

    /// Ungrounded structured and plain text generation (thinking disabled)
    pub fast_model: String,

    pub image_model: String,

    /// Image edits with a reference image
    pub edit_model: String,

    /// Text-to-speech
    pub audio_model: String,

    /// Prebuilt narrator voice
    pub voice: String,

    pub request_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            text_model: "gemini-3-pro-preview".to_string(),
            fast_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-3-pro-image-preview".to_string(),
            edit_model: "gemini-3-pro-image-preview".to_string(),
            audio_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: DEFAULT_VOICE.to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl GeminiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_models() {
        let config = GeminiConfig::default();
        assert_eq!(config.text_model, "gemini-3-pro-preview");
        assert_eq!(config.fast_model, "gemini-2.5-flash");
        assert_eq!(config.image_model, config.edit_model);
        assert_eq!(config.voice, "Kore");
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: GeminiConfig =
            serde_json::from_str(r#"{"fast_model": "gemini-2.0-flash"}"#).unwrap();
        assert_eq!(config.fast_model, "gemini-2.0-flash");
        assert_eq!(config.text_model, "gemini-3-pro-preview");
    }
}
