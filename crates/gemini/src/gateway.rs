//! Capability-level access to the generative backend.
//!
//! Feature code talks to [`ModelGateway`]; [`GeminiGateway`] maps each
//! capability onto a model, modality and generation config.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{
    GeminiClient, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Modality,
    Part, SpeechConfig, ThinkingConfig, Tool,
};
use crate::credentials::{CredentialSource, EnvCredentials};
use crate::error::{GeminiError, GeminiResult};
use crate::extract::parse_object;
use crate::schema::Schema;
use crate::GeminiConfig;

const JSON_MIME: &str = "application/json";
const DEFAULT_IMAGE_MIME: &str = "image/png";
const DEFAULT_AUDIO_MIME: &str = "audio/pcm";

/// Binary payload with its mime type
#[derive(Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }
}

impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blob")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Prompt plus the JSON shape the reply must follow
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub prompt: String,
    pub schema: Schema,
    /// Attach web search and use the grounded text model
    pub web_grounding: bool,
}

impl StructuredRequest {
    pub fn new(prompt: impl Into<String>, schema: Schema) -> Self {
        Self {
            prompt: prompt.into(),
            schema,
            web_grounding: false,
        }
    }

    pub fn grounded(mut self) -> Self {
        self.web_grounding = true;
        self
    }
}

/// Web source the backend consulted while grounding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingCitation {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredResponse {
    /// Always a JSON object
    pub value: Value,
    pub citations: Vec<GroundingCitation>,
}

#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Schema-constrained JSON generation
    async fn generate_structured(&self, request: StructuredRequest)
        -> GeminiResult<StructuredResponse>;

    /// Plain text generation on the fast model
    async fn generate_text(&self, prompt: &str) -> GeminiResult<String>;

    /// Image generation, or an edit of `reference` when given
    async fn generate_image(&self, prompt: &str, reference: Option<Blob>) -> GeminiResult<Blob>;

    /// Speech synthesis with a prebuilt voice
    async fn generate_speech(&self, prompt: &str, voice: &str) -> GeminiResult<Blob>;
}

#[async_trait]
impl<G: ModelGateway + ?Sized> ModelGateway for Arc<G> {
    async fn generate_structured(
        &self,
        request: StructuredRequest,
    ) -> GeminiResult<StructuredResponse> {
        (**self).generate_structured(request).await
    }

    async fn generate_text(&self, prompt: &str) -> GeminiResult<String> {
        (**self).generate_text(prompt).await
    }

    async fn generate_image(&self, prompt: &str, reference: Option<Blob>) -> GeminiResult<Blob> {
        (**self).generate_image(prompt, reference).await
    }

    async fn generate_speech(&self, prompt: &str, voice: &str) -> GeminiResult<Blob> {
        (**self).generate_speech(prompt, voice).await
    }
}

/// [`ModelGateway`] backed by the Gemini REST API
pub struct GeminiGateway {
    client: GeminiClient,
    config: GeminiConfig,
    credentials: Arc<dyn CredentialSource>,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig, credentials: Arc<dyn CredentialSource>) -> GeminiResult<Self> {
        if config.api_base_url.trim().is_empty() {
            return Err(GeminiError::InvalidConfig(
                "api_base_url must not be empty".to_string(),
            ));
        }

        let client = GeminiClient::new(config.api_base_url.clone(), config.request_timeout())?;
        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    /// Gateway reading its key from `GEMINI_API_KEY` / `API_KEY`
    pub fn from_env(config: GeminiConfig) -> GeminiResult<Self> {
        Self::new(config, Arc::new(EnvCredentials::new()))
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn call(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let api_key = self
            .credentials
            .api_key()
            .ok_or(GeminiError::MissingCredential)?;
        self.client.generate_content(&api_key, model, request).await
    }

    fn fast_config() -> GenerationConfig {
        GenerationConfig {
            thinking_config: Some(ThinkingConfig { thinking_budget: 0 }),
            ..Default::default()
        }
    }
}

/// First inline payload of the reply, base64-decoded
fn decode_inline(
    response: &GenerateContentResponse,
    what: &'static str,
    default_mime: &str,
) -> GeminiResult<Blob> {
    let inline = response
        .inline_data()
        .ok_or(GeminiError::EmptyPayload(what))?;

    let data = STANDARD
        .decode(inline.data.trim())
        .map_err(|e| GeminiError::MalformedResponse(format!("Invalid base64 {}: {}", what, e)))?;

    let mime_type = if inline.mime_type.is_empty() {
        default_mime.to_string()
    } else {
        inline.mime_type.clone()
    };

    Ok(Blob::new(mime_type, data))
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate_structured(
        &self,
        request: StructuredRequest,
    ) -> GeminiResult<StructuredResponse> {
        let (model, mut generation_config) = if request.web_grounding {
            (self.config.text_model.as_str(), GenerationConfig::default())
        } else {
            (self.config.fast_model.as_str(), Self::fast_config())
        };
        generation_config.response_mime_type = Some(JSON_MIME.to_string());
        generation_config.response_schema = Some(request.schema);

        let mut body =
            GenerateContentRequest::new(vec![Part::text(request.prompt)]).with_config(generation_config);
        if request.web_grounding {
            body = body.with_tool(Tool::google_search());
        }

        let response = self.call(model, &body).await?;
        let text = response.text();
        let value = parse_object(&text).map_err(|e| {
            warn!(model = %model, error = %e, response_len = text.len(), "Structured reply did not parse");
            e
        })?;

        let citations: Vec<GroundingCitation> = response
            .web_sources()
            .into_iter()
            .map(|w| GroundingCitation {
                title: w.title.clone(),
                uri: w.uri.clone(),
            })
            .collect();

        debug!(
            model = %model,
            citations = citations.len(),
            "Structured generation complete"
        );

        Ok(StructuredResponse { value, citations })
    }

    async fn generate_text(&self, prompt: &str) -> GeminiResult<String> {
        let body =
            GenerateContentRequest::new(vec![Part::text(prompt)]).with_config(Self::fast_config());
        let response = self.call(&self.config.fast_model, &body).await?;
        Ok(response.text())
    }

    async fn generate_image(&self, prompt: &str, reference: Option<Blob>) -> GeminiResult<Blob> {
        let mut parts = Vec::with_capacity(2);
        let model = match reference {
            Some(reference) => {
                parts.push(Part::inline(reference.mime_type, STANDARD.encode(&reference.data)));
                self.config.edit_model.as_str()
            }
            None => self.config.image_model.as_str(),
        };
        parts.push(Part::text(prompt));

        let body = GenerateContentRequest::new(parts).with_config(GenerationConfig {
            response_modalities: Some(vec![Modality::Image]),
            ..Default::default()
        });

        let response = self.call(model, &body).await?;
        let blob = decode_inline(&response, "image", DEFAULT_IMAGE_MIME)?;
        info!(model = %model, bytes = blob.data.len(), "Image generated");
        Ok(blob)
    }

    async fn generate_speech(&self, prompt: &str, voice: &str) -> GeminiResult<Blob> {
        let body = GenerateContentRequest::new(vec![Part::text(prompt)]).with_config(GenerationConfig {
            response_modalities: Some(vec![Modality::Audio]),
            speech_config: Some(SpeechConfig::prebuilt(voice)),
            ..Default::default()
        });

        let response = self.call(&self.config.audio_model, &body).await?;
        let blob = decode_inline(&response, "audio", DEFAULT_AUDIO_MIME)?;
        info!(voice = %voice, bytes = blob.data.len(), "Speech generated");
        Ok(blob)
    }
}
