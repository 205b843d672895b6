use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, warn};

use super::types::*;
use crate::error::{GeminiError, GeminiResult};

/// Client for the Gemini REST API.
///
/// Holds only the connection pool and base URL; the API key is supplied
/// per request.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> GeminiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        debug!(
            model = %model,
            parts = request.contents.iter().map(|c| c.parts.len()).sum::<usize>(),
            grounded = !request.tools.is_empty(),
            "Calling generateContent"
        );

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                warn!(model = %model, "Rate limited by Gemini");
            }

            if let Ok(error_resp) = serde_json::from_str::<ApiErrorResponse>(&error_text) {
                error!(
                    model = %model,
                    status = status.as_u16(),
                    api_status = ?error_resp.error.status,
                    "Gemini API error: {}",
                    error_resp.error.message
                );
                let message = match error_resp.error.status {
                    Some(api_status) => format!("{} ({})", error_resp.error.message, api_status),
                    None => error_resp.error.message,
                };
                return Err(GeminiError::Api {
                    message,
                    status_code: Some(status.as_u16()),
                });
            }

            error!(model = %model, status = status.as_u16(), "Gemini API error");
            return Err(GeminiError::Api {
                message: error_text,
                status_code: Some(status.as_u16()),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(model = %model, error = %e, "Unreadable generateContent response");
            GeminiError::MalformedResponse(format!("Unreadable response envelope: {}", e))
        })
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
