use thiserror::Error;

/// Failure categories the consuming shell reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Credential missing, rejected, or lacking model entitlement
    Authorization,
    /// Payload is not the JSON shape that was asked for
    MalformedResponse,
    /// Image or audio reply carried no inline data
    EmptyPayload,
    /// Transport, quota and server failures
    Backend,
}

/// Gemini gateway error types
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("No API key available (set GEMINI_API_KEY or API_KEY)")]
    MissingCredential,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Response contained no {0} data")]
    EmptyPayload(&'static str),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for gateway operations
pub type GeminiResult<T> = Result<T, GeminiError>;

const AUTHORIZATION_MARKERS: [&str; 4] = [
    "Requested entity was not found",
    "403",
    "404",
    "PERMISSION_DENIED",
];

/// Classifies a backend failure from its status and response body.
///
/// Model-entitlement failures surface either as 403/404 or only inside the
/// error body, so both are inspected. `message` must be text the API
/// returned, never a transport error that embeds the request url.
pub fn classify(status_code: Option<u16>, message: &str) -> FailureKind {
    if AUTHORIZATION_MARKERS.iter().any(|m| message.contains(m)) {
        FailureKind::Authorization
    } else {
        classify_status(status_code)
    }
}

fn classify_status(status_code: Option<u16>) -> FailureKind {
    match status_code {
        Some(403) | Some(404) => FailureKind::Authorization,
        _ => FailureKind::Backend,
    }
}

impl GeminiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GeminiError::Api {
                message,
                status_code,
            } => classify(*status_code, message),
            GeminiError::MissingCredential => FailureKind::Authorization,
            GeminiError::MalformedResponse(_) | GeminiError::Serialization(_) => {
                FailureKind::MalformedResponse
            }
            GeminiError::EmptyPayload(_) => FailureKind::EmptyPayload,
            GeminiError::Http(e) => classify_status(e.status().map(|s| s.as_u16())),
            GeminiError::InvalidConfig(_) => FailureKind::Backend,
        }
    }

    pub fn is_authorization(&self) -> bool {
        self.kind() == FailureKind::Authorization
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: Option<u16>, message: &str) -> GeminiError {
        GeminiError::Api {
            message: message.to_string(),
            status_code: status,
        }
    }

    #[test]
    fn test_status_codes_classify_as_authorization() {
        assert_eq!(api(Some(403), "forbidden").kind(), FailureKind::Authorization);
        assert_eq!(api(Some(404), "gone").kind(), FailureKind::Authorization);
    }

    #[test]
    fn test_message_markers_classify_as_authorization() {
        assert!(api(None, "Requested entity was not found.").is_authorization());
        assert!(api(Some(400), "status PERMISSION_DENIED").is_authorization());
        assert!(api(None, "upstream returned 403").is_authorization());
    }

    #[test]
    fn test_other_failures_are_backend() {
        assert_eq!(api(Some(429), "quota").kind(), FailureKind::Backend);
        assert_eq!(api(Some(500), "internal").kind(), FailureKind::Backend);
        assert_eq!(
            GeminiError::InvalidConfig("bad url".into()).kind(),
            FailureKind::Backend
        );
    }

    #[test]
    fn test_status_alone_decides_without_markers() {
        assert_eq!(classify_status(Some(404)), FailureKind::Authorization);
        assert_eq!(classify_status(Some(502)), FailureKind::Backend);
        assert_eq!(classify_status(None), FailureKind::Backend);
    }

    #[test]
    fn test_payload_kinds() {
        assert!(GeminiError::MissingCredential.is_authorization());
        assert_eq!(
            GeminiError::MalformedResponse("not json".into()).kind(),
            FailureKind::MalformedResponse
        );
        assert_eq!(
            GeminiError::EmptyPayload("image").kind(),
            FailureKind::EmptyPayload
        );
    }
}
