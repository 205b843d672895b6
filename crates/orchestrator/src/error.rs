use gemini::{FailureKind, GeminiError};
use lens_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Gateway(#[from] GeminiError),

    #[error("{0}")]
    Validation(String),

    #[error("Domain error: {0}")]
    Core(CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<CoreError> for OrchestratorError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => Self::Validation(message),
            other => Self::Core(other),
        }
    }
}

impl OrchestratorError {
    /// Payload did not match the requested output contract
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Gateway(GeminiError::MalformedResponse(message.into()))
    }

    /// Failure category of a backend error, if this is one
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::Gateway(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// The shell must force re-authentication
    pub fn is_authorization(&self) -> bool {
        self.kind() == Some(FailureKind::Authorization)
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_validation_maps_to_validation() {
        let err: OrchestratorError = CoreError::Validation("empty topic".into()).into();
        assert!(matches!(err, OrchestratorError::Validation(_)));
        assert_eq!(err.kind(), None);

        let err: OrchestratorError = CoreError::NodeNotFound("x".into()).into();
        assert!(matches!(err, OrchestratorError::Core(_)));
    }

    #[test]
    fn test_authorization_passthrough() {
        let err = OrchestratorError::from(GeminiError::Api {
            message: "Requested entity was not found.".into(),
            status_code: Some(400),
        });
        assert!(err.is_authorization());
        assert_eq!(
            OrchestratorError::malformed("bad").kind(),
            Some(FailureKind::MalformedResponse)
        );
    }
}
