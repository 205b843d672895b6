//! Shared helpers for turning raw model payloads into domain records.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::{OrchestratorError, Result};

/// Deserializes a payload into its raw decoder type.
///
/// Missing fields are handled by the decoder's defaults; a field of the
/// wrong JSON type is a malformed response.
pub(crate) fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        warn!(payload = what, error = %e, "Payload does not match the requested schema");
        OrchestratorError::malformed(format!("Unexpected {} payload: {}", what, e))
    })
}

/// Trimmed text, `None` when blank
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn text_or_empty(value: Option<String>) -> String {
    non_blank(value).unwrap_or_default()
}

/// Trimmed non-blank entries
pub(crate) fn clean_list(values: Option<Vec<String>>) -> Vec<String> {
    values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| non_blank(Some(v)))
        .collect()
}

/// Finite, non-negative amount
pub(crate) fn amount(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

/// Validates a question or instruction typed by the user
pub(crate) fn require_text<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OrchestratorError::Validation(message.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemini::FailureKind;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Raw {
        items: Option<Vec<String>>,
    }

    #[test]
    fn test_decode_type_mismatch_is_malformed() {
        let err = decode::<Raw>(json!({"items": "not a list"}), "test").unwrap_err();
        assert_eq!(err.kind(), Some(FailureKind::MalformedResponse));
    }

    #[test]
    fn test_decode_null_and_missing() {
        assert!(decode::<Raw>(json!({"items": null}), "test").unwrap().items.is_none());
        assert!(decode::<Raw>(json!({}), "test").unwrap().items.is_none());
    }

    #[test]
    fn test_clean_list_and_amount() {
        let list = clean_list(Some(vec![" a ".into(), "".into(), "  ".into(), "b".into()]));
        assert_eq!(list, vec!["a", "b"]);
        assert_eq!(amount(Some(-3.0)), 0.0);
        assert_eq!(amount(Some(f64::NAN)), 0.0);
        assert_eq!(amount(None), 0.0);
        assert_eq!(amount(Some(29.5)), 29.5);
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("  hi ", "empty").unwrap(), "hi");
        assert!(matches!(
            require_text("   ", "empty"),
            Err(OrchestratorError::Validation(_))
        ));
    }
}
