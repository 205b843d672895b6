//! Locating a JSON object inside free-form model output.

use serde_json::Value;

use crate::error::{GeminiError, GeminiResult};

/// Parses a structured reply into a JSON object.
///
/// An empty reply is an empty object. Fenced or prose-wrapped JSON is
/// unwrapped first; anything that still is not an object is malformed.
pub fn parse_object(text: &str) -> GeminiResult<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let value = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value,
        Err(first) => {
            let candidate = extract_from_codeblock(trimmed)
                .or_else(|| extract_raw_object(trimmed))
                .ok_or_else(|| {
                    GeminiError::MalformedResponse(format!("No JSON found in response: {}", first))
                })?;
            serde_json::from_str(candidate).map_err(|e| {
                GeminiError::MalformedResponse(format!("Invalid JSON in response: {}", e))
            })?
        }
    };

    if value.is_object() {
        Ok(value)
    } else {
        Err(GeminiError::MalformedResponse(
            "Expected a JSON object at the top level".to_string(),
        ))
    }
}

/// Body of the first ```json (or bare ```) fence
fn extract_from_codeblock(text: &str) -> Option<&str> {
    let patterns = ["```json", "```JSON", "```"];

    for pattern in patterns {
        if let Some(start_idx) = text.find(pattern) {
            let json_start = start_idx + pattern.len();
            if let Some(end_idx) = text[json_start..].find("```") {
                return Some(text[json_start..json_start + end_idx].trim());
            }
        }
    }

    None
}

/// Span from the first `{` to the last `}`
fn extract_raw_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_object() {
        assert_eq!(parse_object(r#"{"a":1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_empty_reply_is_empty_object() {
        assert_eq!(parse_object("  \n").unwrap(), json!({}));
    }

    #[test]
    fn test_fenced_reply() {
        let text = "Here you go:\n```json\n{\"facts\": [\"x\"]}\n```\nEnjoy.";
        assert_eq!(parse_object(text).unwrap(), json!({"facts": ["x"]}));
    }

    #[test]
    fn test_prose_wrapped_reply() {
        let text = "The analysis is {\"viabilityScore\": 85} as requested";
        assert_eq!(parse_object(text).unwrap()["viabilityScore"], 85);
    }

    #[test]
    fn test_unparseable_reply_is_malformed() {
        assert!(matches!(
            parse_object("I cannot help with that."),
            Err(GeminiError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_object("[1, 2, 3]"),
            Err(GeminiError::MalformedResponse(_))
        ));
    }
}
