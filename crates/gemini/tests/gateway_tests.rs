use std::sync::Arc;

use gemini::{
    Blob, FailureKind, GeminiConfig, GeminiError, GeminiGateway, ModelGateway, Schema,
    StaticCredentials, StructuredRequest,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const API_KEY: &str = "test-key";

fn gateway_for(server: &MockServer) -> GeminiGateway {
    let config = GeminiConfig {
        api_base_url: server.uri(),
        ..Default::default()
    };
    GeminiGateway::new(config, Arc::new(StaticCredentials::new(API_KEY))).unwrap()
}

fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]}
        }]
    })
}

fn inline_reply(mime: &str, data: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"inlineData": {"mimeType": mime, "data": data}}]}
        }]
    })
}

fn risk_schema() -> Schema {
    Schema::object()
        .property("fatalFlaws", Schema::strings())
        .property("viabilityScore", Schema::integer())
}

mod structured {
    use super::*;

    #[tokio::test]
    async fn test_ungrounded_uses_fast_model_without_thinking() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", API_KEY))
            .and(body_partial_json(json!({
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {"type": "OBJECT"},
                    "thinkingConfig": {"thinkingBudget": 0}
                }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(text_reply(r#"{"fatalFlaws":["a"],"viabilityScore":85}"#)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let response = gateway
            .generate_structured(StructuredRequest::new("analyze", risk_schema()))
            .await
            .unwrap();

        assert_eq!(response.value["viabilityScore"], 85);
        assert!(response.citations.is_empty());
    }

    #[tokio::test]
    async fn test_grounded_attaches_search_and_reads_citations() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-pro-preview:generateContent"))
            .and(body_partial_json(json!({"tools": [{"googleSearch": {}}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "```json\n{\"facts\": [\"x\"]}\n```"}]},
                    "groundingMetadata": {"groundingChunks": [
                        {"web": {"uri": "https://a.example", "title": "A"}},
                        {"web": {"uri": "https://b.example", "title": "B"}}
                    ]}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let response = gateway
            .generate_structured(StructuredRequest::new("research", Schema::object()).grounded())
            .await
            .unwrap();

        assert_eq!(response.value, json!({"facts": ["x"]}));
        assert_eq!(response.citations.len(), 2);
        assert_eq!(response.citations[1].uri, "https://b.example");
    }

    #[tokio::test]
    async fn test_empty_reply_is_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let response = gateway_for(&server)
            .generate_structured(StructuredRequest::new("p", Schema::object()))
            .await
            .unwrap();
        assert_eq!(response.value, json!({}));
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("no json here")))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .generate_structured(StructuredRequest::new("p", Schema::object()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
    }
}

mod failures {
    use super::*;

    async fn failing_with(status: u16, body: Value) -> FailureKind {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        gateway_for(&server)
            .generate_text("hello")
            .await
            .unwrap_err()
            .kind()
    }

    #[tokio::test]
    async fn test_entity_not_found_is_authorization() {
        let kind = failing_with(
            400,
            json!({"error": {"code": 400, "message": "Requested entity was not found.", "status": "INVALID_ARGUMENT"}}),
        )
        .await;
        assert_eq!(kind, FailureKind::Authorization);
    }

    #[tokio::test]
    async fn test_forbidden_is_authorization() {
        let kind = failing_with(
            403,
            json!({"error": {"code": 403, "message": "Caller lacks access", "status": "PERMISSION_DENIED"}}),
        )
        .await;
        assert_eq!(kind, FailureKind::Authorization);
    }

    #[tokio::test]
    async fn test_server_error_is_backend_and_not_retried() {
        // expect(1) on the mock verifies a single attempt
        let kind = failing_with(
            503,
            json!({"error": {"code": 503, "message": "overloaded", "status": "UNAVAILABLE"}}),
        )
        .await;
        assert_eq!(kind, FailureKind::Backend);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_backend_even_with_status_like_url() {
        // Nothing listens on port 1; the url text contains 403 and 404
        let config = GeminiConfig {
            api_base_url: "http://127.0.0.1:1/v404/403".to_string(),
            ..Default::default()
        };
        let gateway = GeminiGateway::new(config, Arc::new(StaticCredentials::new(API_KEY))).unwrap();

        let err = gateway.generate_text("hello").await.unwrap_err();
        assert!(matches!(err, GeminiError::Http(_)));
        assert_eq!(err.kind(), FailureKind::Backend);
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("hi")))
            .expect(0)
            .mount(&server)
            .await;

        let config = GeminiConfig {
            api_base_url: server.uri(),
            ..Default::default()
        };
        let gateway = GeminiGateway::new(config, Arc::new(StaticCredentials::new(""))).unwrap();
        let err = gateway.generate_text("hello").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Authorization);
    }
}

mod media {
    use super::*;

    #[tokio::test]
    async fn test_image_generation_requests_image_modality() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-pro-image-preview:generateContent"))
            .and(body_partial_json(
                json!({"generationConfig": {"responseModalities": ["IMAGE"]}}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(inline_reply("image/png", "aGVsbG8=")))
            .expect(1)
            .mount(&server)
            .await;

        let blob = gateway_for(&server)
            .generate_image("an infographic", None)
            .await
            .unwrap();
        assert_eq!(blob.mime_type, "image/png");
        assert_eq!(blob.data, b"hello");
    }

    #[tokio::test]
    async fn test_edit_sends_reference_before_instruction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(inline_reply("image/png", "aGk=")))
            .expect(1)
            .mount(&server)
            .await;

        let reference = Blob::new("image/jpeg", b"hello".to_vec());
        gateway_for(&server)
            .generate_image("make it blue", Some(reference))
            .await
            .unwrap();

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "aGVsbG8=");
        assert_eq!(parts[1]["text"], "make it blue");
    }

    #[tokio::test]
    async fn test_reply_without_inline_data_is_empty_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("I drew it in my mind")))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .generate_image("anything", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyPayload);
    }

    #[tokio::test]
    async fn test_speech_uses_prebuilt_voice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash-preview-tts:generateContent"))
            .and(body_partial_json(json!({
                "generationConfig": {
                    "responseModalities": ["AUDIO"],
                    "speechConfig": {"voiceConfig": {"prebuiltVoiceConfig": {"voiceName": "Kore"}}}
                }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(inline_reply("audio/L16;rate=24000", "AAAA")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let blob = gateway_for(&server)
            .generate_speech("brief me", "Kore")
            .await
            .unwrap();
        assert_eq!(blob.data, vec![0u8; 3]);
    }
}
