//! Integration tests for WhatsApp client using WireMock
//!
//! These tests mock the Meta Graph API to verify request shapes and response
//! handling without making actual API calls.

use integration_whatsapp::{WhatsAppClient, WhatsAppClientConfig, WhatsAppError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string_contains, header, method, path},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn test_config(base_url: &str) -> WhatsAppClientConfig {
    WhatsAppClientConfig {
        access_token: "test_access_token".to_string(),
        graph_base_url: base_url.to_string(),
        timeout_ms: 5000,
        ..Default::default()
    }
}

fn client(server: &MockServer) -> WhatsAppClient {
    WhatsAppClient::new(test_config(&server.uri())).expect("Failed to create client")
}

/// Sample success response for sent messages
fn send_message_success_response() -> serde_json::Value {
    serde_json::json!({
        "messaging_product": "whatsapp",
        "contacts": [{"input": "573001234567", "wa_id": "573001234567"}],
        "messages": [{"id": "wamid.sent"}]
    })
}

/// Sample API error response
fn api_error_response(code: i32, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message,
            "type": "OAuthException",
            "fbtrace_id": "AbcDefGhiJkL"
        }
    })
}

// =============================================================================
// Read Receipts
// =============================================================================

#[tokio::test]
async fn mark_read_posts_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/PNID/messages"))
        .and(header("Authorization", "Bearer test_access_token"))
        .and(body_json(serde_json::json!({
            "messaging_product": "whatsapp",
            "status": "read",
            "message_id": "wamid.in"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).mark_read("PNID", "wamid.in").await.unwrap();
}

// =============================================================================
// Text Messages
// =============================================================================

#[tokio::test]
async fn send_text_threads_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/PNID/messages"))
        .and(body_json(serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": "573001234567",
            "type": "text",
            "text": {"preview_url": false, "body": "Hola 👋"},
            "context": {"message_id": "wamid.in"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(send_message_success_response()))
        .expect(1)
        .mount(&server)
        .await;

    let id = client(&server)
        .send_text("PNID", "573001234567", "Hola 👋", Some("wamid.in"))
        .await
        .unwrap();
    assert_eq!(id, "wamid.sent");
}

#[tokio::test]
async fn send_text_without_context() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/PNID/messages"))
        .and(body_json(serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": "573001234567",
            "type": "text",
            "text": {"preview_url": false, "body": "hola"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(send_message_success_response()))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .send_text("PNID", "573001234567", "hola", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn send_text_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/PNID/messages"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(api_error_response(190, "Invalid OAuth access token")),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .send_text("PNID", "573001234567", "hola", None)
        .await
        .unwrap_err();

    match err {
        WhatsAppError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid OAuth access token");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_is_kept() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/PNID/messages"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client(&server)
        .send_text("PNID", "573001234567", "hola", None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("503"));
    assert!(err.to_string().contains("upstream unavailable"));
}

// =============================================================================
// Media Messages
// =============================================================================

#[tokio::test]
async fn upload_media_uses_media_api_version() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v21.0/PNID/media"))
        .and(header("Authorization", "Bearer test_access_token"))
        .and(body_string_contains("name=\"messaging_product\""))
        .and(body_string_contains("filename=\"file.mpeg\""))
        .and(body_string_contains("audio/mpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "media-up"})))
        .expect(1)
        .mount(&server)
        .await;

    let id = client(&server)
        .upload_media("PNID", b"mp3".to_vec(), "audio/mpeg", "mpeg")
        .await
        .unwrap();
    assert_eq!(id, "media-up");
}

#[tokio::test]
async fn send_media_uses_top_level_type_as_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v19.0/PNID/messages"))
        .and(body_json(serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": "573001234567",
            "type": "image",
            "image": {"id": "media-up"},
            "context": {"message_id": "wamid.in"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(send_message_success_response()))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .send_media("PNID", "573001234567", "media-up", "image", Some("wamid.in"))
        .await
        .unwrap();
}

// =============================================================================
// Media Download
// =============================================================================

#[tokio::test]
async fn media_info_and_download() {
    let server = MockServer::start().await;
    let lookaside = format!("{}/lookaside/media-1", server.uri());

    Mock::given(method("GET"))
        .and(path("/v19.0/media-1/"))
        .and(header("Authorization", "Bearer test_access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messaging_product": "whatsapp",
            "url": lookaside,
            "mime_type": "audio/ogg; codecs=opus",
            "sha256": "abc123",
            "file_size": 2048,
            "id": "media-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lookaside/media-1"))
        .and(header("Authorization", "Bearer test_access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"OggS".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let info = client.media_info("media-1").await.unwrap();
    assert_eq!(info.mime_type, "audio/ogg; codecs=opus");
    assert_eq!(info.file_size, 2048);
    assert_eq!(info.sha256, "abc123");

    let bytes = client.download_media(&info.url).await.unwrap();
    assert_eq!(bytes, b"OggS");
}

#[tokio::test]
async fn media_info_missing_fields_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v19.0/media-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "media-1"})))
        .mount(&server)
        .await;

    let err = client(&server).media_info("media-1").await.unwrap_err();
    assert!(matches!(err, WhatsAppError::InvalidResponse(_)));
}

#[tokio::test]
async fn download_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lookaside/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server)
        .download_media(&format!("{}/lookaside/gone", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, WhatsAppError::Api { status: 404, .. }));
}

// =============================================================================
// Property-Based Tests
// =============================================================================

mod proptest_tests {
    use integration_whatsapp::{WebhookPayload, extract_changes, verify_signature};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn webhook_signature_requires_sha256_prefix(
            prefix in "[a-zA-Z0-9]{1,10}",
            hex in "[0-9a-fA-F]{64}"
        ) {
            let with_wrong_prefix = format!("{prefix}={hex}");
            if prefix != "sha256" {
                prop_assert!(!verify_signature(b"test", &with_wrong_prefix, "secret"));
            }
        }

        #[test]
        fn text_bodies_survive_extraction(body in "\\PC{1,500}") {
            let payload: WebhookPayload = serde_json::from_value(serde_json::json!({
                "entry": [{"changes": [{
                    "field": "messages",
                    "value": {
                        "metadata": {"phone_number_id": "PNID"},
                        "messages": [{"from": "573001234567", "id": "w", "type": "text", "text": {"body": body.clone()}}]
                    }
                }]}]
            })).unwrap();

            let changes = extract_changes(&payload);
            prop_assert_eq!(changes.len(), 1);
            prop_assert_eq!(
                &changes[0].messages[0].kind,
                &domain::MessageKind::Text { body }
            );
        }
    }
}
