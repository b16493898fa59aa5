//! Serverless invocation entry point
//!
//! An event is a flat JSON object: an `http` object with `method` and `path`,
//! the query parameters (`hub.mode`, `hub.verify_token`, `hub.challenge`) and,
//! for `POST`, the webhook body fields (`object`, `entry`). Keys starting with
//! `__ow` are platform metadata.
//!
//! Every outcome is a [`InvocationResponse`] with a `text/plain` body. Failed
//! message processing is logged here and still answered with `200` so Meta
//! does not redeliver the notification.

use std::collections::BTreeMap;

use application::InvocationContext;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use integration_whatsapp::{WebhookPayload, extract_changes};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{Instrument, debug, error, info, warn};

use crate::state::AppState;

/// Body of every liveness answer
pub const ALIVE: &str = "I'm alive";

const TEXT_PLAIN: &str = "text/plain";
const SUBSCRIBE_MODE: &str = "subscribe";
const PLATFORM_KEY_PREFIX: &str = "__ow";

/// Response triple returned to the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub body: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
}

impl InvocationResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status_code: status.as_u16(),
            headers: BTreeMap::from([("Content-Type".to_string(), TEXT_PLAIN.to_string())]),
        }
    }

    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::ok(String::new())
    }

    #[must_use]
    pub fn alive() -> Self {
        Self::ok(ALIVE)
    }

    #[must_use]
    pub fn invalid_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid request")
    }
}

impl IntoResponse for InvocationResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], self.body).into_response()
    }
}

/// `method` and `path` of the HTTP request that triggered the invocation
#[derive(Debug, Default, Deserialize)]
struct HttpInfo {
    #[serde(default)]
    method: String,
    #[serde(default)]
    path: String,
}

/// Route one platform event
pub async fn handle_invocation(
    state: &AppState,
    event: &Value,
    ctx: &InvocationContext,
) -> InvocationResponse {
    let span = ctx.span().clone();
    route(state, event, ctx).instrument(span).await
}

async fn route(state: &AppState, event: &Value, ctx: &InvocationContext) -> InvocationResponse {
    debug!(diagnostics = %ctx.diagnostics(), "Routing invocation");

    if event.get("healthcheck").and_then(Value::as_bool) == Some(true) {
        return InvocationResponse::alive();
    }
    let Some(http) = event.get("http") else {
        return InvocationResponse::invalid_request();
    };
    let http: HttpInfo = serde_json::from_value(http.clone()).unwrap_or_default();

    match http.method.to_ascii_uppercase().as_str() {
        "GET" if http.path == "/healthcheck" => InvocationResponse::alive(),
        "GET" => confirm_subscription(state, event),
        "POST" => {
            process_event(state, event, ctx).await;
            InvocationResponse::empty()
        },
        other => {
            debug!(method = other, "Ignoring method");
            InvocationResponse::empty()
        },
    }
}

/// Answer Meta's webhook subscription handshake
fn confirm_subscription(state: &AppState, event: &Value) -> InvocationResponse {
    let param = |name: &str| event.get(name).and_then(Value::as_str).unwrap_or_default();

    if param("hub.mode") != SUBSCRIBE_MODE {
        debug!(mode = param("hub.mode"), "Invalid hub.mode");
        return InvocationResponse::new(StatusCode::BAD_REQUEST, "Invalid mode");
    }
    if state.verify_token() != Some(param("hub.verify_token")) {
        warn!("Webhook verification failed: token mismatch");
        return InvocationResponse::new(StatusCode::FORBIDDEN, "Verification token mismatch");
    }

    info!("Webhook subscription verified");
    InvocationResponse::ok(param("hub.challenge"))
}

async fn process_event(state: &AppState, event: &Value, ctx: &InvocationContext) {
    let payload: WebhookPayload = match serde_json::from_value(event.clone()) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Ignoring event with unexpected shape");
            return;
        },
    };

    let changes = extract_changes(&payload);
    if changes.is_empty() {
        debug!("No messages in event");
        return;
    }

    let Some(dispatcher) = &state.dispatcher else {
        error!(
            event = %sanitized(event),
            "Failed to process the request: dispatcher is not available"
        );
        return;
    };

    match dispatcher.dispatch(&changes, ctx).await {
        Ok(summary) => debug!(handled = summary.handled, "Event processed"),
        Err(e) => error!(
            error = %e,
            diagnostics = %ctx.diagnostics(),
            event = %sanitized(event),
            "Failed to process the request"
        ),
    }
}

/// The event without `http` and platform metadata, for failure logs
pub fn sanitized(event: &Value) -> Value {
    match event {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .filter(|(key, _)| *key != "http" && !key.starts_with(PLATFORM_KEY_PREFIX))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Map<_, _>>(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use infrastructure::WhatsAppConfig;
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;

    fn state() -> AppState {
        let whatsapp = WhatsAppConfig {
            verify_token: Some(SecretString::from("s3cret")),
            ..WhatsAppConfig::default()
        };
        AppState::new(whatsapp, None)
    }

    async fn invoke(event: Value) -> InvocationResponse {
        handle_invocation(&state(), &event, &InvocationContext::new("act-1", None)).await
    }

    #[tokio::test]
    async fn healthcheck_flag_wins_over_everything() {
        let response = invoke(json!({"healthcheck": true})).await;
        assert_eq!(response, InvocationResponse::alive());
    }

    #[tokio::test]
    async fn missing_http_is_invalid() {
        let response = invoke(json!({"entry": []})).await;
        assert_eq!(response.status_code, 400);
        assert_eq!(response.body, "Invalid request");
    }

    #[tokio::test]
    async fn get_healthcheck_path_is_alive() {
        let response = invoke(json!({"http": {"method": "GET", "path": "/healthcheck"}})).await;
        assert_eq!(response.body, ALIVE);
    }

    #[tokio::test]
    async fn subscription_handshake() {
        let http = json!({"method": "GET", "path": ""});

        let ok = invoke(json!({
            "http": http, "hub.mode": "subscribe", "hub.verify_token": "s3cret", "hub.challenge": "1158201444"
        }))
        .await;
        assert_eq!((ok.status_code, ok.body.as_str()), (200, "1158201444"));

        let mismatch = invoke(json!({
            "http": http, "hub.mode": "subscribe", "hub.verify_token": "nope", "hub.challenge": "1"
        }))
        .await;
        assert_eq!(mismatch.status_code, 403);
        assert_eq!(mismatch.body, "Verification token mismatch");

        let bad_mode = invoke(json!({"http": http, "hub.mode": "unsubscribe"})).await;
        assert_eq!((bad_mode.status_code, bad_mode.body.as_str()), (400, "Invalid mode"));
    }

    #[tokio::test]
    async fn unconfigured_verify_token_never_matches() {
        let state = AppState::new(WhatsAppConfig::default(), None);
        let event = json!({
            "http": {"method": "GET", "path": ""}, "hub.mode": "subscribe", "hub.verify_token": ""
        });
        let response = handle_invocation(&state, &event, &InvocationContext::generate()).await;
        assert_eq!(response.status_code, 403);
    }

    #[tokio::test]
    async fn post_without_messages_is_acknowledged() {
        let response = invoke(json!({
            "http": {"method": "POST", "path": ""},
            "object": "whatsapp_business_account",
            "entry": [{"id": "1", "changes": [{"field": "statuses", "value": {}}]}]
        }))
        .await;
        assert_eq!(response, InvocationResponse::empty());
    }

    #[tokio::test]
    async fn post_is_acknowledged_even_without_dispatcher() {
        let response = invoke(json!({
            "http": {"method": "POST", "path": ""},
            "entry": [{"changes": [{"field": "messages", "value": {
                "metadata": {"phone_number_id": "106540352242922"},
                "messages": [{"from": "573001234567", "id": "wamid.1", "type": "text", "text": {"body": "hola"}}]
            }}]}]
        }))
        .await;
        assert_eq!(response, InvocationResponse::empty());
    }

    #[tokio::test]
    async fn other_methods_get_empty_ok() {
        let response = invoke(json!({"http": {"method": "DELETE", "path": ""}})).await;
        assert_eq!(response, InvocationResponse::empty());
    }

    #[test]
    fn sanitized_drops_transport_keys() {
        let event = json!({
            "http": {"method": "POST"},
            "__ow_headers": {"host": "x"},
            "__ow_path": "",
            "object": "whatsapp_business_account",
            "entry": []
        });
        assert_eq!(
            sanitized(&event),
            json!({"object": "whatsapp_business_account", "entry": []})
        );
    }

    #[test]
    fn response_serializes_platform_shape() {
        let value = serde_json::to_value(InvocationResponse::alive()).unwrap();
        assert_eq!(
            value,
            json!({"body": "I'm alive", "statusCode": 200, "headers": {"Content-Type": "text/plain"}})
        );
    }
}
