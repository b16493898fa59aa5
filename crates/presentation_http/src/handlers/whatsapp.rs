//! WhatsApp webhook handlers
//!
//! Translate plain HTTP requests from Meta into platform events so the
//! serverless and server deployments share one routing path.

use std::collections::HashMap;

use application::InvocationContext;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
};
use integration_whatsapp::verify_signature;
use serde_json::{Map, Value, json};
use tracing::{instrument, warn};

use crate::invocation::{InvocationResponse, handle_invocation};
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "x-hub-signature-256";

fn event_from(method: &Method, uri: &Uri, query: HashMap<String, String>) -> Map<String, Value> {
    let mut event: Map<String, Value> = query
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    event.insert(
        "http".to_string(),
        json!({"method": method.as_str(), "path": uri.path()}),
    );
    event
}

/// WhatsApp webhook verification (GET)
///
/// Meta sends `hub.mode`, `hub.verify_token` and `hub.challenge` as query
/// parameters when the webhook is registered.
#[instrument(skip_all)]
pub async fn verify_webhook(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> InvocationResponse {
    let event = Value::Object(event_from(&method, &uri, query));
    handle_invocation(&state, &event, &InvocationContext::generate()).await
}

/// WhatsApp webhook notification (POST)
///
/// With an app secret configured the raw body must carry a valid
/// `X-Hub-Signature-256`. The JSON body fields are merged over the query
/// parameters.
#[instrument(skip_all, fields(size = body.len()))]
pub async fn handle_webhook(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> InvocationResponse {
    if let Some(secret) = state.app_secret() {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !verify_signature(&body, signature, secret) {
            warn!("WhatsApp webhook signature verification failed");
            return InvocationResponse::new(StatusCode::UNAUTHORIZED, "Invalid signature");
        }
    }

    let fields: Map<String, Value> = match serde_json::from_slice(&body) {
        Ok(fields) => fields,
        Err(e) => {
            warn!(error = %e, "Webhook body is not a JSON object");
            return InvocationResponse::invalid_request();
        },
    };

    let mut event = event_from(&method, &uri, query);
    for (key, value) in fields {
        if key != "http" {
            event.insert(key, value);
        }
    }

    let event = Value::Object(event);
    handle_invocation(&state, &event, &InvocationContext::generate()).await
}
