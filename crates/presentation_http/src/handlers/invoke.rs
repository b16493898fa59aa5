//! Raw platform events over HTTP
//!
//! `POST /invoke` takes the serverless event as-is and returns the response
//! triple as JSON, the way the platform would see it.

use application::InvocationContext;
use axum::{Json, extract::State};
use serde_json::Value;
use tracing::instrument;

use crate::invocation::{InvocationResponse, handle_invocation};
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn invoke(
    State(state): State<AppState>,
    Json(event): Json<Value>,
) -> Json<InvocationResponse> {
    let ctx = InvocationContext::generate();
    Json(handle_invocation(&state, &event, &ctx).await)
}
