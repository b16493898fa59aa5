//! Liveness handler

use crate::invocation::InvocationResponse;

/// Liveness check - is the server running?
pub async fn health_check() -> InvocationResponse {
    InvocationResponse::alive()
}
