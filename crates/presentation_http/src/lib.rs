//! WhatsApp bridge HTTP presentation layer
//!
//! Serves the webhook both as a serverless-style `POST /invoke` endpoint and
//! as plain HTTP routes Meta can call directly.

pub mod handlers;
pub mod invocation;
pub mod routes;
pub mod state;

pub use invocation::{InvocationResponse, handle_invocation};
pub use routes::create_router;
pub use state::AppState;
