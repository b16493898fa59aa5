//! Application layer - Use cases and orchestration
//!
//! Contains the message dispatcher, the media and messaging services it
//! composes, and the port definitions adapters implement.

pub mod error;
pub mod invocation_context;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use invocation_context::InvocationContext;
pub use ports::*;
pub use services::*;
