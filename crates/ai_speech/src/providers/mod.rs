//! Speech provider implementations

pub mod azure;
pub mod openai;
