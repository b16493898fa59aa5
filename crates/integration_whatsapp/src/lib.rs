//! WhatsApp integration
//!
//! Parses WhatsApp Cloud API webhooks into domain messages and talks to the
//! Meta Graph API: read receipts, text and media replies, media upload and
//! media download.

pub mod client;
pub mod webhook;

pub use client::{MediaInfo, WhatsAppClient, WhatsAppClientConfig, WhatsAppError};
pub use webhook::{WebhookPayload, extract_changes, verify_signature};
