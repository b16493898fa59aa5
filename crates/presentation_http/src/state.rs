//! Application state shared across handlers

use std::sync::Arc;

use application::Dispatcher;
use infrastructure::WhatsAppConfig;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Message dispatcher, absent when the adapters could not be built
    pub dispatcher: Option<Arc<Dispatcher>>,
    /// Webhook verification settings
    pub whatsapp: Arc<WhatsAppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(whatsapp: WhatsAppConfig, dispatcher: Option<Dispatcher>) -> Self {
        Self {
            dispatcher: dispatcher.map(Arc::new),
            whatsapp: Arc::new(whatsapp),
        }
    }

    /// Token Meta must echo back during subscription verification
    pub(crate) fn verify_token(&self) -> Option<&str> {
        self.whatsapp.verify_token_str()
    }

    /// Secret for `X-Hub-Signature-256`, if signature checks are enabled
    pub(crate) fn app_secret(&self) -> Option<&str> {
        self.whatsapp.app_secret_str()
    }
}
