//! Dispatcher configuration.

use std::time::Duration;

use application::DispatcherConfig;
use domain::VoiceSelection;
use serde::{Deserialize, Serialize};

/// Reply pacing and default voice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherAppConfig {
    /// Pause between consecutive chunks of a long reply
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,

    /// Voice used when a sender has not picked one with `/voice`
    #[serde(default)]
    pub default_voice: VoiceSelection,
}

const fn default_reply_delay_ms() -> u64 {
    1000
}

impl Default for DispatcherAppConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay_ms(),
            default_voice: VoiceSelection::default(),
        }
    }
}

impl DispatcherAppConfig {
    /// Dispatcher settings; `backup_media` comes from the storage section
    #[must_use]
    pub fn to_dispatcher_config(&self, backup_media: bool) -> DispatcherConfig {
        DispatcherConfig {
            reply_delay: Duration::from_millis(self.reply_delay_ms),
            default_voice: self.default_voice.clone(),
            backup_media,
        }
    }
}
