//! Text messages: voice commands, synthesis and help

use domain::{
    InboundMessage, MAX_REPLY_CHARS, Rejection, TextCommand, VoiceSelection, chunk_text, replies,
};
use tracing::{debug, instrument, warn};

use super::Dispatcher;
use crate::{error::ApplicationError, ports::ReplyTarget};

impl Dispatcher {
    #[instrument(skip_all)]
    pub(super) async fn handle_text(
        &self,
        body: &str,
        message: &InboundMessage,
        target: &ReplyTarget,
    ) -> Result<(), ApplicationError> {
        let command = TextCommand::parse(body)?;
        debug!(command = ?command, "Parsed text command");

        match command {
            TextCommand::ListVoices { filter } => self.list_voices(filter, message, target).await,
            TextCommand::SelectVoice { short_name } => {
                self.select_voice(&short_name, message, target).await
            },
            TextCommand::Speak { text } => self.speak(&text, message, target).await,
            TextCommand::Help => self.gateway.send_text(target, replies::HELP).await,
        }
    }

    async fn list_voices(
        &self,
        filter: Option<String>,
        message: &InboundMessage,
        target: &ReplyTarget,
    ) -> Result<(), ApplicationError> {
        let filter = match filter {
            Some(filter) => filter,
            None => self.current_voice(message).await.language().to_string(),
        };
        let prefix = filter.to_ascii_lowercase();

        let listing = self
            .synthesis
            .list_voices()
            .await?
            .iter()
            .filter(|voice| voice.locale.to_ascii_lowercase().starts_with(&prefix))
            .map(replies::voice_line)
            .collect::<Vec<_>>()
            .join("\n");

        if listing.is_empty() {
            return self
                .gateway
                .send_text(target, &replies::no_voices(&filter))
                .await;
        }

        self.gateway
            .send_texts(target, chunk_text(&listing, MAX_REPLY_CHARS))
            .await
    }

    async fn select_voice(
        &self,
        short_name: &str,
        message: &InboundMessage,
        target: &ReplyTarget,
    ) -> Result<(), ApplicationError> {
        let voice = self
            .synthesis
            .list_voices()
            .await?
            .into_iter()
            .find(|voice| voice.short_name.eq_ignore_ascii_case(short_name))
            .ok_or_else(|| Rejection::UnknownVoice {
                short_name: short_name.to_string(),
            })?;

        self.sender_store
            .save_voice(&message.sender, &voice)
            .await?;
        self.gateway
            .send_text(target, &replies::voice_saved(&voice))
            .await
    }

    async fn speak(
        &self,
        text: &str,
        message: &InboundMessage,
        target: &ReplyTarget,
    ) -> Result<(), ApplicationError> {
        let voice = self.current_voice(message).await;
        debug!(voice = %voice.short_name, "Synthesizing text");
        let audio = self.synthesis.synthesize(text, &voice).await?;
        self.gateway.send_media(target, audio).await
    }

    /// Stored voice for the sender, or the configured default
    async fn current_voice(&self, message: &InboundMessage) -> VoiceSelection {
        match self.sender_store.voice_for(&message.sender).await {
            Ok(Some(voice)) => voice,
            Ok(None) => self.config.default_voice.clone(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored voice, using default");
                self.config.default_voice.clone()
            },
        }
    }
}
