//! Audio messages: transcription replies

use domain::{MAX_REPLY_CHARS, MediaKind, chunk_text, replies};
use tracing::{debug, instrument};

use super::Dispatcher;
use crate::{error::ApplicationError, invocation_context::InvocationContext, ports::ReplyTarget};

impl Dispatcher {
    #[instrument(skip(self, target, ctx), fields(diagnostics = %ctx.diagnostics()))]
    pub(super) async fn handle_audio(
        &self,
        media_id: &str,
        target: &ReplyTarget,
        ctx: &InvocationContext,
    ) -> Result<(), ApplicationError> {
        let media = self.fetcher.fetch(media_id, MediaKind::Audio).await?;
        let transcription = self
            .transcription
            .transcribe(media.bytes, &media.mime_type)
            .await?;

        if transcription.trim().is_empty() {
            debug!("Transcription is blank");
            return self.gateway.send_text(target, replies::NO_SPEECH).await;
        }

        let chunks = chunk_text(&transcription, MAX_REPLY_CHARS);
        debug!(chunks = chunks.len(), "Sending transcription");
        self.gateway.send_texts(target, chunks).await
    }
}
