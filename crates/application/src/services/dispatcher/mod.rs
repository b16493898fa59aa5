//! Dispatcher - routes each inbound message to its pipeline
//!
//! For every message of every change, in order: mark read, then branch on
//! the message type. A [`Rejection`](domain::Rejection) is replied to the
//! sender as text and processing continues. Any other error is reported to
//! the sender with a generic failure reply carrying the invocation
//! diagnostics, then returned to the caller.

mod audio;
mod image;
mod text;

use std::{fmt, sync::Arc, time::Duration};

use domain::{InboundChange, InboundMessage, MessageKind, Rejection, VoiceSelection, replies};
use tracing::{Instrument, debug, error, info, warn};

use crate::{
    error::ApplicationError,
    invocation_context::InvocationContext,
    ports::{
        AsciiArtPort, ImageToolsPort, MediaStorePort, MessengerPort, ReplyTarget, SenderStorePort,
        SynthesisPort, TranscriptionPort, VisionPort,
    },
    services::{MediaFetcher, MessagingGateway},
};

/// Dispatcher settings
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Pause between consecutive chunked replies
    pub reply_delay: Duration,
    /// Voice used by `/tts` when the sender chose none
    pub default_voice: VoiceSelection,
    /// Back up inbound and outbound media to object storage
    pub backup_media: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_secs(1),
            default_voice: VoiceSelection::default(),
            backup_media: true,
        }
    }
}

/// Adapters the dispatcher drives
#[derive(Clone)]
pub struct DispatcherPorts {
    pub messenger: Arc<dyn MessengerPort>,
    pub transcription: Arc<dyn TranscriptionPort>,
    pub synthesis: Arc<dyn SynthesisPort>,
    pub vision: Arc<dyn VisionPort>,
    pub image_tools: Arc<dyn ImageToolsPort>,
    pub ascii_art: Arc<dyn AsciiArtPort>,
    pub media_store: Arc<dyn MediaStorePort>,
    pub sender_store: Arc<dyn SenderStorePort>,
}

impl fmt::Debug for DispatcherPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherPorts").finish_non_exhaustive()
    }
}

/// Outcome counters of one dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Messages fully served
    pub handled: usize,
    /// Messages answered with a rejection
    pub rejected: usize,
}

/// Message dispatcher
pub struct Dispatcher {
    fetcher: MediaFetcher,
    gateway: MessagingGateway,
    transcription: Arc<dyn TranscriptionPort>,
    synthesis: Arc<dyn SynthesisPort>,
    vision: Arc<dyn VisionPort>,
    image_tools: Arc<dyn ImageToolsPort>,
    ascii_art: Arc<dyn AsciiArtPort>,
    media_store: Arc<dyn MediaStorePort>,
    sender_store: Arc<dyn SenderStorePort>,
    config: DispatcherConfig,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("fetcher", &self.fetcher)
            .field("gateway", &self.gateway)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(ports: DispatcherPorts, config: DispatcherConfig) -> Self {
        let backup = config.backup_media.then(|| Arc::clone(&ports.media_store));
        Self {
            fetcher: MediaFetcher::new(Arc::clone(&ports.messenger), backup.clone()),
            gateway: MessagingGateway::new(
                ports.messenger,
                Arc::clone(&ports.sender_store),
                backup,
                config.reply_delay,
            ),
            transcription: ports.transcription,
            synthesis: ports.synthesis,
            vision: ports.vision,
            image_tools: ports.image_tools,
            ascii_art: ports.ascii_art,
            media_store: ports.media_store,
            sender_store: ports.sender_store,
            config,
        }
    }

    pub const fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Process all messages of all changes in declaration order
    ///
    /// Stops at the first system failure, after notifying its sender.
    pub async fn dispatch(
        &self,
        changes: &[InboundChange],
        ctx: &InvocationContext,
    ) -> Result<DispatchSummary, ApplicationError> {
        let mut summary = DispatchSummary::default();
        for change in changes {
            for message in &change.messages {
                let span = tracing::debug_span!(
                    parent: ctx.span(),
                    "message",
                    message_id = %message.id,
                    message_type = message.kind.type_name(),
                );
                let rejected = self
                    .handle_message(&change.phone_number_id, message, ctx)
                    .instrument(span)
                    .await?;
                if rejected {
                    summary.rejected += 1;
                } else {
                    summary.handled += 1;
                }
            }
        }
        info!(parent: ctx.span(), handled = summary.handled, rejected = summary.rejected, "Dispatch finished");
        Ok(summary)
    }

    /// Handle one message under the error policy; returns whether it was rejected
    async fn handle_message(
        &self,
        phone_number_id: &str,
        message: &InboundMessage,
        ctx: &InvocationContext,
    ) -> Result<bool, ApplicationError> {
        let target = ReplyTarget::for_message(phone_number_id, message);

        match self.route(phone_number_id, message, &target, ctx).await {
            Ok(()) => Ok(false),
            Err(ApplicationError::Rejected(rejection)) => {
                debug!(reason = ?rejection, "Replying with rejection");
                self.gateway
                    .send_text(&target, &rejection.to_string())
                    .await?;
                Ok(true)
            },
            Err(e) => {
                error!(error = %e, diagnostics = %ctx.diagnostics(), "Message processing failed");
                let notice = replies::generic_failure(&ctx.diagnostics());
                if let Err(send_err) = self.gateway.send_text(&target, &notice).await {
                    warn!(error = %send_err, "Failed to notify sender about the failure");
                }
                Err(e)
            },
        }
    }

    async fn route(
        &self,
        phone_number_id: &str,
        message: &InboundMessage,
        target: &ReplyTarget,
        ctx: &InvocationContext,
    ) -> Result<(), ApplicationError> {
        self.gateway.mark_read(phone_number_id, &message.id).await?;

        match &message.kind {
            MessageKind::Audio { media_id, .. } => self.handle_audio(media_id, target, ctx).await,
            MessageKind::Text { body } => self.handle_text(body, message, target).await,
            MessageKind::Image {
                media_id, caption, ..
            } => {
                self.handle_image(media_id, caption.as_deref(), target, ctx)
                    .await
            },
            MessageKind::Unsupported { message_type } => Err(Rejection::UnsupportedMessageType {
                message_type: message_type.clone(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use domain::PhoneNumber;

    use super::*;
    use crate::ports::{
        MockAsciiArtPort, MockImageToolsPort, MockMediaStorePort, MockMessengerPort,
        MockSenderStorePort, MockSynthesisPort, MockTranscriptionPort, MockVisionPort,
    };

    pub const SENDER: &str = "573001234567";

    /// Mocks with no expectations; tests add the ones they need
    #[derive(Default)]
    pub struct Mocks {
        pub messenger: MockMessengerPort,
        pub transcription: MockTranscriptionPort,
        pub synthesis: MockSynthesisPort,
        pub vision: MockVisionPort,
        pub image_tools: MockImageToolsPort,
        pub ascii_art: MockAsciiArtPort,
        pub media_store: MockMediaStorePort,
        pub sender_store: MockSenderStorePort,
    }

    impl Mocks {
        /// Messenger accepts read receipts and records text replies
        pub fn with_text_sink(mut self, sink: Arc<std::sync::Mutex<Vec<String>>>) -> Self {
            self.messenger.expect_mark_read().returning(|_, _| Ok(()));
            self.messenger.expect_send_text().returning(move |_, text| {
                sink.lock().unwrap().push(text.to_string());
                Ok(())
            });
            self
        }

        pub fn into_dispatcher(self) -> Dispatcher {
            let ports = DispatcherPorts {
                messenger: Arc::new(self.messenger),
                transcription: Arc::new(self.transcription),
                synthesis: Arc::new(self.synthesis),
                vision: Arc::new(self.vision),
                image_tools: Arc::new(self.image_tools),
                ascii_art: Arc::new(self.ascii_art),
                media_store: Arc::new(self.media_store),
                sender_store: Arc::new(self.sender_store),
            };
            Dispatcher::new(
                ports,
                DispatcherConfig {
                    reply_delay: Duration::ZERO,
                    backup_media: false,
                    ..DispatcherConfig::default()
                },
            )
        }
    }

    pub fn sink() -> Arc<std::sync::Mutex<Vec<String>>> {
        Arc::new(std::sync::Mutex::new(Vec::new()))
    }

    pub fn message(kind: MessageKind) -> InboundMessage {
        InboundMessage::new(
            "wamid.1",
            PhoneNumber::from_wa_id(SENDER).unwrap(),
            kind,
        )
    }

    pub fn change(messages: Vec<InboundMessage>) -> Vec<InboundChange> {
        vec![InboundChange {
            phone_number_id: "pnid".into(),
            messages,
        }]
    }

    pub fn ctx() -> InvocationContext {
        InvocationContext::new("act-1", None)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn default_config() {
        let config = DispatcherConfig::default();
        assert_eq!(config.reply_delay, Duration::from_secs(1));
        assert_eq!(config.default_voice.short_name, "es-CO-SalomeNeural");
        assert!(config.backup_media);
    }

    #[tokio::test]
    async fn empty_changes_touch_nothing() {
        let dispatcher = Mocks::default().into_dispatcher();
        let summary = dispatcher.dispatch(&[], &ctx()).await.unwrap();
        assert_eq!(summary, DispatchSummary::default());
    }

    #[tokio::test]
    async fn unsupported_type_is_answered_and_processing_continues() {
        let replies = sink();
        let dispatcher = Mocks::default()
            .with_text_sink(Arc::clone(&replies))
            .into_dispatcher();

        let messages = vec![
            message(MessageKind::Unsupported {
                message_type: "sticker".into(),
            }),
            message(MessageKind::Text { body: "hola".into() }),
        ];
        let summary = dispatcher.dispatch(&change(messages), &ctx()).await.unwrap();

        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.handled, 1);
        let replies = replies.lock().unwrap();
        assert_eq!(
            replies[0],
            "Lo siento, no puedo procesar este mensaje de tipo: `sticker`"
        );
        assert_eq!(replies[1], replies::HELP);
    }

    #[tokio::test]
    async fn messages_are_marked_read_before_replying() {
        let mut mocks = Mocks::default();
        let mut seq = mockall::Sequence::new();
        mocks
            .messenger
            .expect_mark_read()
            .withf(|pnid, id| pnid == "pnid" && id == "wamid.1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        mocks
            .messenger
            .expect_send_text()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        let dispatcher = mocks.into_dispatcher();

        let messages = vec![message(MessageKind::Text { body: "hola".into() })];
        dispatcher.dispatch(&change(messages), &ctx()).await.unwrap();
    }

    #[tokio::test]
    async fn system_failure_notifies_and_propagates() {
        let replies = sink();
        let mut mocks = Mocks::default().with_text_sink(Arc::clone(&replies));
        mocks
            .messenger
            .expect_media_metadata()
            .returning(|_| Err(ApplicationError::ExternalService("graph 500".into())));
        let dispatcher = mocks.into_dispatcher();

        let messages = vec![
            message(MessageKind::Audio {
                media_id: "m1".into(),
                mime_type: None,
            }),
            message(MessageKind::Text { body: "hola".into() }),
        ];
        let err = dispatcher
            .dispatch(&change(messages), &ctx())
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ExternalService(_)));
        let replies = replies.lock().unwrap();
        assert_eq!(replies.len(), 1, "processing stops after the failure");
        assert!(replies[0].contains("ActvID act-1 Remaining millis n/a"));
    }

    #[tokio::test]
    async fn failing_notification_still_propagates_original_error() {
        let mut mocks = Mocks::default();
        mocks
            .messenger
            .expect_mark_read()
            .returning(|_, _| Err(ApplicationError::ExternalService("read failed".into())));
        mocks
            .messenger
            .expect_send_text()
            .returning(|_, _| Err(ApplicationError::ExternalService("send failed".into())));
        let dispatcher = mocks.into_dispatcher();

        let messages = vec![message(MessageKind::Text { body: "hola".into() })];
        let err = dispatcher
            .dispatch(&change(messages), &ctx())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "External service error: read failed");
    }
}
