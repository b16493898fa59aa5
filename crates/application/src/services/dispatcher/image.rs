//! Image messages: description, background removal and ASCII art

use domain::{
    AsciiArtOptions, BackgroundColor, Dimensions, ImageCommand, MAX_REPLY_CHARS, MediaKind,
    MimeType, VerifiedMedia, chunk_text, replies,
};
use tracing::{debug, instrument, warn};

use super::Dispatcher;
use crate::{
    error::ApplicationError,
    invocation_context::InvocationContext,
    ports::{AsciiArtRequest, MediaPayload, ReplyTarget},
};

impl Dispatcher {
    #[instrument(skip(self, target, ctx), fields(diagnostics = %ctx.diagnostics()))]
    pub(super) async fn handle_image(
        &self,
        media_id: &str,
        caption: Option<&str>,
        target: &ReplyTarget,
        ctx: &InvocationContext,
    ) -> Result<(), ApplicationError> {
        let command = ImageCommand::parse(caption)?;
        debug!(operation = command.name(), "Parsed image caption");

        let media = self.fetcher.fetch(media_id, MediaKind::Image).await?;

        match command {
            ImageCommand::Describe => self.describe(media, target).await,
            ImageCommand::RemoveBackground { background } => {
                let jpeg = self.remove_background(media, background).await?;
                self.gateway
                    .send_media(target, MediaPayload::new(jpeg, MimeType::jpeg()))
                    .await
            },
            ImageCommand::AsciiArt(options) => {
                let jpeg = self.ascii_art(media, options).await?;
                self.gateway
                    .send_media(target, MediaPayload::new(jpeg, MimeType::jpeg()))
                    .await
            },
        }
    }

    async fn describe(
        &self,
        media: VerifiedMedia,
        target: &ReplyTarget,
    ) -> Result<(), ApplicationError> {
        let text = self.vision.analyze(media.bytes, &media.mime_type).await?;
        if text.trim().is_empty() {
            return self.gateway.send_text(target, replies::NO_IMAGE_TEXT).await;
        }

        let blocks = chunk_text(&text, MAX_REPLY_CHARS)
            .iter()
            .map(|chunk| replies::code_block(chunk))
            .collect::<Vec<_>>();
        self.gateway.send_texts(target, blocks).await
    }

    /// Segment the image and flatten the result onto `background` as JPEG
    async fn remove_background(
        &self,
        media: VerifiedMedia,
        background: BackgroundColor,
    ) -> Result<Vec<u8>, ApplicationError> {
        let segmented = self
            .vision
            .remove_background(media.bytes, &media.mime_type)
            .await?;
        debug!(mime_type = %segmented.mime_type, "Background removed");
        self.image_tools
            .flatten_to_jpeg(segmented.bytes, background)
            .await
    }

    /// Render the image as ASCII art and return it as JPEG
    ///
    /// The resized source is staged as `{key}.jpeg` for the rendering
    /// service, which answers with the storage key of the rendered PNG.
    async fn ascii_art(
        &self,
        media: VerifiedMedia,
        options: AsciiArtOptions,
    ) -> Result<Vec<u8>, ApplicationError> {
        let (key, source) = if options.remove_background {
            let key = format!("{}-bgrm", media.media_id);
            (key, self.remove_background(media, options.background).await?)
        } else {
            (media.media_id, media.bytes)
        };

        let source_size = self.image_tools.dimensions(&source).await?;
        let target = Dimensions::resolve(source_size, options.width, options.height);
        debug!(
            source_width = source_size.width,
            source_height = source_size.height,
            width = target.width,
            height = target.height,
            "Resizing image for ASCII art"
        );
        let resized = self.image_tools.resize_to_jpeg(source, target).await?;

        let staged_key = format!("{key}.jpeg");
        self.media_store
            .put(&staged_key, resized, &MimeType::jpeg())
            .await?;

        let request = AsciiArtRequest {
            media_id: key,
            width: target.width,
            height: target.height,
            background_color_name: options.background.name().to_string(),
        };
        let rendered = self.ascii_art.render(&request).await;
        self.discard(&staged_key).await;
        let rendered_key = rendered?;
        let rendered_key = rendered_key.trim();
        debug!(rendered_key = %rendered_key, "ASCII art rendered");

        let png = self.media_store.get(rendered_key).await?;
        self.discard(rendered_key).await;

        self.image_tools
            .flatten_to_jpeg(png, options.background)
            .await
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.media_store.delete(key).await {
            warn!(error = %e, key = %key, "Failed to delete staged object");
        }
    }
}
