//! User-facing rejections
//!
//! A rejection is a failure caused by what the sender sent, not by the
//! system. It is relayed back to the sender as text (the `Display` output)
//! and processing continues with the next message.

use std::fmt;

use crate::value_objects::{MAX_ASCII_SIDE, MAX_MEDIA_BYTES, MediaKind};

/// Reasons a sender's request cannot be served
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Declared mime type is not in the kind's allow-list
    UnsupportedMediaFormat { kind: MediaKind, mime_type: String },
    /// Declared size exceeds [`MAX_MEDIA_BYTES`]
    MediaTooLarge { kind: MediaKind, file_size: u64 },
    /// Downloaded bytes do not hash to the declared value
    CorruptedMedia {
        kind: MediaKind,
        computed: String,
        expected: String,
    },
    /// Image caption names an unknown operation
    UnknownImageOperation { operation: String },
    /// Image caption has an invalid `w`/`h` value
    InvalidDimension { parameter: String, value: String },
    /// `/voice` names a voice the provider does not offer
    UnknownVoice { short_name: String },
    /// `/voice` without a voice name
    MissingVoiceName,
    /// `/tts` without text
    MissingTtsText,
    /// Message type the bridge cannot handle
    UnsupportedMessageType { message_type: String },
}

impl Rejection {
    const fn noun(kind: MediaKind) -> &'static str {
        match kind {
            MediaKind::Audio => "del audio",
            MediaKind::Image => "de la imagen",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedMediaFormat { kind, mime_type } => {
                let noun = Self::noun(*kind);
                write!(
                    f,
                    "Lo siento, el formato {noun} no es válido. Los formatos válidos son: {}. \
                     El formato {noun} que enviaste es: `{mime_type}`",
                    kind.allowed_formats_sentence()
                )
            },
            Self::MediaTooLarge { kind, file_size } => {
                let noun = Self::noun(*kind);
                #[allow(clippy::cast_precision_loss)]
                let megabytes = *file_size as f64 / (1024.0 * 1024.0);
                write!(
                    f,
                    "Lo siento, el tamaño {noun} es muy grande. El tamaño máximo permitido es de {}MB. \
                     El tamaño {noun} que enviaste es: `{file_size} bytes, {megabytes:.2} MB`",
                    MAX_MEDIA_BYTES / (1024 * 1024)
                )
            },
            Self::CorruptedMedia {
                kind,
                computed,
                expected,
            } => match kind {
                MediaKind::Audio => write!(
                    f,
                    "Lo siento, el audio que enviaste está corrupto. Por favor, intenta enviarlo de nuevo. \
                     `{computed} != {expected}`"
                ),
                MediaKind::Image => write!(
                    f,
                    "Lo siento, la imagen que enviaste está corrupta. Por favor, intenta enviarla de nuevo. \
                     `{computed} != {expected}`"
                ),
            },
            Self::UnknownImageOperation { operation } => write!(
                f,
                "Lo siento, la operación que intentas realizar no es válida. Las operaciones válidas son: \
                 bg (remover fondo de imagen) e i2a (convertir imagen a arte ASCII). \
                 La operación que intentaste realizar es: `{operation}`"
            ),
            Self::InvalidDimension { parameter, value } => write!(
                f,
                "Lo siento, el valor del parámetro `{parameter}` no es válido. \
                 Debe ser un número entero mayor que cero y menor o igual a {MAX_ASCII_SIDE}. \
                 El valor que enviaste es: `{value}`"
            ),
            Self::UnknownVoice { short_name } => write!(
                f,
                "Lo siento, no encontré la voz `{short_name}`. \
                 Escribe `/voices` para ver las voces disponibles."
            ),
            Self::MissingVoiceName => write!(
                f,
                "Lo siento, debes indicar el nombre de la voz, por ejemplo: `/voice es-CO-SalomeNeural`"
            ),
            Self::MissingTtsText => write!(
                f,
                "Lo siento, debes escribir un texto después de `/tts` para convertirlo en audio."
            ),
            Self::UnsupportedMessageType { message_type } => write!(
                f,
                "Lo siento, no puedo procesar este mensaje de tipo: `{message_type}`"
            ),
        }
    }
}

impl std::error::Error for Rejection {}
