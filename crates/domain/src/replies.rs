//! Fixed reply texts sent to senders

use crate::value_objects::VoiceSelection;

/// Reply to any text that is not a command
pub const HELP: &str = "¡Hola! Envíame un audio para responderte con la transcripción de este, \
                        o escribe `/tts` seguido de un texto para convertirlo en audio. \
                        Usa `/voices` para ver las voces disponibles y `/voice` para elegir una.";

/// Reply to an audio whose transcription is blank
pub const NO_SPEECH: &str = "Lo siento, no pude detectar voz en el audio que enviaste.";

/// Reply to an image without readable text or caption
pub const NO_IMAGE_TEXT: &str = "Lo siento, no pude encontrar texto ni una descripción en la imagen que enviaste.";

/// Reply sent when a system error interrupts processing
pub fn generic_failure(diagnostics: &str) -> String {
    format!(
        "Lo siento, ocurrió un error al procesar tu mensaje. \
         Por favor, intenta de nuevo más tarde. `{diagnostics}`"
    )
}

/// Confirmation after a voice was stored
pub fn voice_saved(voice: &VoiceSelection) -> String {
    format!("¡Listo! A partir de ahora usaré la voz `{voice}` para `/tts`.")
}

/// Reply when no voice matches a `/voices` filter
pub fn no_voices(filter: &str) -> String {
    format!("Lo siento, no encontré voces para el filtro: `{filter}`")
}

/// One line of a `/voices` listing
pub fn voice_line(voice: &VoiceSelection) -> String {
    format!("`{}` {} {}", voice.short_name, voice.locale, voice.gender)
}

/// Wrap text in a monospace block
pub fn code_block(text: &str) -> String {
    format!("```{text}```")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_mentions_tts() {
        assert!(HELP.starts_with("¡Hola! Envíame un audio"));
        assert!(HELP.contains("`/tts`"));
    }

    #[test]
    fn generic_failure_embeds_diagnostics() {
        let text = generic_failure("ActvID abc Remaining millis 1200");
        assert!(text.ends_with("`ActvID abc Remaining millis 1200`"));
    }

    #[test]
    fn voice_line_format() {
        let line = voice_line(&VoiceSelection::default());
        assert_eq!(line, "`es-CO-SalomeNeural` es-CO Female");
    }

    #[test]
    fn code_block_wraps_in_backticks() {
        assert_eq!(code_block("texto"), "```texto```");
    }
}
