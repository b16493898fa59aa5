//! SSML document construction

use std::fmt::Write;

use crate::types::VoiceInfo;

/// Wrap `text` in a single-voice SSML document
///
/// The text is XML-escaped; locale, gender and voice name are attribute
/// values and escaped as such.
#[must_use]
pub fn build_ssml(text: &str, voice: &VoiceInfo) -> String {
    let locale = escape_xml(&voice.locale);
    let mut ssml = String::with_capacity(text.len() + 160);
    let _ = write!(
        ssml,
        r#"<speak version="1.0" xml:lang="{locale}"><voice xml:lang="{locale}" xml:gender="{}" name="{}">{}</voice></speak>"#,
        escape_xml(&voice.gender),
        escape_xml(&voice.short_name),
        escape_xml(text),
    );
    ssml
}

/// Escape the five XML special characters
#[must_use]
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
