//! Splitting long replies into WhatsApp-sized chunks

/// Maximum characters per text reply
pub const MAX_REPLY_CHARS: usize = 4000;

/// Split `text` into the fewest chunks of at most `max_chars` characters
///
/// Counts Unicode scalar values and never splits inside one. Concatenating
/// the chunks yields `text`. Empty input yields no chunks.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
