//! Fixed-size text chunking.
//!
//! Chunks are measured in characters and cut without regard for word or sentence
//! boundaries, so every chunk but the last holds exactly `max_chars` characters.

/// Default maximum chunk length in characters
pub const DEFAULT_CHUNK_SIZE: usize = 4000;

/// Split `text` into contiguous, non-overlapping slices of at most `max_chars` characters
///
/// A limit of zero is treated as one.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (index, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..index]);
            start = index;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}
