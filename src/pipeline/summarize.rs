use super::chunker::chunk_text;
use crate::presenter::{Presenter, Progress};
use crate::services::{ChatMessage, TextGenerator};
use crate::BlogError;

/// System instruction for each chunk summary
pub const SUMMARY_INSTRUCTION: &str = "Summarize this transcript chunk.";

/// Summarize a transcript one chunk at a time
///
/// Chunks are sent sequentially, one generation call each, and progress is reported
/// after every chunk. Any failed call fails the whole stage.
pub async fn summarize_transcript(
    generator: &dyn TextGenerator,
    transcript: &str,
    chunk_size: usize,
    max_tokens: u32,
    presenter: &mut dyn Presenter,
) -> Result<Vec<String>, BlogError> {
    let chunks = chunk_text(transcript, chunk_size);
    let total = chunks.len();
    let mut summaries = Vec::with_capacity(total);

    tracing::info!("Summarizing {} transcript chunks", total);

    for (index, chunk) in chunks.into_iter().enumerate() {
        let messages = [ChatMessage::system(SUMMARY_INSTRUCTION), ChatMessage::user(chunk)];

        let summary = generator
            .generate_text(&messages, Some(max_tokens))
            .await
            .map_err(|e| BlogError::Generation(format!("chunk {} of {}: {:#}", index + 1, total, e)))?;

        tracing::debug!("Chunk {}/{} summarized ({} chars)", index + 1, total, summary.len());
        summaries.push(summary);
        presenter.progress(Progress::new(index + 1, total));
    }

    Ok(summaries)
}
