use crate::services::TranscriptSource;
use crate::video::VideoReference;
use crate::BlogError;

/// Fetch a video's transcript and join its fragments into one text
///
/// Fragments are joined with a single space in the order the service returned them.
/// A transcript with no text is treated as unavailable.
pub async fn fetch_transcript_text(
    source: &dyn TranscriptSource,
    video: &VideoReference,
) -> Result<String, BlogError> {
    tracing::info!("Fetching transcript for video {}", video);

    let fragments = source
        .fetch_transcript(video)
        .await
        .map_err(|e| BlogError::TranscriptUnavailable(format!("{:#}", e)))?;

    let text = fragments
        .iter()
        .map(|fragment| fragment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    if text.trim().is_empty() {
        return Err(BlogError::EmptyTranscript(video.to_string()));
    }

    tracing::debug!("Transcript has {} fragments, {} characters", fragments.len(), text.chars().count());
    Ok(text)
}
