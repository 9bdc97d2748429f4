use std::path::Path;
use tempfile::NamedTempFile;

use crate::presenter::Presenter;
use crate::services::SpeechSynthesizer;
use crate::BlogError;

/// Temporary narration file, removed when dropped
#[derive(Debug)]
pub struct AudioArtifact {
    file: NamedTempFile,
}

impl AudioArtifact {
    /// Create an empty `.mp3` file in `dir`, or the system temp directory
    pub fn create(dir: Option<&Path>) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("blogsmith-narration-").suffix(".mp3");

        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for AudioArtifact {
    fn drop(&mut self) {
        tracing::debug!("Removing narration audio {}", self.file.path().display());
    }
}

/// Synthesize the article body, hand the audio to the presenter, then discard it
///
/// The audio file is removed on every exit path, including synthesis or display failure.
pub async fn narrate(
    speech: &dyn SpeechSynthesizer,
    body: &str,
    language: &str,
    temp_dir: Option<&Path>,
    presenter: &mut dyn Presenter,
) -> Result<(), BlogError> {
    let artifact = AudioArtifact::create(temp_dir)
        .map_err(|e| BlogError::SpeechSynthesis(format!("could not create audio file: {}", e)))?;

    tracing::info!("Synthesizing narration ({} chars, language {})", body.len(), language);

    speech
        .synthesize_speech(body, language, artifact.path())
        .await
        .map_err(|e| BlogError::SpeechSynthesis(format!("{:#}", e)))?;

    presenter
        .audio(artifact.path())
        .map_err(|e| BlogError::Presentation(format!("{:#}", e)))?;

    Ok(())
}
