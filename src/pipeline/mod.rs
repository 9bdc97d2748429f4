use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub mod article;
pub mod chunker;
pub mod illustrate;
pub mod narrate;
pub mod summarize;
pub mod transcript;

pub use article::Article;
pub use illustrate::{ImageSettings, Illustration};

use crate::config::Config;
use crate::presenter::Presenter;
use crate::services::openai::OpenAiClient;
use crate::services::speech::GoogleSpeechClient;
use crate::services::youtube::YoutubeTranscriptClient;
use crate::services::{ImageGenerator, ImageReference, SpeechSynthesizer, TextGenerator, TranscriptSource};
use crate::video::VideoReference;
use crate::BlogError;

/// Progress of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Idle,
    IdentifierExtracted,
    TranscriptFetched,
    Summarized,
    Synthesized,
    Illustrated,
    Narrated,
    Complete,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Complete | PipelineState::Failed)
    }

    /// Whether a run may move from `self` to `next`
    ///
    /// Stages advance strictly in order. Narration may be skipped, and any
    /// non-terminal state may fail.
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;

        if next == Failed {
            return !self.is_terminal();
        }

        matches!(
            (self, next),
            (Idle, IdentifierExtracted)
                | (IdentifierExtracted, TranscriptFetched)
                | (TranscriptFetched, Summarized)
                | (Summarized, Synthesized)
                | (Synthesized, Illustrated)
                | (Illustrated, Narrated)
                | (Illustrated, Complete)
                | (Narrated, Complete)
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::IdentifierExtracted => "identifier extracted",
            PipelineState::TranscriptFetched => "transcript fetched",
            PipelineState::Summarized => "summarized",
            PipelineState::Synthesized => "synthesized",
            PipelineState::Illustrated => "illustrated",
            PipelineState::Narrated => "narrated",
            PipelineState::Complete => "complete",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Everything a successful run produced, except the discarded narration audio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub video: VideoReference,
    pub article: Article,
    pub image_prompt: String,
    pub image: ImageReference,
    pub chunk_count: usize,
    pub transcript_chars: usize,
    pub narrated: bool,
    pub generated_at: DateTime<Utc>,
}

/// A run that ended in the failed state
#[derive(thiserror::Error, Debug)]
#[error("{error}")]
pub struct PipelineFailure {
    /// Last state reached before failing
    pub last_state: PipelineState,
    pub error: BlogError,
}

/// External services used by the pipeline
#[derive(Clone)]
pub struct Services {
    pub transcripts: Arc<dyn TranscriptSource>,
    pub text: Arc<dyn TextGenerator>,
    pub images: Arc<dyn ImageGenerator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
}

impl Services {
    /// Real HTTP clients configured from `config`
    pub fn from_config(config: &Config) -> Self {
        let openai = Arc::new(OpenAiClient::new(config.openai.clone(), config.api_key.clone()));

        Self {
            transcripts: Arc::new(YoutubeTranscriptClient::new(config.youtube.clone())),
            text: openai.clone(),
            images: openai,
            speech: Arc::new(GoogleSpeechClient::new(config.speech.clone())),
        }
    }
}

/// Per-run tunables
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub chunk_size: usize,
    pub summary_max_tokens: u32,
    pub article_max_tokens: u32,
    pub narration_language: String,
    pub image: ImageSettings,
    pub temp_dir: Option<PathBuf>,
    pub narrate: bool,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk_size: config.pipeline.chunk_size,
            summary_max_tokens: config.pipeline.summary_max_tokens,
            article_max_tokens: config.pipeline.article_max_tokens,
            narration_language: config.pipeline.narration_language.clone(),
            image: ImageSettings {
                size: config.openai.image_size.clone(),
                quality: config.openai.image_quality.clone(),
            },
            temp_dir: config.app.temp_dir.clone(),
            narrate: true,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Sequences the stages from URL to finished blog post
pub struct Pipeline {
    services: Services,
    settings: PipelineSettings,
}

impl Pipeline {
    /// Create a pipeline backed by the real services
    pub fn new(config: &Config) -> Self {
        Self::with_services(Services::from_config(config), PipelineSettings::from_config(config))
    }

    pub fn with_services(services: Services, settings: PipelineSettings) -> Self {
        Self { services, settings }
    }

    pub fn settings_mut(&mut self) -> &mut PipelineSettings {
        &mut self.settings
    }

    /// Run every stage for one submitted URL
    ///
    /// Each run starts from idle. The first failing stage ends the run; its error is
    /// shown through the presenter and returned along with the last state reached.
    pub async fn run(&self, url: &str, presenter: &mut dyn Presenter) -> Result<BlogPost, PipelineFailure> {
        let mut state = PipelineState::Idle;

        match self.run_stages(url, presenter, &mut state).await {
            Ok(post) => Ok(post),
            Err(error) => {
                tracing::error!("Pipeline failed after '{}': {}", state, error);
                presenter.error(&error);
                Err(PipelineFailure {
                    last_state: state,
                    error,
                })
            }
        }
    }

    async fn run_stages(
        &self,
        url: &str,
        presenter: &mut dyn Presenter,
        state: &mut PipelineState,
    ) -> Result<BlogPost, BlogError> {
        let video = VideoReference::from_url(url).ok_or_else(|| BlogError::InvalidUrl(url.to_string()))?;
        advance(state, PipelineState::IdentifierExtracted);
        presenter.video_preview(&video);

        let transcript = transcript::fetch_transcript_text(self.services.transcripts.as_ref(), &video).await?;
        advance(state, PipelineState::TranscriptFetched);

        presenter.status("Generating content... This may take a few minutes.");
        presenter.status("Summarizing transcript chunks...");
        let summaries = summarize::summarize_transcript(
            self.services.text.as_ref(),
            &transcript,
            self.settings.chunk_size,
            self.settings.summary_max_tokens,
            presenter,
        )
        .await?;
        advance(state, PipelineState::Summarized);

        presenter.status("Generating final article...");
        let article =
            article::synthesize_article(self.services.text.as_ref(), &summaries, self.settings.article_max_tokens)
                .await?;
        advance(state, PipelineState::Synthesized);

        presenter.status("Generating image...");
        let illustration = illustrate::illustrate(
            self.services.text.as_ref(),
            self.services.images.as_ref(),
            &article.title,
            &self.settings.image,
        )
        .await?;
        advance(state, PipelineState::Illustrated);

        presenter.image(&illustration.image, &illustration.prompt);
        presenter.article(&article);

        if self.settings.narrate {
            presenter.status("Generating audio...");
            narrate::narrate(
                self.services.speech.as_ref(),
                &article.body,
                &self.settings.narration_language,
                self.settings.temp_dir.as_deref(),
                presenter,
            )
            .await?;
            advance(state, PipelineState::Narrated);
        }

        advance(state, PipelineState::Complete);
        presenter.success("Blog generation complete!");

        Ok(BlogPost {
            video,
            article,
            image_prompt: illustration.prompt,
            image: illustration.image,
            chunk_count: summaries.len(),
            transcript_chars: transcript.chars().count(),
            narrated: self.settings.narrate,
            generated_at: Utc::now(),
        })
    }
}

fn advance(state: &mut PipelineState, next: PipelineState) {
    debug_assert!(state.can_transition_to(next), "illegal transition {} -> {}", state, next);
    tracing::info!("Pipeline: {} -> {}", state, next);
    *state = next;
}
