//! Blogsmith - turn a YouTube video into an illustrated, narrated blog article
//!
//! The library fetches a video's transcript, summarizes it chunk by chunk with a
//! language model, composes an article, derives a featured image and narrates the
//! article body. External services sit behind the traits in [`services`] so the
//! [`pipeline::Pipeline`] can run against real clients or test doubles.

pub mod cli;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod presenter;
pub mod services;
pub mod utils;
pub mod video;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use pipeline::{Article, BlogPost, Pipeline, PipelineFailure, PipelineState};
pub use presenter::{Presenter, TerminalPresenter};
pub use video::VideoReference;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Where a pipeline error originated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad user input, the pipeline never started
    Input,
    /// An external service failed or had nothing to offer
    Upstream,
    /// A service answered with output the pipeline cannot use
    ContractViolation,
    /// Local failure such as the filesystem or the display
    Local,
}

/// Errors that terminate a pipeline run
#[derive(thiserror::Error, Debug)]
pub enum BlogError {
    #[error("Could not find a YouTube video ID in: {0}")]
    InvalidUrl(String),

    #[error("Error fetching transcript: {0}")]
    TranscriptUnavailable(String),

    #[error("Transcript for video {0} is empty")]
    EmptyTranscript(String),

    #[error("Text generation failed: {0}")]
    Generation(String),

    #[error("Malformed article from generation service: {0}")]
    MalformedArticle(String),

    #[error("Image generation failed: {0}")]
    ImageGeneration(String),

    #[error("Speech synthesis failed: {0}")]
    SpeechSynthesis(String),

    #[error("Presentation failed: {0}")]
    Presentation(String),
}

impl BlogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BlogError::InvalidUrl(_) => ErrorCategory::Input,
            BlogError::TranscriptUnavailable(_)
            | BlogError::EmptyTranscript(_)
            | BlogError::Generation(_)
            | BlogError::ImageGeneration(_)
            | BlogError::SpeechSynthesis(_) => ErrorCategory::Upstream,
            BlogError::MalformedArticle(_) => ErrorCategory::ContractViolation,
            BlogError::Presentation(_) => ErrorCategory::Local,
        }
    }
}
