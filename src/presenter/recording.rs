use std::path::{Path, PathBuf};

use super::{Presenter, Progress};
use crate::pipeline::Article;
use crate::services::ImageReference;
use crate::video::VideoReference;
use crate::{BlogError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    VideoPreview(String),
    Status(String),
    Progress(f64),
    Image(String),
    Article(Article),
    /// Audio path and whether it existed while being presented
    Audio(PathBuf, bool),
    Error(String),
    Success(String),
}

/// Presenter that records what it was shown
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<Event>,
    pub fail_audio: bool,
}

impl RecordingPresenter {
    pub fn progress_values(&self) -> Vec<f64> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Progress(value) => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn audio_path(&self) -> Option<&Path> {
        self.events.iter().find_map(|event| match event {
            Event::Audio(path, _) => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has(&self, matches: impl Fn(&Event) -> bool) -> bool {
        self.events.iter().any(matches)
    }
}

impl Presenter for RecordingPresenter {
    fn video_preview(&mut self, video: &VideoReference) {
        self.events.push(Event::VideoPreview(video.id().to_string()));
    }

    fn status(&mut self, message: &str) {
        self.events.push(Event::Status(message.to_string()));
    }

    fn progress(&mut self, progress: Progress) {
        self.events.push(Event::Progress(progress.fraction()));
    }

    fn image(&mut self, image: &ImageReference, _prompt: &str) {
        self.events.push(Event::Image(image.url().to_string()));
    }

    fn article(&mut self, article: &Article) {
        self.events.push(Event::Article(article.clone()));
    }

    fn audio(&mut self, path: &Path) -> Result<()> {
        self.events.push(Event::Audio(path.to_path_buf(), path.exists()));
        if self.fail_audio {
            anyhow::bail!("audio player unavailable");
        }
        Ok(())
    }

    fn error(&mut self, error: &BlogError) {
        self.events.push(Event::Error(error.to_string()));
    }

    fn success(&mut self, message: &str) {
        self.events.push(Event::Success(message.to_string()));
    }
}
