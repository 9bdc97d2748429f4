use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

#[cfg(test)]
pub mod recording;

use crate::pipeline::Article;
use crate::services::ImageReference;
use crate::utils;
use crate::video::VideoReference;
use crate::{BlogError, Result};

/// Chunks summarized so far out of the total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    /// Completed fraction in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// Receives everything a pipeline run shows to the user, in display order
pub trait Presenter {
    /// Preview of the submitted video
    fn video_preview(&mut self, video: &VideoReference);

    /// Informational status line between stages
    fn status(&mut self, message: &str);

    /// Summarization progress, reported after each chunk
    fn progress(&mut self, progress: Progress);

    /// Featured image and the prompt that produced it
    fn image(&mut self, image: &ImageReference, prompt: &str);

    fn article(&mut self, article: &Article);

    /// Narration audio; the file is deleted once this returns
    fn audio(&mut self, path: &Path) -> Result<()>;

    /// Failure that ended the run
    fn error(&mut self, error: &BlogError);

    fn success(&mut self, message: &str);
}

/// Where the terminal presenter should keep the narration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioTarget {
    /// Report the narration and let it be discarded
    Discard,
    /// Copy to a name derived from the article title in the current directory
    AutoNamed,
    /// Copy to an explicit path
    Path(PathBuf),
}

/// Renders a pipeline run on stderr
pub struct TerminalPresenter {
    quiet: bool,
    audio_target: AudioTarget,
    progress_bar: Option<ProgressBar>,
    title: Option<String>,
    saved_audio: Option<PathBuf>,
}

impl TerminalPresenter {
    pub fn new(quiet: bool, audio_target: AudioTarget) -> Self {
        Self {
            quiet,
            audio_target,
            progress_bar: None,
            title: None,
            saved_audio: None,
        }
    }

    /// Path the narration was copied to, if it was kept
    pub fn saved_audio(&self) -> Option<&Path> {
        self.saved_audio.as_deref()
    }

    fn finish_progress(&mut self) {
        if let Some(bar) = self.progress_bar.take() {
            bar.finish_and_clear();
        }
    }

    fn progress_bar(&mut self) -> &ProgressBar {
        let quiet = self.quiet;
        self.progress_bar.get_or_insert_with(|| {
            if quiet {
                return ProgressBar::hidden();
            }
            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        })
    }

    fn keep_audio(&self, path: &Path, destination: &Path) -> Result<()> {
        fs_err::copy(path, destination).context("Failed to save narration audio")?;
        Ok(())
    }
}

impl Presenter for TerminalPresenter {
    fn video_preview(&mut self, video: &VideoReference) {
        eprintln!("{} {}", style("Video:").bold(), video.watch_url());
        eprintln!("{} {}", style("Embed:").dim(), video.embed_url());
    }

    fn status(&mut self, message: &str) {
        self.finish_progress();
        if !self.quiet {
            eprintln!("{} {}", style("ℹ").blue(), message);
        }
    }

    fn progress(&mut self, progress: Progress) {
        let bar = self.progress_bar();
        bar.set_position((progress.fraction() * 100.0).round() as u64);
        bar.set_message(format!("chunk {}/{}", progress.completed, progress.total));
        if progress.completed == progress.total {
            self.finish_progress();
        }
    }

    fn image(&mut self, image: &ImageReference, prompt: &str) {
        self.finish_progress();
        eprintln!();
        eprintln!("{} {}", style("Featured image:").bold(), image);
        eprintln!("{} {}", style("Prompt:").dim(), prompt);
    }

    fn article(&mut self, article: &Article) {
        self.title = Some(article.title.clone());
        eprintln!();
        eprintln!("{}", style(&article.title).bold().underlined());
        eprintln!("{}", style(&article.subtitle).italic());
        eprintln!("---");
        eprintln!("{}", article.body);
        eprintln!();
    }

    fn audio(&mut self, path: &Path) -> Result<()> {
        let size = fs_err::metadata(path)?.len();

        let destination = match &self.audio_target {
            AudioTarget::Discard => {
                eprintln!(
                    "{} narration ready ({}); pass --save-audio to keep it",
                    style("♪").magenta(),
                    utils::format_file_size(size)
                );
                return Ok(());
            }
            AudioTarget::AutoNamed => {
                let base = self.title.as_deref().unwrap_or("article");
                PathBuf::from(utils::generate_unique_filename(base, "mp3"))
            }
            AudioTarget::Path(path) => path.clone(),
        };

        self.keep_audio(path, &destination)?;
        eprintln!(
            "{} narration saved to {} ({})",
            style("♪").magenta(),
            destination.display(),
            utils::format_file_size(size)
        );
        self.saved_audio = Some(destination);

        Ok(())
    }

    fn error(&mut self, error: &BlogError) {
        self.finish_progress();
        eprintln!("{} {}", style("✗").red().bold(), style(error).red());
    }

    fn success(&mut self, message: &str) {
        self.finish_progress();
        eprintln!("{} {}", style("✓").green().bold(), message);
    }
}
