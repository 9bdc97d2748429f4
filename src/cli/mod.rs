use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "blogsmith",
    about = "Blogsmith - Turn a YouTube video into an illustrated, narrated blog article",
    version,
    long_about = "Fetches a YouTube video's transcript, summarizes it with a language model, writes a blog article with a generated featured image, and narrates the article body."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators and status lines
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (defaults to ./blogsmith.yaml or the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a blog article from a YouTube URL
    Generate {
        /// YouTube URL (youtube.com/watch?v=... or youtu.be/...)
        #[arg(value_name = "URL")]
        url: String,

        /// Write the finished article to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (printed to stdout when no output file is given)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Keep the narration audio, optionally at the given path
        #[arg(long, value_name = "FILE", num_args = 0..=1)]
        save_audio: Option<Option<PathBuf>>,

        /// Maximum transcript chunk size in characters
        #[arg(long, value_name = "CHARS")]
        chunk_size: Option<usize>,

        /// Skip narration audio
        #[arg(long)]
        no_narration: bool,
    },

    /// Show or initialize configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the default configuration to the user config directory
        #[arg(long, conflicts_with = "show")]
        init: bool,
    },
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// Markdown with the featured image embedded
    Markdown,
    /// JSON with all generated artifacts
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::parse_from([
            "blogsmith",
            "generate",
            "https://youtu.be/abc123",
            "--format",
            "markdown",
            "--save-audio",
            "--chunk-size",
            "2000",
        ]);

        match cli.command {
            Commands::Generate {
                url,
                format,
                save_audio,
                chunk_size,
                no_narration,
                ..
            } => {
                assert_eq!(url, "https://youtu.be/abc123");
                assert_eq!(format, Some(OutputFormat::Markdown));
                assert_eq!(save_audio, Some(None));
                assert_eq!(chunk_size, Some(2000));
                assert!(!no_narration);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_save_audio_with_path() {
        let cli = Cli::parse_from(["blogsmith", "-q", "generate", "u", "--save-audio", "talk.mp3"]);
        assert!(cli.quiet);
        match cli.command {
            Commands::Generate { save_audio, .. } => {
                assert_eq!(save_audio, Some(Some(PathBuf::from("talk.mp3"))));
            }
            _ => panic!("expected generate"),
        }
    }
}
