use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the OpenAI credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text and image generation settings
    pub openai: OpenAiConfig,

    /// Pipeline stage settings
    pub pipeline: PipelineConfig,

    /// Transcript service settings
    pub youtube: YoutubeConfig,

    /// Speech synthesis settings
    pub speech: SpeechConfig,

    /// Application settings
    pub app: AppConfig,

    /// API key, read from the environment, never from the file
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API base URL
    pub base_url: String,

    /// Model used for every text generation call
    pub chat_model: String,

    /// Model used for the featured image
    pub image_model: String,

    /// Square resolution for the featured image
    pub image_size: String,

    /// Image quality tier
    pub image_quality: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum characters per transcript chunk
    pub chunk_size: usize,

    /// Output budget for each chunk summary
    pub summary_max_tokens: u32,

    /// Output budget for the final article
    pub article_max_tokens: u32,

    /// Language passed to speech synthesis
    pub narration_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    /// Base URL for watch pages
    pub base_url: String,

    /// Caption track language to prefer
    pub preferred_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Text-to-speech endpoint
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Temporary directory for narration audio
    pub temp_dir: Option<PathBuf>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            image_quality: "standard".to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4000,
            summary_max_tokens: 500,
            article_max_tokens: 1000,
            narration_language: "en".to_string(),
        }
    }
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            preferred_language: "en".to_string(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com/translate_tts".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file (or defaults) and read the API key from the environment
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::config_path().ok().filter(|p| p.exists()),
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.api_key = std::env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty());
        if config.api_key.is_none() {
            tracing::warn!("{} is not set; generation calls will fail", API_KEY_ENV);
        }

        Ok(config)
    }

    /// Parse and validate a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from {}", path.display());

        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Write configuration to the user config path, returning where it went
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::user_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // Project-local file wins
        let local_config = PathBuf::from("blogsmith.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        Self::user_config_path()
    }

    fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("blogsmith").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.chunk_size == 0 {
            anyhow::bail!("pipeline.chunk_size must be greater than zero");
        }

        if self.openai.chat_model.trim().is_empty() || self.openai.image_model.trim().is_empty() {
            anyhow::bail!("openai model names must not be empty");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  API Base URL: {}", self.openai.base_url);
        println!(
            "  API Key: {}",
            if self.api_key.is_some() { "<set>" } else { "<not set>" }
        );
        println!("  Chat Model: {}", self.openai.chat_model);
        println!(
            "  Image Model: {} ({}, {})",
            self.openai.image_model, self.openai.image_size, self.openai.image_quality
        );
        println!("  Chunk Size: {}", self.pipeline.chunk_size);
        println!(
            "  Token Budgets: summary {}, article {}",
            self.pipeline.summary_max_tokens, self.pipeline.article_max_tokens
        );
        println!("  Narration Language: {}", self.pipeline.narration_language);
        println!("  Caption Language: {}", self.youtube.preferred_language);
        if let Some(dir) = &self.app.temp_dir {
            println!("  Temp Dir: {}", dir.display());
        }
    }
}
