use serde::{Deserialize, Serialize};

use crate::services::{ChatMessage, ImageGenerator, ImageReference, ImageRequest, TextGenerator};
use crate::BlogError;

/// System instruction for deriving the image prompt
pub const IMAGE_PROMPT_INSTRUCTION: &str = "Generate a detailed image prompt for DALL-E based on the blog title.";

/// Featured image and the prompt it was generated from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Illustration {
    pub prompt: String,
    pub image: ImageReference,
}

/// Image output settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettings {
    pub size: String,
    pub quality: String,
}

/// Derive an image prompt from the title, then generate one image from it
pub async fn illustrate(
    generator: &dyn TextGenerator,
    images: &dyn ImageGenerator,
    title: &str,
    settings: &ImageSettings,
) -> Result<Illustration, BlogError> {
    let messages = [
        ChatMessage::system(IMAGE_PROMPT_INSTRUCTION),
        ChatMessage::user(format!("Generate an image prompt for this title: {}", title)),
    ];

    let prompt = generator
        .generate_text(&messages, None)
        .await
        .map_err(|e| BlogError::Generation(format!("image prompt: {:#}", e)))?;

    tracing::debug!("Image prompt: {}", prompt);

    let request = ImageRequest {
        prompt: prompt.clone(),
        size: settings.size.clone(),
        quality: settings.quality.clone(),
        count: 1,
    };

    let image = images
        .generate_image(&request)
        .await
        .map_err(|e| BlogError::ImageGeneration(format!("{:#}", e)))?;

    tracing::info!("Generated featured image: {}", image);
    Ok(Illustration { prompt, image })
}
