use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ChatMessage, ImageGenerator, ImageReference, ImageRequest, TextGenerator};
use crate::config::OpenAiConfig;
use crate::Result;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Client for the OpenAI chat completion and image generation APIs
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig, api_key: Option<String>) -> Self {
        tracing::debug!(base_url = %config.base_url, model = %config.chat_model, "Creating OpenAI client");
        Self {
            client: Client::new(),
            config,
            api_key,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Missing API key: set {}", crate::config::API_KEY_ENV))?;

        let url = self.endpoint(path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API returned {}: {}", status, api_error_message(&body));
        }

        response
            .json::<R>()
            .await
            .context("Failed to parse OpenAI response")
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("config", &self.config)
            .finish()
    }
}

/// Pull the human-readable message out of an API error body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn first_completion(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| anyhow::anyhow!("OpenAI response contained no completion"))
}

fn first_image(response: ImageGenerationResponse) -> Result<ImageReference> {
    response
        .data
        .into_iter()
        .find_map(|image| image.url)
        .map(ImageReference::new)
        .ok_or_else(|| anyhow::anyhow!("OpenAI response contained no image URL"))
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate_text(&self, messages: &[ChatMessage], max_tokens: Option<u32>) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.config.chat_model,
            messages,
            max_tokens,
        };

        let response: ChatCompletionResponse = self.post_json("chat/completions", &request).await?;
        first_completion(response)
    }
}

#[async_trait]
impl ImageGenerator for OpenAiClient {
    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageReference> {
        let body = ImageGenerationRequest {
            model: &self.config.image_model,
            prompt: &request.prompt,
            size: &request.size,
            quality: &request.quality,
            n: request.count,
        };

        let response: ImageGenerationResponse = self.post_json("images/generations", &body).await?;
        first_image(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_shape() {
        let messages = vec![ChatMessage::system("Summarize this transcript chunk."), ChatMessage::user("hello")];
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            max_tokens: Some(500),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
    }

    #[test]
    fn test_unbounded_request_omits_max_tokens() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: &[],
            max_tokens: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_first_completion() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"A summary."}}]}"#,
        )
        .unwrap();
        assert_eq!(first_completion(response).unwrap(), "A summary.");

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_completion(empty).is_err());
    }

    #[test]
    fn test_first_image() {
        let response: ImageGenerationResponse = serde_json::from_str(
            r#"{"created":1,"data":[{"url":"https://img.example/1.png","revised_prompt":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(first_image(response).unwrap().url(), "https://img.example/1.png");
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota"}}"#;
        assert_eq!(api_error_message(body), "You exceeded your current quota");
        assert_eq!(api_error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let client = OpenAiClient::new(OpenAiConfig::default(), None);
        let err = client
            .generate_text(&[ChatMessage::user("hi")], None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
