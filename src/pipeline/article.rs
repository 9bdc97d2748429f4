use serde::{Deserialize, Serialize};

use crate::services::{ChatMessage, TextGenerator};
use crate::BlogError;

/// System instruction for the final article
pub const ARTICLE_INSTRUCTION: &str = "Generate a blog article with title and subtitle from this summary.";

const TITLE_LABEL: &str = "Title: ";
const SUBTITLE_LABEL: &str = "Subtitle: ";

/// Generated blog article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub subtitle: String,
    pub body: String,
}

impl Article {
    /// Parse the generation service's raw article text
    ///
    /// Line 0 is the title and line 1 the subtitle, each with its label stripped;
    /// the remaining lines form the body. Output with fewer than two lines breaks the
    /// service contract and is rejected rather than padded.
    pub fn parse(raw: &str) -> Result<Self, BlogError> {
        let lines: Vec<&str> = raw.split('\n').collect();

        let [title, subtitle, body @ ..] = lines.as_slice() else {
            return Err(BlogError::MalformedArticle(format!(
                "expected a title line and a subtitle line, got {} line(s)",
                lines.len()
            )));
        };

        Ok(Self {
            title: strip_label(title, TITLE_LABEL),
            subtitle: strip_label(subtitle, SUBTITLE_LABEL),
            body: body.join("\n"),
        })
    }
}

fn strip_label(line: &str, label: &str) -> String {
    let line = line.trim_end_matches('\r');
    line.strip_prefix(label).unwrap_or(line).to_string()
}

/// Fold chunk summaries into one summary and generate the article from it
pub async fn synthesize_article(
    generator: &dyn TextGenerator,
    summaries: &[String],
    max_tokens: u32,
) -> Result<Article, BlogError> {
    let combined = summaries.join(" ");
    tracing::info!("Generating article from {} summaries ({} chars)", summaries.len(), combined.len());

    let messages = [ChatMessage::system(ARTICLE_INSTRUCTION), ChatMessage::user(combined)];

    let raw = generator
        .generate_text(&messages, Some(max_tokens))
        .await
        .map_err(|e| BlogError::Generation(format!("{:#}", e)))?;

    Article::parse(&raw)
}
