use anyhow::Context;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::io::Write;
use std::path::Path;

use super::SpeechSynthesizer;
use crate::config::SpeechConfig;
use crate::Result;

/// Longest text the translate TTS endpoint accepts in one request
const MAX_PIECE_CHARS: usize = 100;

/// Text-to-speech via the Google Translate TTS endpoint (MP3 output)
pub struct GoogleSpeechClient {
    client: Client,
    config: SpeechConfig,
}

impl GoogleSpeechClient {
    pub fn new(config: SpeechConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn piece_url(&self, piece: &str, language: &str, index: usize, total: usize) -> String {
        format!(
            "{}?ie=UTF-8&client=tw-ob&tl={}&q={}&total={}&idx={}&textlen={}",
            self.config.base_url,
            urlencoding::encode(language),
            urlencoding::encode(piece),
            total,
            index,
            piece.chars().count()
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeechClient {
    async fn synthesize_speech(&self, text: &str, language: &str, destination: &Path) -> Result<()> {
        let pieces = split_for_speech(text, MAX_PIECE_CHARS);
        if pieces.is_empty() {
            anyhow::bail!("No text to speak");
        }

        tracing::debug!("Synthesizing {} speech pieces to {}", pieces.len(), destination.display());

        let mut file = fs_err::File::create(destination)?;
        let mut written = 0u64;

        for (index, piece) in pieces.iter().enumerate() {
            let url = self.piece_url(piece, language, index, pieces.len());
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .context("Speech request failed")?;

            if !response.status().is_success() {
                anyhow::bail!("Speech service returned HTTP {}", response.status());
            }

            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.context("Failed to read speech audio")?;
                file.write_all(&chunk)?;
                written += chunk.len() as u64;
            }
        }

        file.flush()?;
        tracing::debug!("Wrote {} bytes of speech audio", written);

        Ok(())
    }
}

/// Split text into pieces of at most `max_chars`, preferring whitespace boundaries
///
/// Words longer than the limit are hard-split. Whitespace between pieces is dropped.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            pieces.extend(chars.chunks(max_chars).map(|c| c.iter().collect::<String>()));
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}
