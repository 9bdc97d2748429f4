use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{TranscriptFragment, TranscriptSource};
use crate::config::YoutubeConfig;
use crate::video::VideoReference;
use crate::Result;

const CAPTION_TRACKS_MARKER: &str = "\"captionTracks\":";

/// Caption track advertised in the watch page player response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

/// Timed text document in YouTube's json3 format
#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedTextEvent {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<TimedTextSegment>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSegment {
    #[serde(default)]
    utf8: String,
}

/// Transcript source backed by YouTube's public caption tracks
pub struct YoutubeTranscriptClient {
    client: Client,
    config: YoutubeConfig,
}

impl YoutubeTranscriptClient {
    pub fn new(config: YoutubeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Download the watch page HTML
    async fn fetch_watch_page(&self, video: &VideoReference) -> Result<String> {
        let mut url = Url::parse(&self.config.base_url).context("Invalid YouTube base URL")?;
        url.set_path("watch");
        url.query_pairs_mut().append_pair("v", video.id());

        tracing::debug!("Fetching watch page: {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .context("Failed to fetch watch page")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch watch page: HTTP {}", response.status());
        }

        response.text().await.context("Failed to read watch page")
    }

    /// Download and parse one caption track
    async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<TranscriptFragment>> {
        let mut url = Url::parse(&track.base_url).context("Invalid caption track URL")?;
        url.query_pairs_mut().append_pair("fmt", "json3");

        tracing::debug!("Fetching caption track ({})", track.language_code);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch caption track")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch caption track: HTTP {}", response.status());
        }

        let body = response.text().await.context("Failed to read caption track")?;
        parse_timed_text(&body)
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptClient {
    async fn fetch_transcript(&self, video: &VideoReference) -> Result<Vec<TranscriptFragment>> {
        let page = self.fetch_watch_page(video).await?;

        let tracks = parse_caption_tracks(&page)?
            .ok_or_else(|| anyhow::anyhow!("No transcript available for video {}", video))?;

        let track = select_track(&tracks, &self.config.preferred_language)
            .ok_or_else(|| anyhow::anyhow!("No transcript available for video {}", video))?;

        if track.language_code != self.config.preferred_language {
            tracing::warn!(
                "No '{}' captions for {}, using '{}'",
                self.config.preferred_language,
                video,
                track.language_code
            );
        }

        let fragments = self.fetch_track(track).await?;
        tracing::info!("Fetched {} transcript fragments for {}", fragments.len(), video);

        Ok(fragments)
    }
}

/// Locate the caption track list embedded in a watch page
///
/// Returns `Ok(None)` when the page advertises no captions at all.
fn parse_caption_tracks(page: &str) -> Result<Option<Vec<CaptionTrack>>> {
    let Some(start) = page.find(CAPTION_TRACKS_MARKER) else {
        return Ok(None);
    };

    let rest = &page[start + CAPTION_TRACKS_MARKER.len()..];

    // The array is followed by more player JSON; only read the first value.
    let tracks = serde_json::Deserializer::from_str(rest)
        .into_iter::<Vec<CaptionTrack>>()
        .next()
        .transpose()
        .context("Failed to parse caption track list")?;

    Ok(tracks.filter(|tracks| !tracks.is_empty()))
}

/// Prefer a manual track in the wanted language, then an auto-generated one, then anything
fn select_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    let in_language = |track: &&CaptionTrack| track.language_code == language;
    let is_generated = |track: &CaptionTrack| track.kind.as_deref() == Some("asr");

    tracks
        .iter()
        .filter(in_language)
        .find(|track| !is_generated(*track))
        .or_else(|| tracks.iter().find(in_language))
        .or_else(|| tracks.first())
}

/// Convert a json3 timed text document into transcript fragments
fn parse_timed_text(body: &str) -> Result<Vec<TranscriptFragment>> {
    let document: TimedText = serde_json::from_str(body).context("Failed to parse caption track")?;

    let fragments = document
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|seg| seg.utf8.as_str()).collect();
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return None;
            }

            Some(TranscriptFragment {
                text,
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect();

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(language: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://www.youtube.com/api/timedtext?lang={}", language),
            language_code: language.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_caption_tracks_from_page() {
        let page = r#"<script>var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","name":{"simpleText":"English"},"languageCode":"en","kind":"asr"}],"audioTracks":[]}}};</script>"#;

        let tracks = parse_caption_tracks(page).unwrap().unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].language_code, "en");
        assert_eq!(tracks[0].kind.as_deref(), Some("asr"));
        assert!(tracks[0].base_url.contains("lang=en"));
    }

    #[test]
    fn test_page_without_captions() {
        assert!(parse_caption_tracks("<html>no player here</html>").unwrap().is_none());
        assert!(parse_caption_tracks(r#"{"captionTracks":[]}"#).unwrap().is_none());
    }

    #[test]
    fn test_malformed_track_list_is_an_error() {
        assert!(parse_caption_tracks(r#"{"captionTracks":[{"oops"#).is_err());
    }

    #[test]
    fn test_select_track_preference() {
        let tracks = vec![track("de", None), track("en", Some("asr")), track("en", None)];
        assert_eq!(select_track(&tracks, "en").unwrap().kind, None);
        assert_eq!(select_track(&tracks, "en").unwrap().language_code, "en");

        let generated_only = vec![track("de", None), track("en", Some("asr"))];
        assert_eq!(select_track(&generated_only, "en").unwrap().language_code, "en");

        let foreign = vec![track("fr", None)];
        assert_eq!(select_track(&foreign, "en").unwrap().language_code, "fr");

        assert!(select_track(&[], "en").is_none());
    }

    #[test]
    fn test_parse_timed_text() {
        let body = r#"{"wireMagic":"pb3","events":[
            {"tStartMs":0,"dDurationMs":2500,"segs":[{"utf8":"hello"},{"utf8":" world"}]},
            {"tStartMs":2500,"dDurationMs":100,"aAppend":1,"segs":[{"utf8":"\n"}]},
            {"tStartMs":3000},
            {"tStartMs":4000,"dDurationMs":1500,"segs":[{"utf8":"second\nline"}]}
        ]}"#;

        let fragments = parse_timed_text(body).unwrap();
        assert_eq!(
            fragments,
            vec![
                TranscriptFragment {
                    text: "hello world".to_string(),
                    start: 0.0,
                    duration: 2.5,
                },
                TranscriptFragment {
                    text: "second line".to_string(),
                    start: 4.0,
                    duration: 1.5,
                },
            ]
        );
    }
}
