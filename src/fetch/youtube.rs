// src/fetch/youtube.rs
// YouTube Data API v3 `videos.list chart=mostPopular`. Identity is the video
// id, which survives title edits by the uploader.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::fetch::TrendProvider;
use crate::render::format_views;
use crate::trend::{Snapshot, Source, TrendItem};

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    channel_title: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    #[serde(default)]
    view_count: Option<String>,
}

pub struct YoutubeTrendsProvider {
    mode: Mode,
    max_results: u32,
}

enum Mode {
    Fixture(String),
    Http {
        client: reqwest::Client,
        api_key: String,
    },
}

impl YoutubeTrendsProvider {
    pub fn from_fixture(json: &str) -> Self {
        Self {
            mode: Mode::Fixture(json.to_string()),
            max_results: 10,
        }
    }

    pub fn from_http(api_key: String) -> Self {
        Self {
            mode: Mode::Http {
                client: reqwest::Client::new(),
                api_key,
            },
            max_results: 10,
        }
    }

    /// Reads YOUTUBE_API_KEY. Missing key is a startup error.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("YOUTUBE_API_KEY")
            .map_err(|_| anyhow!("YOUTUBE_API_KEY is not set (check .env.local)"))?;
        Ok(Self::from_http(api_key))
    }

    pub fn with_max_results(mut self, n: u32) -> Self {
        self.max_results = n;
        self
    }

    pub fn parse_snapshot(body: &str) -> Result<Snapshot> {
        let t0 = std::time::Instant::now();
        let resp: VideoListResponse =
            serde_json::from_str(body).context("parsing youtube videos.list response")?;

        let mut items = Vec::with_capacity(resp.items.len());
        for (idx, video) in resp.items.into_iter().enumerate() {
            let views: u64 = video
                .statistics
                .view_count
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            items.push(TrendItem {
                identity: video.id.clone(),
                rank: (idx + 1) as u32,
                title: video.snippet.title,
                description: format!(
                    "👤 {} | 👁 {}회",
                    video.snippet.channel_title,
                    format_views(views)
                ),
                url: Some(format!("https://youtu.be/{}", video.id)),
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("fetch_parse_ms").record(ms);
        counter!("fetch_items_total").increment(items.len() as u64);

        Ok(Snapshot::new(items))
    }
}

#[async_trait]
impl TrendProvider for YoutubeTrendsProvider {
    async fn fetch(&self, region: &str) -> Result<Snapshot> {
        match &self.mode {
            Mode::Fixture(json) => Self::parse_snapshot(json),
            Mode::Http { client, api_key } => {
                let body = client
                    .get("https://www.googleapis.com/youtube/v3/videos")
                    .query(&[
                        ("part", "snippet,statistics"),
                        ("chart", "mostPopular"),
                        ("regionCode", region),
                        ("maxResults", &self.max_results.to_string()),
                        ("key", api_key),
                    ])
                    .send()
                    .await
                    .context("youtube videos.list get")?
                    .error_for_status()
                    .context("youtube videos.list status")?
                    .text()
                    .await
                    .context("youtube videos.list body")?;
                Self::parse_snapshot(&body)
            }
        }
    }

    fn source(&self) -> Source {
        Source::Youtube
    }
}
