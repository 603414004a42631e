// src/fetch/google.rs
// Google Trends RSS feed (`trends.google.com/trending/rss?geo=XX`). Identity
// is the normalized search title; rank is the feed position.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::fetch::TrendProvider;
use crate::trend::{normalize_title, Snapshot, Source, TrendItem};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "approx_traffic")]
    approx_traffic: Option<String>,
    #[serde(rename = "news_item", default)]
    news_items: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    #[serde(rename = "news_item_title")]
    title: Option<String>,
    #[serde(rename = "news_item_url")]
    url: Option<String>,
    #[serde(rename = "news_item_source")]
    source: Option<String>,
}

fn parse_rfc2822_to_unix(ts: &str) -> i64 {
    OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
        .unwrap_or(0)
}

pub struct GoogleTrendsProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

impl GoogleTrendsProvider {
    pub fn from_fixture(xml: &str) -> Self {
        Self {
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn from_http() -> Self {
        Self {
            mode: Mode::Http {
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn parse_snapshot(xml: &str) -> Result<Snapshot> {
        let t0 = std::time::Instant::now();
        let rss: Rss = from_str(xml).context("parsing google trends rss")?;

        let mut items = Vec::with_capacity(rss.channel.items.len());
        let mut seen = std::collections::HashSet::new();
        let mut latest_pub: i64 = 0;
        for it in rss.channel.items {
            let raw_title = it.title.unwrap_or_default();
            let identity = normalize_title(&raw_title);
            // Identities must be unique and ranks dense: drop empty titles and
            // normalization collisions (first occurrence keeps the feed slot).
            if identity.is_empty() || !seen.insert(identity.clone()) {
                continue;
            }

            if let Some(pd) = it.pub_date.as_deref() {
                latest_pub = latest_pub.max(parse_rfc2822_to_unix(pd));
            }

            let mut description = match it.approx_traffic.as_deref() {
                Some(traffic) => format!("🔍 {traffic}"),
                None => String::new(),
            };
            let mut url = None;
            if let Some(news) = it.news_items.first() {
                if let (Some(nt), Some(ns)) = (news.title.as_deref(), news.source.as_deref()) {
                    if !description.is_empty() {
                        description.push_str(" | ");
                    }
                    description.push_str(&format!("📰 {} | 📱 {}", normalize_title(nt), ns));
                }
                url = news.url.clone();
            }

            items.push(TrendItem {
                identity: identity.clone(),
                rank: items.len() as u32 + 1,
                title: identity,
                description,
                url,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("fetch_parse_ms").record(ms);
        counter!("fetch_items_total").increment(items.len() as u64);

        let captured_at = DateTime::<Utc>::from_timestamp(latest_pub, 0)
            .filter(|_| latest_pub > 0)
            .unwrap_or_else(Utc::now);
        Ok(Snapshot {
            captured_at,
            items,
        })
    }
}

#[async_trait]
impl TrendProvider for GoogleTrendsProvider {
    async fn fetch(&self, region: &str) -> Result<Snapshot> {
        match &self.mode {
            Mode::Fixture(xml) => Self::parse_snapshot(xml),
            Mode::Http { client } => {
                let url = format!("https://trends.google.com/trending/rss?geo={region}");
                let body = client
                    .get(&url)
                    .send()
                    .await
                    .context("google trends rss get")?
                    .error_for_status()
                    .context("google trends rss status")?
                    .text()
                    .await
                    .context("google trends rss body")?;
                Self::parse_snapshot(&body)
            }
        }
    }

    fn source(&self) -> Source {
        Source::Google
    }
}
