// src/notify/telegram.rs
// Telegram Bot API transport with bounded retries and exponential backoff.

use anyhow::{anyhow, bail, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{Deliver, OutboundMessage};

#[derive(Clone)]
pub struct TelegramNotifier {
    token: String,
    chat_id: String,
    /// Extra channel for mirrored messages (the YouTube-only channel).
    secondary_chat_id: Option<String>,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            token,
            chat_id,
            secondary_chat_id: None,
            client: Client::new(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
        }
    }

    /// Reads TELEGRAM_BOT_TOKEN, TELEGRAM_CHAT_ID and the optional
    /// YOUTUBE_CHANNEL_ID. Missing credentials are a startup error.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN is not set (check .env.local)"))?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID")
            .map_err(|_| anyhow!("TELEGRAM_CHAT_ID is not set (check .env.local)"))?;
        let mut me = Self::new(token, chat_id);
        if let Ok(id) = std::env::var("YOUTUBE_CHANNEL_ID") {
            me = me.with_secondary(id);
        }
        Ok(me)
    }

    pub fn with_secondary(mut self, chat_id: String) -> Self {
        self.secondary_chat_id = Some(chat_id);
        self
    }

    async fn send_to(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let payload = SendMessage {
            chat_id,
            text,
            parse_mode: "HTML",
        };

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&url)
                .timeout(self.timeout)
                .json(&payload)
                .send()
                .await;

            match res {
                Ok(rsp) => {
                    if let Err(e) = rsp.error_for_status_ref() {
                        if attempt < self.max_retries {
                            tracing::warn!(attempt, error = %e, "telegram send failed, retrying");
                            tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1)))
                                .await;
                            continue;
                        }
                        bail!("telegram sendMessage HTTP error: {e}");
                    }
                    tracing::info!(chat_id, "telegram message sent");
                    return Ok(());
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        tracing::warn!(attempt, error = %e, "telegram request failed, retrying");
                        tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                        continue;
                    }
                    bail!("telegram request failed: {e}");
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl Deliver for TelegramNotifier {
    async fn deliver(&self, msg: &OutboundMessage) -> Result<()> {
        self.send_to(&self.chat_id, &msg.text).await?;
        if msg.mirror_to_secondary {
            if let Some(secondary) = &self.secondary_chat_id {
                self.send_to(secondary, &msg.text).await?;
            }
        }
        Ok(())
    }
}
