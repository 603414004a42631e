// src/notify/mod.rs
// Outbound delivery edge. The engine only ever sees the `Deliver` trait;
// Telegram is the one shipped transport.

pub mod telegram;

use anyhow::Result;

/// A rendered message ready to send. `mirror_to_secondary` asks the transport
/// to copy the message to its secondary channel, if one is configured
/// (the dedicated YouTube channel in production).
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub text: String,
    pub mirror_to_secondary: bool,
}

impl OutboundMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mirror_to_secondary: false,
        }
    }

    pub fn mirrored(mut self) -> Self {
        self.mirror_to_secondary = true;
        self
    }
}

#[async_trait::async_trait]
pub trait Deliver: Send + Sync {
    async fn deliver(&self, msg: &OutboundMessage) -> Result<()>;
}
