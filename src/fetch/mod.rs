// src/fetch/mod.rs
// Upstream trend feeds. Providers return one full ranked snapshot per call;
// retries and scheduling live with the caller.

pub mod google;
pub mod youtube;

use anyhow::Result;

use crate::trend::{Snapshot, Source};

#[async_trait::async_trait]
pub trait TrendProvider: Send + Sync {
    /// Fetch the current ranked list for `region` ("KR", "US", ...).
    async fn fetch(&self, region: &str) -> Result<Snapshot>;
    fn source(&self) -> Source;
}
