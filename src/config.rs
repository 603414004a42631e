// src/config.rs
// Runtime configuration. TOML is the primary format, JSON accepted as a
// fallback; the path can be overridden via RANKWATCH_CONFIG_PATH. Secrets
// (bot token, chat ids, API key) come from the environment, never from here.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleGate;
use crate::trend::Source;

const ENV_PATH: &str = "RANKWATCH_CONFIG_PATH";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Local working directory for snapshots and dedup state.
    pub data_dir: PathBuf,
    /// Bot-local timezone as a fixed UTC offset (KST = 9).
    pub utc_offset_hours: i32,
    /// Scheduler wake-up interval.
    pub poll_interval_secs: u64,
    /// Upstream fetch attempts per key per run.
    pub fetch_retries: u32,
    pub fetch_retry_delay_secs: u64,
    /// Pause between outgoing messages within one run.
    pub send_gap_secs: u64,
    /// Send the courtesy notice during quiet hours.
    pub quiet_notice: bool,
    pub sources: Vec<Source>,
    pub regions: Vec<String>,
    /// YouTube list size; Google Trends sends whatever the feed carries.
    pub max_results: u32,
    pub schedule: ScheduleGate,
    /// Bind address of the ops router (/health, /api/status, /metrics).
    pub ops_addr: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            utc_offset_hours: 9,
            poll_interval_secs: 60,
            fetch_retries: 3,
            fetch_retry_delay_secs: 5,
            send_gap_secs: 5,
            quiet_notice: true,
            sources: vec![Source::Google, Source::Youtube],
            regions: vec!["KR".to_string(), "US".to_string()],
            max_results: 10,
            schedule: ScheduleGate::default(),
            ops_addr: "127.0.0.1:8000".to_string(),
        }
    }
}

impl BotConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, &ext)
    }

    /// Load order:
    /// 1) $RANKWATCH_CONFIG_PATH
    /// 2) config/rankwatch.toml
    /// 3) config/rankwatch.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_PATH} points to non-existent path"));
        }
        let toml_p = PathBuf::from("config/rankwatch.toml");
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from("config/rankwatch.json");
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<BotConfig> {
    let try_toml = hint_ext == "toml" || !s.trim_start().starts_with('{');
    if try_toml {
        if let Ok(cfg) = toml::from_str(s) {
            return Ok(cfg);
        }
    }
    if let Ok(cfg) = serde_json::from_str(s) {
        return Ok(cfg);
    }
    if !try_toml {
        if let Ok(cfg) = toml::from_str(s) {
            return Ok(cfg);
        }
    }
    Err(anyhow!("unsupported config format"))
}
