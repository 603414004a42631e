// src/history.rs
// Bounded in-memory log of per-key run outcomes, served by /api/status.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::schedule::ScheduleBucket;

#[derive(Debug, Clone, Serialize)]
pub struct CycleRecord {
    pub ts: DateTime<Utc>,
    pub key: String,
    pub bucket: ScheduleBucket,
    pub emitted: usize,
    pub delivered: bool,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<CycleRecord>>,
    cap: usize,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, record: CycleRecord) {
        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(record);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<CycleRecord> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let start = v.len().saturating_sub(n);
        v[start..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(key: &str) -> CycleRecord {
        CycleRecord {
            ts: Utc::now(),
            key: key.to_string(),
            bucket: ScheduleBucket::Delta,
            emitted: 1,
            delivered: true,
        }
    }

    #[test]
    fn cap_drops_oldest() {
        let h = History::with_capacity(3);
        for i in 0..5 {
            h.push(rec(&format!("k{i}")));
        }
        let last = h.snapshot_last_n(10);
        assert_eq!(last.len(), 3);
        assert_eq!(last[0].key, "k2");
        assert_eq!(last[2].key, "k4");
    }
}
