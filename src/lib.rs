// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod cycle;
pub mod dedup;
pub mod diff;
pub mod engine;
pub mod fetch;
pub mod history;
pub mod metrics;
pub mod notify;
pub mod render;
pub mod schedule;
pub mod store;
pub mod trend;

// ---- Re-exports for stable public API ----
pub use crate::engine::{decide, Entry, Plan, StateUpdate};
pub use crate::schedule::{ScheduleBucket, ScheduleGate};
pub use crate::trend::{Reason, Snapshot, Source, TrendItem, TrendKey};
