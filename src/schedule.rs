// src/schedule.rs
// Pure time-of-day classification. No clock access: callers inject `now` in
// the bot's local timezone, which keeps boundary tests exhaustive and cheap.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

/// What the current moment means for notification policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleBucket {
    /// Dump the whole list and reset the dedup epoch.
    FullRefresh,
    /// Report only changes against the stored snapshot.
    Delta,
    /// No-notify window; at most a courtesy notice goes out.
    Quiet,
    /// Re-send the stored snapshot as a day recap, no state changes.
    DailySummary,
}

/// Trigger-hour table. Defaults mirror the production cadence: a run every
/// four hours with the 06:00 run doing the full refresh and 01:00 the recap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleGate {
    /// Hours (local) whose first `trigger_window_min` minutes mean FullRefresh.
    pub trigger_hours: Vec<u32>,
    /// Width of the full-refresh window after a trigger hour, in minutes.
    pub trigger_window_min: u32,
    /// Hour (local) of the daily summary; `None` disables the recap.
    pub summary_hour: Option<u32>,
    /// Hours (local) with no change notifications. Empty disables quiet mode.
    pub quiet_hours: Vec<u32>,
    /// Explicit override for deterministic runs. Never set implicitly.
    pub force: Option<ScheduleBucket>,
}

impl Default for ScheduleGate {
    fn default() -> Self {
        Self {
            trigger_hours: vec![6, 10, 14, 18, 22, 2],
            trigger_window_min: 5,
            summary_hour: Some(1),
            quiet_hours: Vec::new(),
            force: None,
        }
    }
}

impl ScheduleGate {
    /// Classify `now` (already converted to the bot's local offset).
    /// Precedence: force > full-refresh window > daily summary > quiet > delta.
    pub fn classify(&self, now: DateTime<FixedOffset>) -> ScheduleBucket {
        if let Some(forced) = self.force {
            return forced;
        }

        let hour = now.hour();
        let minute = now.minute();

        if self.trigger_hours.contains(&hour) && minute < self.trigger_window_min {
            return ScheduleBucket::FullRefresh;
        }
        if self.summary_hour == Some(hour) {
            return ScheduleBucket::DailySummary;
        }
        if self.quiet_hours.contains(&hour) {
            return ScheduleBucket::Quiet;
        }
        ScheduleBucket::Delta
    }

    /// Hours at which the scheduler loop should fire a run at all. Quiet
    /// hours are included so the courtesy notice actually goes out.
    pub fn run_hours(&self) -> Vec<u32> {
        let mut hours = self.trigger_hours.clone();
        if let Some(h) = self.summary_hour {
            if !hours.contains(&h) {
                hours.push(h);
            }
        }
        for &h in &self.quiet_hours {
            if !hours.contains(&h) {
                hours.push(h);
            }
        }
        hours.sort_unstable();
        hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn kst(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 10, h, m, 0)
            .unwrap()
    }

    #[test]
    fn trigger_window_boundaries() {
        let gate = ScheduleGate::default();
        assert_eq!(gate.classify(kst(6, 0)), ScheduleBucket::FullRefresh);
        assert_eq!(gate.classify(kst(6, 4)), ScheduleBucket::FullRefresh);
        // Window is [0, trigger_window_min): minute 5 falls out.
        assert_eq!(gate.classify(kst(6, 5)), ScheduleBucket::Delta);
        assert_eq!(gate.classify(kst(2, 0)), ScheduleBucket::FullRefresh);
    }

    #[test]
    fn summary_hour_spans_the_whole_hour() {
        let gate = ScheduleGate::default();
        assert_eq!(gate.classify(kst(1, 0)), ScheduleBucket::DailySummary);
        assert_eq!(gate.classify(kst(1, 59)), ScheduleBucket::DailySummary);
        assert_eq!(gate.classify(kst(3, 0)), ScheduleBucket::Delta);
    }

    #[test]
    fn quiet_hours_yield_quiet_only_outside_triggers() {
        let gate = ScheduleGate {
            quiet_hours: vec![3, 4, 5],
            ..ScheduleGate::default()
        };
        assert_eq!(gate.classify(kst(3, 30)), ScheduleBucket::Quiet);
        assert_eq!(gate.classify(kst(5, 0)), ScheduleBucket::Quiet);
        // Trigger window wins over quiet if the tables overlap.
        let overlapping = ScheduleGate {
            quiet_hours: vec![6],
            ..ScheduleGate::default()
        };
        assert_eq!(overlapping.classify(kst(6, 1)), ScheduleBucket::FullRefresh);
        assert_eq!(overlapping.classify(kst(6, 30)), ScheduleBucket::Quiet);
    }

    #[test]
    fn force_override_beats_everything() {
        let gate = ScheduleGate {
            force: Some(ScheduleBucket::Delta),
            ..ScheduleGate::default()
        };
        assert_eq!(gate.classify(kst(6, 0)), ScheduleBucket::Delta);
        assert_eq!(gate.classify(kst(1, 30)), ScheduleBucket::Delta);
    }

    #[test]
    fn run_hours_include_summary_once() {
        let gate = ScheduleGate::default();
        assert_eq!(gate.run_hours(), vec![1, 2, 6, 10, 14, 18, 22]);
        let no_summary = ScheduleGate {
            summary_hour: None,
            ..ScheduleGate::default()
        };
        assert_eq!(no_summary.run_hours(), vec![2, 6, 10, 14, 18, 22]);
    }

    #[test]
    fn run_hours_cover_quiet_hours() {
        let gate = ScheduleGate {
            quiet_hours: vec![3, 4],
            ..ScheduleGate::default()
        };
        assert_eq!(gate.run_hours(), vec![1, 2, 3, 4, 6, 10, 14, 18, 22]);
        // A run fired at a quiet hour classifies as Quiet, not Delta.
        assert_eq!(gate.classify(kst(3, 0)), ScheduleBucket::Quiet);
    }
}
