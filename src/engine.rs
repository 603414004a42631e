// src/engine.rs
// The notification decision engine: turns (bucket, previous snapshot, fresh
// snapshot, known identities) into exactly what to say and how state should
// change once it has been said. Pure: the caller applies `StateUpdate` only
// after a successful delivery, so an aborted cycle leaves prior state intact
// and is always safe to retry.

use std::collections::BTreeSet;

use crate::diff;
use crate::schedule::ScheduleBucket;
use crate::trend::{Reason, Snapshot, TrendItem};

/// One line of output: an item plus why it is being mentioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub item: TrendItem,
    pub reason: Reason,
}

/// State changes to apply after the rendered message was delivered.
///
/// Dedup epoch resets are not part of this: the cycle runner resets the
/// tracker once per full-refresh run, before processing any key, since one
/// epoch spans every (source, region) key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    /// Replaces the stored snapshot for the key.
    pub snapshot: Snapshot,
    /// Identities to union into the key's dedup namespace.
    pub mark_known: Vec<String>,
}

/// The engine's verdict for one key and one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Nothing to say; no state is touched.
    Silent,
    /// Quiet window: the caller may send the courtesy notice, state untouched.
    QuietNotice,
    /// Send `entries` (ascending by new rank); on success apply `update`.
    /// `update` is `None` for the daily summary, which never mutates state.
    Announce {
        entries: Vec<Entry>,
        update: Option<StateUpdate>,
    },
}

/// Decide what to emit for one key.
///
/// `old` is the stored snapshot (None on bootstrap), `new` the freshly
/// fetched one (None when the fetch failed or the bucket needs no fetch),
/// `known` the key's dedup namespace. Missing upstream data is never an
/// error here; it degrades to `Silent` and the caller retries next tick.
pub fn decide(
    bucket: ScheduleBucket,
    old: Option<&Snapshot>,
    new: Option<&Snapshot>,
    known: &BTreeSet<String>,
) -> Plan {
    match bucket {
        ScheduleBucket::Quiet => Plan::QuietNotice,

        ScheduleBucket::DailySummary => match old {
            Some(stored) if !stored.is_empty() => Plan::Announce {
                entries: stored
                    .items
                    .iter()
                    .map(|item| Entry {
                        item: item.clone(),
                        reason: Reason::Summary,
                    })
                    .collect(),
                update: None,
            },
            _ => Plan::Silent,
        },

        ScheduleBucket::FullRefresh => match new {
            Some(fresh) if !fresh.is_empty() => full_dump(fresh),
            _ => Plan::Silent,
        },

        ScheduleBucket::Delta => {
            let Some(fresh) = new.filter(|s| !s.is_empty()) else {
                return Plan::Silent;
            };
            match old.filter(|s| !s.is_empty()) {
                // NoPriorState -> FullRefresh: the first cycle for a key
                // always produces output.
                None => full_dump(fresh),
                Some(stored) => delta(stored, fresh, known),
            }
        }
    }
}

/// Emit the whole list, remember every identity, replace the snapshot.
fn full_dump(fresh: &Snapshot) -> Plan {
    let entries = fresh
        .items
        .iter()
        .map(|item| Entry {
            item: item.clone(),
            reason: Reason::Full,
        })
        .collect();
    let mark_known = fresh.items.iter().map(|i| i.identity.clone()).collect();
    Plan::Announce {
        entries,
        update: Some(StateUpdate {
            snapshot: fresh.clone(),
            mark_known,
        }),
    }
}

fn delta(stored: &Snapshot, fresh: &Snapshot, known: &BTreeSet<String>) -> Plan {
    let changes = diff::diff(stored, fresh);

    // Entries already surfaced this epoch stay suppressed; rank moves are
    // allowed to repeat.
    let entered: Vec<TrendItem> = changes
        .entered
        .into_iter()
        .filter(|item| !known.contains(&item.identity))
        .collect();

    if entered.is_empty() && changes.improved.is_empty() && changes.worsened.is_empty() {
        return Plan::Silent;
    }

    let mark_known: Vec<String> = entered.iter().map(|i| i.identity.clone()).collect();

    let mut entries: Vec<Entry> = Vec::new();
    entries.extend(entered.into_iter().map(|item| Entry {
        item,
        reason: Reason::Entered,
    }));
    entries.extend(changes.improved.into_iter().map(|shift| Entry {
        reason: Reason::Improved {
            from: shift.old_rank,
            to: shift.new_rank,
        },
        item: shift.item,
    }));
    entries.extend(changes.worsened.into_iter().map(|shift| Entry {
        reason: Reason::Worsened {
            from: shift.old_rank,
            to: shift.new_rank,
        },
        item: shift.item,
    }));
    // Stable: ties keep the entered/improved/worsened insertion order, which
    // itself follows the new snapshot's order.
    entries.sort_by_key(|e| e.item.rank);

    Plan::Announce {
        entries,
        update: Some(StateUpdate {
            snapshot: fresh.clone(),
            mark_known,
        }),
    }
}
