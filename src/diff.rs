// src/diff.rs
// Typed diff between two snapshots of the same key. Pure and total: an empty
// `old` classifies everything in `new` as entered. Items that fell out of the
// ranking are dropped without a bucket.

use std::collections::HashMap;

use crate::trend::{Snapshot, TrendItem};

/// An item that kept its identity but moved rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankShift {
    pub item: TrendItem,
    pub old_rank: u32,
    pub new_rank: u32,
}

/// Four disjoint buckets over `new`'s items. Each bucket preserves the new
/// snapshot's order, so every bucket is already ascending by new rank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub entered: Vec<TrendItem>,
    pub improved: Vec<RankShift>,
    pub worsened: Vec<RankShift>,
    pub unchanged: Vec<TrendItem>,
}

impl ChangeSet {
    /// True if anything worth telling the channel about happened.
    /// `unchanged` never counts.
    pub fn has_movement(&self) -> bool {
        !(self.entered.is_empty() && self.improved.is_empty() && self.worsened.is_empty())
    }
}

pub fn diff(old: &Snapshot, new: &Snapshot) -> ChangeSet {
    let old_ranks: HashMap<&str, u32> = old
        .items
        .iter()
        .map(|it| (it.identity.as_str(), it.rank))
        .collect();

    let mut out = ChangeSet::default();
    for item in &new.items {
        match old_ranks.get(item.identity.as_str()) {
            None => out.entered.push(item.clone()),
            Some(&old_rank) if item.rank < old_rank => out.improved.push(RankShift {
                item: item.clone(),
                old_rank,
                new_rank: item.rank,
            }),
            Some(&old_rank) if item.rank > old_rank => out.worsened.push(RankShift {
                item: item.clone(),
                old_rank,
                new_rank: item.rank,
            }),
            Some(_) => out.unchanged.push(item.clone()),
        }
    }

    let exited = old
        .items
        .len()
        .saturating_sub(new.items.len() - out.entered.len());
    tracing::debug!(
        entered = out.entered.len(),
        improved = out.improved.len(),
        worsened = out.worsened.len(),
        unchanged = out.unchanged.len(),
        exited,
        "snapshot diff"
    );

    out
}
