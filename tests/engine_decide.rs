// tests/engine_decide.rs
//
// The decision engine's contract, bucket by bucket: what gets emitted, in
// what order, and which state changes the caller is told to apply.

use std::collections::BTreeSet;

use rankwatch::engine::{decide, Plan};
use rankwatch::{Reason, ScheduleBucket, Snapshot, TrendItem};

fn item(id: &str, rank: u32, title: &str) -> TrendItem {
    TrendItem {
        identity: id.to_string(),
        rank,
        title: title.to_string(),
        description: String::new(),
        url: None,
    }
}

fn snap(items: Vec<TrendItem>) -> Snapshot {
    Snapshot::new(items)
}

fn no_known() -> BTreeSet<String> {
    BTreeSet::new()
}

#[test]
fn bootstrap_emits_everything_as_full() {
    let new = snap(vec![item("a", 1, "Foo"), item("b", 2, "Bar")]);
    let plan = decide(ScheduleBucket::Delta, None, Some(&new), &no_known());

    let Plan::Announce { entries, update } = plan else {
        panic!("bootstrap must announce");
    };
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.reason == Reason::Full));
    assert_eq!(entries[0].item.identity, "a");

    let update = update.expect("bootstrap replaces state");
    assert_eq!(update.snapshot, new);
    assert_eq!(update.mark_known, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn full_refresh_emits_everything_and_marks_all() {
    let old = snap(vec![item("a", 1, "Foo")]);
    let new = snap(vec![item("a", 1, "Foo"), item("b", 2, "Bar")]);
    // Known set is irrelevant on full refresh: the epoch was just reset.
    let known: BTreeSet<String> = ["a".to_string(), "b".to_string()].into();
    let plan = decide(ScheduleBucket::FullRefresh, Some(&old), Some(&new), &known);

    let Plan::Announce { entries, update } = plan else {
        panic!("full refresh must announce");
    };
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.reason == Reason::Full));
    assert_eq!(update.unwrap().mark_known.len(), 2);
}

#[test]
fn delta_without_change_is_a_noop() {
    let s = snap(vec![item("a", 1, "Foo")]);
    let plan = decide(ScheduleBucket::Delta, Some(&s), Some(&s.clone()), &no_known());
    assert_eq!(plan, Plan::Silent);
}

#[test]
fn delta_rank_swap_emits_both_sorted_by_new_rank() {
    let old = snap(vec![item("a", 1, "Foo"), item("b", 2, "Bar")]);
    let new = snap(vec![item("b", 1, "Bar"), item("a", 2, "Foo")]);
    // Rank changes are allowed to repeat even when everything is "known".
    let known: BTreeSet<String> = ["a".to_string(), "b".to_string()].into();
    let plan = decide(ScheduleBucket::Delta, Some(&old), Some(&new), &known);

    let Plan::Announce { entries, update } = plan else {
        panic!("rank swap must announce");
    };
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].item.identity, "b");
    assert_eq!(entries[0].reason, Reason::Improved { from: 2, to: 1 });
    assert_eq!(entries[1].item.identity, "a");
    assert_eq!(entries[1].reason, Reason::Worsened { from: 1, to: 2 });

    // No new entries, so nothing gets marked; the snapshot still advances.
    let update = update.expect("rank change replaces the snapshot");
    assert!(update.mark_known.is_empty());
    assert_eq!(update.snapshot, new);
}

#[test]
fn known_entry_is_suppressed_and_nothing_mutates() {
    let old = snap(vec![item("a", 1, "Foo")]);
    let new = snap(vec![item("a", 1, "Foo"), item("c", 2, "Baz")]);
    let known: BTreeSet<String> = ["c".to_string()].into();
    let plan = decide(ScheduleBucket::Delta, Some(&old), Some(&new), &known);
    // "c" is entered but already reported this epoch: the whole cycle is a
    // no-op, old snapshot included.
    assert_eq!(plan, Plan::Silent);
}

#[test]
fn unknown_entry_still_fires_next_to_known_one() {
    let old = snap(vec![item("a", 1, "Foo")]);
    let new = snap(vec![
        item("a", 1, "Foo"),
        item("c", 2, "Baz"),
        item("d", 3, "Qux"),
    ]);
    let known: BTreeSet<String> = ["c".to_string()].into();
    let plan = decide(ScheduleBucket::Delta, Some(&old), Some(&new), &known);

    let Plan::Announce { entries, update } = plan else {
        panic!("unknown entry must announce");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].item.identity, "d");
    assert_eq!(entries[0].reason, Reason::Entered);
    assert_eq!(update.unwrap().mark_known, vec!["d".to_string()]);
}

#[test]
fn daily_summary_replays_stored_snapshot_without_mutation() {
    let stored = snap(vec![item("x", 1, "X"), item("y", 2, "Y")]);
    let fetched = snap(vec![item("z", 1, "Z")]);
    // A live fetch result must not leak into the recap.
    let plan = decide(
        ScheduleBucket::DailySummary,
        Some(&stored),
        Some(&fetched),
        &no_known(),
    );

    let Plan::Announce { entries, update } = plan else {
        panic!("summary must announce");
    };
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.reason == Reason::Summary));
    assert_eq!(entries[0].item.identity, "x");
    assert!(update.is_none(), "summary never mutates state");
}

#[test]
fn daily_summary_without_stored_snapshot_is_silent() {
    let plan = decide(ScheduleBucket::DailySummary, None, None, &no_known());
    assert_eq!(plan, Plan::Silent);
}

#[test]
fn missing_or_empty_fetch_is_silent_not_an_error() {
    let old = snap(vec![item("a", 1, "Foo")]);
    assert_eq!(
        decide(ScheduleBucket::Delta, Some(&old), None, &no_known()),
        Plan::Silent
    );
    let empty = snap(vec![]);
    assert_eq!(
        decide(ScheduleBucket::Delta, Some(&old), Some(&empty), &no_known()),
        Plan::Silent
    );
    assert_eq!(
        decide(ScheduleBucket::FullRefresh, None, Some(&empty), &no_known()),
        Plan::Silent
    );
}

#[test]
fn quiet_bucket_yields_the_notice_plan() {
    let plan = decide(ScheduleBucket::Quiet, None, None, &no_known());
    assert_eq!(plan, Plan::QuietNotice);
}

#[test]
fn empty_stored_snapshot_counts_as_bootstrap() {
    let old = snap(vec![]);
    let new = snap(vec![item("a", 1, "Foo")]);
    let plan = decide(ScheduleBucket::Delta, Some(&old), Some(&new), &no_known());
    let Plan::Announce { entries, .. } = plan else {
        panic!("empty prior state must bootstrap");
    };
    assert_eq!(entries[0].reason, Reason::Full);
}
