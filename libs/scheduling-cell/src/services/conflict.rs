//! Overlap checks between a requested interval and committed ledger state.

use shared_models::scheduling::{BookedInterval, Interval};

/// Half-open overlap predicate: [a.start, a.end) and [b.start, b.end)
/// overlap iff a.start < b.end && b.start < a.end.
pub fn overlaps(a: Interval, b: Interval) -> bool {
    a.overlaps(b)
}

/// First committed interval that still occupies time and overlaps the
/// requested range, if any.
pub fn find_conflict(requested: Interval, booked: &[BookedInterval]) -> Option<&BookedInterval> {
    booked
        .iter()
        .find(|b| b.status.blocks_slot() && b.interval().overlaps(requested))
}

pub fn is_blocked(requested: Interval, booked: &[BookedInterval]) -> bool {
    find_conflict(requested, booked).is_some()
}
