//! Mapping from the global animation clock to snapshots.
//!
//! All times are milliseconds as `f64`. None of these functions clamp: offsets before the first
//! snapshot are negative and offsets past the end exceed the last snapshot's duration, which is how
//! playback freezes on the final frame.

use crate::document::model::Snapshot;

/// A global time resolved to a snapshot and a local offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimePosition {
    /// Snapshot index.
    pub index: usize,
    /// Milliseconds since the snapshot started (may be negative or exceed its duration).
    pub offset_ms: f64,
}

/// Sum of all snapshot durations; `0` for an empty list.
pub fn sum_duration(snapshots: &[Snapshot]) -> f64 {
    snapshots.iter().map(|s| s.duration_ms).sum()
}

/// Resolve global time `t` to the snapshot whose `[start, start + duration)` contains it.
///
/// - `t` before the first snapshot resolves to `(0, t)`.
/// - `t` at or past the total duration resolves to the last snapshot with `offset = t - start`.
/// - An empty list resolves to `None` (there is no snapshot to show).
pub fn snapshot_at_time(snapshots: &[Snapshot], t: f64) -> Option<TimePosition> {
    let last = snapshots.len().checked_sub(1)?;
    let mut start = 0.0;
    for (index, s) in snapshots.iter().enumerate() {
        if t < start + s.duration_ms {
            return Some(TimePosition {
                index,
                offset_ms: t - start,
            });
        }
        if index < last {
            start += s.duration_ms;
        }
    }
    Some(TimePosition {
        index: last,
        offset_ms: t - start,
    })
}

/// Return `true` when `offset` lies strictly inside the snapshot's trailing transition window.
///
/// The boundary `duration - transition_duration` itself is not in the window. A zero-length window
/// never matches. A window longer than the snapshot keeps the literal arithmetic and starts before
/// the snapshot does.
pub fn is_in_transition_window(snapshot: &Snapshot, offset: f64) -> bool {
    if snapshot.transition_duration_ms == 0.0 {
        return false;
    }
    offset > snapshot.duration_ms - snapshot.transition_duration_ms
}

/// Progress through the transition window at `offset`, `0` at the window start.
///
/// Not clamped; callers clamp when they ease.
pub fn transition_progress(snapshot: &Snapshot, offset: f64) -> f64 {
    if snapshot.transition_duration_ms == 0.0 {
        return 0.0;
    }
    (offset - snapshot.duration_ms + snapshot.transition_duration_ms)
        / snapshot.transition_duration_ms
}

/// Frame dedup rule: does moving the clock from `prev` to `next` change the picture?
///
/// - A negative `prev` means nothing has been drawn yet: always `true`.
/// - Equal times never differ.
/// - Different snapshots always differ.
/// - Within one snapshot, the picture only changes while either time is inside the transition
///   window; the static frame is identical for any two times outside it.
///
/// Callers pass `prev < next`, but any order is accepted.
pub fn frame_differs(snapshots: &[Snapshot], prev: f64, next: f64) -> bool {
    if prev < 0.0 {
        return true;
    }
    if prev == next {
        return false;
    }
    let (Some(a), Some(b)) = (
        snapshot_at_time(snapshots, prev),
        snapshot_at_time(snapshots, next),
    ) else {
        return true;
    };
    if a.index != b.index {
        return true;
    }
    let s = &snapshots[a.index];
    is_in_transition_window(s, a.offset_ms) || is_in_transition_window(s, b.offset_ms)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/time.rs"]
mod tests;
