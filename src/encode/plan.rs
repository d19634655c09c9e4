//! Deduplicated frame schedule for an export.

use crate::document::model::Document;
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::time::frame_differs;

/// One frame that must actually be rendered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlannedFrame {
    /// Index on the fixed frame grid.
    pub index: u64,
    /// Render time in milliseconds.
    pub time_ms: f64,
    /// How long the frame stays on screen, up to the next kept frame.
    pub hold_ms: f64,
}

impl PlannedFrame {
    /// Grid frames covered by this frame (at least one).
    pub fn repeat_count(&self, frame_duration_ms: f64) -> u64 {
        ((self.hold_ms / frame_duration_ms).round() as u64).max(1)
    }
}

/// Kept frames of an export with their hold durations.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    /// Frames on the fixed grid: `ceil(total_ms / 1000 * frame_rate)`.
    pub frame_count: u64,
    /// `1000 / frame_rate`.
    pub frame_duration_ms: f64,
    /// Kept frames, strictly increasing, always starting at frame 0.
    pub frames: Vec<PlannedFrame>,
}

impl FramePlan {
    /// Number of kept frames.
    pub fn kept(&self) -> usize {
        self.frames.len()
    }

    /// Grid frames skipped because they match their predecessor.
    pub fn elided(&self) -> u64 {
        self.frame_count - self.frames.len() as u64
    }

    /// Sum of all hold durations.
    pub fn duration_ms(&self) -> f64 {
        self.frame_count as f64 * self.frame_duration_ms
    }
}

/// Plan the frames of `document` at `frame_rate`.
///
/// Grid frame `f` is kept when the frame at `f * d` can differ from the one at `(f - 1) * d`;
/// each kept frame holds until the next kept frame (or the end of the grid).
#[tracing::instrument(level = "debug", skip(document), fields(snapshots = document.len()))]
pub fn plan_frames(document: &Document, frame_rate: u32) -> ReelResult<FramePlan> {
    if frame_rate == 0 {
        return Err(ReelError::validation("frame_rate must be non-zero"));
    }
    let total_ms = document.total_duration_ms();
    if document.is_empty() || total_ms.is_nan() || total_ms <= 0.0 {
        return Err(ReelError::validation(
            "document has no duration; nothing to export",
        ));
    }

    let frame_duration_ms = 1000.0 / f64::from(frame_rate);
    let frame_count = (total_ms / 1000.0 * f64::from(frame_rate)).ceil() as u64;

    let kept: Vec<u64> = (0..frame_count)
        .filter(|&f| {
            let prev = (f as f64 - 1.0) * frame_duration_ms;
            let next = f as f64 * frame_duration_ms;
            frame_differs(&document.snapshots, prev, next)
        })
        .collect();

    let frames = kept
        .iter()
        .enumerate()
        .map(|(i, &f)| {
            let until = kept.get(i + 1).copied().unwrap_or(frame_count);
            PlannedFrame {
                index: f,
                time_ms: f as f64 * frame_duration_ms,
                hold_ms: (until - f) as f64 * frame_duration_ms,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        frame_count,
        kept = frames.len(),
        elided = frame_count - frames.len() as u64,
        "planned export frames"
    );
    Ok(FramePlan {
        frame_count,
        frame_duration_ms,
        frames,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/plan.rs"]
mod tests;
