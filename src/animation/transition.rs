//! Three-phase transition model.
//!
//! A transition window is driven by a single progress fraction `p` in `[0, 1]`. Three phases are
//! derived from it: removed content fades *out*, surviving content *moves* to its new layout
//! position and added content fades *in*. Phase windows are proportions of the whole transition
//! and may overlap.

use crate::animation::ease::Ease;
use crate::foundation::core::Point;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::clamp01;

/// Visual effect applied to tokens entering or leaving the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionEffect {
    /// Alpha follows progress.
    #[default]
    Fade,
    /// Alpha follows progress (old and new content overlap).
    Crossfade,
    /// Slides in from the right, moving left.
    SlideLeft,
    /// Slides in from the left, moving right.
    SlideRight,
    /// Slides in from below, moving up.
    SlideUp,
    /// Slides in from above, moving down.
    SlideDown,
    /// Grows from `scale_amount` to full size.
    Scale,
    /// Grows from nothing to full size.
    ZoomIn,
    /// Shrinks from double size to full size.
    ZoomOut,
}

/// Per-transition configuration. Proportions are fractions of the transition window.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Share of the window used by the fade-out of removed tokens.
    pub out_duration_proportion: f64,
    /// Share of the window used by the movement of surviving tokens.
    pub move_duration_proportion: f64,
    /// Share of the window used by the fade-in of added tokens.
    pub in_duration_proportion: f64,
    /// Easing applied to every phase.
    pub easing: Ease,
    /// Effect used for added and removed tokens.
    pub effect: TransitionEffect,
    /// Slide offset in logical pixels (slide effects only).
    pub slide_distance: Option<f64>,
    /// Starting scale (scale effect only).
    pub scale_amount: Option<f64>,
}

/// Default slide offset in logical pixels.
pub const DEFAULT_SLIDE_DISTANCE: f64 = 40.0;
/// Default starting scale for [`TransitionEffect::Scale`].
pub const DEFAULT_SCALE_AMOUNT: f64 = 0.5;

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            out_duration_proportion: 0.3,
            move_duration_proportion: 0.5,
            in_duration_proportion: 0.3,
            easing: Ease::InOutCubic,
            effect: TransitionEffect::Fade,
            slide_distance: None,
            scale_amount: None,
        }
    }
}

impl TransitionConfig {
    /// Reject non-finite or out-of-range proportions and effect knobs.
    pub fn validate(&self) -> ReelResult<()> {
        for (name, v) in [
            ("out_duration_proportion", self.out_duration_proportion),
            ("move_duration_proportion", self.move_duration_proportion),
            ("in_duration_proportion", self.in_duration_proportion),
        ] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(ReelError::validation(format!(
                    "transition {name} must be within [0, 1], got {v}"
                )));
            }
        }
        if let Some(d) = self.slide_distance
            && !d.is_finite()
        {
            return Err(ReelError::validation("slide_distance must be finite"));
        }
        if let Some(s) = self.scale_amount
            && (!s.is_finite() || s < 0.0)
        {
            return Err(ReelError::validation(
                "scale_amount must be finite and >= 0",
            ));
        }
        Ok(())
    }

    fn slide_distance(&self) -> f64 {
        self.slide_distance.unwrap_or(DEFAULT_SLIDE_DISTANCE)
    }

    fn scale_amount(&self) -> f64 {
        self.scale_amount.unwrap_or(DEFAULT_SCALE_AMOUNT)
    }
}

/// Eased progress of the three phases, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionState {
    /// Fade-out progress of removed tokens.
    pub out_progress: f64,
    /// Fade-in progress of added tokens.
    pub in_progress: f64,
    /// Movement progress of surviving tokens.
    pub move_progress: f64,
}

/// Position, alpha and scale of one token at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TokenEffect {
    /// Draw origin in logical pixels.
    pub position: Point,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Uniform scale around the draw origin.
    pub scale: f64,
}

/// Split one transition progress into the out/move/in phase progresses.
///
/// The move window is centered between the end of the out phase and the start of the in phase:
/// `move_start = (1 - out - in) / 2 + out - move / 2`. A zero-length phase is instantaneous, and
/// `progress >= 1` completes every phase.
pub fn compute_transition_state(progress: f64, config: &TransitionConfig) -> TransitionState {
    let p = clamp01(progress);
    let ease = config.easing;
    if p >= 1.0 {
        return TransitionState {
            out_progress: 1.0,
            in_progress: 1.0,
            move_progress: 1.0,
        };
    }

    let out = clamp01(config.out_duration_proportion);
    let mov = clamp01(config.move_duration_proportion);
    let inn = clamp01(config.in_duration_proportion);
    let move_start = (1.0 - out - inn) / 2.0 + out - mov / 2.0;

    TransitionState {
        out_progress: ease.apply(phase_progress(p, 0.0, out)),
        in_progress: ease.apply(phase_progress(p, 1.0 - inn, inn)),
        move_progress: ease.apply(phase_progress(p, move_start, mov)),
    }
}

fn phase_progress(p: f64, start: f64, len: f64) -> f64 {
    if len <= f64::EPSILON {
        return if p >= start { 1.0 } else { 0.0 };
    }
    clamp01((p - start) / len)
}

/// Visual state of an entering (or, with `1 - out_progress`, leaving) token.
///
/// `progress` is already eased. Position is interpolated from `from` to `to`, then the effect
/// overrides alpha, one position axis or scale.
pub fn apply_transition_effect(
    progress: f64,
    config: &TransitionConfig,
    from: Point,
    to: Point,
) -> TokenEffect {
    let p = clamp01(progress);
    let mut position = from.lerp(to, p);
    let mut scale = 1.0;
    let remaining = 1.0 - p;
    match config.effect {
        TransitionEffect::Fade | TransitionEffect::Crossfade => {}
        TransitionEffect::SlideLeft => position.x = to.x + remaining * config.slide_distance(),
        TransitionEffect::SlideRight => position.x = to.x - remaining * config.slide_distance(),
        TransitionEffect::SlideUp => position.y = to.y + remaining * config.slide_distance(),
        TransitionEffect::SlideDown => position.y = to.y - remaining * config.slide_distance(),
        TransitionEffect::Scale => {
            let s = config.scale_amount();
            scale = s + (1.0 - s) * p;
        }
        TransitionEffect::ZoomIn => scale = p,
        TransitionEffect::ZoomOut => scale = 2.0 - p,
    }
    TokenEffect {
        position,
        alpha: p,
        scale,
    }
}

/// A surviving token travelling between its old and new layout positions.
pub fn interpolate_moved(move_progress: f64, from: Point, to: Point) -> TokenEffect {
    TokenEffect {
        position: from.lerp(to, clamp01(move_progress)),
        alpha: 1.0,
        scale: 1.0,
    }
}

/// Alphas of the terminal snapshot's content and of the end-of-sequence marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinalTransition {
    /// Content opacity, gone by the middle of the window.
    pub content_alpha: f64,
    /// Marker opacity.
    pub marker_alpha: f64,
}

/// Simplified transition for the last snapshot: content fades out over the first half of the
/// window while the end marker fades in over the whole window.
pub fn final_transition(progress: f64, ease: Ease) -> FinalTransition {
    let p = clamp01(progress);
    FinalTransition {
        content_alpha: ease.apply(clamp01(1.0 - 2.0 * p)),
        marker_alpha: ease.apply(p),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transition.rs"]
mod tests;
