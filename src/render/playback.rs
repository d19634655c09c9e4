//! Live-preview clock driving a [`Renderer`].

use std::sync::Arc;

use crate::document::model::Document;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::renderer::Renderer;
use crate::render::surface::DrawSurface;

/// Host-ticked playback of one document.
///
/// The host calls [`Playback::tick`] with the wall time elapsed since the previous tick; the
/// renderer only redraws when the frame can differ from the last one drawn.
#[derive(Debug)]
pub struct Playback {
    renderer: Renderer,
    position_ms: f64,
    duration_ms: f64,
    playing: bool,
    looping: bool,
    speed: f64,
}

impl Playback {
    /// Paused playback at `t = 0`.
    pub fn new(document: Arc<Document>) -> Self {
        let mut renderer = Renderer::new();
        let duration_ms = document.total_duration_ms();
        renderer.set_document(document);
        Self {
            renderer,
            position_ms: 0.0,
            duration_ms,
            playing: false,
            looping: false,
            speed: 1.0,
        }
    }

    /// Swap in a new document and restart from `t = 0`.
    pub fn set_document(&mut self, document: Arc<Document>) {
        self.duration_ms = document.total_duration_ms();
        self.renderer.set_document(document);
        self.position_ms = 0.0;
    }

    /// Start or resume. Restarts from zero when parked at the end.
    pub fn play(&mut self) {
        if self.position_ms >= self.duration_ms {
            self.position_ms = 0.0;
        }
        self.playing = true;
    }

    /// Pause at the current position.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Whether the clock advances on tick.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Jump to `t_ms`, clamped to the document.
    pub fn seek(&mut self, t_ms: f64) {
        self.position_ms = if t_ms.is_nan() {
            0.0
        } else {
            t_ms.clamp(0.0, self.duration_ms)
        };
    }

    /// Wrap around instead of stopping at the end.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Playback rate multiplier.
    pub fn set_speed(&mut self, speed: f64) -> ReelResult<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ReelError::validation(format!(
                "playback speed must be finite and > 0, got {speed}"
            )));
        }
        self.speed = speed;
        Ok(())
    }

    /// Current position in milliseconds.
    pub fn position_ms(&self) -> f64 {
        self.position_ms
    }

    /// Document duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Underlying renderer.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Advance by `elapsed_ms` of wall time and draw if needed.
    ///
    /// Returns `true` when the surface was redrawn.
    pub fn tick(&mut self, elapsed_ms: f64, surface: &mut dyn DrawSurface) -> ReelResult<bool> {
        if self.playing && elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            let next = self.position_ms + elapsed_ms * self.speed;
            if next < self.duration_ms {
                self.position_ms = next;
            } else if self.looping && self.duration_ms > 0.0 {
                self.position_ms = next % self.duration_ms;
            } else {
                self.position_ms = self.duration_ms;
                self.playing = false;
            }
        }
        self.renderer.render_if_needed(self.position_ms, surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/playback.rs"]
mod tests;
