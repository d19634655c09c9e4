//! Drawing boundary between the renderer and a concrete backend.

use crate::foundation::core::{Point, Rgba8};

/// Text paint parameters for one draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle<'a> {
    /// Fill color (straight alpha).
    pub color: Rgba8,
    /// Font size in logical pixels.
    pub font_size: f64,
    /// CSS-style font family list.
    pub font_family: &'a str,
}

/// Minimal 2D surface the renderer draws on.
///
/// Global alpha and scale apply to every subsequent `fill_text` until changed. Scale is applied
/// around each text origin.
pub trait DrawSurface {
    /// Start a new frame filled with `color`.
    fn clear(&mut self, color: Rgba8);
    /// Set the opacity multiplier.
    fn set_global_alpha(&mut self, alpha: f64);
    /// Set the uniform scale around the text origin.
    fn set_global_scale(&mut self, scale: f64);
    /// Draw `text` with its left baseline at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle<'_>);
}

/// One recorded surface operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Background fill.
    Clear(Rgba8),
    /// Text draw with the global state captured at call time.
    Text {
        /// Drawn text.
        text: String,
        /// Left baseline.
        origin: Point,
        /// Fill color.
        color: Rgba8,
        /// Font size.
        font_size: f64,
        /// Global alpha at draw time.
        alpha: f64,
        /// Global scale at draw time.
        scale: f64,
    },
}

/// Surface that records commands instead of drawing. `clear` discards the previous frame.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    alpha: f64,
    scale: f64,
    commands: Vec<DrawCommand>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            scale: 1.0,
            commands: Vec::new(),
        }
    }
}

impl RecordingSurface {
    /// Create an empty recording surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the current frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text commands of the current frame as `(text, alpha)` pairs.
    pub fn texts(&self) -> Vec<(&str, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, alpha, .. } => Some((text.as_str(), *alpha)),
                DrawCommand::Clear(_) => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, color: Rgba8) {
        self.commands.clear();
        self.alpha = 1.0;
        self.scale = 1.0;
        self.commands.push(DrawCommand::Clear(color));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    fn set_global_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle<'_>) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            origin,
            color: style.color,
            font_size: style.font_size,
            alpha: self.alpha,
            scale: self.scale,
        });
    }
}
