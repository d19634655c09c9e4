//! Document model: snapshots, render style and JSON loading.

use crate::animation::transition::TransitionConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One static state of the animated content.
///
/// The last `transition_duration_ms` of `duration_ms` is the transition window toward the next
/// snapshot. `transition_duration_ms <= duration_ms` is expected but not enforced.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    /// Caller-assigned identifier.
    pub id: String,
    /// Source text shown by this snapshot.
    pub text: String,
    /// Display duration in milliseconds.
    pub duration_ms: f64,
    /// Length of the trailing transition window in milliseconds.
    #[serde(default)]
    pub transition_duration_ms: f64,
    /// Overrides the document's default transition toward the next snapshot.
    #[serde(default)]
    pub transition: Option<TransitionConfig>,
}

impl Snapshot {
    /// Snapshot without a transition window.
    pub fn new(id: impl Into<String>, text: impl Into<String>, duration_ms: f64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            duration_ms,
            transition_duration_ms: 0.0,
            transition: None,
        }
    }

    /// Set the trailing transition window length.
    pub fn with_transition_ms(mut self, transition_duration_ms: f64) -> Self {
        self.transition_duration_ms = transition_duration_ms;
        self
    }

    /// Set a per-snapshot transition config.
    pub fn with_transition_config(mut self, config: TransitionConfig) -> Self {
        self.transition = Some(config);
        self
    }
}

/// Closed set of built-in color themes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    /// Light text on a dark background.
    #[default]
    Dark,
    /// Dark text on a light background.
    Light,
}

/// Rendering metadata. Opaque to the timeline and transition math; consumed by layout and drawing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Font size in logical pixels.
    pub font_size: f64,
    /// Line height as a multiple of `font_size`.
    pub line_height: f64,
    /// Logical canvas size.
    pub canvas: Canvas,
    /// Inset of the text block from the canvas edges.
    pub padding: f64,
    /// Color theme.
    pub theme: ThemeId,
    /// CSS-style font family list.
    pub font_family: String,
    /// Use the fixed-advance layout fast path.
    pub monospace: bool,
    /// Text faded in by the final transition. `None` disables the marker.
    pub end_marker: Option<String>,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            font_size: 20.0,
            line_height: 1.5,
            canvas: Canvas::default(),
            padding: 40.0,
            theme: ThemeId::Dark,
            font_family: "monospace".to_owned(),
            monospace: true,
            end_marker: Some("■".to_owned()),
        }
    }
}

impl RenderStyle {
    /// Reject non-positive metrics and empty canvases.
    pub fn validate(&self) -> ReelResult<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ReelError::validation("font_size must be finite and > 0"));
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            return Err(ReelError::validation("line_height must be finite and > 0"));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(ReelError::validation("padding must be finite and >= 0"));
        }
        self.canvas.validate()
    }

    /// Distance between consecutive baselines.
    pub fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }
}

/// Ordered list of snapshots plus rendering metadata.
///
/// Documents are replaced wholesale; renderers drop every derived cache when given a new one.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    /// Snapshots in display order.
    pub snapshots: Vec<Snapshot>,
    /// Language id handed to the tokenizer.
    #[serde(default = "default_language")]
    pub language: String,
    /// Layout and drawing metadata.
    #[serde(default)]
    pub style: RenderStyle,
    /// Transition used when a snapshot has no config of its own.
    #[serde(default)]
    pub default_transition: TransitionConfig,
}

fn default_language() -> String {
    "plaintext".to_owned()
}

impl Document {
    /// Document with default style and transition.
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self {
            snapshots,
            language: default_language(),
            style: RenderStyle::default(),
            default_transition: TransitionConfig::default(),
        }
    }

    /// Replace the tokenizer language id.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Replace the rendering style.
    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the default transition config.
    pub fn with_default_transition(mut self, config: TransitionConfig) -> Self {
        self.default_transition = config;
        self
    }

    /// Parse and validate a document from a JSON reader.
    #[tracing::instrument(skip(r))]
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        let doc: Document = serde_json::from_reader(r)
            .map_err(|e| ReelError::serde(format!("parse document JSON: {e}")))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse and validate a document from a JSON string.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse and validate a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open document JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReelError::serde(format!("serialize document JSON: {e}")))
    }

    /// Validate durations, style and transition configs.
    ///
    /// A transition window longer than its snapshot is accepted (and logged): the timeline keeps
    /// the literal window arithmetic for such snapshots.
    pub fn validate(&self) -> ReelResult<()> {
        self.style.validate()?;
        self.default_transition.validate()?;
        for (i, s) in self.snapshots.iter().enumerate() {
            if !s.duration_ms.is_finite() || s.duration_ms < 0.0 {
                return Err(ReelError::validation(format!(
                    "snapshot {i} ('{}') duration_ms must be finite and >= 0",
                    s.id
                )));
            }
            if !s.transition_duration_ms.is_finite() || s.transition_duration_ms < 0.0 {
                return Err(ReelError::validation(format!(
                    "snapshot {i} ('{}') transition_duration_ms must be finite and >= 0",
                    s.id
                )));
            }
            if s.transition_duration_ms > s.duration_ms {
                tracing::warn!(
                    index = i,
                    id = %s.id,
                    duration_ms = s.duration_ms,
                    transition_duration_ms = s.transition_duration_ms,
                    "transition window is longer than its snapshot"
                );
            }
            if let Some(cfg) = &s.transition {
                cfg.validate()?;
            }
        }
        Ok(())
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Return `true` when there are no snapshots.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Transition config used by the window at the end of snapshot `index`.
    pub fn transition_for(&self, index: usize) -> &TransitionConfig {
        self.snapshots
            .get(index)
            .and_then(|s| s.transition.as_ref())
            .unwrap_or(&self.default_transition)
    }

    /// Sum of all snapshot durations.
    pub fn total_duration_ms(&self) -> f64 {
        crate::timeline::time::sum_duration(&self.snapshots)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
