//! Time-to-pixels renderer with per-snapshot caches.

use std::collections::HashMap;
use std::sync::Arc;

use crate::animation::transition::{
    apply_transition_effect, compute_transition_state, final_transition, interpolate_moved,
};
use crate::document::diff::{CorrespondenceKind, LcsDiff, TokenCorrespondence, TokenDiff};
use crate::document::model::Document;
use crate::document::token::{LexTokenizer, Token, Tokenizer};
use crate::foundation::core::Point;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::layout::{
    MonospaceMeasure, ProportionalMeasure, SnapshotLayout, TextMeasure, layout_tokens,
};
use crate::render::surface::{DrawSurface, TextStyle};
use crate::render::theme::Theme;
use crate::timeline::time::{
    frame_differs, is_in_transition_window, snapshot_at_time, transition_progress,
};

/// Which kind of transition window a frame falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowKind {
    /// Transition into the following snapshot.
    Between,
    /// Fade-out of the last snapshot towards the end marker.
    Final,
}

/// What the last [`Renderer::render`] call drew.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderState {
    /// Nothing drawn yet.
    Uninitialized,
    /// A snapshot at rest.
    Static {
        /// Snapshot index.
        index: usize,
    },
    /// A snapshot inside its transition window.
    Transitioning {
        /// Snapshot index that owns the window.
        index: usize,
        /// Raw window progress in `[0, 1]`.
        progress: f64,
        /// Window kind.
        kind: WindowKind,
    },
}

/// Renders a [`Document`] at arbitrary times onto a [`DrawSurface`].
///
/// Tokens, layouts and diffs are computed lazily and cached per snapshot index. Each export job
/// owns its renderer; caches are never shared between documents.
pub struct Renderer {
    document: Option<Arc<Document>>,
    tokenizer: Arc<dyn Tokenizer>,
    differ: Arc<dyn TokenDiff>,
    measure: Option<Arc<dyn TextMeasure>>,
    tokens: HashMap<usize, Arc<[Token]>>,
    layouts: HashMap<usize, Arc<SnapshotLayout>>,
    diffs: HashMap<usize, Arc<[TokenCorrespondence]>>,
    state: RenderState,
    last_drawn_ms: Option<f64>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("has_document", &self.document.is_some())
            .field("cached_layouts", &self.layouts.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Renderer using [`LexTokenizer`] and [`LcsDiff`].
    pub fn new() -> Self {
        Self {
            document: None,
            tokenizer: Arc::new(LexTokenizer),
            differ: Arc::new(LcsDiff::default()),
            measure: None,
            tokens: HashMap::new(),
            layouts: HashMap::new(),
            diffs: HashMap::new(),
            state: RenderState::Uninitialized,
            last_drawn_ms: None,
        }
    }

    /// Replace the tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self.clear_caches();
        self
    }

    /// Replace the token differ.
    pub fn with_diff(mut self, differ: Arc<dyn TokenDiff>) -> Self {
        self.differ = differ;
        self.clear_caches();
        self
    }

    /// Force a text measure instead of deriving it from the document style.
    pub fn with_measure(mut self, measure: Arc<dyn TextMeasure>) -> Self {
        self.measure = Some(measure);
        self.clear_caches();
        self
    }

    /// Install a new document and drop every derived cache.
    pub fn set_document(&mut self, document: Arc<Document>) {
        tracing::debug!(snapshots = document.len(), "renderer document replaced");
        self.document = Some(document);
        self.clear_caches();
    }

    /// Current document, if any.
    pub fn document(&self) -> Option<&Arc<Document>> {
        self.document.as_ref()
    }

    /// State produced by the most recent render.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Number of snapshot layouts currently cached.
    pub fn cached_layout_count(&self) -> usize {
        self.layouts.len()
    }

    fn clear_caches(&mut self) {
        self.tokens.clear();
        self.layouts.clear();
        self.diffs.clear();
        self.state = RenderState::Uninitialized;
        self.last_drawn_ms = None;
    }

    fn require_document(&self) -> ReelResult<Arc<Document>> {
        self.document
            .clone()
            .ok_or_else(|| ReelError::invalid_document("no document set on renderer"))
    }

    /// Tokens of snapshot `index`.
    pub fn tokens(&mut self, index: usize) -> ReelResult<Arc<[Token]>> {
        if let Some(t) = self.tokens.get(&index) {
            return Ok(t.clone());
        }
        let doc = self.require_document()?;
        let snapshot = doc.snapshots.get(index).ok_or_else(|| {
            ReelError::invalid_document(format!("snapshot index {index} out of range"))
        })?;
        let tokens: Arc<[Token]> = self.tokenizer.tokenize(&snapshot.text, &doc.language).into();
        self.tokens.insert(index, tokens.clone());
        Ok(tokens)
    }

    /// Layout of snapshot `index`.
    pub fn layout(&mut self, index: usize) -> ReelResult<Arc<SnapshotLayout>> {
        if let Some(l) = self.layouts.get(&index) {
            return Ok(l.clone());
        }
        let doc = self.require_document()?;
        let tokens = self.tokens(index)?;
        let measure = self.measure_for(&doc);
        let layout = Arc::new(layout_tokens(&tokens, &doc.style, measure.as_ref()));
        self.layouts.insert(index, layout.clone());
        Ok(layout)
    }

    /// Correspondences between snapshot `index` and `index + 1`.
    pub fn correspondences(&mut self, index: usize) -> ReelResult<Arc<[TokenCorrespondence]>> {
        if let Some(d) = self.diffs.get(&index) {
            return Ok(d.clone());
        }
        let left = self.tokens(index)?;
        let right = self.tokens(index + 1)?;
        let diff: Arc<[TokenCorrespondence]> = self.differ.diff(&left, &right).into();
        self.diffs.insert(index, diff.clone());
        Ok(diff)
    }

    fn measure_for(&self, doc: &Document) -> Arc<dyn TextMeasure> {
        match &self.measure {
            Some(m) => m.clone(),
            None if doc.style.monospace => Arc::new(MonospaceMeasure::default()),
            None => Arc::new(ProportionalMeasure),
        }
    }

    /// Whether the frame at `next_ms` can differ from the frame at `prev_ms`.
    ///
    /// A negative `prev_ms` means nothing was drawn yet. Without a document every frame counts
    /// as new.
    pub fn should_re_render(&self, prev_ms: f64, next_ms: f64) -> bool {
        match &self.document {
            Some(doc) => frame_differs(&doc.snapshots, prev_ms, next_ms),
            None => true,
        }
    }

    /// Draw the frame at `t_ms` unless it matches the last drawn frame.
    ///
    /// Returns `true` when the surface was redrawn.
    pub fn render_if_needed(
        &mut self,
        t_ms: f64,
        surface: &mut dyn DrawSurface,
    ) -> ReelResult<bool> {
        let prev = self.last_drawn_ms.unwrap_or(-1.0);
        if self.last_drawn_ms.is_some() && !self.should_re_render(prev, t_ms) {
            return Ok(false);
        }
        self.render(t_ms, surface)?;
        Ok(true)
    }

    /// Draw the frame at `t_ms`.
    pub fn render(&mut self, t_ms: f64, surface: &mut dyn DrawSurface) -> ReelResult<RenderState> {
        let doc = self.require_document()?;
        let theme = Theme::get(doc.style.theme);
        surface.clear(theme.background);

        let Some(pos) = snapshot_at_time(&doc.snapshots, t_ms) else {
            self.state = RenderState::Uninitialized;
            self.last_drawn_ms = Some(t_ms);
            return Ok(self.state);
        };
        let snapshot = &doc.snapshots[pos.index];
        let is_last = pos.index + 1 == doc.snapshots.len();

        let state = if is_in_transition_window(snapshot, pos.offset_ms) {
            let progress = transition_progress(snapshot, pos.offset_ms).clamp(0.0, 1.0);
            if is_last {
                self.draw_final(&doc, pos.index, progress, surface)?;
                RenderState::Transitioning {
                    index: pos.index,
                    progress,
                    kind: WindowKind::Final,
                }
            } else {
                self.draw_between(&doc, pos.index, progress, surface)?;
                RenderState::Transitioning {
                    index: pos.index,
                    progress,
                    kind: WindowKind::Between,
                }
            }
        } else {
            self.draw_snapshot(&doc, pos.index, 1.0, surface)?;
            RenderState::Static { index: pos.index }
        };

        surface.set_global_alpha(1.0);
        surface.set_global_scale(1.0);
        self.state = state;
        self.last_drawn_ms = Some(t_ms);
        Ok(state)
    }

    fn draw_snapshot(
        &mut self,
        doc: &Document,
        index: usize,
        alpha: f64,
        surface: &mut dyn DrawSurface,
    ) -> ReelResult<()> {
        let tokens = self.tokens(index)?;
        let layout = self.layout(index)?;
        let theme = Theme::get(doc.style.theme);
        surface.set_global_alpha(alpha);
        surface.set_global_scale(1.0);
        for (token, b) in tokens.iter().zip(layout.boxes.iter()) {
            if token.kind.is_blank() {
                continue;
            }
            surface.fill_text(&token.text, b.origin, &text_style(doc, theme, token));
        }
        Ok(())
    }

    fn draw_between(
        &mut self,
        doc: &Document,
        index: usize,
        progress: f64,
        surface: &mut dyn DrawSurface,
    ) -> ReelResult<()> {
        let config = doc.transition_for(index).clone();
        let phases = compute_transition_state(progress, &config);
        let (left, right) = (self.tokens(index)?, self.tokens(index + 1)?);
        let (left_layout, right_layout) = (self.layout(index)?, self.layout(index + 1)?);
        let correspondences = self.correspondences(index)?;
        let theme = Theme::get(doc.style.theme);
        let origin = |layout: &SnapshotLayout, i: usize| layout.origin(i).unwrap_or(Point::ZERO);

        for c in correspondences.iter() {
            let (token, effect) = match c.kind() {
                Some(CorrespondenceKind::Moved { left: l, right: r }) => (
                    token_at(&right, r, index, "right")?,
                    interpolate_moved(
                        phases.move_progress,
                        origin(&left_layout, l),
                        origin(&right_layout, r),
                    ),
                ),
                Some(CorrespondenceKind::Removed(l)) => {
                    let at = origin(&left_layout, l);
                    (
                        token_at(&left, l, index, "left")?,
                        apply_transition_effect(1.0 - phases.out_progress, &config, at, at),
                    )
                }
                Some(CorrespondenceKind::Added(r)) => {
                    let at = origin(&right_layout, r);
                    (
                        token_at(&right, r, index, "right")?,
                        apply_transition_effect(phases.in_progress, &config, at, at),
                    )
                }
                None => continue,
            };
            if effect.alpha <= 0.0 {
                continue;
            }
            surface.set_global_alpha(effect.alpha);
            surface.set_global_scale(effect.scale);
            surface.fill_text(&token.text, effect.position, &text_style(doc, theme, token));
        }
        Ok(())
    }

    fn draw_final(
        &mut self,
        doc: &Document,
        index: usize,
        progress: f64,
        surface: &mut dyn DrawSurface,
    ) -> ReelResult<()> {
        let fade = final_transition(progress, doc.transition_for(index).easing);
        if fade.content_alpha > 0.0 {
            self.draw_snapshot(doc, index, fade.content_alpha, surface)?;
        }
        let Some(marker) = doc.style.end_marker.as_deref() else {
            return Ok(());
        };
        if fade.marker_alpha <= 0.0 || marker.is_empty() {
            return Ok(());
        }
        let theme = Theme::get(doc.style.theme);
        let font_size = doc.style.font_size * 2.0;
        let width = self.measure_for(doc).measure(marker, font_size);
        let center = doc.style.canvas.center();
        let at = Point::new(center.x - width / 2.0, center.y + font_size / 3.0);
        surface.set_global_alpha(fade.marker_alpha);
        surface.set_global_scale(1.0);
        surface.fill_text(
            marker,
            at,
            &TextStyle {
                color: theme.marker,
                font_size,
                font_family: &doc.style.font_family,
            },
        );
        Ok(())
    }
}

/// Diff indices come from a pluggable boundary and are checked before use.
fn token_at<'t>(tokens: &'t [Token], i: usize, index: usize, side: &str) -> ReelResult<&'t Token> {
    tokens.get(i).ok_or_else(|| {
        ReelError::invalid_document(format!(
            "token diff for snapshot {index} references {side} token {i} of {}",
            tokens.len()
        ))
    })
}

fn text_style<'a>(doc: &'a Document, theme: &Theme, token: &Token) -> TextStyle<'a> {
    TextStyle {
        color: theme.color_for(token.kind),
        font_size: doc.style.font_size,
        font_family: &doc.style.font_family,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
