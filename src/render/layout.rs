//! Token placement on the canvas.
//!
//! Layout is computed once per snapshot and cached by the renderer. Positions are draw origins
//! (left edge, baseline) in logical canvas pixels.

use crate::document::model::RenderStyle;
use crate::document::token::{Token, TokenKind};
use crate::foundation::core::Point;

/// Columns covered by one tab stop.
pub const TAB_WIDTH: usize = 4;

/// Horizontal text metrics.
pub trait TextMeasure: Send + Sync {
    /// Fixed per-character advance, when every glyph shares one.
    ///
    /// Returning `Some` enables the column-based fast path.
    fn monospace_advance(&self, font_size: f64) -> Option<f64>;

    /// Advance width of `text`.
    fn measure(&self, text: &str, font_size: f64) -> f64;
}

/// Fixed advance of `advance_em * font_size` per character.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceMeasure {
    /// Advance as a fraction of the font size.
    pub advance_em: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance_em: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn monospace_advance(&self, font_size: f64) -> Option<f64> {
        Some(self.advance_em * font_size)
    }

    fn measure(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * self.advance_em * font_size
    }
}

/// Width-class approximation for proportional faces.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProportionalMeasure;

impl ProportionalMeasure {
    fn char_em(c: char) -> f64 {
        match c {
            'i' | 'j' | 'l' | 't' | 'f' | 'r' | 'I' | '.' | ',' | ':' | ';' | '\'' | '|' | '!'
            | '(' | ')' | '[' | ']' => 0.3,
            'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.85,
            ' ' => 0.3,
            _ => 0.55,
        }
    }
}

impl TextMeasure for ProportionalMeasure {
    fn monospace_advance(&self, _font_size: f64) -> Option<f64> {
        None
    }

    fn measure(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(Self::char_em).sum::<f64>() * font_size
    }
}

/// Placement of one token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TokenBox {
    /// Left edge on the baseline.
    pub origin: Point,
    /// Advance width.
    pub width: f64,
    /// Zero-based line number.
    pub line: usize,
}

/// Placement of every token of one snapshot, index-aligned with its token list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapshotLayout {
    /// One box per token.
    pub boxes: Vec<TokenBox>,
    /// Number of lines.
    pub line_count: usize,
    /// Widest line, excluding padding.
    pub width: f64,
}

impl SnapshotLayout {
    /// Draw origin of token `index`.
    pub fn origin(&self, index: usize) -> Option<Point> {
        self.boxes.get(index).map(|b| b.origin)
    }
}

/// Lay out `tokens` top-left aligned inside the style's padding.
///
/// Tabs advance to the next multiple of [`TAB_WIDTH`] columns; each newline moves down by
/// `font_size * line_height`.
pub fn layout_tokens(
    tokens: &[Token],
    style: &RenderStyle,
    measure: &dyn TextMeasure,
) -> SnapshotLayout {
    let font_size = style.font_size;
    let advance = style.line_advance();
    let cell = measure.monospace_advance(font_size);
    let space = cell.unwrap_or_else(|| measure.measure(" ", font_size));

    let mut boxes = Vec::with_capacity(tokens.len());
    let mut line = 0usize;
    let mut column = 0usize;
    let mut x = 0.0f64;
    let mut widest = 0.0f64;

    for token in tokens {
        let baseline = style.padding + line as f64 * advance + font_size;
        let start = match cell {
            Some(c) => column as f64 * c,
            None => x,
        };
        let origin = Point::new(style.padding + start, baseline);

        if token.kind == TokenKind::Newline {
            boxes.push(TokenBox {
                origin,
                width: 0.0,
                line,
            });
            widest = widest.max(start);
            line += 1;
            column = 0;
            x = 0.0;
            continue;
        }

        for c in token.text.chars() {
            if c == '\t' {
                let next = (column / TAB_WIDTH + 1) * TAB_WIDTH;
                x += (next - column) as f64 * space;
                column = next;
            } else {
                column += 1;
                if cell.is_none() {
                    x += measure.measure(c.encode_utf8(&mut [0u8; 4]), font_size);
                }
            }
        }
        let end = match cell {
            Some(c) => column as f64 * c,
            None => x,
        };
        boxes.push(TokenBox {
            origin,
            width: end - start,
            line,
        });
        widest = widest.max(end);
    }

    SnapshotLayout {
        boxes,
        line_count: line + 1,
        width: widest,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
