//! CPU raster surface: draw calls are collected as SVG text nodes and rasterized with resvg.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;
use crate::render::surface::{DrawSurface, TextStyle};

/// Largest accepted output dimension.
const MAX_DIM: u32 = 16_384;

/// Shared font database used to shape SVG text.
#[derive(Clone, Debug)]
pub struct FontBook {
    db: Arc<usvg::fontdb::Database>,
}

impl FontBook {
    /// System fonts. Loading is slow; build once and clone.
    pub fn system() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self { db: Arc::new(db) }
    }

    /// No fonts at all. Text draws are accepted but produce no ink.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// System fonts plus every `ttf`/`otf`/`ttc` file directly inside `dir`.
    pub fn with_font_dir(dir: &Path) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        let Ok(rd) = std::fs::read_dir(dir) else {
            return Self { db: Arc::new(db) };
        };
        for entry in rd.flatten() {
            let path = entry.path();
            let is_font = path
                .extension()
                .and_then(|s| s.to_str())
                .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
                .unwrap_or(false);
            if is_font && let Err(e) = db.load_font_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
            }
        }
        Self { db: Arc::new(db) }
    }

    /// Number of loaded faces.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }
}

/// [`DrawSurface`] producing premultiplied [`FrameRGBA`] frames.
#[derive(Clone, Debug)]
pub struct SvgRasterSurface {
    canvas: Canvas,
    out_width: u32,
    out_height: u32,
    fonts: FontBook,
    background: Rgba8,
    alpha: f64,
    scale: f64,
    body: String,
}

impl SvgRasterSurface {
    /// Surface for `canvas`, rasterized at the canvas size.
    pub fn new(canvas: Canvas, fonts: FontBook) -> ReelResult<Self> {
        Self::with_output_size(canvas, canvas.width, canvas.height, fonts)
    }

    /// Surface for `canvas`, scaled to `out_width x out_height` on rasterization.
    pub fn with_output_size(
        canvas: Canvas,
        out_width: u32,
        out_height: u32,
        fonts: FontBook,
    ) -> ReelResult<Self> {
        canvas.validate()?;
        if out_width == 0 || out_height == 0 || out_width > MAX_DIM || out_height > MAX_DIM {
            return Err(ReelError::validation(format!(
                "output size must be within 1..={MAX_DIM}, got {out_width}x{out_height}"
            )));
        }
        Ok(Self {
            canvas,
            out_width,
            out_height,
            fonts,
            background: Rgba8::rgb(0x000000),
            alpha: 1.0,
            scale: 1.0,
            body: String::new(),
        })
    }

    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.out_width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.out_height
    }

    /// SVG document for the current frame.
    pub fn to_svg(&self) -> String {
        let (w, h) = (self.canvas.width, self.canvas.height);
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                r#"<rect width="{w}" height="{h}" fill="{bg}" fill-opacity="{bga}"/>{body}</svg>"#
            ),
            w = w,
            h = h,
            bg = self.background.to_hex_rgb(),
            bga = self.background.alpha_f64(),
            body = self.body,
        )
    }

    /// Rasterize the current frame.
    #[tracing::instrument(level = "trace", skip(self), fields(w = self.out_width, h = self.out_height))]
    pub fn rasterize(&self) -> ReelResult<FrameRGBA> {
        let opts = usvg::Options {
            fontdb: self.fonts.db.clone(),
            ..Default::default()
        };
        let svg = self.to_svg();
        let tree = usvg::Tree::from_str(&svg, &opts).with_context(|| "parse frame svg")?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(self.out_width, self.out_height)
            .ok_or_else(|| ReelError::validation("failed to allocate frame pixmap"))?;
        let sx = self.out_width as f32 / self.canvas.width as f32;
        let sy = self.out_height as f32 / self.canvas.height as f32;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(sx, sy),
            &mut pixmap.as_mut(),
        );

        Ok(FrameRGBA {
            width: self.out_width,
            height: self.out_height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }
}

impl DrawSurface for SvgRasterSurface {
    fn clear(&mut self, color: Rgba8) {
        self.background = color;
        self.alpha = 1.0;
        self.scale = 1.0;
        self.body.clear();
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
    }

    fn set_global_scale(&mut self, scale: f64) {
        self.scale = if scale.is_finite() { scale } else { 1.0 };
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle<'_>) {
        let opacity = self.alpha * style.color.alpha_f64();
        if opacity <= 0.0 || self.scale <= 0.0 || text.is_empty() {
            return;
        }
        let (x, y) = (origin.x, origin.y);
        let _ = write!(
            self.body,
            r#"<text x="{x}" y="{y}" font-family="{family}" font-size="{size}" fill="{fill}" fill-opacity="{opacity}" xml:space="preserve""#,
            family = escape_xml(style.font_family),
            size = style.font_size,
            fill = style.color.to_hex_rgb(),
        );
        if (self.scale - 1.0).abs() > f64::EPSILON {
            let s = self.scale;
            let _ = write!(
                self.body,
                r#" transform="translate({x} {y}) scale({s}) translate({nx} {ny})""#,
                nx = -x,
                ny = -y,
            );
        }
        let _ = write!(self.body, ">{}</text>", escape_xml(text));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
