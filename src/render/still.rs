//! Single-frame rendering.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context as _;

use crate::document::model::Document;
use crate::foundation::error::ReelResult;
use crate::render::frame::FrameRGBA;
use crate::render::raster::{FontBook, SvgRasterSurface};
use crate::render::renderer::Renderer;

/// Render the frame at `t_ms`. `size` overrides the output pixel size (defaults to the canvas).
#[tracing::instrument(level = "debug", skip(document, fonts))]
pub fn render_still(
    document: Arc<Document>,
    t_ms: f64,
    fonts: FontBook,
    size: Option<(u32, u32)>,
) -> ReelResult<FrameRGBA> {
    let canvas = document.style.canvas;
    let (w, h) = size.unwrap_or((canvas.width, canvas.height));
    let mut surface = SvgRasterSurface::with_output_size(canvas, w, h, fonts)?;
    let mut renderer = Renderer::new();
    renderer.set_document(document);
    renderer.render(t_ms, &mut surface)?;
    surface.rasterize()
}

/// Encode a frame as PNG bytes (straight alpha).
pub fn encode_png(frame: &FrameRGBA) -> ReelResult<Vec<u8>> {
    let img = frame.to_rgba_image()?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .with_context(|| "encode png still")?;
    Ok(out.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/render/still.rs"]
mod tests;
