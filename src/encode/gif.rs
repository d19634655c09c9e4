//! Animated GIF sink.

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use crate::encode::encoder::{FrameSink, SinkConfig};
use crate::encode::settings::ExportFormat;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::posterize_rgba8;
use crate::render::frame::FrameRGBA;

/// Collects kept frames with per-frame delays and writes one GIF on finish.
///
/// Frames are posterized to the quality tier's level count first, which bounds the colors each
/// frame's palette has to cover.
pub struct GifSink {
    loop_forever: bool,
    cfg: Option<SinkConfig>,
    frames: Vec<Frame>,
}

impl GifSink {
    /// New sink. `loop_forever` writes an infinite repeat extension.
    pub fn new(loop_forever: bool) -> Self {
        Self {
            loop_forever,
            cfg: None,
            frames: Vec::new(),
        }
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(ReelError::validation(format!(
                "gif dimensions are limited to {0}x{0}",
                u16::MAX
            )));
        }
        self.frames.clear();
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRGBA, hold_ms: f64) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::encoding(ExportFormat::Gif, "gif sink not started"))?;
        let mut img = frame.to_rgba_image()?;
        posterize_rgba8(&mut img, cfg.quality.params().gif_levels);
        let delay = Delay::from_numer_denom_ms(hold_ms.max(0.0).round() as u32, 1);
        self.frames.push(Frame::from_parts(img, 0, 0, delay));
        Ok(())
    }

    fn finish(&mut self) -> ReelResult<Vec<u8>> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| ReelError::encoding(ExportFormat::Gif, "gif sink not started"))?;
        if self.frames.is_empty() {
            return Err(ReelError::encoding(ExportFormat::Gif, "no frames to encode"));
        }

        let mut out = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut out, cfg.quality.params().gif_speed);
            if self.loop_forever {
                encoder
                    .set_repeat(Repeat::Infinite)
                    .with_context(|| "set gif repeat")?;
            }
            encoder
                .encode_frames(std::mem::take(&mut self.frames))
                .with_context(|| "encode gif frames")?;
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
