use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::unpremultiply_rgba8;

/// A rendered frame as RGBA8 pixels.
///
/// Raster surfaces produce **premultiplied alpha**; the `premultiplied` flag makes this explicit at
/// sink boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Validate that `data` holds exactly `width * height` pixels.
    pub fn validate(&self) -> ReelResult<()> {
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if self.data.len() != expected {
            return Err(ReelError::validation(format!(
                "frame data is {} bytes, expected {expected} for {}x{}",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// Straight-alpha copy as an `image` buffer.
    pub fn to_rgba_image(&self) -> ReelResult<image::RgbaImage> {
        self.validate()?;
        let mut data = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8(&mut data);
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| ReelError::validation("frame buffer does not match its dimensions"))
    }
}
