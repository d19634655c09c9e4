//! ZIP archive of still frames plus a JSON manifest.

use std::io::{Cursor, Write as _};

use anyhow::Context as _;
use image::ImageEncoder as _;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::encode::encoder::{FrameSink, SinkConfig};
use crate::encode::settings::{ArchiveImageFormat, ExportFormat, PngCompression, Quality};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;

/// Name of the manifest entry.
pub const MANIFEST_NAME: &str = "manifest.json";

/// Manifest written next to the frames.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArchiveManifest {
    /// Frame image format.
    pub format: ArchiveImageFormat,
    /// Grid frame rate.
    pub frame_rate: u32,
    /// Number of frame files.
    pub frame_count: usize,
    /// Animation length in milliseconds.
    pub duration_ms: f64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Quality tier.
    pub quality: Quality,
    /// Archive creation time.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Frame entries in playback order.
    pub frames: Vec<ArchiveFrame>,
}

/// One frame file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArchiveFrame {
    /// Path inside the archive.
    pub file: String,
    /// Time the frame appears.
    pub time_ms: f64,
    /// How long it stays.
    pub hold_ms: f64,
}

/// Writes each kept frame as an independent PNG or JPEG.
pub struct ArchiveSink {
    image_format: ArchiveImageFormat,
    zip: Option<ZipWriter<Cursor<Vec<u8>>>>,
    cfg: Option<SinkConfig>,
    frames: Vec<ArchiveFrame>,
    clock_ms: f64,
}

impl ArchiveSink {
    /// New sink writing frames as `image_format`.
    pub fn new(image_format: ArchiveImageFormat) -> Self {
        Self {
            image_format,
            zip: None,
            cfg: None,
            frames: Vec::new(),
            clock_ms: 0.0,
        }
    }

    fn encode_image(&self, frame: &FrameRGBA, quality: Quality) -> ReelResult<Vec<u8>> {
        let img = frame.to_rgba_image()?;
        let params = quality.params();
        let mut buf = Vec::new();
        match self.image_format {
            ArchiveImageFormat::Png => {
                let compression = match params.png_compression {
                    PngCompression::Fast => CompressionType::Fast,
                    PngCompression::Default => CompressionType::Default,
                    PngCompression::Best => CompressionType::Best,
                };
                PngEncoder::new_with_quality(&mut buf, compression, FilterType::Adaptive)
                    .write_image(
                        img.as_raw(),
                        img.width(),
                        img.height(),
                        image::ExtendedColorType::Rgba8,
                    )
                    .with_context(|| "encode png frame")?;
            }
            ArchiveImageFormat::Jpeg => {
                let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
                let mut cursor = Cursor::new(&mut buf);
                JpegEncoder::new_with_quality(&mut cursor, params.jpeg_quality)
                    .encode(
                        rgb.as_raw(),
                        rgb.width(),
                        rgb.height(),
                        image::ExtendedColorType::Rgb8,
                    )
                    .with_context(|| "encode jpeg frame")?;
            }
        }
        Ok(buf)
    }
}

fn not_started() -> ReelError {
    ReelError::encoding(ExportFormat::Zip, "archive sink not started")
}

impl FrameSink for ArchiveSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.zip = Some(ZipWriter::new(Cursor::new(Vec::new())));
        self.frames.clear();
        self.clock_ms = 0.0;
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRGBA, hold_ms: f64) -> ReelResult<()> {
        let quality = self.cfg.as_ref().ok_or_else(not_started)?.quality;
        let bytes = self.encode_image(frame, quality)?;
        let file = format!(
            "frames/frame_{:06}.{}",
            self.frames.len(),
            self.image_format.extension()
        );

        let zip = self.zip.as_mut().ok_or_else(not_started)?;
        // Frame images are already compressed.
        zip.start_file(
            file.as_str(),
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        )
        .with_context(|| format!("start zip entry '{file}'"))?;
        zip.write_all(&bytes)
            .with_context(|| format!("write zip entry '{file}'"))?;

        self.frames.push(ArchiveFrame {
            file,
            time_ms: self.clock_ms,
            hold_ms,
        });
        self.clock_ms += hold_ms;
        Ok(())
    }

    fn finish(&mut self) -> ReelResult<Vec<u8>> {
        let cfg = self.cfg.take().ok_or_else(not_started)?;
        let mut zip = self.zip.take().ok_or_else(not_started)?;

        let manifest = ArchiveManifest {
            format: self.image_format,
            frame_rate: cfg.frame_rate,
            frame_count: self.frames.len(),
            duration_ms: cfg.duration_ms,
            width: cfg.width,
            height: cfg.height,
            quality: cfg.quality,
            created_at: chrono::Utc::now(),
            frames: std::mem::take(&mut self.frames),
        };
        let json = serde_json::to_vec_pretty(&manifest)
            .map_err(|e| ReelError::serde(e.to_string()))?;
        zip.start_file(
            MANIFEST_NAME,
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        )
        .with_context(|| "start manifest entry")?;
        zip.write_all(&json).with_context(|| "write manifest")?;

        let cursor = zip.finish().with_context(|| "finalize zip archive")?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/archive.rs"]
mod tests;
