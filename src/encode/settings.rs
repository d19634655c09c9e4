//! Export configuration, results and progress reporting.

use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};

/// Basename used when settings do not name the output.
pub const DEFAULT_BASENAME: &str = "code-animation";

/// Output container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// H.264 in fragmented MP4.
    Mp4,
    /// VP9 in WebM.
    Webm,
    /// Animated GIF.
    Gif,
    /// ZIP archive of still frames plus a manifest.
    Zip,
}

impl ExportFormat {
    /// Every format, in declaration order.
    pub const ALL: [ExportFormat; 4] = [Self::Mp4, Self::Webm, Self::Gif, Self::Zip];

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Gif => "gif",
            Self::Zip => "zip",
        }
    }

    /// MIME type of the produced bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Webm => "video/webm",
            Self::Gif => "image/gif",
            Self::Zip => "application/zip",
        }
    }

    /// Whether the format is produced by the external video encoder.
    pub fn is_video(self) -> bool {
        matches!(self, Self::Mp4 | Self::Webm)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(Self::Mp4),
            "webm" => Ok(Self::Webm),
            "gif" => Ok(Self::Gif),
            "zip" => Ok(Self::Zip),
            _ => Err(ReelError::unsupported_format(s)),
        }
    }
}

/// Four-tier quality knob. Each tier maps to fixed per-format parameters.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Smallest output.
    Low,
    /// Default tier; omitted from generated filenames.
    #[default]
    Medium,
    /// Larger output, fewer artifacts.
    High,
    /// Near-lossless.
    Ultra,
}

impl Quality {
    /// Lowercase tier name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Ultra => "ultra",
        }
    }

    /// Format-specific parameters for this tier.
    pub fn params(self) -> QualityParams {
        QUALITY_TABLE[self as usize]
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PNG deflate effort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PngCompression {
    /// Fastest encode.
    Fast,
    /// Encoder default.
    Default,
    /// Smallest file.
    Best,
}

/// Numeric knobs derived from a [`Quality`] tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualityParams {
    /// libx264 constant rate factor (lower is better).
    pub h264_crf: u8,
    /// libvpx-vp9 constant rate factor (lower is better).
    pub vp9_crf: u8,
    /// GIF quantizer speed, `1..=30` (lower is better).
    pub gif_speed: i32,
    /// Levels per color channel before GIF quantization; bounds the palette budget.
    pub gif_levels: u8,
    /// JPEG quality, `1..=100`.
    pub jpeg_quality: u8,
    /// PNG compression effort.
    pub png_compression: PngCompression,
}

const QUALITY_TABLE: [QualityParams; 4] = [
    QualityParams {
        h264_crf: 32,
        vp9_crf: 42,
        gif_speed: 20,
        gif_levels: 4,
        jpeg_quality: 60,
        png_compression: PngCompression::Fast,
    },
    QualityParams {
        h264_crf: 26,
        vp9_crf: 34,
        gif_speed: 10,
        gif_levels: 6,
        jpeg_quality: 80,
        png_compression: PngCompression::Default,
    },
    QualityParams {
        h264_crf: 20,
        vp9_crf: 28,
        gif_speed: 5,
        gif_levels: 8,
        jpeg_quality: 90,
        png_compression: PngCompression::Default,
    },
    QualityParams {
        h264_crf: 16,
        vp9_crf: 20,
        gif_speed: 1,
        gif_levels: 16,
        jpeg_quality: 95,
        png_compression: PngCompression::Best,
    },
];

/// Image codec used for frames inside a ZIP archive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveImageFormat {
    /// Lossless PNG (keeps alpha).
    #[default]
    Png,
    /// JPEG, quality from the tier table.
    Jpeg,
}

impl ArchiveImageFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// One export request.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Output container.
    pub format: ExportFormat,
    /// Quality tier.
    pub quality: Quality,
    /// Frames per second.
    pub frame_rate: u32,
    /// Output width; derived from the canvas aspect when only `height` is set.
    pub width: Option<u32>,
    /// Output height; derived from the canvas aspect when only `width` is set.
    pub height: Option<u32>,
    /// Filename stem; [`DEFAULT_BASENAME`] when unset.
    pub basename: Option<String>,
    /// Frame codec for [`ExportFormat::Zip`].
    pub archive_image: ArchiveImageFormat,
    /// Loop forever ([`ExportFormat::Gif`]).
    pub gif_loop: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Gif,
            quality: Quality::Medium,
            frame_rate: 30,
            width: None,
            height: None,
            basename: None,
            archive_image: ArchiveImageFormat::Png,
            gif_loop: true,
        }
    }
}

/// Largest accepted frame rate.
pub const MAX_FRAME_RATE: u32 = 240;

impl ExportSettings {
    /// Default settings for `format`.
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Set the quality tier.
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Set the frame rate.
    pub fn with_frame_rate(mut self, frame_rate: u32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Set the output size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Reject zero or absurd frame rates and zero dimensions.
    pub fn validate(&self) -> ReelResult<()> {
        if self.frame_rate == 0 || self.frame_rate > MAX_FRAME_RATE {
            return Err(ReelError::validation(format!(
                "frame_rate must be within 1..={MAX_FRAME_RATE}, got {}",
                self.frame_rate
            )));
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(ReelError::validation("output width/height must be non-zero"));
        }
        if let Some(name) = &self.basename
            && (name.is_empty() || name.contains(['/', '\\']))
        {
            return Err(ReelError::validation(format!(
                "basename must be a non-empty file stem, got '{name}'"
            )));
        }
        Ok(())
    }

    /// Output pixel size for a document canvas.
    pub fn output_size(&self, canvas: Canvas) -> (u32, u32) {
        let aspect = f64::from(canvas.width) / f64::from(canvas.height);
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, ((f64::from(w) / aspect).round() as u32).max(1)),
            (None, Some(h)) => (((f64::from(h) * aspect).round() as u32).max(1), h),
            (None, None) => (canvas.width, canvas.height),
        }
    }
}

/// `{basename}{-quality unless medium}-{YYYYMMDD-HHMMSS}.{ext}`
pub fn export_filename(
    basename: Option<&str>,
    format: ExportFormat,
    quality: Quality,
    timestamp: chrono::DateTime<chrono::Utc>,
) -> String {
    let base = basename.unwrap_or(DEFAULT_BASENAME);
    let suffix = match quality {
        Quality::Medium => String::new(),
        q => format!("-{q}"),
    };
    format!(
        "{base}{suffix}-{}.{}",
        timestamp.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

/// Finished export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportResult {
    /// Encoded output.
    pub bytes: Vec<u8>,
    /// Generated filename.
    pub filename: String,
    /// Output container.
    pub format: ExportFormat,
    /// `bytes.len()`.
    pub byte_size: usize,
    /// Animation length in milliseconds.
    pub duration_ms: f64,
    /// Number of distinct frames handed to the sink.
    pub frame_count: usize,
}

/// Stage of a running export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStage {
    /// Planning frames and starting the sink.
    Preparing,
    /// Rendering and pushing frames.
    Rendering,
    /// Finalizing the container.
    Finalizing,
    /// Output ready.
    Done,
}

impl ExportStage {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
            Self::Rendering => "Rendering frames",
            Self::Finalizing => "Finalizing",
            Self::Done => "Done",
        }
    }
}

/// Progress snapshot handed to progress callbacks.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ExportProgress {
    /// Frames processed so far.
    pub current: usize,
    /// Frames to process (kept frames only).
    pub total: usize,
    /// `current / total` as a percentage in `[0, 100]`.
    pub percentage: f64,
    /// Current stage.
    pub stage: ExportStage,
    /// Wall-time estimate, once at least one frame is done.
    pub estimated_ms_remaining: Option<f64>,
}

impl ExportProgress {
    /// Progress at `current / total` after `elapsed_ms` of wall time.
    pub fn at(current: usize, total: usize, stage: ExportStage, elapsed_ms: f64) -> Self {
        let percentage = if total == 0 {
            100.0
        } else {
            (current as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };
        let estimated_ms_remaining = (current > 0).then(|| {
            let per_frame = elapsed_ms / current as f64;
            per_frame * total.saturating_sub(current) as f64
        });
        Self {
            current,
            total,
            percentage,
            stage,
            estimated_ms_remaining,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/settings.rs"]
mod tests;
