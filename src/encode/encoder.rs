//! Encoder contract and the shared render-then-sink frame loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use async_trait::async_trait;

use crate::document::model::Document;
use crate::encode::plan::plan_frames;
use crate::encode::settings::{
    ExportFormat, ExportProgress, ExportResult, ExportSettings, ExportStage, Quality,
    export_filename,
};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;
use crate::render::raster::{FontBook, SvgRasterSurface};
use crate::render::renderer::Renderer;
use crate::render::theme::Theme;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Debug)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Grid frame rate.
    pub frame_rate: u32,
    /// `1000 / frame_rate`.
    pub frame_duration_ms: f64,
    /// Grid frames in the whole export.
    pub frame_count: u64,
    /// Animation length in milliseconds.
    pub duration_ms: f64,
    /// Quality tier.
    pub quality: Quality,
    /// Background used when flattening alpha.
    pub background: Rgba8,
}

/// Format-specific consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called in increasing time order; `hold_ms` is how long the
/// frame stays on screen.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Push one kept frame.
    fn push_frame(&mut self, frame: &FrameRGBA, hold_ms: f64) -> ReelResult<()>;
    /// Finalize the container and return its bytes.
    fn finish(&mut self) -> ReelResult<Vec<u8>>;
}

/// Cooperative cancellation flag shared between an encoder and its controllers.
#[derive(Clone, Debug, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    /// Fresh, un-aborted handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Honored at the next frame boundary.
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress callback. Runs on the encoding task between frames.
pub type ProgressCallback = Box<dyn FnMut(&ExportProgress)>;

/// Anything that turns a document into one export.
#[async_trait(?Send)]
pub trait Encoder {
    /// Format this encoder produces.
    fn format(&self) -> ExportFormat;

    /// Run the export. Fails with [`ReelError::Aborted`] after [`Encoder::abort`].
    async fn encode(&mut self, settings: &ExportSettings) -> ReelResult<ExportResult>;

    /// Shared cancellation flag.
    fn abort_handle(&self) -> AbortHandle;

    /// Request cooperative cancellation.
    fn abort(&self) {
        self.abort_handle().abort();
    }

    /// Install a progress callback, replacing any previous one.
    fn set_progress_callback(&mut self, callback: ProgressCallback);
}

/// Builds a fresh sink for one export.
pub type SinkFactory = Box<dyn Fn(&ExportSettings) -> ReelResult<Box<dyn FrameSink>>>;

/// Base encoder: plans deduplicated frames, renders each one and hands it to a sink.
///
/// Every instance owns its own [`Renderer`], so concurrent encoders never invalidate each
/// other's caches.
pub struct FrameEncoder {
    document: Arc<Document>,
    format: ExportFormat,
    fonts: FontBook,
    make_sink: SinkFactory,
    abort: AbortHandle,
    on_progress: Option<ProgressCallback>,
}

impl std::fmt::Debug for FrameEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameEncoder")
            .field("format", &self.format)
            .field("aborted", &self.abort.is_aborted())
            .finish_non_exhaustive()
    }
}

impl FrameEncoder {
    /// Encoder for `format` using sinks from `make_sink`.
    pub fn new(
        document: Arc<Document>,
        format: ExportFormat,
        fonts: FontBook,
        make_sink: SinkFactory,
    ) -> Self {
        Self {
            document,
            format,
            fonts,
            make_sink,
            abort: AbortHandle::new(),
            on_progress: None,
        }
    }

    fn emit(&mut self, progress: ExportProgress) {
        if let Some(cb) = self.on_progress.as_mut() {
            cb(&progress);
        }
    }

    fn check_abort(&self) -> ReelResult<()> {
        if self.abort.is_aborted() {
            return Err(ReelError::Aborted);
        }
        Ok(())
    }
}

fn backend_error(format: ExportFormat, err: ReelError) -> ReelError {
    match err {
        ReelError::EncodingBackend { .. } | ReelError::Aborted => err,
        other => ReelError::encoding(format, other.to_string()),
    }
}

#[async_trait(?Send)]
impl Encoder for FrameEncoder {
    fn format(&self) -> ExportFormat {
        self.format
    }

    #[tracing::instrument(level = "info", skip(self, settings), fields(format = %self.format, quality = %settings.quality))]
    async fn encode(&mut self, settings: &ExportSettings) -> ReelResult<ExportResult> {
        if settings.format != self.format {
            return Err(ReelError::validation(format!(
                "{} encoder cannot produce {}",
                self.format, settings.format
            )));
        }
        settings.validate()?;
        self.check_abort()?;

        let document = self.document.clone();
        document.validate()?;
        let plan = plan_frames(&document, settings.frame_rate)?;
        let total = plan.kept();
        let started = Instant::now();
        self.emit(ExportProgress::at(0, total, ExportStage::Preparing, 0.0));

        let canvas = document.style.canvas;
        let (width, height) = settings.output_size(canvas);
        let mut surface =
            SvgRasterSurface::with_output_size(canvas, width, height, self.fonts.clone())?;
        let mut renderer = Renderer::new();
        renderer.set_document(document.clone());

        let mut sink = (self.make_sink)(settings)?;
        sink.begin(SinkConfig {
            width,
            height,
            frame_rate: settings.frame_rate,
            frame_duration_ms: plan.frame_duration_ms,
            frame_count: plan.frame_count,
            duration_ms: plan.duration_ms(),
            quality: settings.quality,
            background: Theme::get(document.style.theme).background,
        })
        .map_err(|e| backend_error(self.format, e))?;

        for (i, planned) in plan.frames.iter().enumerate() {
            self.check_abort()?;
            renderer.render(planned.time_ms, &mut surface)?;
            let frame = surface.rasterize()?;
            sink.push_frame(&frame, planned.hold_ms)
                .map_err(|e| backend_error(self.format, e))?;

            let elapsed = started.elapsed().as_secs_f64() * 1000.0;
            self.emit(ExportProgress::at(i + 1, total, ExportStage::Rendering, elapsed));
            tokio::task::yield_now().await;
            self.check_abort()?;
        }

        let elapsed = started.elapsed().as_secs_f64() * 1000.0;
        self.emit(ExportProgress::at(total, total, ExportStage::Finalizing, elapsed));
        let bytes = sink.finish().map_err(|e| backend_error(self.format, e))?;
        self.emit(ExportProgress::at(total, total, ExportStage::Done, elapsed));

        let filename = export_filename(
            settings.basename.as_deref(),
            self.format,
            settings.quality,
            chrono::Utc::now(),
        );
        tracing::info!(
            filename = %filename,
            bytes = bytes.len(),
            kept = total,
            elided = plan.elided(),
            "export finished"
        );
        Ok(ExportResult {
            byte_size: bytes.len(),
            bytes,
            filename,
            format: self.format,
            duration_ms: document.total_duration_ms(),
            frame_count: total,
        })
    }

    fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.on_progress = Some(callback);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encoder.rs"]
mod tests;
