//! Format-to-encoder lookup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::document::model::Document;
use crate::encode::archive::ArchiveSink;
use crate::encode::encoder::{Encoder, FrameEncoder, FrameSink};
use crate::encode::ffmpeg::FfmpegSink;
use crate::encode::gif::GifSink;
use crate::encode::settings::{ExportFormat, ExportSettings};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::raster::FontBook;

/// Builds a fresh encoder for one export of `document`.
pub type EncoderFactory = Arc<dyn Fn(Arc<Document>) -> Box<dyn Encoder>>;

/// Maps export formats to encoder factories.
#[derive(Clone, Default)]
pub struct EncoderRegistry {
    factories: HashMap<ExportFormat, EncoderFactory>,
}

impl std::fmt::Debug for EncoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formats: Vec<_> = self.factories.keys().map(|k| k.extension()).collect();
        formats.sort_unstable();
        f.debug_struct("EncoderRegistry")
            .field("formats", &formats)
            .finish()
    }
}

impl EncoderRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the video, GIF and archive encoders, shaping text with `fonts`.
    pub fn with_builtin(fonts: FontBook) -> Self {
        let mut reg = Self::new();
        for format in ExportFormat::ALL {
            let fonts = fonts.clone();
            reg.register(
                format,
                Arc::new(move |doc: Arc<Document>| -> Box<dyn Encoder> {
                    Box::new(FrameEncoder::new(
                        doc,
                        format,
                        fonts.clone(),
                        Box::new(move |settings: &ExportSettings| builtin_sink(format, settings)),
                    ))
                }),
            );
        }
        reg
    }

    /// Add or replace the factory for `format`.
    pub fn register(&mut self, format: ExportFormat, factory: EncoderFactory) {
        self.factories.insert(format, factory);
    }

    /// Whether `format` has a factory.
    pub fn supports(&self, format: ExportFormat) -> bool {
        self.factories.contains_key(&format)
    }

    /// Fresh encoder for `format`, or [`ReelError::UnsupportedFormat`].
    pub fn create(
        &self,
        format: ExportFormat,
        document: Arc<Document>,
    ) -> ReelResult<Box<dyn Encoder>> {
        let factory = self
            .factories
            .get(&format)
            .ok_or_else(|| ReelError::unsupported_format(format.extension()))?;
        Ok(factory(document))
    }
}

fn builtin_sink(
    format: ExportFormat,
    settings: &ExportSettings,
) -> ReelResult<Box<dyn FrameSink>> {
    Ok(match format {
        ExportFormat::Mp4 | ExportFormat::Webm => Box::new(FfmpegSink::new(format)?),
        ExportFormat::Gif => Box::new(GifSink::new(settings.gif_loop)),
        ExportFormat::Zip => Box::new(ArchiveSink::new(settings.archive_image)),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/registry.rs"]
mod tests;
