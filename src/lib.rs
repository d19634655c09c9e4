//! codereel animates transitions between snapshots of source code.
//!
//! A [`Document`] is an ordered list of [`Snapshot`]s. The crate maps a global clock onto that
//! list, morphs tokens between adjacent snapshots and exports the result:
//!
//! - Map time to a snapshot with [`snapshot_at_time`] and skip redundant frames with
//!   [`frame_differs`]
//! - Draw any instant with a [`Renderer`] onto a [`DrawSurface`]
//! - Export MP4, WebM, GIF or a ZIP of frames through an [`Encoder`] from the
//!   [`EncoderRegistry`]
//! - Run many exports with bounded concurrency using a [`BatchExportManager`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod batch;
pub(crate) mod document;
pub(crate) mod encode;
pub(crate) mod render;
pub(crate) mod timeline;

pub use crate::foundation::core::{Canvas, Point, Rgba8};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::transition::{
    DEFAULT_SCALE_AMOUNT, DEFAULT_SLIDE_DISTANCE, FinalTransition, TokenEffect, TransitionConfig,
    TransitionEffect, TransitionState, apply_transition_effect, compute_transition_state,
    final_transition, interpolate_moved,
};
pub use crate::document::diff::{CorrespondenceKind, LcsDiff, TokenCorrespondence, TokenDiff};
pub use crate::document::model::{Document, RenderStyle, Snapshot, ThemeId};
pub use crate::document::token::{LexTokenizer, Token, TokenKind, Tokenizer};
pub use crate::timeline::time::{
    TimePosition, frame_differs, is_in_transition_window, snapshot_at_time, sum_duration,
    transition_progress,
};

pub use crate::render::frame::FrameRGBA;
pub use crate::render::layout::{
    MonospaceMeasure, ProportionalMeasure, SnapshotLayout, TAB_WIDTH, TextMeasure, TokenBox,
    layout_tokens,
};
pub use crate::render::playback::Playback;
pub use crate::render::raster::{FontBook, SvgRasterSurface};
pub use crate::render::renderer::{RenderState, Renderer, WindowKind};
pub use crate::render::still::{encode_png, render_still};
pub use crate::render::surface::{DrawCommand, DrawSurface, RecordingSurface, TextStyle};
pub use crate::render::theme::Theme;

pub use crate::encode::archive::{ArchiveFrame, ArchiveManifest, ArchiveSink, MANIFEST_NAME};
pub use crate::encode::encoder::{
    AbortHandle, Encoder, FrameEncoder, FrameSink, ProgressCallback, SinkConfig, SinkFactory,
};
pub use crate::encode::ffmpeg::{FfmpegSink, is_ffmpeg_on_path};
pub use crate::encode::gif::GifSink;
pub use crate::encode::plan::{FramePlan, PlannedFrame, plan_frames};
pub use crate::encode::registry::{EncoderFactory, EncoderRegistry};
pub use crate::encode::settings::{
    ArchiveImageFormat, DEFAULT_BASENAME, ExportFormat, ExportProgress, ExportResult,
    ExportSettings, ExportStage, MAX_FRAME_RATE, PngCompression, Quality, QualityParams,
    export_filename,
};

pub use crate::batch::manager::{
    BatchAbortHandle, BatchExportJob, BatchExportManager, BatchOptions, JobStatus,
};
