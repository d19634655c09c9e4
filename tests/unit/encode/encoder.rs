use super::*;
use crate::document::model::{RenderStyle, Snapshot};
use crate::foundation::core::Canvas;
use parking_lot::Mutex;

#[derive(Default)]
struct Log {
    begun: bool,
    holds: Vec<f64>,
    finished: bool,
}

struct CollectSink {
    log: Arc<Mutex<Log>>,
    fail_on: Option<usize>,
}

impl FrameSink for CollectSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ReelResult<()> {
        self.log.lock().begun = true;
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRGBA, hold_ms: f64) -> ReelResult<()> {
        frame.validate()?;
        let mut log = self.log.lock();
        if self.fail_on == Some(log.holds.len()) {
            return Err(ReelError::validation("sink rejected frame"));
        }
        log.holds.push(hold_ms);
        Ok(())
    }

    fn finish(&mut self) -> ReelResult<Vec<u8>> {
        self.log.lock().finished = true;
        Ok(b"done".to_vec())
    }
}

fn doc() -> Arc<Document> {
    let style = RenderStyle {
        canvas: Canvas {
            width: 16,
            height: 8,
        },
        ..RenderStyle::default()
    };
    Arc::new(
        Document::new(vec![
            Snapshot::new("a", "a", 2000.0).with_transition_ms(1000.0),
            Snapshot::new("b", "b", 1000.0),
        ])
        .with_style(style),
    )
}

fn encoder(log: Arc<Mutex<Log>>, fail_on: Option<usize>) -> FrameEncoder {
    FrameEncoder::new(
        doc(),
        ExportFormat::Gif,
        FontBook::empty(),
        Box::new(move |_settings: &ExportSettings| -> ReelResult<Box<dyn FrameSink>> {
            Ok(Box::new(CollectSink {
                log: log.clone(),
                fail_on,
            }))
        }),
    )
}

fn settings() -> ExportSettings {
    ExportSettings::new(ExportFormat::Gif).with_frame_rate(10)
}

#[tokio::test]
async fn pushes_only_kept_frames_with_holds() {
    let log = Arc::new(Mutex::new(Log::default()));
    let mut enc = encoder(log.clone(), None);
    let result = enc.encode(&settings()).await.unwrap();

    assert_eq!(result.bytes, b"done");
    assert_eq!(result.byte_size, 4);
    assert_eq!(result.frame_count, 11);
    assert_eq!(result.duration_ms, 3000.0);
    assert_eq!(result.format, ExportFormat::Gif);
    assert!(result.filename.starts_with("code-animation-"));
    assert!(result.filename.ends_with(".gif"));

    let log = log.lock();
    assert!(log.begun && log.finished);
    assert_eq!(log.holds.len(), 11);
    assert_eq!(log.holds[0], 1100.0);
    assert_eq!(log.holds.iter().sum::<f64>(), 3000.0);
}

#[tokio::test]
async fn progress_runs_through_every_stage() {
    let log = Arc::new(Mutex::new(Log::default()));
    let seen = Arc::new(Mutex::new(Vec::<ExportProgress>::new()));
    let mut enc = encoder(log, None);
    let sink = seen.clone();
    enc.set_progress_callback(Box::new(move |p: &ExportProgress| sink.lock().push(*p)));
    enc.encode(&settings()).await.unwrap();

    let seen = seen.lock();
    assert_eq!(seen.first().map(|p| p.stage), Some(ExportStage::Preparing));
    assert_eq!(seen.last().map(|p| p.stage), Some(ExportStage::Done));
    let rendering: Vec<_> = seen
        .iter()
        .filter(|p| p.stage == ExportStage::Rendering)
        .collect();
    assert_eq!(rendering.len(), 11);
    assert!(rendering.iter().all(|p| p.total == 11));
    assert!(seen.windows(2).all(|w| w[0].percentage <= w[1].percentage));
    assert_eq!(seen.last().map(|p| p.percentage), Some(100.0));
}

#[tokio::test]
async fn abort_before_encode_does_no_work() {
    let log = Arc::new(Mutex::new(Log::default()));
    let mut enc = encoder(log.clone(), None);
    enc.abort();
    let err = enc.encode(&settings()).await.unwrap_err();
    assert!(err.is_aborted());
    assert!(!log.lock().begun);
}

#[tokio::test]
async fn abort_is_honored_at_the_next_frame_boundary() {
    let log = Arc::new(Mutex::new(Log::default()));
    let mut enc = encoder(log.clone(), None);
    let handle = enc.abort_handle();
    enc.set_progress_callback(Box::new(move |p: &ExportProgress| {
        if p.stage == ExportStage::Rendering && p.current == 3 {
            handle.abort();
        }
    }));
    let err = enc.encode(&settings()).await.unwrap_err();
    assert!(matches!(err, ReelError::Aborted));
    let log = log.lock();
    assert_eq!(log.holds.len(), 3);
    assert!(!log.finished);
}

#[tokio::test]
async fn sink_failures_carry_format_context() {
    let log = Arc::new(Mutex::new(Log::default()));
    let mut enc = encoder(log, Some(2));
    let err = enc.encode(&settings()).await.unwrap_err();
    match err {
        ReelError::EncodingBackend { format, message } => {
            assert_eq!(format, "gif");
            assert!(message.contains("sink rejected frame"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn mismatched_settings_are_rejected() {
    let log = Arc::new(Mutex::new(Log::default()));
    let mut enc = encoder(log, None);
    let err = enc
        .encode(&ExportSettings::new(ExportFormat::Zip))
        .await
        .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert_eq!(enc.format(), ExportFormat::Gif);
}

#[test]
fn abort_handles_share_one_flag() {
    let a = AbortHandle::new();
    let b = a.clone();
    assert!(!b.is_aborted());
    a.abort();
    assert!(b.is_aborted());
}
