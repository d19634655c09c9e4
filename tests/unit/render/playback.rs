use super::*;
use crate::document::model::Snapshot;
use crate::render::surface::RecordingSurface;

fn doc() -> Arc<Document> {
    Arc::new(Document::new(vec![
        Snapshot::new("one", "a", 1000.0).with_transition_ms(200.0),
        Snapshot::new("two", "b", 1000.0),
    ]))
}

#[test]
fn paused_playback_draws_once() {
    let mut p = Playback::new(doc());
    let mut s = RecordingSurface::new();
    assert!(!p.is_playing());
    assert!(p.tick(16.0, &mut s).unwrap());
    assert!(!p.tick(16.0, &mut s).unwrap());
    assert_eq!(p.position_ms(), 0.0);
}

#[test]
fn playing_advances_and_redraws_only_when_needed() {
    let mut p = Playback::new(doc());
    let mut s = RecordingSurface::new();
    p.play();
    assert!(p.tick(100.0, &mut s).unwrap());
    assert!(!p.tick(100.0, &mut s).unwrap());
    assert_eq!(p.position_ms(), 200.0);
    p.seek(850.0);
    assert!(p.tick(0.0, &mut s).unwrap());
    assert!(p.tick(10.0, &mut s).unwrap());
}

#[test]
fn stops_at_the_end_unless_looping() {
    let mut p = Playback::new(doc());
    let mut s = RecordingSurface::new();
    p.play();
    p.tick(5000.0, &mut s).unwrap();
    assert_eq!(p.position_ms(), p.duration_ms());
    assert!(!p.is_playing());

    p.play();
    assert_eq!(p.position_ms(), 0.0);
    p.set_looping(true);
    p.tick(2500.0, &mut s).unwrap();
    assert!(p.is_playing());
    assert_eq!(p.position_ms(), 500.0);
}

#[test]
fn speed_scales_elapsed_time() {
    let mut p = Playback::new(doc());
    let mut s = RecordingSurface::new();
    assert!(p.set_speed(0.0).is_err());
    assert!(p.set_speed(f64::NAN).is_err());
    p.set_speed(2.0).unwrap();
    p.play();
    p.tick(100.0, &mut s).unwrap();
    assert_eq!(p.position_ms(), 200.0);
    p.pause();
    p.tick(100.0, &mut s).unwrap();
    assert_eq!(p.position_ms(), 200.0);
}

#[test]
fn seek_clamps_into_the_document() {
    let mut p = Playback::new(doc());
    p.seek(-10.0);
    assert_eq!(p.position_ms(), 0.0);
    p.seek(1e9);
    assert_eq!(p.position_ms(), 2000.0);
    p.seek(f64::NAN);
    assert_eq!(p.position_ms(), 0.0);
}

#[test]
fn new_document_resets_position() {
    let mut p = Playback::new(doc());
    p.seek(700.0);
    p.set_document(Arc::new(Document::new(vec![Snapshot::new("x", "x", 50.0)])));
    assert_eq!(p.position_ms(), 0.0);
    assert_eq!(p.duration_ms(), 50.0);
    assert!(p.renderer().document().is_some());
}
