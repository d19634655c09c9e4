use super::*;
use crate::animation::ease::Ease;
use crate::animation::transition::TransitionEffect;

#[test]
fn json_defaults_fill_style_and_transition() {
    let doc = Document::from_json_str(
        r#"{
            "snapshots": [
                { "id": "a", "text": "let x = 1;", "duration_ms": 2000, "transition_duration_ms": 1000 },
                { "id": "b", "text": "let x = 2;", "duration_ms": 1000 }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.language, "plaintext");
    assert_eq!(doc.style, RenderStyle::default());
    assert_eq!(doc.snapshots[1].transition_duration_ms, 0.0);
    assert_eq!(doc.total_duration_ms(), 3000.0);
}

#[test]
fn per_snapshot_transition_overrides_default() {
    let custom = TransitionConfig {
        effect: TransitionEffect::ZoomIn,
        easing: Ease::Linear,
        ..TransitionConfig::default()
    };
    let doc = Document::new(vec![
        Snapshot::new("a", "a", 100.0).with_transition_config(custom.clone()),
        Snapshot::new("b", "b", 100.0),
    ]);
    assert_eq!(doc.transition_for(0), &custom);
    assert_eq!(doc.transition_for(1), &TransitionConfig::default());
    assert_eq!(doc.transition_for(99), &TransitionConfig::default());
}

#[test]
fn validation_rejects_bad_durations_and_metrics() {
    let doc = Document::new(vec![Snapshot::new("a", "x", -1.0)]);
    assert!(doc.validate().is_err());

    let doc = Document::new(vec![Snapshot::new("a", "x", 10.0).with_transition_ms(f64::NAN)]);
    assert!(doc.validate().is_err());

    let doc = Document::new(vec![Snapshot::new("a", "x", 10.0)]).with_style(RenderStyle {
        font_size: 0.0,
        ..RenderStyle::default()
    });
    assert!(doc.validate().is_err());
}

#[test]
fn oversized_transition_window_is_accepted() {
    let doc = Document::new(vec![Snapshot::new("a", "x", 100.0).with_transition_ms(500.0)]);
    assert!(doc.validate().is_ok());
}

#[test]
fn unknown_easing_in_json_is_an_error() {
    let err = Document::from_json_str(
        r#"{ "snapshots": [], "default_transition": { "easing": "bouncy" } }"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("bouncy"), "{err}");
}

#[test]
fn json_round_trip_preserves_document() {
    let doc = Document::new(vec![
        Snapshot::new("a", "fn main() {}", 1500.0).with_transition_ms(500.0),
        Snapshot::new("b", "fn main() { run(); }", 1500.0),
    ])
    .with_language("rust");
    let json = doc.to_json_string().unwrap();
    assert_eq!(Document::from_json_str(&json).unwrap(), doc);
}
