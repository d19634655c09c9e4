use super::*;

fn linear(out: f64, mov: f64, inn: f64) -> TransitionConfig {
    TransitionConfig {
        out_duration_proportion: out,
        move_duration_proportion: mov,
        in_duration_proportion: inn,
        easing: Ease::Linear,
        ..TransitionConfig::default()
    }
}

#[test]
fn phases_follow_the_documented_windows() {
    let cfg = linear(0.25, 0.5, 0.25);
    // move_start = (1 - 0.5) / 2 + 0.25 - 0.25 = 0.25
    let s = compute_transition_state(0.5, &cfg);
    assert_eq!(s.out_progress, 1.0);
    assert_eq!(s.move_progress, 0.5);
    assert_eq!(s.in_progress, 0.0);

    let s = compute_transition_state(0.125, &cfg);
    assert_eq!(s.out_progress, 0.5);
    assert_eq!(s.move_progress, 0.0);

    let s = compute_transition_state(0.875, &cfg);
    assert_eq!(s.in_progress, 0.5);
    assert_eq!(s.move_progress, 1.0);
}

#[test]
fn phases_can_overlap() {
    let cfg = linear(0.6, 0.4, 0.6);
    let s = compute_transition_state(0.5, &cfg);
    assert!(s.out_progress > 0.0 && s.out_progress < 1.0);
    assert!(s.in_progress > 0.0 && s.in_progress < 1.0);
}

#[test]
fn phases_are_monotonic_and_complete_at_one() {
    let configs = [
        linear(0.25, 0.5, 0.25),
        linear(0.1, 0.9, 0.1),
        linear(0.5, 0.9, 0.1),
        linear(0.0, 0.0, 0.0),
        TransitionConfig::default(),
        TransitionConfig {
            easing: Ease::OutExpo,
            ..linear(0.33, 0.2, 0.7)
        },
    ];
    for cfg in &configs {
        let mut prev = compute_transition_state(0.0, cfg);
        for i in 1..=400 {
            let s = compute_transition_state(f64::from(i) / 400.0, cfg);
            assert!(s.out_progress >= prev.out_progress, "{cfg:?} out at {i}");
            assert!(s.move_progress >= prev.move_progress, "{cfg:?} move at {i}");
            assert!(s.in_progress >= prev.in_progress, "{cfg:?} in at {i}");
            prev = s;
        }
        let end = compute_transition_state(1.0, cfg);
        assert_eq!(
            (end.out_progress, end.move_progress, end.in_progress),
            (1.0, 1.0, 1.0)
        );
    }
}

#[test]
fn zero_proportions_never_produce_nan() {
    let cfg = linear(0.0, 0.0, 0.0);
    for p in [0.0, 0.3, 0.5, 0.99, f64::NAN, -1.0, 2.0] {
        let s = compute_transition_state(p, &cfg);
        for v in [s.out_progress, s.move_progress, s.in_progress] {
            assert!(v.is_finite() && (0.0..=1.0).contains(&v), "p={p} -> {s:?}");
        }
    }
    let s = compute_transition_state(0.0, &cfg);
    assert_eq!(s.out_progress, 1.0);
    assert_eq!(s.in_progress, 0.0);
}

#[test]
fn fade_interpolates_position_and_alpha() {
    let cfg = linear(0.3, 0.3, 0.3);
    let e = apply_transition_effect(0.5, &cfg, Point::new(0.0, 0.0), Point::new(10.0, 20.0));
    assert_eq!(e.position, Point::new(5.0, 10.0));
    assert_eq!(e.alpha, 0.5);
    assert_eq!(e.scale, 1.0);
}

#[test]
fn slides_offset_one_axis_from_target() {
    let to = Point::new(100.0, 50.0);
    let mk = |effect| TransitionConfig {
        effect,
        slide_distance: Some(20.0),
        ..TransitionConfig::default()
    };
    let left = apply_transition_effect(0.25, &mk(TransitionEffect::SlideLeft), to, to);
    assert_eq!(left.position, Point::new(115.0, 50.0));
    let right = apply_transition_effect(0.25, &mk(TransitionEffect::SlideRight), to, to);
    assert_eq!(right.position, Point::new(85.0, 50.0));
    let up = apply_transition_effect(0.25, &mk(TransitionEffect::SlideUp), to, to);
    assert_eq!(up.position, Point::new(100.0, 65.0));
    let down = apply_transition_effect(0.25, &mk(TransitionEffect::SlideDown), to, to);
    assert_eq!(down.position, Point::new(100.0, 35.0));
    assert_eq!(down.alpha, 0.25);

    let done = apply_transition_effect(1.0, &mk(TransitionEffect::SlideUp), to, to);
    assert_eq!(done.position, to);
}

#[test]
fn scale_family_effects() {
    let at = Point::new(1.0, 1.0);
    let scale = TransitionConfig {
        effect: TransitionEffect::Scale,
        scale_amount: Some(0.5),
        ..TransitionConfig::default()
    };
    assert_eq!(apply_transition_effect(0.5, &scale, at, at).scale, 0.75);
    assert_eq!(apply_transition_effect(0.0, &scale, at, at).scale, 0.5);

    let zin = TransitionConfig {
        effect: TransitionEffect::ZoomIn,
        ..TransitionConfig::default()
    };
    assert_eq!(apply_transition_effect(0.4, &zin, at, at).scale, 0.4);

    let zout = TransitionConfig {
        effect: TransitionEffect::ZoomOut,
        ..TransitionConfig::default()
    };
    let e = apply_transition_effect(0.5, &zout, at, at);
    assert_eq!(e.scale, 1.5);
    assert_eq!(e.alpha, 0.5);
}

#[test]
fn moved_tokens_stay_opaque() {
    let e = interpolate_moved(0.5, Point::new(0.0, 10.0), Point::new(10.0, 30.0));
    assert_eq!(e.position, Point::new(5.0, 20.0));
    assert_eq!(e.alpha, 1.0);
    assert_eq!(e.scale, 1.0);
}

#[test]
fn final_transition_fades_content_by_half_time() {
    let f = final_transition(0.0, Ease::Linear);
    assert_eq!((f.content_alpha, f.marker_alpha), (1.0, 0.0));
    let f = final_transition(0.25, Ease::Linear);
    assert_eq!((f.content_alpha, f.marker_alpha), (0.5, 0.25));
    let f = final_transition(0.5, Ease::Linear);
    assert_eq!(f.content_alpha, 0.0);
    let f = final_transition(3.0, Ease::Linear);
    assert_eq!((f.content_alpha, f.marker_alpha), (0.0, 1.0));
}

#[test]
fn config_validation_rejects_bad_proportions() {
    assert!(TransitionConfig::default().validate().is_ok());
    assert!(linear(1.5, 0.5, 0.5).validate().is_err());
    assert!(linear(f64::NAN, 0.5, 0.5).validate().is_err());
    let bad_scale = TransitionConfig {
        scale_amount: Some(-1.0),
        ..TransitionConfig::default()
    };
    assert!(bad_scale.validate().is_err());
}

#[test]
fn config_json_uses_camel_case_effects_and_defaults() {
    let cfg: TransitionConfig =
        serde_json::from_str(r#"{ "effect": "slideLeft", "easing": "linear" }"#).unwrap();
    assert_eq!(cfg.effect, TransitionEffect::SlideLeft);
    assert_eq!(cfg.easing, Ease::Linear);
    assert_eq!(cfg.move_duration_proportion, 0.5);
}
