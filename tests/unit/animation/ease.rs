use super::*;

#[test]
fn endpoints_are_exact_for_every_easing() {
    for e in Ease::all() {
        assert_eq!(e.apply(0.0), 0.0, "{e:?} at 0");
        assert_eq!(e.apply(1.0), 1.0, "{e:?} at 1");
        assert_eq!(e.apply(-3.0), 0.0, "{e:?} below range");
        assert_eq!(e.apply(7.0), 1.0, "{e:?} above range");
        assert_eq!(e.apply(f64::NAN), 0.0, "{e:?} nan");
    }
}

#[test]
fn every_easing_is_monotonic() {
    for e in Ease::all() {
        let mut prev = 0.0;
        for i in 0..=200 {
            let v = e.apply(f64::from(i) / 200.0);
            assert!(v + 1e-12 >= prev, "{e:?} decreased at step {i}");
            assert!((0.0..=1.0).contains(&v), "{e:?} left [0,1] at step {i}");
            prev = v;
        }
    }
}

#[test]
fn ids_round_trip_and_unknown_ids_error() {
    for e in Ease::all() {
        assert_eq!(Ease::from_id(e.id()).unwrap(), e);
    }
    let err = Ease::from_id("easeOutBounce").unwrap_err();
    assert!(matches!(err, ReelError::UnknownEasing(ref id) if id == "easeOutBounce"));
}

#[test]
fn serde_uses_registry_ids() {
    let json = serde_json::to_string(&Ease::OutCubic).unwrap();
    assert_eq!(json, "\"easeOutCubic\"");
    let back: Ease = serde_json::from_str("\"easeInOutSine\"").unwrap();
    assert_eq!(back, Ease::InOutSine);
    assert!(serde_json::from_str::<Ease>("\"wobble\"").is_err());
}
