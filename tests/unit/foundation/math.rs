use super::*;

#[test]
fn clamp01_handles_nan_and_infinities() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(f64::INFINITY), 1.0);
    assert_eq!(clamp01(f64::NEG_INFINITY), 0.0);
    assert_eq!(clamp01(0.25), 0.25);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let mut px = vec![64u8, 0, 0, 128, 10, 20, 30, 255, 0, 0, 0, 0];
    unpremultiply_rgba8(&mut px);
    assert_eq!(&px[0..4], &[128, 0, 0, 128]);
    assert_eq!(&px[4..8], &[10, 20, 30, 255]);
    assert_eq!(&px[8..12], &[0, 0, 0, 0]);
}

#[test]
fn posterize_keeps_extremes_and_snaps_midtones() {
    let mut px = vec![0u8, 255, 100, 255];
    posterize_rgba8(&mut px, 2);
    assert_eq!(px, vec![0, 255, 0, 255]);

    let mut px = vec![0u8, 255, 130, 7];
    posterize_rgba8(&mut px, 3);
    assert_eq!(px, vec![0, 255, 128, 7]);
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
}
