/// Clamp into `[0, 1]`. `NaN` maps to `0`.
pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Convert premultiplied RGBA8 into straight RGBA8 in place.
pub(crate) fn unpremultiply_rgba8(px: &mut [u8]) {
    for p in px.chunks_exact_mut(4) {
        let a = u32::from(p[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut p[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Quantize each color channel to `levels` evenly spaced values.
///
/// Used to keep animated-image palettes within a color budget.
pub(crate) fn posterize_rgba8(px: &mut [u8], levels: u8) {
    if levels < 2 {
        return;
    }
    let steps = u32::from(levels - 1);
    for p in px.chunks_exact_mut(4) {
        for c in &mut p[..3] {
            let q = (u32::from(*c) * steps + 127) / 255;
            *c = ((q * 255 + steps / 2) / steps) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
