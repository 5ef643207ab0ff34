//! Diff image painting.

use rgb::{RGB8, RGBA8};

use crate::color::{blend, rgb2y};

/// Writes an opaque solid color.
#[inline]
pub fn draw_pixel(out: &mut RGBA8, color: RGB8) {
    *out = RGBA8::new(color.r, color.g, color.b, 255);
}

/// Writes the source pixel as grayscale, faded toward white.
///
/// The source luma is blended with opacity `alpha * source_alpha / 255`.
#[inline]
pub fn draw_gray_pixel(src: RGBA8, alpha: f64, out: &mut RGBA8) {
    let y = rgb2y(f64::from(src.r), f64::from(src.g), f64::from(src.b));
    // alpha outside 0..=1 can push the blend out of byte range
    let val = blend(y, alpha * f64::from(src.a) / 255.0).clamp(0.0, 255.0) as u8;
    draw_pixel(out, RGB8::new(val, val, val));
}
