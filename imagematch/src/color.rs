//! Perceptual color distance in the YIQ color space.
//!
//! Semi-transparent pixels are composited over white before conversion,
//! so opacity changes show up as color changes.

use rgb::RGBA8;

use crate::consts::{
    DELTA_WEIGHT_I, DELTA_WEIGHT_Q, DELTA_WEIGHT_Y, RGB_TO_I, RGB_TO_Q, RGB_TO_Y,
};

/// Blends a channel value against white with opacity `a` (0.0-1.0).
#[inline]
#[must_use]
pub fn blend(c: f64, a: f64) -> f64 {
    255.0 + (c - 255.0) * a
}

/// Luma (Y) of an RGB triple.
#[inline]
#[must_use]
pub fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    r * RGB_TO_Y[0] + g * RGB_TO_Y[1] + b * RGB_TO_Y[2]
}

/// In-phase chroma (I) of an RGB triple.
#[inline]
#[must_use]
pub fn rgb2i(r: f64, g: f64, b: f64) -> f64 {
    r * RGB_TO_I[0] + g * RGB_TO_I[1] + b * RGB_TO_I[2]
}

/// Quadrature chroma (Q) of an RGB triple.
#[inline]
#[must_use]
pub fn rgb2q(r: f64, g: f64, b: f64) -> f64 {
    r * RGB_TO_Q[0] + g * RGB_TO_Q[1] + b * RGB_TO_Q[2]
}

/// RGB of a pixel as rendered on a white canvas.
#[inline]
fn composite_on_white(px: RGBA8) -> (f64, f64, f64) {
    let (r, g, b) = (f64::from(px.r), f64::from(px.g), f64::from(px.b));
    if px.a < 255 {
        let a = f64::from(px.a) / 255.0;
        (blend(r, a), blend(g, a), blend(b, a))
    } else {
        (r, g, b)
    }
}

/// Color difference between two pixels.
///
/// With `y_only` set, returns the signed luma difference `Y(p1) - Y(p2)`.
/// Otherwise returns the weighted squared YIQ distance, which lies in
/// `0.0..=MAX_YIQ_DELTA`.
#[must_use]
pub fn color_delta(p1: RGBA8, p2: RGBA8, y_only: bool) -> f64 {
    if p1 == p2 {
        return 0.0;
    }

    let (r1, g1, b1) = composite_on_white(p1);
    let (r2, g2, b2) = composite_on_white(p2);

    let y = rgb2y(r1, g1, b1) - rgb2y(r2, g2, b2);

    if y_only {
        return y;
    }

    let i = rgb2i(r1, g1, b1) - rgb2i(r2, g2, b2);
    let q = rgb2q(r1, g1, b1) - rgb2q(r2, g2, b2);

    DELTA_WEIGHT_Y * y * y + DELTA_WEIGHT_I * i * i + DELTA_WEIGHT_Q * q * q
}
