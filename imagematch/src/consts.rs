//! Constants for the YIQ color metric and the default comparison options.
//!
//! Coefficients are from "Measuring perceived color difference using YIQ NTSC
//! transmission color space in mobile applications" (Y. Kotsarenko, F. Ramos).

use rgb::RGB8;

// ============================================================================
// RGB -> YIQ
// ============================================================================

/// Luma (Y) weights for R, G, B.
pub const RGB_TO_Y: [f64; 3] = [0.298_895_31, 0.586_622_47, 0.114_482_23];

/// In-phase chroma (I) weights for R, G, B.
pub const RGB_TO_I: [f64; 3] = [0.595_977_99, -0.274_176_10, -0.321_801_89];

/// Quadrature chroma (Q) weights for R, G, B.
pub const RGB_TO_Q: [f64; 3] = [0.211_470_17, -0.522_617_11, 0.311_146_94];

// ============================================================================
// Perceptual distance
// ============================================================================

/// Weight of the squared luma difference.
pub const DELTA_WEIGHT_Y: f64 = 0.5053;
/// Weight of the squared I difference.
pub const DELTA_WEIGHT_I: f64 = 0.299;
/// Weight of the squared Q difference.
pub const DELTA_WEIGHT_Q: f64 = 0.1957;

/// Largest value the squared YIQ distance can take over 8-bit RGB.
///
/// `threshold` is normalized against it: `max_delta = MAX_YIQ_DELTA * threshold^2`.
pub const MAX_YIQ_DELTA: f64 = 35215.0;

// ============================================================================
// Option defaults
// ============================================================================

/// Default matching threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Default opacity of the source image in the diff output.
pub const DEFAULT_ALPHA: f64 = 0.1;

/// Default color of anti-aliased pixels (yellow).
pub const DEFAULT_AA_COLOR: RGB8 = RGB8 { r: 255, g: 255, b: 0 };

/// Default color of differing pixels (red).
pub const DEFAULT_DIFF_COLOR: RGB8 = RGB8 { r: 255, g: 0, b: 0 };
