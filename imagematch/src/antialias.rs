//! Anti-aliased pixel detection.
//!
//! Based on "Anti-aliased Pixel and Intensity Slope Detector" by
//! V. Vysniauskas (2009). A pixel is treated as anti-aliasing when its
//! 3x3 neighborhood has both a darker and a brighter neighbor, and one of
//! those extremes sits inside a flat region in both images.

use rgb::RGBA8;

use crate::color::color_delta;

/// Clamped 3x3 window around `(x, y)`: `(x0, y0, x2, y2)`, inclusive.
#[inline]
fn window(x: usize, y: usize, width: usize, height: usize) -> (usize, usize, usize, usize) {
    (
        x.saturating_sub(1),
        y.saturating_sub(1),
        (x + 1).min(width - 1),
        (y + 1).min(height - 1),
    )
}

/// Border pixels start with one "equal" neighbor to make up for the
/// neighbors they lack.
#[inline]
fn border_head_start(x: usize, y: usize, (x0, y0, x2, y2): (usize, usize, usize, usize)) -> u32 {
    u32::from(x == x0 || x == x2 || y == y0 || y == y2)
}

/// Returns `true` if the pixel at `(x, y)` has 3 or more byte-identical
/// neighbors.
#[must_use]
pub fn has_many_siblings(img: &[RGBA8], x: usize, y: usize, width: usize, height: usize) -> bool {
    let win = window(x, y, width, height);
    let (x0, y0, x2, y2) = win;
    let center = img[y * width + x];
    let mut zeroes = border_head_start(x, y, win);

    for nx in x0..=x2 {
        for ny in y0..=y2 {
            if nx == x && ny == y {
                continue;
            }
            if img[ny * width + nx] == center {
                zeroes += 1;
            }
            if zeroes > 2 {
                return true;
            }
        }
    }

    false
}

/// Returns `true` if the pixel at `(x, y)` of `img` is likely part of an
/// anti-aliased edge. `other` is the image it is being compared against.
#[must_use]
pub fn antialiased(
    img: &[RGBA8],
    other: &[RGBA8],
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> bool {
    let win = window(x, y, width, height);
    let (x0, y0, x2, y2) = win;
    let center = img[y * width + x];
    let mut zeroes = border_head_start(x, y, win);

    let mut min = 0.0f64;
    let mut max = 0.0f64;
    let (mut min_x, mut min_y) = (0usize, 0usize);
    let (mut max_x, mut max_y) = (0usize, 0usize);

    for nx in x0..=x2 {
        for ny in y0..=y2 {
            if nx == x && ny == y {
                continue;
            }

            // brightness delta between the center pixel and this neighbor
            let delta = color_delta(center, img[ny * width + nx], true);

            if delta == 0.0 {
                zeroes += 1;
                // 3+ equal neighbors: flat area or hard edge
                if zeroes > 2 {
                    return false;
                }
            } else if delta < min {
                min = delta;
                min_x = nx;
                min_y = ny;
            } else if delta > max {
                max = delta;
                max_x = nx;
                max_y = ny;
            }
        }
    }

    // needs both a darker and a brighter neighbor
    if min == 0.0 || max == 0.0 {
        return false;
    }

    let flat_in_both = |px: usize, py: usize| {
        has_many_siblings(img, px, py, width, height)
            && has_many_siblings(other, px, py, width, height)
    };

    flat_in_both(min_x, min_y) || flat_in_both(max_x, max_y)
}
