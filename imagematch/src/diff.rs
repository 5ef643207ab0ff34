//! Pixel sweep combining the color metric, the anti-aliasing detector and
//! the diff painter.

use std::iter::Sum;
use std::ops::Add;

use log::{debug, trace};
use rgb::{RGB8, RGBA8};

use crate::antialias::antialiased;
use crate::color::color_delta;
use crate::consts::MAX_YIQ_DELTA;
use crate::draw::{draw_gray_pixel, draw_pixel};
use crate::Options;

/// Per-row (and per-image) sweep counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SweepStats {
    pub mismatched: usize,
    pub antialiased: usize,
}

impl Add for SweepStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            mismatched: self.mismatched + rhs.mismatched,
            antialiased: self.antialiased + rhs.antialiased,
        }
    }
}

impl Sum for SweepStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Read-only state shared by every row of a sweep.
struct Sweep<'a> {
    img1: &'a [RGBA8],
    img2: &'a [RGBA8],
    width: usize,
    height: usize,
    options: &'a Options,
    max_delta: f64,
}

impl Sweep<'_> {
    fn diff_color(&self, p1: RGBA8, p2: RGBA8) -> RGB8 {
        match self.options.diff_color_alt() {
            // img2 is darker than img1
            Some(alt) if color_delta(p1, p2, true) > 0.0 => alt,
            _ => self.options.diff_color(),
        }
    }

    /// Compares row `y`, painting into `out_row` (exactly `width` pixels) if given.
    fn row(&self, y: usize, mut out_row: Option<&mut [RGBA8]>) -> SweepStats {
        let opts = self.options;
        let mut stats = SweepStats::default();
        let row_start = y * self.width;

        for x in 0..self.width {
            let pos = row_start + x;
            let (p1, p2) = (self.img1[pos], self.img2[pos]);

            // squared YIQ distance between colors at this pixel position
            let delta = color_delta(p1, p2, false);

            if delta > self.max_delta {
                if !opts.include_aa()
                    && antialiased(self.img1, self.img2, x, y, self.width, self.height)
                    && antialiased(self.img2, self.img1, x, y, self.width, self.height)
                {
                    // anti-aliasing: not counted, and not part of a mask
                    stats.antialiased += 1;
                    if let Some(out) = out_row.as_deref_mut() {
                        if !opts.diff_mask() {
                            draw_pixel(&mut out[x], opts.aa_color());
                        }
                    }
                } else {
                    stats.mismatched += 1;
                    if let Some(out) = out_row.as_deref_mut() {
                        draw_pixel(&mut out[x], self.diff_color(p1, p2));
                    }
                }
            } else if let Some(out) = out_row.as_deref_mut() {
                if !opts.diff_mask() {
                    draw_gray_pixel(p1, opts.alpha(), &mut out[x]);
                }
            }
        }

        stats
    }

    #[cfg(not(feature = "parallel"))]
    fn run(&self, output: Option<&mut [RGBA8]>) -> SweepStats {
        match output {
            Some(out) => out
                .chunks_exact_mut(self.width)
                .enumerate()
                .map(|(y, row)| self.row(y, Some(row)))
                .sum(),
            None => (0..self.height).map(|y| self.row(y, None)).sum(),
        }
    }

    #[cfg(feature = "parallel")]
    fn run(&self, output: Option<&mut [RGBA8]>) -> SweepStats {
        use rayon::prelude::*;

        match output {
            Some(out) => out
                .par_chunks_exact_mut(self.width)
                .enumerate()
                .map(|(y, row)| self.row(y, Some(row)))
                .sum(),
            None => (0..self.height)
                .into_par_iter()
                .map(|y| self.row(y, None))
                .sum(),
        }
    }
}

/// Paints the background rendering of `img` into `out`.
fn draw_background(img: &[RGBA8], out: &mut [RGBA8], alpha: f64) {
    for (src, dst) in img.iter().zip(out.iter_mut()) {
        draw_gray_pixel(*src, alpha, dst);
    }
}

/// Compares two validated images of `width * height` pixels.
///
/// Returns the number of mismatched pixels. Callers must have checked that
/// all buffers hold exactly `width * height` pixels.
pub(crate) fn compare_pixels(
    img1: &[RGBA8],
    img2: &[RGBA8],
    output: Option<&mut [RGBA8]>,
    width: usize,
    height: usize,
    options: &Options,
) -> usize {
    debug_assert_eq!(img1.len(), width * height);
    debug_assert_eq!(img2.len(), width * height);
    trace!("comparing {width}x{height} images with {options:?}");

    // fast path if identical
    if img1 == img2 {
        debug!("images are identical, skipping sweep");
        if let Some(out) = output {
            if !options.diff_mask() {
                draw_background(img1, out, options.alpha());
            }
        }
        return 0;
    }

    let max_delta = MAX_YIQ_DELTA * options.threshold() * options.threshold();
    trace!("max acceptable delta: {max_delta}");

    let sweep = Sweep {
        img1,
        img2,
        width,
        height,
        options,
        max_delta,
    };
    let stats = sweep.run(output);

    debug!(
        "sweep finished: {} mismatched, {} anti-aliased of {} pixels",
        stats.mismatched,
        stats.antialiased,
        width * height
    );

    stats.mismatched
}
