//! # imagematch
//!
//! Pixel-level image comparison built for visual regression tests.
//!
//! Two equally-sized RGBA images are compared pixel by pixel using a
//! perceptual color distance in the YIQ color space. Pixels that differ only
//! because of anti-aliasing along edges are detected and excluded from the
//! mismatch count. Optionally a diff image is painted:
//!
//! - differing pixels in `diff_color` (red by default)
//! - anti-aliased pixels in `aa_color` (yellow by default)
//! - everything else as a faded grayscale copy of the first image, or left
//!   untouched in mask mode
//!
//! ## Example
//!
//! ```rust
//! use imagematch::{imagematch, Options};
//!
//! let (width, height) = (2, 1);
//! let img1: Vec<u8> = vec![0, 0, 0, 255, 255, 0, 0, 255];
//! let img2: Vec<u8> = vec![0, 0, 0, 255, 0, 0, 0, 255];
//! let mut diff = vec![0u8; img1.len()];
//!
//! let options = Options::default().with_include_aa(true);
//! let mismatched = imagematch(&img1, &img2, Some(&mut diff), width, height, &options)?;
//!
//! assert_eq!(mismatched, 1);
//! assert_eq!(&diff[4..], &[255, 0, 0, 255]);
//! # Ok::<(), imagematch::ImagematchError>(())
//! ```
//!
//! ## Features
//!
//! - **`parallel`**: Sweep rows in parallel with rayon
//! - **`internals`**: Expose internal modules for testing/benchmarking (unstable API)
//!
//! ## References
//!
//! - Y. Kotsarenko, F. Ramos, "Measuring perceived color difference using YIQ
//!   NTSC transmission color space in mobile applications", 2010
//! - V. Vysniauskas, "Anti-aliased Pixel and Intensity Slope Detector", 2009

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

use std::borrow::Cow;

use rgb::FromSlice;

#[cfg(feature = "internals")]
pub mod antialias;
#[cfg(not(feature = "internals"))]
pub(crate) mod antialias;

#[cfg(feature = "internals")]
pub mod color;
#[cfg(not(feature = "internals"))]
pub(crate) mod color;

pub mod consts;

mod diff;

#[cfg(feature = "internals")]
pub mod draw;
#[cfg(not(feature = "internals"))]
pub(crate) mod draw;

pub mod pixels;

pub use pixels::{PixelData, PixelDataMut};

// Re-export imgref and rgb types for convenience
pub use imgref::{Img, ImgRef, ImgRefMut, ImgVec};
pub use rgb::{RGB8, RGBA8};

use crate::consts::{DEFAULT_AA_COLOR, DEFAULT_ALPHA, DEFAULT_DIFF_COLOR, DEFAULT_THRESHOLD};

/// Error type for imagematch operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImagematchError {
    /// A buffer does not hold 8-bit RGBA samples.
    InvalidPixelData {
        /// Which buffer was rejected: `"img1"`, `"img2"` or `"output"`.
        buffer: &'static str,
    },
    /// Buffers that must have equal size don't.
    SizeMismatch {
        /// Size of the first image, in bytes.
        expected: usize,
        /// Size of the offending buffer, in bytes.
        actual: usize,
    },
    /// Image data size doesn't match `width * height * 4`.
    DimensionMismatch {
        /// Width provided.
        width: usize,
        /// Height provided.
        height: usize,
        /// Expected buffer size in bytes (`usize::MAX` if it overflows).
        expected: usize,
        /// Actual buffer size in bytes.
        actual: usize,
    },
}

impl std::fmt::Display for ImagematchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPixelData { buffer } => {
                write!(f, "image data ({buffer}): 8-bit RGBA samples expected")
            }
            Self::SizeMismatch { expected, actual } => {
                write!(f, "image sizes do not match: {expected} vs {actual} bytes")
            }
            Self::DimensionMismatch {
                width,
                height,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "image data size {actual} does not match {width}x{height} (expected {expected} bytes)"
                )
            }
        }
    }
}

impl std::error::Error for ImagematchError {}

/// Comparison options.
///
/// Start from the defaults and override what you need:
/// ```rust
/// use imagematch::{Options, RGB8};
///
/// let options = Options::new()
///     .with_threshold(0.05)                     // more sensitive
///     .with_diff_color(RGB8::new(255, 0, 255))  // magenta diffs
///     .with_diff_mask(true);                    // transparent background
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    threshold: f64,
    include_aa: bool,
    alpha: f64,
    aa_color: RGB8,
    diff_color: RGB8,
    diff_color_alt: Option<RGB8>,
    diff_mask: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            include_aa: false,
            alpha: DEFAULT_ALPHA,
            aa_color: DEFAULT_AA_COLOR,
            diff_color: DEFAULT_DIFF_COLOR,
            diff_color_alt: None,
            diff_mask: false,
        }
    }
}

impl Options {
    /// Creates new `Options` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the matching threshold, from 0.0 to 1.0.
    /// Smaller values make the comparison more sensitive; 0.0 only accepts
    /// exact matches.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// When `true`, anti-aliasing detection is disabled and every pixel
    /// above the threshold counts as a difference.
    #[must_use]
    pub fn with_include_aa(mut self, include_aa: bool) -> Self {
        self.include_aa = include_aa;
        self
    }

    /// Sets the opacity of the first image in the diff output background.
    ///
    /// Meaningful in `0.0..=1.0`; values outside that range saturate to
    /// black or white background pixels.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the color of anti-aliased pixels in the diff output.
    #[must_use]
    pub fn with_aa_color(mut self, color: RGB8) -> Self {
        self.aa_color = color;
        self
    }

    /// Sets the color of differing pixels in the diff output.
    #[must_use]
    pub fn with_diff_color(mut self, color: RGB8) -> Self {
        self.diff_color = color;
        self
    }

    /// Sets an alternative color for differences where the second image is
    /// darker than the first, to tell "added" from "removed" content.
    /// `None` (default) paints all differences with the diff color.
    #[must_use]
    pub fn with_diff_color_alt(mut self, color: Option<RGB8>) -> Self {
        self.diff_color_alt = color;
        self
    }

    /// When `true`, only differences are painted; all other output pixels
    /// are left untouched.
    #[must_use]
    pub fn with_diff_mask(mut self, diff_mask: bool) -> Self {
        self.diff_mask = diff_mask;
        self
    }

    /// Returns the matching threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns whether anti-aliased pixels count as differences.
    pub fn include_aa(&self) -> bool {
        self.include_aa
    }

    /// Returns the background opacity.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the anti-aliased pixel color.
    pub fn aa_color(&self) -> RGB8 {
        self.aa_color
    }

    /// Returns the diff pixel color.
    pub fn diff_color(&self) -> RGB8 {
        self.diff_color
    }

    /// Returns the alternative diff color for darkened pixels, if set.
    pub fn diff_color_alt(&self) -> Option<RGB8> {
        self.diff_color_alt
    }

    /// Returns whether the output is a mask.
    pub fn diff_mask(&self) -> bool {
        self.diff_mask
    }
}

/// Compares two RGBA images and returns the number of mismatched pixels.
///
/// `img1`, `img2` and `output` hold interleaved 8-bit RGBA samples,
/// `width * height * 4` bytes each. When `output` is given, the diff image is
/// painted into it.
///
/// # Errors
/// Returns an error, before anything is written to `output`, if:
/// - a buffer does not hold 8-bit samples ([`ImagematchError::InvalidPixelData`])
/// - the buffers differ in size ([`ImagematchError::SizeMismatch`])
/// - the size is not `width * height * 4` ([`ImagematchError::DimensionMismatch`])
pub fn imagematch<A, B, O>(
    img1: &A,
    img2: &B,
    output: Option<&mut O>,
    width: usize,
    height: usize,
    options: &Options,
) -> Result<usize, ImagematchError>
where
    A: PixelData + ?Sized,
    B: PixelData + ?Sized,
    O: PixelDataMut + ?Sized,
{
    let bytes1 = img1
        .pixel_bytes()
        .ok_or(ImagematchError::InvalidPixelData { buffer: "img1" })?;
    let bytes2 = img2
        .pixel_bytes()
        .ok_or(ImagematchError::InvalidPixelData { buffer: "img2" })?;
    let out_bytes = match output {
        Some(out) => Some(
            out.pixel_bytes_mut()
                .ok_or(ImagematchError::InvalidPixelData { buffer: "output" })?,
        ),
        None => None,
    };

    if bytes1.len() != bytes2.len() {
        return Err(ImagematchError::SizeMismatch {
            expected: bytes1.len(),
            actual: bytes2.len(),
        });
    }
    if let Some(out) = &out_bytes {
        if out.len() != bytes1.len() {
            return Err(ImagematchError::SizeMismatch {
                expected: bytes1.len(),
                actual: out.len(),
            });
        }
    }

    let expected = width.checked_mul(height).and_then(|n| n.checked_mul(4));
    if expected != Some(bytes1.len()) {
        return Err(ImagematchError::DimensionMismatch {
            width,
            height,
            expected: expected.unwrap_or(usize::MAX),
            actual: bytes1.len(),
        });
    }

    Ok(diff::compare_pixels(
        bytes1.as_rgba(),
        bytes2.as_rgba(),
        out_bytes.map(|bytes| bytes.as_rgba_mut()),
        width,
        height,
        options,
    ))
}

/// Counts mismatched pixels without painting a diff image.
///
/// Same as [`imagematch`] with no output.
///
/// # Errors
/// See [`imagematch`].
pub fn count_mismatches<A, B>(
    img1: &A,
    img2: &B,
    width: usize,
    height: usize,
    options: &Options,
) -> Result<usize, ImagematchError>
where
    A: PixelData + ?Sized,
    B: PixelData + ?Sized,
{
    imagematch::<A, B, [u8]>(img1, img2, None, width, height, options)
}

/// Contiguous pixels of `img`, copying only if it has row padding.
fn contiguous<'a>(img: ImgRef<'a, RGBA8>) -> Cow<'a, [RGBA8]> {
    let len = img.width() * img.height();
    if img.stride() == img.width() {
        let buf: &'a [RGBA8] = *img.buf();
        Cow::Borrowed(&buf[..len])
    } else {
        Cow::Owned(img.rows().flatten().copied().collect())
    }
}

/// Compares two `imgref` images and returns the number of mismatched pixels.
///
/// Dimensions are taken from the images, which may have row padding. When
/// `output` is given, the diff image is painted into it.
///
/// # Errors
/// Returns [`ImagematchError::SizeMismatch`] if the images (or the output)
/// differ in dimensions.
///
/// # Example
/// ```rust
/// use imagematch::{imagematch_img, Img, Options, RGBA8};
///
/// let white = vec![RGBA8::new(255, 255, 255, 255); 16 * 16];
/// let mut changed = white.clone();
/// changed[8 * 16 + 8] = RGBA8::new(0, 0, 0, 255);
///
/// let img1 = Img::new(white, 16, 16);
/// let img2 = Img::new(changed, 16, 16);
/// let mut diff = Img::new(vec![RGBA8::default(); 16 * 16], 16, 16);
///
/// let n = imagematch_img(img1.as_ref(), img2.as_ref(), Some(diff.as_mut()), &Options::default())?;
/// assert_eq!(n, 1);
/// assert_eq!(diff[(8usize, 8usize)], RGBA8::new(255, 0, 0, 255));
/// # Ok::<(), imagematch::ImagematchError>(())
/// ```
pub fn imagematch_img(
    img1: ImgRef<'_, RGBA8>,
    img2: ImgRef<'_, RGBA8>,
    output: Option<ImgRefMut<'_, RGBA8>>,
    options: &Options,
) -> Result<usize, ImagematchError> {
    let (width, height) = (img1.width(), img1.height());
    let size_of = |w: usize, h: usize| w.saturating_mul(h).saturating_mul(4);
    let expected = size_of(width, height);

    if img2.width() != width || img2.height() != height {
        return Err(ImagematchError::SizeMismatch {
            expected,
            actual: size_of(img2.width(), img2.height()),
        });
    }
    if let Some(out) = &output {
        if out.width() != width || out.height() != height {
            return Err(ImagematchError::SizeMismatch {
                expected,
                actual: size_of(out.width(), out.height()),
            });
        }
    }

    let px1 = contiguous(img1);
    let px2 = contiguous(img2);

    let Some(mut out) = output else {
        return Ok(diff::compare_pixels(&px1, &px2, None, width, height, options));
    };

    if width == 0 || height == 0 {
        return Ok(0);
    }

    if out.stride() == width {
        let buf = &mut out.buf_mut()[..width * height];
        return Ok(diff::compare_pixels(&px1, &px2, Some(buf), width, height, options));
    }

    // padded output: paint into a compact copy, then write rows back
    let stride = out.stride();
    let mut scratch = Vec::with_capacity(width * height);
    {
        let buf: &[RGBA8] = out.buf();
        for y in 0..height {
            scratch.extend_from_slice(&buf[y * stride..y * stride + width]);
        }
    }
    let mismatched = diff::compare_pixels(&px1, &px2, Some(&mut scratch), width, height, options);
    let buf: &mut [RGBA8] = out.buf_mut();
    for (y, row) in scratch.chunks_exact(width).enumerate() {
        buf[y * stride..y * stride + width].copy_from_slice(row);
    }
    Ok(mismatched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Options::default();
        assert_eq!(opts.threshold(), 0.1);
        assert!(!opts.include_aa());
        assert_eq!(opts.alpha(), 0.1);
        assert_eq!(opts.aa_color(), RGB8::new(255, 255, 0));
        assert_eq!(opts.diff_color(), RGB8::new(255, 0, 0));
        assert_eq!(opts.diff_color_alt(), None);
        assert!(!opts.diff_mask());
        assert_eq!(Options::new(), opts);
    }

    #[test]
    fn test_builder_overrides_only_named_fields() {
        let opts = Options::default()
            .with_threshold(0.05)
            .with_alpha(0.5)
            .with_aa_color(RGB8::new(0, 192, 0))
            .with_diff_color(RGB8::new(255, 0, 255));
        assert_eq!(opts.threshold(), 0.05);
        assert_eq!(opts.alpha(), 0.5);
        assert_eq!(opts.aa_color(), RGB8::new(0, 192, 0));
        assert_eq!(opts.diff_color(), RGB8::new(255, 0, 255));
        assert!(!opts.include_aa());
        assert!(!opts.diff_mask());
    }

    #[test]
    fn test_size_mismatch() {
        let result = count_mismatches(&[0u8; 8], &[0u8; 9], 2, 1, &Options::default());
        assert_eq!(
            result,
            Err(ImagematchError::SizeMismatch {
                expected: 8,
                actual: 9
            })
        );
    }

    #[test]
    fn test_output_size_mismatch() {
        let img = vec![0u8; 8];
        let mut out = vec![0u8; 4];
        let result = imagematch(&img, &img, Some(&mut out), 2, 1, &Options::default());
        assert!(matches!(
            result,
            Err(ImagematchError::SizeMismatch { actual: 4, .. })
        ));
        assert_eq!(out, vec![0u8; 4]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let result = count_mismatches(&[0u8; 9], &[0u8; 9], 2, 1, &Options::default());
        assert!(matches!(
            result,
            Err(ImagematchError::DimensionMismatch {
                width: 2,
                height: 1,
                expected: 8,
                actual: 9
            })
        ));
    }

    #[test]
    fn test_dimension_overflow() {
        let result = count_mismatches(&[0u8; 4], &[0u8; 4], usize::MAX, 2, &Options::default());
        assert!(matches!(
            result,
            Err(ImagematchError::DimensionMismatch {
                expected: usize::MAX,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_pixel_data() {
        let good = vec![0u8; 4 * 20 * 20];
        let bad = vec![0u16; 4 * 20 * 20];
        let opts = Options::default();

        assert_eq!(
            count_mismatches(&bad, &good, 20, 20, &opts),
            Err(ImagematchError::InvalidPixelData { buffer: "img1" })
        );
        assert_eq!(
            count_mismatches(&good, &bad, 20, 20, &opts),
            Err(ImagematchError::InvalidPixelData { buffer: "img2" })
        );
        let mut bad_out = vec![0.0f32; 4 * 20 * 20];
        assert_eq!(
            imagematch(&good, &good, Some(&mut bad_out), 20, 20, &opts),
            Err(ImagematchError::InvalidPixelData { buffer: "output" })
        );
    }

    #[test]
    fn test_pixel_data_type_checked_before_size() {
        let bad = vec![0u16; 3];
        let good = vec![0u8; 8];
        assert_eq!(
            count_mismatches(&good, &bad, 2, 1, &Options::default()),
            Err(ImagematchError::InvalidPixelData { buffer: "img2" })
        );
    }

    #[test]
    fn test_error_display() {
        let err = ImagematchError::SizeMismatch {
            expected: 8,
            actual: 9,
        };
        assert_eq!(err.to_string(), "image sizes do not match: 8 vs 9 bytes");
        let err = ImagematchError::InvalidPixelData { buffer: "img1" };
        assert!(err.to_string().contains("8-bit RGBA"));
    }

    #[test]
    fn test_rgba_slices_accepted() {
        let img = vec![RGBA8::new(10, 20, 30, 255); 4];
        let mut out = vec![RGBA8::default(); 4];
        let n = imagematch(&img, &img, Some(&mut out), 2, 2, &Options::default()).unwrap();
        assert_eq!(n, 0);
        assert!(out.iter().all(|px| px.a == 255 && px.r == px.g && px.g == px.b));
    }

    #[test]
    fn test_img_dimension_mismatch() {
        let a = Img::new(vec![RGBA8::default(); 16], 4, 4);
        let b = Img::new(vec![RGBA8::default(); 8], 4, 2);
        let result = imagematch_img(a.as_ref(), b.as_ref(), None, &Options::default());
        assert_eq!(
            result,
            Err(ImagematchError::SizeMismatch {
                expected: 64,
                actual: 32
            })
        );
    }

    #[test]
    fn test_img_padded_output() {
        let white = RGBA8::new(255, 255, 255, 255);
        let a = Img::new(vec![white; 9], 3, 3);
        let mut changed = vec![white; 9];
        changed[4] = RGBA8::new(0, 0, 0, 255);
        let b = Img::new(changed, 3, 3);

        // stride 4, padding column must stay untouched
        let marker = RGBA8::new(1, 2, 3, 4);
        let mut out = Img::new_stride(vec![marker; 12], 3, 3, 4);
        let n = imagematch_img(a.as_ref(), b.as_ref(), Some(out.as_mut()), &Options::default())
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(out[(1usize, 1usize)], RGBA8::new(255, 0, 0, 255));
        assert_eq!(out[(0usize, 0usize)], white);
        assert_eq!(out.buf()[3], marker);
        assert_eq!(out.buf()[7], marker);
    }

    #[test]
    fn test_img_padded_input_matches_compact() {
        let px: Vec<RGBA8> = (0..12u8).map(|i| RGBA8::new(i * 20, 0, 0, 255)).collect();
        // 3x3 view over a 4-wide buffer
        let padded = Img::new_stride(px, 3, 3, 4);
        let compact: Vec<RGBA8> = padded.as_ref().rows().flatten().copied().collect();
        let compact = Img::new(compact, 3, 3);

        let n = imagematch_img(padded.as_ref(), compact.as_ref(), None, &Options::default())
            .unwrap();
        assert_eq!(n, 0);
    }
}
