//! Common test utilities for imagematch tests.

#![allow(dead_code)]

pub mod generators;

use imagematch::{imagematch, ImagematchError, Options};

/// Runs a comparison with a freshly allocated diff buffer.
pub fn match_with_diff(
    img1: &[u8],
    img2: &[u8],
    width: usize,
    height: usize,
    options: &Options,
) -> Result<(usize, Vec<u8>), ImagematchError> {
    let mut diff = vec![0u8; img1.len()];
    let n = imagematch(img1, img2, Some(&mut diff[..]), width, height, options)?;
    Ok((n, diff))
}

/// RGBA bytes of pixel `(x, y)`.
pub fn pixel_at(buf: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
    let pos = (y * width + x) * 4;
    [buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]]
}

/// Background rendering of `img` as painted in a diff image with `alpha`.
pub fn expected_background(img: &[u8], alpha: f64) -> Vec<u8> {
    img.chunks_exact(4)
        .flat_map(|px| {
            let y = f64::from(px[0]) * 0.298_895_31
                + f64::from(px[1]) * 0.586_622_47
                + f64::from(px[2]) * 0.114_482_23;
            let a = alpha * f64::from(px[3]) / 255.0;
            let v = (255.0 + (y - 255.0) * a) as u8;
            [v, v, v, 255]
        })
        .collect()
}
