//! Deterministic RGBA test image generators.
//!
//! These use an LCG PRNG so every platform sees identical inputs.

// ============================================================================
// LCG PRNG
// ============================================================================

/// Deterministic 64-bit LCG; only the high bits are handed out.
pub struct Lcg(u64);

impl Lcg {
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn step(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    /// Uniform index in `0..n`.
    pub fn next_index(&mut self, n: usize) -> usize {
        (self.step() & 0xFF) as usize * n / 256
    }
}

// ============================================================================
// Image Generation Functions
// ============================================================================

/// Generate uniform color image
pub fn gen_uniform(width: usize, height: usize, rgba: [u8; 4]) -> Vec<u8> {
    rgba.repeat(width * height)
}

/// Generate horizontal gradient (grayscale, opaque)
pub fn gen_gradient_h(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 4);
    for _y in 0..height {
        for x in 0..width {
            let val = if width > 1 {
                (x * 255 / (width - 1)) as u8
            } else {
                128
            };
            data.extend_from_slice(&[val, val, val, 255]);
        }
    }
    data
}

/// Generate a black-to-white vertical edge with one column of `gray`
/// at `edge_x`, the way a rasterizer smooths a hard edge.
pub fn gen_soft_edge(width: usize, height: usize, edge_x: usize, gray: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 4);
    for _y in 0..height {
        for x in 0..width {
            let val = match x.cmp(&edge_x) {
                std::cmp::Ordering::Less => 0,
                std::cmp::Ordering::Equal => gray,
                std::cmp::Ordering::Greater => 255,
            };
            data.extend_from_slice(&[val, val, val, 255]);
        }
    }
    data
}

/// Generate an image of random pixels drawn from a small palette, so flat
/// runs and hard edges both occur.
pub fn gen_palette_noise(width: usize, height: usize, palette: &[[u8; 4]], seed: u64) -> Vec<u8> {
    let mut lcg = Lcg::new(seed);
    let mut data = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        data.extend_from_slice(&palette[lcg.next_index(palette.len())]);
    }
    data
}

// ============================================================================
// Distortions
// ============================================================================

/// Set pixel `(x, y)` to `rgba`.
pub fn set_pixel(data: &mut [u8], width: usize, x: usize, y: usize, rgba: [u8; 4]) {
    let pos = (y * width + x) * 4;
    data[pos..pos + 4].copy_from_slice(&rgba);
}

/// Fill a rectangle with `rgba`.
pub fn fill_rect(
    data: &mut [u8],
    width: usize,
    (x0, y0): (usize, usize),
    (w, h): (usize, usize),
    rgba: [u8; 4],
) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            set_pixel(data, width, x, y, rgba);
        }
    }
}
