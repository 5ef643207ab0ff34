//! Pixel buffer types accepted by the comparison functions.
//!
//! Buffers hold interleaved RGBA samples, 8 bits per channel, row-major with
//! no row padding. Containers of wider sample types implement the traits too,
//! but report no byte view, so passing one is rejected with
//! [`ImagematchError::InvalidPixelData`](crate::ImagematchError::InvalidPixelData)
//! instead of being silently reinterpreted.

use rgb::{ComponentBytes, RGBA8};

/// Read access to RGBA pixel data.
pub trait PixelData {
    /// Flat RGBA byte view, or `None` if the samples are not 8-bit.
    fn pixel_bytes(&self) -> Option<&[u8]>;
}

/// Write access to RGBA pixel data.
pub trait PixelDataMut: PixelData {
    /// Mutable flat RGBA byte view, or `None` if the samples are not 8-bit.
    fn pixel_bytes_mut(&mut self) -> Option<&mut [u8]>;
}

impl PixelData for [u8] {
    #[inline]
    fn pixel_bytes(&self) -> Option<&[u8]> {
        Some(self)
    }
}

impl PixelDataMut for [u8] {
    #[inline]
    fn pixel_bytes_mut(&mut self) -> Option<&mut [u8]> {
        Some(self)
    }
}

impl<const N: usize> PixelData for [u8; N] {
    #[inline]
    fn pixel_bytes(&self) -> Option<&[u8]> {
        Some(self)
    }
}

impl<const N: usize> PixelDataMut for [u8; N] {
    #[inline]
    fn pixel_bytes_mut(&mut self) -> Option<&mut [u8]> {
        Some(self)
    }
}

impl PixelData for Vec<u8> {
    #[inline]
    fn pixel_bytes(&self) -> Option<&[u8]> {
        Some(self)
    }
}

impl PixelDataMut for Vec<u8> {
    #[inline]
    fn pixel_bytes_mut(&mut self) -> Option<&mut [u8]> {
        Some(self)
    }
}

impl PixelData for [RGBA8] {
    #[inline]
    fn pixel_bytes(&self) -> Option<&[u8]> {
        Some(self.as_bytes())
    }
}

impl PixelDataMut for [RGBA8] {
    #[inline]
    fn pixel_bytes_mut(&mut self) -> Option<&mut [u8]> {
        Some(self.as_bytes_mut())
    }
}

impl PixelData for Vec<RGBA8> {
    #[inline]
    fn pixel_bytes(&self) -> Option<&[u8]> {
        Some(self.as_bytes())
    }
}

impl PixelDataMut for Vec<RGBA8> {
    #[inline]
    fn pixel_bytes_mut(&mut self) -> Option<&mut [u8]> {
        Some(self.as_bytes_mut())
    }
}

macro_rules! impl_wide_samples {
    ($($t:ty),*) => {$(
        impl PixelData for [$t] {
            #[inline]
            fn pixel_bytes(&self) -> Option<&[u8]> {
                None
            }
        }

        impl PixelDataMut for [$t] {
            #[inline]
            fn pixel_bytes_mut(&mut self) -> Option<&mut [u8]> {
                None
            }
        }

        impl PixelData for Vec<$t> {
            #[inline]
            fn pixel_bytes(&self) -> Option<&[u8]> {
                None
            }
        }

        impl PixelDataMut for Vec<$t> {
            #[inline]
            fn pixel_bytes_mut(&mut self) -> Option<&mut [u8]> {
                None
            }
        }
    )*};
}

impl_wide_samples!(u16, i16, u32, i32, f32, f64);
