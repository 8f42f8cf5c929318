//! Borrowed 8-bit grayscale view.
//!
//! Phase maps exported by acquisition software are often stored as 8-bit
//! images spanning one full turn; [`ImageU8::to_phase`] maps them back to
//! radians.
use super::{ImageF64, ImageView, ImageViewMut};
use std::f64::consts::PI;

#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Map gray levels linearly onto `[-π, π)`: `v / 255 · 2π - π`.
    pub fn to_phase(&self) -> ImageF64 {
        let mut out = ImageF64::new(self.w, self.h);
        for (src, dst) in self.rows().zip(out.rows_mut()) {
            for (&v, d) in src.iter().zip(dst.iter_mut()) {
                *d = f64::from(v) / 255.0 * 2.0 * PI - PI;
            }
        }
        out
    }
}

impl<'a> ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn buffer(&self) -> &[u8] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_levels_span_one_turn() {
        // padded rows: stride 3 for a 2-wide image
        let raw = [0u8, 255, 9, 128, 0, 9];
        let view = ImageU8 {
            w: 2,
            h: 2,
            stride: 3,
            data: &raw,
        };
        let phase = view.to_phase();
        assert!((phase.get(0, 0) + PI).abs() < 1e-12);
        assert!((phase.get(1, 0) - PI).abs() < 1e-12);
        assert!(phase.get(0, 1).abs() < 0.02);
        assert_eq!(view.get(0, 1), 128);
    }
}
