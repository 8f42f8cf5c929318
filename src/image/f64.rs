//! Owned single-channel f64 image in row-major layout (stride == width).
//!
//! Phase values are kept in double precision: the reference refinement
//! averages small gradient differences over large regions.
use super::traits::{ImageView, ImageViewMut};
use crate::error::GpaError;

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF64 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f64 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f64>,
}

impl ImageF64 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Wrap an existing row-major buffer. Fails if `data.len() != w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<f64>) -> Result<Self, GpaError> {
        if data.len() != w * h {
            return Err(GpaError::InvalidData(format!(
                "buffer of {} samples cannot hold a {w}x{h} image",
                data.len()
            )));
        }
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    /// Build an image by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut img = Self::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set(x, y, f(x, y));
            }
        }
        img
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f64) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// `(width, height)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    /// Copy the window `[x0, x0+w) × [y0, y0+h)` into a new image.
    pub fn crop(&self, x0: usize, y0: usize, w: usize, h: usize) -> ImageF64 {
        let mut out = ImageF64::new(w, h);
        for y in 0..h {
            let src = &self.data[self.idx(x0, y0 + y)..self.idx(x0, y0 + y) + w];
            let start = out.idx(0, y);
            out.data[start..start + w].copy_from_slice(src);
        }
        out
    }

    /// Mean over all finite samples, `None` when there are none.
    pub fn finite_mean(&self) -> Option<f64> {
        let (sum, count) = self
            .data
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
        (count > 0).then(|| sum / count as f64)
    }
}

impl ImageView for ImageF64 {
    type Pixel = f64;

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
    fn buffer(&self) -> &[f64] {
        &self.data
    }
}

impl ImageViewMut for ImageF64 {
    #[inline]
    fn buffer_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}
