//! Labeled 2D signal: a stack of equally sized frames over navigation axes.
//!
//! Frames are stored in row-major order over the navigation shape (the first
//! navigation axis varies slowest). A signal without navigation axes holds a
//! single frame.
use crate::axes::{DataAxis, SignalAxes};
use crate::error::{GpaError, GpaResult};
use crate::image::{ImageF64, ImageViewMut};

#[derive(Clone, Debug, PartialEq)]
pub struct Signal2D {
    frames: Vec<ImageF64>,
    nav_axes: Vec<DataAxis>,
    signal_axes: SignalAxes,
}

impl Signal2D {
    /// Single-frame signal with uncalibrated axes.
    pub fn new(image: ImageF64) -> Self {
        let signal_axes = SignalAxes::uncalibrated(image.w, image.h);
        Self {
            frames: vec![image],
            nav_axes: Vec::new(),
            signal_axes,
        }
    }

    /// Build a signal from frames, navigation axes and signal axes.
    ///
    /// Every frame must match the signal axes shape, the frame count must
    /// equal the product of the navigation axis sizes and the signal axes
    /// need a finite, non-zero calibration.
    pub fn from_frames(
        frames: Vec<ImageF64>,
        nav_axes: Vec<DataAxis>,
        signal_axes: SignalAxes,
    ) -> GpaResult<Self> {
        signal_axes.validate_calibration()?;
        let expected = signal_axes.shape();
        if let Some(bad) = frames.iter().find(|f| f.shape() != expected) {
            return Err(GpaError::ShapeMismatch {
                expected,
                actual: bad.shape(),
            });
        }
        let nav_len: usize = nav_axes.iter().map(|a| a.size).product();
        if frames.len() != nav_len {
            return Err(GpaError::InvalidData(format!(
                "{} frames for a navigation shape of {} positions",
                frames.len(),
                nav_len
            )));
        }
        Ok(Self {
            frames,
            nav_axes,
            signal_axes,
        })
    }

    // Callers guarantee the frame shapes and count.
    pub(crate) fn from_parts(
        frames: Vec<ImageF64>,
        nav_axes: Vec<DataAxis>,
        signal_axes: SignalAxes,
    ) -> Self {
        debug_assert_eq!(
            frames.len(),
            nav_axes.iter().map(|a| a.size).product::<usize>()
        );
        Self {
            frames,
            nav_axes,
            signal_axes,
        }
    }

    pub fn frames(&self) -> &[ImageF64] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&ImageF64> {
        self.frames.get(index)
    }

    pub fn nav_axes(&self) -> &[DataAxis] {
        &self.nav_axes
    }

    pub fn signal_axes(&self) -> &SignalAxes {
        &self.signal_axes
    }

    /// Sizes of the navigation axes, slowest first.
    pub fn nav_shape(&self) -> Vec<usize> {
        self.nav_axes.iter().map(|a| a.size).collect()
    }

    /// Number of frames (product of the navigation shape).
    pub fn nav_len(&self) -> usize {
        self.frames.len()
    }

    /// Crop every frame to the pixel window `xs × ys`, keeping calibration.
    pub fn crop(
        &self,
        xs: std::ops::Range<usize>,
        ys: std::ops::Range<usize>,
    ) -> Signal2D {
        let signal_axes = SignalAxes {
            x: self.signal_axes.x.cropped(&xs),
            y: self.signal_axes.y.cropped(&ys),
        };
        let frames = self
            .frames
            .iter()
            .map(|f| f.crop(xs.start, ys.start, xs.len(), ys.len()))
            .collect();
        Signal2D {
            frames,
            nav_axes: self.nav_axes.clone(),
            signal_axes,
        }
    }

    /// Apply `f(x, y, value)` to every pixel of every frame.
    pub fn map_pixels(&mut self, mut f: impl FnMut(usize, usize, f64) -> f64) {
        for frame in &mut self.frames {
            for (y, row) in frame.rows_mut().enumerate() {
                for (x, v) in row.iter_mut().enumerate() {
                    *v = f(x, y, *v);
                }
            }
        }
    }

    /// Mean over both signal dimensions, one value per frame.
    ///
    /// Non-finite samples are skipped; a frame without finite samples yields
    /// `EmptyRegion`.
    pub fn mean_over_signal(&self) -> GpaResult<Vec<f64>> {
        self.frames
            .iter()
            .map(|f| f.finite_mean().ok_or(GpaError::EmptyRegion))
            .collect()
    }

    /// Subtract one constant per frame, in place.
    pub fn subtract_per_frame(&mut self, values: &[f64]) -> GpaResult<()> {
        if values.len() != self.frames.len() {
            return Err(GpaError::InvalidData(format!(
                "{} offsets for {} frames",
                values.len(),
                self.frames.len()
            )));
        }
        for (frame, &v) in self.frames.iter_mut().zip(values) {
            for row in frame.rows_mut() {
                row.iter_mut().for_each(|p| *p -= v);
            }
        }
        Ok(())
    }
}
