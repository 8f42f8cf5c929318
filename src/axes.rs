//! Calibrated axis metadata.
//!
//! A [`DataAxis`] maps pixel indices to calibrated coordinates through
//! `value = offset + index * scale`. [`SignalAxes`] groups the two spatial
//! axes of an image, ordered `(x, y)` i.e. columns then rows.
//!
//! Interval selection is threshold based: pixel `i` is inside `[lo, hi)`
//! when its coordinate `offset + i·scale` is. A fractional lower bound
//! therefore drops the pixel whose coordinate lies just below it instead of
//! rounding to the nearest index.
use crate::error::{GpaError, GpaResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataAxis {
    pub name: String,
    pub size: usize,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub units: String,
}

fn default_scale() -> f64 {
    1.0
}

impl DataAxis {
    /// Uncalibrated axis: unit scale, zero offset, no units.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
            scale: 1.0,
            offset: 0.0,
            units: String::new(),
        }
    }

    pub fn with_calibration(mut self, scale: f64, offset: f64, units: impl Into<String>) -> Self {
        self.scale = scale;
        self.offset = offset;
        self.units = units.into();
        self
    }

    #[inline]
    pub fn index_to_value(&self, index: usize) -> f64 {
        self.offset + index as f64 * self.scale
    }

    /// Indices whose coordinate lies in `[lo, hi)`, as a half-open range.
    ///
    /// Returns `None` when no pixel of the axis falls inside the interval.
    pub fn index_range(&self, lo: f64, hi: f64) -> Option<std::ops::Range<usize>> {
        self.index_span(|v| v >= lo && v < hi)
    }

    /// Indices whose coordinate lies in the closed interval `[lo, hi]`.
    pub fn index_range_closed(&self, lo: f64, hi: f64) -> Option<std::ops::Range<usize>> {
        self.index_span(|v| v >= lo && v <= hi)
    }

    // Axes are monotonic, so the matching indices are contiguous.
    fn index_span(&self, inside: impl Fn(f64) -> bool) -> Option<std::ops::Range<usize>> {
        let mut matching = (0..self.size).filter(|&i| inside(self.index_to_value(i)));
        let first = matching.next()?;
        let last = matching.last().unwrap_or(first);
        Some(first..last + 1)
    }

    /// Same axis restricted to `range`; the offset moves to the first kept pixel.
    pub fn cropped(&self, range: &std::ops::Range<usize>) -> DataAxis {
        DataAxis {
            name: self.name.clone(),
            size: range.len(),
            scale: self.scale,
            offset: self.index_to_value(range.start),
            units: self.units.clone(),
        }
    }

    /// True when scale, offset and units match `other`.
    pub fn same_calibration(&self, other: &DataAxis) -> bool {
        self.scale == other.scale && self.offset == other.offset && self.units == other.units
    }
}

/// The two spatial axes of a 2D signal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalAxes {
    pub x: DataAxis,
    pub y: DataAxis,
}

impl SignalAxes {
    /// Uncalibrated axes named `x` and `y` for a `w × h` image.
    pub fn uncalibrated(w: usize, h: usize) -> Self {
        Self {
            x: DataAxis::new("x", w),
            y: DataAxis::new("y", h),
        }
    }

    /// `(width, height)` in pixels.
    pub fn shape(&self) -> (usize, usize) {
        (self.x.size, self.y.size)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataAxis> {
        [&self.x, &self.y].into_iter()
    }

    /// Check that both axes map indices to distinct finite coordinates.
    pub fn validate_calibration(&self) -> GpaResult<()> {
        for ax in self.iter() {
            if !ax.scale.is_finite() || ax.scale == 0.0 || !ax.offset.is_finite() {
                return Err(GpaError::InvalidData(format!(
                    "axis '{}' has unusable calibration (scale {}, offset {})",
                    ax.name, ax.scale, ax.offset
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_range_is_half_open() {
        let ax = DataAxis::new("x", 10).with_calibration(0.5, 1.0, "nm");
        // values: 1.0, 1.5, ..., 5.5
        assert_eq!(ax.index_range(1.0, 2.0), Some(0..2));
        assert_eq!(ax.index_range(0.0, 100.0), Some(0..10));
        assert_eq!(ax.index_range(10.0, 20.0), None);
        assert_eq!(ax.index_range(2.0, 2.0), None);
        assert_eq!(ax.index_range_closed(2.0, 2.0), Some(2..3));
    }

    #[test]
    fn fractional_bounds_select_by_pixel_coordinate() {
        let ax = DataAxis::new("x", 6);
        assert_eq!(ax.index_range(0.3, 4.0), Some(1..4));
        assert_eq!(ax.index_range(-0.3, 3.7), Some(0..4));
        assert_eq!(ax.index_range_closed(0.3, 3.7), Some(1..4));
    }

    #[test]
    fn zero_or_non_finite_calibration_is_rejected() {
        let mut axes = SignalAxes::uncalibrated(4, 4);
        assert!(axes.validate_calibration().is_ok());
        axes.y.scale = 0.0;
        assert!(matches!(axes.validate_calibration(), Err(GpaError::InvalidData(_))));
        axes.y.scale = 1.0;
        axes.x.offset = f64::NAN;
        assert!(axes.validate_calibration().is_err());
    }

    #[test]
    fn cropped_moves_offset() {
        let ax = DataAxis::new("y", 8).with_calibration(2.0, -4.0, "nm");
        let c = ax.cropped(&(3..6));
        assert_eq!(c.size, 3);
        assert_eq!(c.offset, 2.0);
        assert_eq!(c.scale, 2.0);
        assert_eq!(c.units, "nm");
    }

    #[test]
    fn negative_scale_is_supported() {
        let ax = DataAxis::new("x", 4).with_calibration(-1.0, 3.0, "");
        // values: 3, 2, 1, 0
        assert_eq!(ax.index_range(1.0, 3.0), Some(1..3));
    }

    #[test]
    fn axes_deserialize_with_defaults() {
        let axes: SignalAxes = serde_json::from_str(
            r#"{"x": {"name": "x", "size": 4}, "y": {"name": "y", "size": 2, "scale": 0.1, "units": "nm"}}"#,
        )
        .unwrap();
        assert_eq!(axes.shape(), (4, 2));
        assert_eq!(axes.x.scale, 1.0);
        assert_eq!(axes.y.units, "nm");
    }
}
