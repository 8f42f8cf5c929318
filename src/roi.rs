//! Regions of interest selected in calibrated axis units.
//!
//! The [`Roi`] trait is the capability required by the refinement step: a
//! value that can check its own geometry, crop a [`Signal2D`] to the region
//! and describe itself as a plot widget. Pixel `i` of an axis belongs to
//! `[lo, hi)` when `lo <= offset + i·scale < hi`.
use crate::axes::SignalAxes;
use crate::error::{GpaError, GpaResult};
use crate::plot::RoiWidget;
use crate::signal::Signal2D;
use serde::{Deserialize, Serialize};

pub trait Roi {
    /// Check that the geometry describes a usable region.
    fn validate(&self) -> GpaResult<()>;

    /// Crop `signal` to the region. Samples inside the bounding box but
    /// outside the region are set to NaN.
    fn apply(&self, signal: &Signal2D) -> GpaResult<Signal2D>;

    /// Serializable description of the geometry.
    fn describe(&self) -> AnyRoi;

    /// Widget bound to `axes`, for attaching to a plot.
    fn widget(&self, axes: &SignalAxes) -> RoiWidget {
        RoiWidget::new(self.describe(), axes.clone())
    }
}

/// Axis-aligned rectangle; `right` and `bottom` are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectangularRoi {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RectangularRoi {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle covering every pixel of `axes`.
    pub fn covering(axes: &SignalAxes) -> Self {
        let span = |ax: &crate::axes::DataAxis| {
            let a = ax.index_to_value(0);
            let b = ax.index_to_value(ax.size.saturating_sub(1));
            let half = 0.5 * ax.scale.abs();
            (a.min(b) - half, a.max(b) + half)
        };
        let (left, right) = span(&axes.x);
        let (top, bottom) = span(&axes.y);
        Self::new(left, top, right, bottom)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

impl Roi for RectangularRoi {
    fn validate(&self) -> GpaResult<()> {
        let coords = [self.left, self.top, self.right, self.bottom];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(GpaError::InvalidRoi(format!(
                "non-finite rectangle {self:?}"
            )));
        }
        if self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(GpaError::InvalidRoi(format!("empty rectangle {self:?}")));
        }
        Ok(())
    }

    fn apply(&self, signal: &Signal2D) -> GpaResult<Signal2D> {
        self.validate()?;
        let axes = signal.signal_axes();
        let xs = axes.x.index_range(self.left, self.right);
        let ys = axes.y.index_range(self.top, self.bottom);
        match (xs, ys) {
            (Some(xs), Some(ys)) => Ok(signal.crop(xs, ys)),
            _ => Err(GpaError::InvalidRoi(format!(
                "rectangle {self:?} does not overlap the signal axes"
            ))),
        }
    }

    fn describe(&self) -> AnyRoi {
        AnyRoi::Rectangular(*self)
    }
}

/// Disc (or annulus when `r_inner > 0`) centred on `(cx, cy)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircleRoi {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    #[serde(default)]
    pub r_inner: f64,
}

impl CircleRoi {
    pub fn new(cx: f64, cy: f64, r: f64) -> Self {
        Self {
            cx,
            cy,
            r,
            r_inner: 0.0,
        }
    }

    pub fn with_inner_radius(mut self, r_inner: f64) -> Self {
        self.r_inner = r_inner;
        self
    }

    /// True when the calibrated point `(x, y)` lies in the disc/annulus.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let d = (x - self.cx).hypot(y - self.cy);
        d <= self.r && d >= self.r_inner
    }
}

impl Roi for CircleRoi {
    fn validate(&self) -> GpaResult<()> {
        let coords = [self.cx, self.cy, self.r, self.r_inner];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(GpaError::InvalidRoi(format!("non-finite circle {self:?}")));
        }
        if self.r <= 0.0 || self.r_inner < 0.0 || self.r_inner >= self.r {
            return Err(GpaError::InvalidRoi(format!(
                "radii must satisfy 0 <= r_inner < r, got {self:?}"
            )));
        }
        Ok(())
    }

    fn apply(&self, signal: &Signal2D) -> GpaResult<Signal2D> {
        self.validate()?;
        let axes = signal.signal_axes();
        let xs = axes.x.index_range_closed(self.cx - self.r, self.cx + self.r);
        let ys = axes.y.index_range_closed(self.cy - self.r, self.cy + self.r);
        let (Some(xs), Some(ys)) = (xs, ys) else {
            return Err(GpaError::InvalidRoi(format!(
                "circle {self:?} does not overlap the signal axes"
            )));
        };
        let mut cropped = signal.crop(xs, ys);
        let local = cropped.signal_axes().clone();
        cropped.map_pixels(|x, y, v| {
            if self.contains(local.x.index_to_value(x), local.y.index_to_value(y)) {
                v
            } else {
                f64::NAN
            }
        });
        Ok(cropped)
    }

    fn describe(&self) -> AnyRoi {
        AnyRoi::Circle(*self)
    }
}

/// Any supported ROI, in the tagged form used by configuration files:
/// `{"kind": "rectangular", "left": .., "top": .., "right": .., "bottom": ..}`
/// or `{"kind": "circle", "cx": .., "cy": .., "r": .., "r_inner": ..}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnyRoi {
    Rectangular(RectangularRoi),
    Circle(CircleRoi),
}

impl AnyRoi {
    /// Interpret an untyped JSON value as an ROI.
    ///
    /// Anything that is not one of the tagged ROI objects (numbers, strings,
    /// unknown kinds, missing coordinates) is rejected with `InvalidRoi`.
    pub fn from_value(value: &serde_json::Value) -> GpaResult<Self> {
        if !value.is_object() {
            return Err(GpaError::InvalidRoi(format!("Provided ROI: {value}")));
        }
        let roi: AnyRoi = serde_json::from_value(value.clone())
            .map_err(|e| GpaError::InvalidRoi(format!("Provided ROI: {value} ({e})")))?;
        roi.validate()?;
        Ok(roi)
    }

    fn as_dyn(&self) -> &dyn Roi {
        match self {
            AnyRoi::Rectangular(r) => r,
            AnyRoi::Circle(c) => c,
        }
    }
}

impl TryFrom<serde_json::Value> for AnyRoi {
    type Error = GpaError;

    fn try_from(value: serde_json::Value) -> GpaResult<Self> {
        AnyRoi::from_value(&value)
    }
}

impl From<RectangularRoi> for AnyRoi {
    fn from(r: RectangularRoi) -> Self {
        AnyRoi::Rectangular(r)
    }
}

impl From<CircleRoi> for AnyRoi {
    fn from(c: CircleRoi) -> Self {
        AnyRoi::Circle(c)
    }
}

impl Roi for AnyRoi {
    fn validate(&self) -> GpaResult<()> {
        self.as_dyn().validate()
    }

    fn apply(&self, signal: &Signal2D) -> GpaResult<Signal2D> {
        self.as_dyn().apply(signal)
    }

    fn describe(&self) -> AnyRoi {
        *self
    }
}
