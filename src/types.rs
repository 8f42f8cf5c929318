use crate::axes::DataAxis;
use nalgebra::Vector2;
use serde::Serialize;
use std::f64::consts::PI;

/// Shift of the reciprocal lattice vector `g` implied by a reference
/// refinement, one `(x, y)` pair per position of the phase navigation space.
///
/// The shift is the subtracted mean phase gradient divided by `-2π`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GShift {
    pub nav_axes: Vec<DataAxis>,
    pub values: Vec<Vector2<f64>>,
}

impl GShift {
    /// Build from per-frame gradient means laid out component-major
    /// (all x means, then all y means).
    pub(crate) fn from_component_means(nav_axes: Vec<DataAxis>, means: &[f64]) -> Self {
        let n = means.len() / 2;
        let values = (0..n)
            .map(|i| Vector2::new(means[i], means[n + i]) / (-2.0 * PI))
            .collect();
        Self { nav_axes, values }
    }

    /// The mean gradient (radians per pixel) this shift was derived from.
    pub fn mean_gradient(&self) -> Vec<Vector2<f64>> {
        self.values.iter().map(|v| v * (-2.0 * PI)).collect()
    }

    /// Reciprocal vector `g` corrected by the shift at navigation `index`.
    pub fn shifted_g(&self, g: Vector2<f64>, index: usize) -> Option<Vector2<f64>> {
        self.values.get(index).map(|dg| g + dg)
    }

    /// Largest shift magnitude over the navigation space.
    pub fn max_norm(&self) -> f64 {
        self.values.iter().map(|v| v.norm()).fold(0.0, f64::max)
    }
}
