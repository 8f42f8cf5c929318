//! Serializable reports produced by refinement runs.

pub mod builders;
pub mod timing;

pub use builders::run_refinement;
pub use timing::{StageTiming, TimingBreakdown};

use crate::axes::SignalAxes;
use crate::roi::AnyRoi;
use serde::Serialize;

/// Gradient statistics for one navigation position.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSummary {
    pub index: usize,
    /// Mean `(x, y)` gradient over the ROI before refinement, rad/px.
    pub mean_gradient_before: [f64; 2],
    /// Same mean after refinement; close to zero.
    pub mean_gradient_after: [f64; 2],
    pub g_shift: [f64; 2],
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementReport {
    pub signal_type: &'static str,
    pub width: usize,
    pub height: usize,
    pub nav_shape: Vec<usize>,
    pub signal_axes: SignalAxes,
    pub roi: AnyRoi,
    pub frames: Vec<FrameSummary>,
    pub timing: TimingBreakdown,
}
