//! Stage runner shared by the command-line tool and the integration tests.

use super::{FrameSummary, RefinementReport, TimingBreakdown};
use crate::error::GpaResult;
use crate::gpa::GeometricalPhaseImage;
use crate::roi::Roi;
use crate::signal::Signal2D;
use log::debug;

/// Per-frame `(x, y)` gradient means over `roi`, without touching the field.
fn component_means<R: Roi + ?Sized>(gradient: &Signal2D, roi: &R) -> GpaResult<Vec<[f64; 2]>> {
    let means = roi.apply(gradient)?.mean_over_signal()?;
    let n = means.len() / 2;
    Ok((0..n).map(|i| [means[i], means[n + i]]).collect())
}

/// Compute the gradient, refine it over `roi` and collect a report with the
/// gradient means before and after the refinement.
pub fn run_refinement<R: Roi + ?Sized>(
    gpi: &mut GeometricalPhaseImage,
    roi: &R,
) -> GpaResult<RefinementReport> {
    let mut timing = TimingBreakdown::default();

    timing.time("gradient", || {
        gpi.gradient();
    });
    let before = match gpi.gradient_field() {
        Some(g) => component_means(g, roi)?,
        None => Vec::new(),
    };

    let shift = timing.time("refine_phase", || gpi.refine_phase(roi))?;
    let after = match gpi.gradient_field() {
        Some(g) => component_means(g, roi)?,
        None => Vec::new(),
    };

    let frames = before
        .into_iter()
        .zip(after)
        .zip(&shift.values)
        .enumerate()
        .map(|(index, ((before, after), g))| FrameSummary {
            index,
            mean_gradient_before: before,
            mean_gradient_after: after,
            g_shift: [g.x, g.y],
        })
        .collect::<Vec<_>>();
    debug!(
        "run_refinement: {} frames, max |g shift| = {:.3e}",
        frames.len(),
        shift.max_norm()
    );

    let (width, height) = gpi.signal_axes().shape();
    Ok(RefinementReport {
        signal_type: GeometricalPhaseImage::SIGNAL_TYPE,
        width,
        height,
        nav_shape: gpi.phase().nav_shape(),
        signal_axes: gpi.signal_axes().clone(),
        roi: roi.describe(),
        frames,
        timing,
    })
}
