//! Geometrical phase image: phase gradient and ROI-based reference refinement.
//!
//! A [`GeometricalPhaseImage`] owns a phase [`Signal2D`] and, once
//! [`gradient`](GeometricalPhaseImage::gradient) has been called, the
//! wrap-insensitive gradient of that phase. The gradient signal has an extra
//! leading navigation axis `component` of size 2 (x derivative, then y
//! derivative) and carries the phase's signal axes unchanged, so an ROI given
//! in calibrated units selects the same region on both.
//!
//! [`refine_phase`](GeometricalPhaseImage::refine_phase) removes the mean
//! gradient over an ROI from the stored gradient (in place) and returns the
//! corresponding shift of the reciprocal vector, `-⟨∇φ⟩ / 2π`.
use crate::axes::{DataAxis, SignalAxes};
use crate::error::{GpaError, GpaResult};
use crate::image::ImageF64;
use crate::phase::gradient_phase;
use crate::plot::Plot;
use crate::roi::Roi;
use crate::signal::Signal2D;
use crate::types::GShift;
use image::RgbImage;
use log::debug;

/// A phase image (radians) together with its stored gradient and plot state.
///
/// The gradient is absent until [`gradient`](Self::gradient) is called;
/// [`refine_phase`](Self::refine_phase) requires it and corrects it in place.
pub struct GeometricalPhaseImage {
    phase: Signal2D,
    gradient: Option<Signal2D>,
    plot: Option<Plot>,
}

impl GeometricalPhaseImage {
    /// Signal type recorded in refinement reports.
    pub const SIGNAL_TYPE: &'static str = "geometrical_phase";

    /// Wrap a single phase frame with uncalibrated axes.
    pub fn new(phase: ImageF64) -> Self {
        Self::from_signal(Signal2D::new(phase))
    }

    /// Wrap a single phase frame with calibrated signal axes.
    ///
    /// Fails with `ShapeMismatch` when the axis sizes disagree with the
    /// image and with `InvalidData` for a zero or non-finite calibration.
    pub fn with_axes(phase: ImageF64, axes: SignalAxes) -> GpaResult<Self> {
        let signal = Signal2D::from_frames(vec![phase], Vec::new(), axes)?;
        Ok(Self::from_signal(signal))
    }

    /// Wrap an existing (possibly navigated) phase signal.
    pub fn from_signal(phase: Signal2D) -> Self {
        Self {
            phase,
            gradient: None,
            plot: None,
        }
    }

    pub fn phase(&self) -> &Signal2D {
        &self.phase
    }

    pub fn signal_axes(&self) -> &SignalAxes {
        self.phase.signal_axes()
    }

    /// The stored gradient, if [`gradient`](Self::gradient) has been called.
    pub fn gradient_field(&self) -> Option<&Signal2D> {
        self.gradient.as_ref()
    }

    pub fn plot_state(&self) -> Option<&Plot> {
        self.plot.as_ref()
    }

    pub fn plot_state_mut(&mut self) -> Option<&mut Plot> {
        self.plot.as_mut()
    }

    /// Display the phase image, reactivating an existing plot if present.
    pub fn plot(&mut self) -> &mut Plot {
        let plot = self.plot.get_or_insert_with(Plot::open);
        plot.activate();
        plot
    }

    pub fn close_plot(&mut self) {
        if let Some(plot) = self.plot.as_mut() {
            plot.close();
        }
    }

    /// Attach a widget for `roi` to the displayed phase image so the
    /// refinement area can be adjusted.
    ///
    /// Opens the plot if it is not active. Returns the widget index.
    pub fn plot_refinement_roi<R: Roi + ?Sized>(&mut self, roi: &R) -> GpaResult<usize> {
        roi.validate()?;
        let widget = roi.widget(self.phase.signal_axes());
        let index = self.plot().add_widget(widget);
        debug!(
            "GeometricalPhaseImage::plot_refinement_roi attached widget #{index}: {:?}",
            roi.describe()
        );
        Ok(index)
    }

    /// Refine the reference of the phase by subtracting the mean gradient
    /// over `roi` from the stored gradient.
    ///
    /// Returns the shift in `g` corresponding to the change of reference.
    /// The stored gradient is modified in place; nothing is modified when an
    /// error is returned.
    pub fn refine_phase<R: Roi + ?Sized>(&mut self, roi: &R) -> GpaResult<GShift> {
        let gradient = self
            .gradient
            .as_mut()
            .ok_or(GpaError::GradientNotComputed)?;

        let region = roi.apply(gradient)?;
        let means = region.mean_over_signal()?;
        gradient.subtract_per_frame(&means)?;
        debug!(
            "GeometricalPhaseImage::refine_phase region {:?} mean gradient {:?}",
            region.signal_axes().shape(),
            means
        );

        Ok(GShift::from_component_means(
            self.phase.nav_axes().to_vec(),
            &means,
        ))
    }

    /// Calculate the gradient of the phase (Appendix D in Hÿtch et al.,
    /// Ultramicroscopy 1998) and store it, replacing any previous gradient.
    pub fn gradient(&mut self) -> &Signal2D {
        let (gx, gy): (Vec<_>, Vec<_>) = self
            .phase
            .frames()
            .iter()
            .map(|frame| {
                let g = gradient_phase(frame);
                (g.gx, g.gy)
            })
            .unzip();

        let mut nav_axes = Vec::with_capacity(self.phase.nav_axes().len() + 1);
        nav_axes.push(DataAxis::new("component", 2));
        nav_axes.extend_from_slice(self.phase.nav_axes());

        let frames = gx.into_iter().chain(gy).collect();
        let gradient = Signal2D::from_parts(frames, nav_axes, self.phase.signal_axes().clone());
        debug!(
            "GeometricalPhaseImage::gradient computed {} frames of {:?}",
            gradient.nav_len(),
            gradient.signal_axes().shape()
        );
        self.gradient.insert(gradient)
    }

    /// Render the phase frame at navigation `index` with the attached
    /// widgets. `None` when the index is out of range.
    pub fn render(&self, index: usize) -> Option<RgbImage> {
        let frame = self.phase.frame(index)?;
        Some(match &self.plot {
            Some(plot) => plot.render(frame),
            None => Plot::default().render(frame),
        })
    }
}
