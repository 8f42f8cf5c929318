#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod axes;
pub mod error;
pub mod gpa;
pub mod image;
pub mod roi;
pub mod signal;
pub mod types;

// Tooling support: reports, configuration and display state.
pub mod config;
pub mod diagnostics;
pub mod phase;
pub mod plot;

// --- High-level re-exports -------------------------------------------------

pub use crate::axes::{DataAxis, SignalAxes};
pub use crate::error::{GpaError, GpaResult};
pub use crate::gpa::GeometricalPhaseImage;
pub use crate::roi::{AnyRoi, CircleRoi, RectangularRoi, Roi};
pub use crate::signal::Signal2D;
pub use crate::types::GShift;

// Refinement report returned by the stage runner.
pub use crate::diagnostics::{run_refinement, RefinementReport};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for notebooks and quick experiments.
pub mod prelude {
    pub use crate::image::ImageF64;
    pub use crate::phase::wrap_phase;
    pub use crate::{
        AnyRoi, CircleRoi, GShift, GeometricalPhaseImage, GpaError, RectangularRoi, Roi,
        SignalAxes,
    };
}
