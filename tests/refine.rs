mod common;

use common::synthetic_phase::{phase_ramp, two_domain_phase};
use gpa_phase::axes::{DataAxis, SignalAxes};
use gpa_phase::image::ImageF64;
use gpa_phase::roi::{AnyRoi, CircleRoi, RectangularRoi, Roi};
use gpa_phase::signal::Signal2D;
use gpa_phase::{GeometricalPhaseImage, GpaError};
use serde_json::json;
use std::f64::consts::PI;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Mean of each gradient frame over `roi`, computed independently of
/// `refine_phase`.
fn roi_means(gpi: &GeometricalPhaseImage, roi: &dyn Roi) -> Vec<f64> {
    let gradient = gpi.gradient_field().expect("gradient computed");
    roi.apply(gradient)
        .expect("roi overlaps")
        .mean_over_signal()
        .expect("finite samples")
}

#[test]
fn linear_ramp_scenario() {
    init_logging();
    let mut gpi = GeometricalPhaseImage::new(phase_ramp(10, 10, 0.1, 0.0, 0.0, false));

    let gradient = gpi.gradient();
    let gx = gradient.frame(0).unwrap();
    let gy = gradient.frame(1).unwrap();
    assert!(gx.data.iter().all(|v| (v - 0.1).abs() < 1e-3));
    assert!(gy.data.iter().all(|v| v.abs() < 1e-12));

    let roi = RectangularRoi::new(0.0, 0.0, 10.0, 10.0);
    let shift = gpi.refine_phase(&roi).unwrap();
    assert_eq!(shift.values.len(), 1);
    assert!((shift.values[0].x - (-0.1 / (2.0 * PI))).abs() < 1e-3 / (2.0 * PI));
    assert!(shift.values[0].y.abs() < 1e-12);

    for m in roi_means(&gpi, &roi) {
        assert!(m.abs() < 1e-12, "mean after refinement: {m}");
    }
}

#[test]
fn correction_is_exactly_negative_mean_over_two_pi() {
    let mut gpi = GeometricalPhaseImage::new(two_domain_phase(40, 24, 0.25, 0.4));
    gpi.gradient();
    let roi = RectangularRoi::new(2.0, 3.0, 17.0, 20.0);
    let before = roi_means(&gpi, &roi);

    let shift = gpi.refine_phase(&roi).unwrap();
    assert_eq!(shift.values[0].x, before[0] / (-2.0 * PI));
    assert_eq!(shift.values[0].y, before[1] / (-2.0 * PI));
}

#[test]
fn constant_phase_yields_zero_correction() {
    let mut gpi = GeometricalPhaseImage::new(phase_ramp(16, 12, 0.0, 0.0, 2.5, false));
    let gradient = gpi.gradient();
    for frame in gradient.frames() {
        assert!(frame.data.iter().all(|v| v.abs() < 1e-12));
    }
    for roi in [
        AnyRoi::from(RectangularRoi::new(3.0, 3.0, 9.0, 7.0)),
        AnyRoi::from(CircleRoi::new(8.0, 6.0, 4.0)),
    ] {
        let shift = gpi.refine_phase(&roi).unwrap();
        assert!(shift.max_norm() < 1e-12);
    }
}

#[test]
fn second_refinement_is_near_zero() {
    let mut gpi = GeometricalPhaseImage::new(phase_ramp(32, 32, 0.3, -0.2, 0.0, true));
    gpi.gradient();
    let roi = RectangularRoi::new(4.0, 4.0, 20.0, 28.0);
    let first = gpi.refine_phase(&roi).unwrap();
    assert!(first.max_norm() > 0.01);
    let second = gpi.refine_phase(&roi).unwrap();
    assert!(second.max_norm() < 1e-12);
}

#[test]
fn wrapped_phase_refines_like_unwrapped() {
    let mut wrapped = GeometricalPhaseImage::new(phase_ramp(24, 16, 0.9, 0.35, 1.0, true));
    let mut unwrapped = GeometricalPhaseImage::new(phase_ramp(24, 16, 0.9, 0.35, 1.0, false));
    wrapped.gradient();
    unwrapped.gradient();
    let roi = CircleRoi::new(12.0, 8.0, 6.0);
    let a = wrapped.refine_phase(&roi).unwrap();
    let b = unwrapped.refine_phase(&roi).unwrap();
    assert!((a.values[0] - b.values[0]).norm() < 1e-9);
    assert!((a.values[0].x + 0.9f64.sin() / (2.0 * PI)).abs() < 1e-9);
}

#[test]
fn reference_region_removes_its_own_slope_only() {
    let mut gpi = GeometricalPhaseImage::new(two_domain_phase(40, 8, 0.2, 0.5));
    gpi.gradient();
    // reference region fully inside the left domain, away from the border
    let shift = gpi
        .refine_phase(&RectangularRoi::new(2.0, 0.0, 16.0, 8.0))
        .unwrap();
    assert!((shift.values[0].x + 0.2f64.sin() / (2.0 * PI)).abs() < 1e-9);

    let gx = gpi.gradient_field().unwrap().frame(0).unwrap();
    assert!(gx.get(8, 4).abs() < 1e-9);
    assert!((gx.get(30, 4) - (0.5f64.sin() - 0.2f64.sin())).abs() < 1e-9);
}

#[test]
fn refine_before_gradient_is_a_state_error() {
    let mut gpi = GeometricalPhaseImage::new(phase_ramp(8, 8, 0.1, 0.0, 0.0, false));
    let err = gpi
        .refine_phase(&RectangularRoi::new(0.0, 0.0, 8.0, 8.0))
        .unwrap_err();
    assert_eq!(err, GpaError::GradientNotComputed);
    assert_eq!(err.to_string(), "Gradient needs to be calculated first.");
}

#[test]
fn non_roi_values_are_invalid_arguments() {
    let mut gpi = GeometricalPhaseImage::new(phase_ramp(8, 8, 0.1, 0.0, 0.0, false));
    for value in [json!(1.5), json!("rectangle"), json!({"kind": "triangle"})] {
        let err = AnyRoi::try_from(value).unwrap_err();
        assert!(matches!(err, GpaError::InvalidRoi(_)));
    }
    let err = gpi
        .plot_refinement_roi(&CircleRoi::new(2.0, 2.0, f64::INFINITY))
        .unwrap_err();
    assert!(matches!(err, GpaError::InvalidRoi(_)));
}

#[test]
fn gradient_axes_follow_phase_axes() {
    let axes = SignalAxes {
        x: DataAxis::new("x", 20).with_calibration(0.012, 0.3, "nm"),
        y: DataAxis::new("y", 10).with_calibration(0.015, -0.1, "nm"),
    };
    let mut gpi =
        GeometricalPhaseImage::with_axes(phase_ramp(20, 10, 0.1, 0.0, 0.0, true), axes.clone())
            .unwrap();
    let gradient = gpi.gradient();
    assert_eq!(gradient.signal_axes(), &axes);

    // calibrated ROI: x in [0.3, 0.3 + 10·0.012)
    let roi = RectangularRoi::new(0.3, -0.1, 0.3 + 10.0 * 0.012 - 1e-9, 0.05);
    let region = roi.apply(gpi.gradient_field().unwrap()).unwrap();
    assert_eq!(region.signal_axes().shape().0, 10);
    assert_eq!(region.signal_axes().x.units, "nm");
}

#[test]
fn navigation_stack_is_refined_per_frame() {
    init_logging();
    let slopes = [0.05, 0.15, -0.1];
    let frames: Vec<ImageF64> = slopes
        .iter()
        .map(|&s| phase_ramp(16, 16, s, 0.0, 0.0, true))
        .collect();
    let signal = Signal2D::from_frames(
        frames,
        vec![DataAxis::new("time", slopes.len())],
        SignalAxes::uncalibrated(16, 16),
    )
    .unwrap();
    let mut gpi = GeometricalPhaseImage::from_signal(signal);

    let gradient = gpi.gradient();
    assert_eq!(gradient.nav_shape(), vec![2, 3]);

    let shift = gpi
        .refine_phase(&RectangularRoi::new(0.0, 0.0, 16.0, 16.0))
        .unwrap();
    assert_eq!(shift.values.len(), 3);
    assert_eq!(shift.nav_axes[0].name, "time");
    for (value, s) in shift.values.iter().zip(slopes) {
        assert!((value.x + s.sin() / (2.0 * PI)).abs() < 1e-9);
        assert!(value.y.abs() < 1e-12);
    }
}

#[test]
fn recomputing_gradient_discards_refinement() {
    let mut gpi = GeometricalPhaseImage::new(phase_ramp(10, 10, 0.1, 0.0, 0.0, false));
    let original = gpi.gradient().clone();

    let roi = RectangularRoi::new(0.0, 0.0, 10.0, 10.0);
    gpi.refine_phase(&roi).unwrap();
    let refined = gpi.gradient_field().unwrap().frame(0).unwrap().get(5, 5);
    assert!(refined.abs() < 1e-12);

    let recomputed = gpi.gradient();
    assert_eq!(recomputed, &original);
    assert!((recomputed.frame(0).unwrap().get(5, 5) - 0.1f64.sin()).abs() < 1e-12);

    let shift = gpi.refine_phase(&roi).unwrap();
    assert!((shift.values[0].x + 0.1f64.sin() / (2.0 * PI)).abs() < 1e-9);
}
