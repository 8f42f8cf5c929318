//! Phase-aware gradients (Hÿtch et al., Ultramicroscopy 1998, Appendix D).
//!
//! The measured phase is only known modulo 2π, so a plain finite difference
//! jumps by ±2π wherever the phase wraps. Differentiating the unit phasor
//! instead removes the ambiguity:
//!
//! ```text
//! ∇φ = Im( e^{-iφ} · ∇e^{iφ} )
//! ```
//!
//! With central differences `∇f[i] = (f[i+1] - f[i-1]) / 2` this reduces per
//! sample to `(sin(φ[i+1] - φ[i]) - sin(φ[i-1] - φ[i])) / 2`. Borders use the
//! one-sided difference `sin(φ[1] - φ[0])`, and an axis of length one has a
//! zero derivative.
//!
//! Units are radians per pixel.
use crate::image::{ImageF64, ImageView, ImageViewMut};
use std::f64::consts::PI;

/// Per-pixel phase derivatives along x (columns) and y (rows).
#[derive(Clone, Debug)]
pub struct PhaseGrad {
    pub gx: ImageF64,
    pub gy: ImageF64,
}

/// Wrap an angle into `[-π, π)`.
#[inline]
pub fn wrap_phase(angle: f64) -> f64 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

/// Derivative of a phase sequence at `i` using the phasor formulation.
#[inline]
fn phasor_diff(prev: f64, cur: f64, next: f64, at_start: bool, at_end: bool) -> f64 {
    match (at_start, at_end) {
        (true, true) => 0.0,
        (true, false) => (next - cur).sin(),
        (false, true) => (cur - prev).sin(),
        (false, false) => 0.5 * ((next - cur).sin() - (prev - cur).sin()),
    }
}

/// Compute the wrap-insensitive gradient of a single phase frame.
pub fn gradient_phase(phase: &ImageF64) -> PhaseGrad {
    let w = phase.w;
    let h = phase.h;
    let mut gx = ImageF64::new(w, h);
    let mut gy = ImageF64::new(w, h);

    if w == 0 || h == 0 {
        return PhaseGrad { gx, gy };
    }

    for y in 0..h {
        let rows = [
            phase.row(y.saturating_sub(1)),
            phase.row(y),
            phase.row((y + 1).min(h - 1)),
        ];
        let out_gx = gx.row_mut(y);
        for x in 0..w {
            let prev = rows[1][x.saturating_sub(1)];
            let next = rows[1][(x + 1).min(w - 1)];
            out_gx[x] = phasor_diff(prev, rows[1][x], next, x == 0, x + 1 == w);
        }
        let out_gy = gy.row_mut(y);
        for x in 0..w {
            out_gy[x] = phasor_diff(rows[0][x], rows[1][x], rows[2][x], y == 0, y + 1 == h);
        }
    }

    PhaseGrad { gx, gy }
}
