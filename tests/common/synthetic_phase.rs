use gpa_phase::image::ImageF64;
use gpa_phase::phase::wrap_phase;

/// Linear phase ramp `φ = sx·x + sy·y + c`, optionally wrapped into [-π, π).
#[allow(dead_code)]
pub fn phase_ramp(width: usize, height: usize, sx: f64, sy: f64, c: f64, wrap: bool) -> ImageF64 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    ImageF64::from_fn(width, height, |x, y| {
        let v = sx * x as f64 + sy * y as f64 + c;
        if wrap {
            wrap_phase(v)
        } else {
            v
        }
    })
}

/// Ramp whose slope differs in the right half: a reference region on the
/// left and a strained region on the right.
#[allow(dead_code)]
pub fn two_domain_phase(width: usize, height: usize, left: f64, right: f64) -> ImageF64 {
    let split = width / 2;
    ImageF64::from_fn(width, height, |x, _| {
        let v = if x < split {
            left * x as f64
        } else {
            left * split as f64 + right * (x - split) as f64
        };
        wrap_phase(v)
    })
}
