use gpa_phase::image::ImageF64;
use gpa_phase::phase::wrap_phase;
use gpa_phase::{GeometricalPhaseImage, RectangularRoi};

fn main() {
    // Demo stub: a wrapped phase ramp whose reference is off by 0.1 rad/px in x
    let w = 128usize;
    let h = 128usize;
    let phase = ImageF64::from_fn(w, h, |x, y| wrap_phase(0.1 * x as f64 + 0.02 * y as f64));

    let mut gpi = GeometricalPhaseImage::new(phase);
    gpi.gradient();
    let roi = RectangularRoi::new(16.0, 16.0, 112.0, 112.0);
    match gpi.refine_phase(&roi) {
        Ok(shift) => {
            let g = shift.values[0];
            println!("g shift: ({:.5}, {:.5}) 1/px", g.x, g.y);
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
