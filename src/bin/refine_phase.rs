use gpa_phase::config::refine::{load_config, RefineToolConfig};
use gpa_phase::diagnostics::{run_refinement, RefinementReport};
use gpa_phase::image::io::{load_phase_file, save_rgb_png, save_scaled_png, write_json_file};
use gpa_phase::{GeometricalPhaseImage, SignalAxes};
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let loaded = load_phase_file(&config.input)?;
    let axes = config
        .axes
        .clone()
        .or(loaded.axes)
        .unwrap_or_else(|| SignalAxes::uncalibrated(loaded.image.w, loaded.image.h));
    let mut gpi = GeometricalPhaseImage::with_axes(loaded.image, axes).map_err(|e| e.to_string())?;

    let roi = config.resolve_roi(gpi.signal_axes())?;
    gpi.plot_refinement_roi(&roi).map_err(|e| e.to_string())?;
    let report = run_refinement(&mut gpi, &roi).map_err(|e| e.to_string())?;

    write_json_file(&config.output.report_json, &report)?;
    save_images(&config, &gpi)?;
    print_summary(&report);
    println!(
        "Report written to {}",
        config.output.report_json.display()
    );
    Ok(())
}

fn save_images(config: &RefineToolConfig, gpi: &GeometricalPhaseImage) -> Result<(), String> {
    if let Some(path) = &config.output.overlay_png {
        let overlay = gpi.render(0).ok_or("Phase image has no frames")?;
        save_rgb_png(&overlay, path)?;
        println!("ROI overlay written to {}", path.display());
    }
    if let (Some(path), Some(gradient)) = (&config.output.gradient_png, gpi.gradient_field()) {
        for (index, suffix) in ["x", "y"].iter().enumerate() {
            let frame = gradient
                .frame(index)
                .ok_or_else(|| format!("Gradient has no {suffix} component"))?;
            let target = with_suffix(path, suffix);
            save_scaled_png(frame, &target)?;
            println!("Gradient {suffix} written to {}", target.display());
        }
    }
    Ok(())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("gradient");
    path.with_file_name(format!("{stem}_{suffix}.png"))
}

fn print_summary(report: &RefinementReport) {
    println!(
        "Phase {}x{} (navigation {:?}), ROI {:?}",
        report.width, report.height, report.nav_shape, report.roi
    );
    for frame in &report.frames {
        println!(
            "  frame {}: mean gradient ({:+.5}, {:+.5}) -> ({:+.2e}, {:+.2e}) rad/px, g shift ({:+.6}, {:+.6})",
            frame.index,
            frame.mean_gradient_before[0],
            frame.mean_gradient_before[1],
            frame.mean_gradient_after[0],
            frame.mean_gradient_after[1],
            frame.g_shift[0],
            frame.g_shift[1],
        );
    }
    for stage in &report.timing.stages {
        println!("  {:<14} {:8.3} ms", stage.label, stage.elapsed_ms);
    }
}

fn usage() -> String {
    "Usage: refine_phase <config.json>".to_string()
}
