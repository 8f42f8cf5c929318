//! I/O helpers for phase images and JSON.
//!
//! - `load_phase_file`: read a phase map from JSON (`PhaseImageFile`) or from
//!   an 8-bit grayscale image spanning one turn.
//! - `save_phase_png`: write a phase frame as grayscale, wrapped to `[-π, π)`.
//! - `save_scaled_png`: write any float frame stretched to its min/max.
//! - `save_rgb_png`: write a rendered plot.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF64, ImageU8, ImageView};
use crate::axes::SignalAxes;
use crate::plot::render_phase;
use image::{GrayImage, Luma, RgbImage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// JSON layout of a stored phase map (row-major radians).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhaseImageFile {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes: Option<SignalAxes>,
}

impl PhaseImageFile {
    pub fn from_image(image: &ImageF64, axes: Option<SignalAxes>) -> Self {
        Self {
            width: image.w,
            height: image.h,
            data: image.rows().flat_map(|r| r.iter().copied()).collect(),
            axes,
        }
    }
}

/// A loaded phase frame with the axes stored alongside it, if any.
#[derive(Clone, Debug)]
pub struct LoadedPhase {
    pub image: ImageF64,
    pub axes: Option<SignalAxes>,
}

/// Load a phase map. `.json` files are parsed as [`PhaseImageFile`]; PNG,
/// TIFF and JPEG files are decoded, converted to 8-bit gray and mapped onto
/// `[-π, π]`. Other formats are rejected.
pub fn load_phase_file(path: &Path) -> Result<LoadedPhase, String> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let file: PhaseImageFile = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
        let image = ImageF64::from_vec(file.width, file.height, file.data)
            .map_err(|e| format!("Invalid phase map {}: {e}", path.display()))?;
        return Ok(LoadedPhase {
            image,
            axes: file.axes,
        });
    }

    let gray = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let raw = gray.into_raw();
    let view = ImageU8 {
        w,
        h,
        stride: w,
        data: &raw,
    };
    Ok(LoadedPhase {
        image: view.to_phase(),
        axes: None,
    })
}

/// Save a phase frame as grayscale PNG (`-π` black, `π` white).
pub fn save_phase_png(phase: &ImageF64, path: &Path) -> Result<(), String> {
    save_rgb_png(&render_phase(phase, &[]), path)
}

/// Save a float frame to grayscale PNG, stretching its finite range to
/// [0, 255]. Non-finite samples are written black.
pub fn save_scaled_png(image: &ImageF64, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let (lo, hi) = image
        .data
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = if hi > lo { hi - lo } else { 1.0 };
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = if px.is_finite() {
                ((px - lo) / span * 255.0).clamp(0.0, 255.0) as u8
            } else {
                0
            };
            out.put_pixel(x as u32, y as u32, Luma([v]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a rendered RGB image.
pub fn save_rgb_png(image: &RgbImage, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    image
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    use tempfile::tempdir;

    #[test]
    fn json_phase_round_trip_keeps_axes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("phase.json");
        let img = ImageF64::from_fn(3, 2, |x, y| 0.1 * x as f64 - 0.2 * y as f64);
        let axes = SignalAxes::uncalibrated(3, 2);
        write_json_file(&path, &PhaseImageFile::from_image(&img, Some(axes.clone()))).unwrap();

        let loaded = load_phase_file(&path).unwrap();
        assert_eq!(loaded.image.shape(), img.shape());
        for (a, b) in loaded.image.data.iter().zip(&img.data) {
            assert!((a - b).abs() < 1e-12);
        }
        assert_eq!(loaded.axes, Some(axes));
    }

    #[test]
    fn json_with_wrong_length_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("phase.json");
        write_json_file(
            &path,
            &PhaseImageFile {
                width: 4,
                height: 4,
                data: vec![0.0; 3],
                axes: None,
            },
        )
        .unwrap();
        assert!(load_phase_file(&path).is_err());
    }

    #[test]
    fn png_phase_is_mapped_to_one_turn() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("phase.png");
        let img = ImageF64::from_fn(4, 1, |x, _| -PI + x as f64);
        save_phase_png(&img, &path).unwrap();
        let loaded = load_phase_file(&path).unwrap();
        assert_eq!(loaded.image.shape(), (4, 1));
        assert!(loaded.axes.is_none());
        for x in 0..4 {
            assert!((loaded.image.get(x, 0) - img.get(x, 0)).abs() < 2.0 * PI / 255.0 + 1e-9);
        }
    }

    #[test]
    fn tiff_phase_is_decoded_as_gray() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("phase.tif");
        let gray = GrayImage::from_fn(5, 3, |x, _| Luma([if x < 2 { 0 } else { 255 }]));
        gray.save(&path).unwrap();

        let loaded = load_phase_file(&path).unwrap();
        assert_eq!(loaded.image.shape(), (5, 3));
        assert!((loaded.image.get(0, 1) + PI).abs() < 1e-12);
        assert!((loaded.image.get(4, 2) - PI).abs() < 1e-12);
    }

    #[test]
    fn unknown_image_format_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("phase.xyz");
        fs::write(&path, b"not an image").unwrap();
        let err = load_phase_file(&path).unwrap_err();
        assert!(err.contains("Failed to open"), "{err}");
    }
}
