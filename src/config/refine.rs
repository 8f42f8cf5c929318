//! JSON configuration of the `refine_phase` tool.
//!
//! ```json
//! {
//!   "input": "phase.json",
//!   "axes": null,
//!   "roi": { "kind": "rectangular", "left": 0, "top": 0, "right": 64, "bottom": 64 },
//!   "output": { "report_json": "out/report.json", "overlay_png": "out/roi.png" }
//! }
//! ```
use crate::axes::SignalAxes;
use crate::roi::AnyRoi;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct RefineToolConfig {
    pub input: PathBuf,
    /// Overrides the axes stored with the input (or the uncalibrated default).
    #[serde(default)]
    pub axes: Option<SignalAxes>,
    /// Kept untyped so that malformed ROIs surface as ROI errors.
    #[serde(default)]
    pub roi: Option<serde_json::Value>,
    pub output: RefineOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct RefineOutputConfig {
    pub report_json: PathBuf,
    #[serde(default)]
    pub overlay_png: Option<PathBuf>,
    /// Refined gradient components, written as `<stem>_x.png` / `<stem>_y.png`.
    #[serde(default)]
    pub gradient_png: Option<PathBuf>,
}

impl RefineToolConfig {
    /// The configured ROI, or a rectangle covering all of `axes` when none
    /// is given.
    pub fn resolve_roi(&self, axes: &SignalAxes) -> Result<AnyRoi, String> {
        match &self.roi {
            Some(value) => AnyRoi::from_value(value).map_err(|e| e.to_string()),
            None => Ok(crate::roi::RectangularRoi::covering(axes).into()),
        }
    }
}

pub fn load_config(path: &Path) -> Result<RefineToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
