//! Headless plot state with attachable ROI widgets.
//!
//! A [`Plot`] records whether the phase image is currently displayed and the
//! widgets attached to it. Widgets keep the ROI geometry in calibrated units;
//! moving a widget ([`RoiWidget::set_geometry`]) and reading it back
//! ([`RoiWidget::to_roi`]) is how an interactive front-end feeds an adjusted
//! region into the refinement.
use crate::axes::SignalAxes;
use crate::error::GpaResult;
use crate::image::{ImageF64, ImageView};
use crate::phase::wrap_phase;
use crate::roi::{AnyRoi, CircleRoi, Roi};
use image::{Rgb, RgbImage};
use std::f64::consts::PI;
use std::ops::Range;

const OUTLINE: Rgb<u8> = Rgb([230, 40, 40]);

#[derive(Clone, Debug, PartialEq)]
pub struct RoiWidget {
    geometry: AnyRoi,
    axes: SignalAxes,
}

impl RoiWidget {
    pub fn new(geometry: AnyRoi, axes: SignalAxes) -> Self {
        Self { geometry, axes }
    }

    pub fn geometry(&self) -> &AnyRoi {
        &self.geometry
    }

    /// Signal axes the widget is bound to.
    pub fn axes(&self) -> &SignalAxes {
        &self.axes
    }

    /// Move/resize the widget. Invalid geometry is rejected and the previous
    /// geometry kept.
    pub fn set_geometry(&mut self, geometry: impl Into<AnyRoi>) -> GpaResult<()> {
        let geometry = geometry.into();
        geometry.validate()?;
        self.geometry = geometry;
        Ok(())
    }

    /// Current geometry as an ROI usable by `refine_phase`.
    pub fn to_roi(&self) -> AnyRoi {
        self.geometry
    }

    /// Pixel-space outline, resolved once per render.
    fn outline(&self) -> Outline<'_> {
        match &self.geometry {
            AnyRoi::Rectangular(r) => match (
                self.axes.x.index_range(r.left, r.right),
                self.axes.y.index_range(r.top, r.bottom),
            ) {
                (Some(xs), Some(ys)) => Outline::Rect { xs, ys },
                _ => Outline::Empty,
            },
            AnyRoi::Circle(c) => Outline::Circle {
                roi: c,
                axes: &self.axes,
                tol: 0.5 * self.axes.x.scale.abs().max(self.axes.y.scale.abs()),
            },
        }
    }
}

enum Outline<'a> {
    Empty,
    Rect {
        xs: Range<usize>,
        ys: Range<usize>,
    },
    Circle {
        roi: &'a CircleRoi,
        axes: &'a SignalAxes,
        tol: f64,
    },
}

impl Outline<'_> {
    fn contains(&self, x: usize, y: usize) -> bool {
        match self {
            Outline::Empty => false,
            Outline::Rect { xs, ys } => {
                let inside = xs.contains(&x) && ys.contains(&y);
                let edge = x == xs.start || x + 1 == xs.end || y == ys.start || y + 1 == ys.end;
                inside && edge
            }
            Outline::Circle { roi, axes, tol } => {
                let d = (axes.x.index_to_value(x) - roi.cx).hypot(axes.y.index_to_value(y) - roi.cy);
                (d - roi.r).abs() <= *tol || (roi.r_inner > 0.0 && (d - roi.r_inner).abs() <= *tol)
            }
        }
    }
}

/// Display state of a signal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plot {
    active: bool,
    widgets: Vec<RoiWidget>,
}

impl Plot {
    /// An active plot without widgets.
    pub fn open() -> Self {
        Self {
            active: true,
            widgets: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Deactivate the plot; attached widgets are kept for the next display.
    pub fn close(&mut self) {
        self.active = false;
    }

    /// Attach a widget and return its index.
    pub fn add_widget(&mut self, widget: RoiWidget) -> usize {
        self.widgets.push(widget);
        self.widgets.len() - 1
    }

    pub fn widgets(&self) -> &[RoiWidget] {
        &self.widgets
    }

    pub fn widget_mut(&mut self, index: usize) -> Option<&mut RoiWidget> {
        self.widgets.get_mut(index)
    }

    /// Render a phase frame with the widget outlines drawn on top.
    pub fn render(&self, phase: &ImageF64) -> RgbImage {
        render_phase(phase, &self.widgets)
    }
}

/// Map a phase frame to gray levels (`-π` black, `π` white) and draw widget
/// outlines in red.
pub fn render_phase(phase: &ImageF64, widgets: &[RoiWidget]) -> RgbImage {
    let outlines: Vec<Outline<'_>> = widgets.iter().map(RoiWidget::outline).collect();
    let mut out = RgbImage::new(phase.w as u32, phase.h as u32);
    for (y, row) in phase.rows().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            let px = if outlines.iter().any(|o| o.contains(x, y)) {
                OUTLINE
            } else {
                let g = if v.is_finite() {
                    ((wrap_phase(v) + PI) / (2.0 * PI) * 255.0).clamp(0.0, 255.0) as u8
                } else {
                    0
                };
                Rgb([g, g, g])
            };
            out.put_pixel(x as u32, y as u32, px);
        }
    }
    out
}
