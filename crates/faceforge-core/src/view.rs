//! View state (zoom/pan/grid) and canvas settings.

use crate::snap::snap_to_grid;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Canvas logical extent in unzoomed units. Export rasters and the grid use
/// this extent regardless of the live viewport.
pub const CANVAS_WIDTH: f64 = 600.0;
pub const CANVAS_HEIGHT: f64 = 700.0;

/// Zoom percentage bounds and toolbar step.
pub const MIN_ZOOM: f64 = 25.0;
pub const MAX_ZOOM: f64 = 300.0;
pub const ZOOM_STEP: f64 = 25.0;

/// Default grid spacing in logical units.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// The live view transform plus grid configuration.
///
/// `zoom` is a percentage (100 = 1:1); `pan` is a screen-space offset applied
/// before zoom, so a screen point maps to logical coordinates as
/// `(screen - pan) / (zoom / 100)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub zoom: f64,
    pub pan: Vec2,
    pub show_grid: bool,
    pub grid_size: f64,
    pub snap_to_grid: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 100.0,
            pan: Vec2::ZERO,
            show_grid: true,
            grid_size: DEFAULT_GRID_SIZE,
            snap_to_grid: false,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zoom as a scale factor.
    pub fn zoom_scale(&self) -> f64 {
        self.zoom / 100.0
    }

    /// Transform from logical (scene) coordinates to screen pixels.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom_scale())
    }

    /// Convert a screen-space point to logical scene coordinates.
    pub fn screen_to_scene(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom_scale(),
            (screen.y - self.pan.y) / self.zoom_scale(),
        )
    }

    /// Convert a logical scene point to screen space.
    pub fn scene_to_screen(&self, scene: Point) -> Point {
        self.transform() * scene
    }

    /// Set the zoom percentage, clamped to the allowed range.
    pub fn set_zoom(&mut self, percent: f64) {
        self.zoom = percent.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Reset zoom and pan to the defaults, leaving grid settings alone.
    pub fn reset(&mut self) {
        self.zoom = 100.0;
        self.pan = Vec2::ZERO;
    }

    /// Snap a logical point to the grid when snapping is enabled; identity
    /// otherwise.
    pub fn maybe_snap(&self, point: Point) -> Point {
        if self.snap_to_grid {
            snap_to_grid(point, self.grid_size)
        } else {
            point
        }
    }
}

/// Export raster quality: multiplier over the logical canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportQuality {
    Standard,
    #[default]
    High,
}

impl ExportQuality {
    /// Raster resolution multiplier.
    pub fn factor(self) -> u32 {
        match self {
            ExportQuality::Standard => 1,
            ExportQuality::High => 2,
        }
    }
}

/// Persisted canvas appearance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSettings {
    /// Hex color string, e.g. `#ffffff`.
    pub background_color: String,
    pub show_rulers: bool,
    pub show_safe_area: bool,
    pub quality: ExportQuality,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            show_rulers: false,
            show_safe_area: false,
            quality: ExportQuality::High,
        }
    }
}
