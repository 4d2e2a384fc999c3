//! Renderer trait abstraction.

use faceforge_core::feature::FeatureId;
use faceforge_core::scene::Scene;
use faceforge_core::view::{ExportQuality, CANVAS_HEIGHT, CANVAS_WIDTH};
use image::RgbaImage;
use kurbo::{Affine, Size};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render pass.
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a Scene,
    /// Output size in physical pixels.
    pub viewport_size: Size,
    /// Scene-to-device transform.
    pub transform: Affine,
    /// Whether to draw editing decorations (grid, safe area, selection).
    pub draw_decorations: bool,
    /// Feature picked by auto-selection, highlighted differently.
    pub auto_selected: Option<FeatureId>,
}

impl<'a> RenderContext<'a> {
    /// Context for an interactive canvas pass: the scene's own view
    /// transform, decorations on.
    pub fn new(scene: &'a Scene, viewport_size: Size) -> Self {
        Self {
            scene,
            viewport_size,
            transform: scene.view.transform(),
            draw_decorations: true,
            auto_selected: None,
        }
    }

    /// Context for a deterministic export pass: fixed canvas size scaled by
    /// the quality factor, the live pan/zoom ignored, decorations off.
    pub fn export(scene: &'a Scene, quality: ExportQuality) -> Self {
        let factor = quality.factor() as f64;
        Self {
            scene,
            viewport_size: Size::new(CANVAS_WIDTH * factor, CANVAS_HEIGHT * factor),
            transform: Affine::scale(factor),
            draw_decorations: false,
            auto_selected: None,
        }
    }

    /// Scale for HiDPI output.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.viewport_size = Size::new(
            self.viewport_size.width * scale_factor,
            self.viewport_size.height * scale_factor,
        );
        self.transform = Affine::scale(scale_factor) * self.transform;
        self
    }

    /// Highlight the auto-selected feature.
    pub fn with_auto_selected(mut self, id: Option<FeatureId>) -> Self {
        self.auto_selected = id;
        self
    }

    /// Turn editing decorations on or off.
    pub fn with_decorations(mut self, on: bool) -> Self {
        self.draw_decorations = on;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Render the scene into an RGBA buffer.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RgbaImage>;
}
