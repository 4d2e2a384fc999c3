//! Deterministic scene export.
//!
//! Exports render at the fixed canvas size times the quality factor, with
//! the live pan/zoom and all editing decorations excluded, so the same
//! scene always produces the same bytes.

use crate::raster::RasterRenderer;
use crate::renderer::{RenderContext, Renderer};
use faceforge_core::scene::Scene;
use faceforge_core::view::ExportQuality;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Render failed: {0}")]
    Render(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("IO error: {0}")]
    Io(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Render the scene to an export bitmap.
///
/// All feature images are loaded up front; assets that fail to decode are
/// skipped, matching the interactive canvas.
pub fn export_image(
    renderer: &mut RasterRenderer,
    scene: &Scene,
    quality: ExportQuality,
) -> ExportResult<RgbaImage> {
    renderer
        .cache_mut()
        .load_all(scene.features().iter().map(|f| f.asset.image_path.as_str()));

    let ctx = RenderContext::export(scene, quality);
    renderer
        .render(&ctx)
        .map_err(|e| ExportError::Render(e.to_string()))
}

/// Encode a rendered bitmap as PNG bytes (for recognition submission or
/// clipboard use).
pub fn png_bytes(image: &RgbaImage) -> ExportResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(bytes.into_inner())
}

/// Export the scene straight to a PNG file.
pub fn export_png(
    renderer: &mut RasterRenderer,
    scene: &Scene,
    quality: ExportQuality,
    path: &Path,
) -> ExportResult<()> {
    let image = export_image(renderer, scene, quality)?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| ExportError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use faceforge_core::asset::{AssetDescriptor, FeatureCategory};
    use faceforge_core::view::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use image::Rgba;
    use kurbo::{Point, Vec2};
    use tempfile::tempdir;

    fn asset(id: &str) -> AssetDescriptor {
        AssetDescriptor {
            id: id.to_string(),
            name: id.to_string(),
            category: FeatureCategory::Other,
            image_path: format!("mem://{}", id),
            tags: Vec::new(),
            description: None,
        }
    }

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        let id = scene.add_feature(asset("red"), Some(Point::new(100.0, 100.0)));
        scene.feature_mut(id).unwrap().set_size(50.0, 50.0);
        scene
    }

    fn renderer_with_red() -> RasterRenderer {
        let mut renderer = RasterRenderer::new();
        renderer
            .cache_mut()
            .insert("mem://red", RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255])));
        renderer
    }

    #[test]
    fn test_export_dimensions_follow_quality() {
        let scene = sample_scene();
        let mut renderer = renderer_with_red();

        let standard = export_image(&mut renderer, &scene, ExportQuality::Standard).unwrap();
        assert_eq!(
            standard.dimensions(),
            (CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32)
        );

        let high = export_image(&mut renderer, &scene, ExportQuality::High).unwrap();
        assert_eq!(
            high.dimensions(),
            (CANVAS_WIDTH as u32 * 2, CANVAS_HEIGHT as u32 * 2)
        );
    }

    #[test]
    fn test_export_ignores_view_and_selection() {
        let mut scene = sample_scene();
        let mut renderer = renderer_with_red();
        let baseline = export_image(&mut renderer, &scene, ExportQuality::Standard).unwrap();

        scene.view.zoom = 250.0;
        scene.view.pan = Vec2::new(120.0, 80.0);
        scene.select_all();
        let moved_view = export_image(&mut renderer, &scene, ExportQuality::Standard).unwrap();

        assert_eq!(baseline.as_raw(), moved_view.as_raw());
    }

    #[test]
    fn test_export_is_deterministic() {
        let scene = sample_scene();
        let mut renderer = renderer_with_red();
        let first = export_image(&mut renderer, &scene, ExportQuality::High).unwrap();
        let second = export_image(&mut renderer, &scene, ExportQuality::High).unwrap();
        assert_eq!(png_bytes(&first).unwrap(), png_bytes(&second).unwrap());
    }

    #[test]
    fn test_export_skips_unloadable_assets() {
        let mut scene = sample_scene();
        scene.add_feature(asset("ghost"), Some(Point::new(300.0, 300.0)));
        let mut renderer = renderer_with_red();

        let out = export_image(&mut renderer, &scene, ExportQuality::Standard).unwrap();
        assert_eq!(out.get_pixel(125, 125), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(350, 350), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_export_png_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sketch.png");
        let scene = sample_scene();
        let mut renderer = renderer_with_red();

        export_png(&mut renderer, &scene, ExportQuality::High, &path).unwrap();
        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(
            reloaded.dimensions(),
            (CANVAS_WIDTH as u32 * 2, CANVAS_HEIGHT as u32 * 2)
        );
        assert_eq!(reloaded.get_pixel(250, 250), &Rgba([255, 0, 0, 255]));
    }
}
