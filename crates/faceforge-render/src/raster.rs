//! Software raster backend.
//!
//! Composites the scene into an RGBA buffer on the CPU: inverse-mapped
//! bilinear sampling per feature, CSS-style brightness/contrast filters,
//! source-over blending. The same pass serves the interactive canvas and
//! the exporter, which is what makes exports deterministic.

use crate::cache::ImageCache;
use crate::color::{self, parse_css_color};
use crate::renderer::{RenderContext, Renderer, RenderResult, RendererError};
use faceforge_core::feature::PlacedFeature;
use faceforge_core::view::{CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_GRID_SIZE};
use image::{Rgba, RgbaImage};
use kurbo::{Affine, Point, Rect, Vec2};

/// Safe-area guide inset from the canvas edge, logical units.
pub const SAFE_AREA_INSET: f64 = 50.0;
/// Selection handle edge length, device pixels.
const HANDLE_SIZE: i64 = 8;
/// Dash pattern for guides and selection outlines, device pixels.
const DASH_ON: i64 = 6;
const DASH_PERIOD: i64 = 10;

/// CPU compositing renderer.
#[derive(Default)]
pub struct RasterRenderer {
    cache: ImageCache,
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: ImageCache) -> Self {
        Self { cache }
    }

    pub fn cache_mut(&mut self) -> &mut ImageCache {
        &mut self.cache
    }
}

impl Renderer for RasterRenderer {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RgbaImage> {
        let width = ctx.viewport_size.width.round() as i64;
        let height = ctx.viewport_size.height.round() as i64;
        if width <= 0 || height <= 0 {
            return Err(RendererError::InvalidViewport(format!(
                "{}x{}",
                ctx.viewport_size.width, ctx.viewport_size.height
            )));
        }

        let background = parse_css_color(&ctx.scene.settings.background_color);
        let mut target = RgbaImage::from_pixel(width as u32, height as u32, background);

        if ctx.draw_decorations && ctx.scene.view.show_grid {
            let grid = if ctx.scene.view.grid_size > 0.0 {
                ctx.scene.view.grid_size
            } else {
                DEFAULT_GRID_SIZE
            };
            draw_grid(&mut target, ctx.transform, grid);
        }
        if ctx.draw_decorations && ctx.scene.settings.show_safe_area {
            let safe = Rect::new(
                SAFE_AREA_INSET,
                SAFE_AREA_INSET,
                CANVAS_WIDTH - SAFE_AREA_INSET,
                CANVAS_HEIGHT - SAFE_AREA_INSET,
            );
            draw_dashed_rect(
                &mut target,
                ctx.transform.transform_rect_bbox(safe),
                color::SAFE_AREA,
            );
        }

        for feature in ctx.scene.features_ordered() {
            if !feature.visible {
                continue;
            }
            // A missing image leaves a gap, never an error.
            if let Some(src) = self.cache.get_or_load(&feature.asset.image_path) {
                draw_feature(&mut target, &src, feature, ctx.transform);
            }
        }

        if ctx.draw_decorations {
            for &id in ctx.scene.selection() {
                let Some(feature) = ctx.scene.feature(id) else {
                    continue;
                };
                let accent = if ctx.auto_selected == Some(id) {
                    color::AUTO_SELECTION
                } else {
                    color::SELECTION
                };
                draw_selection(&mut target, feature, ctx.transform, accent);
            }
        }

        Ok(target)
    }
}

/// Composite one feature into the target buffer.
///
/// The source image is mapped through flip, rotation about the feature
/// center, and the scene-to-device transform; each covered device pixel is
/// inverse-mapped and bilinearly sampled so rotation at any zoom stays
/// smooth.
pub(crate) fn draw_feature(
    target: &mut RgbaImage,
    src: &RgbaImage,
    feature: &PlacedFeature,
    view: Affine,
) {
    let (src_w, src_h) = (src.width() as f64, src.height() as f64);
    if src_w == 0.0 || src_h == 0.0 {
        return;
    }

    let sx = if feature.flip_h { -1.0 } else { 1.0 };
    let sy = if feature.flip_v { -1.0 } else { 1.0 };
    let transform = view
        * Affine::translate(feature.center().to_vec2())
        * Affine::rotate(feature.rotation.to_radians())
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate(Vec2::new(-feature.width / 2.0, -feature.height / 2.0))
        * Affine::scale_non_uniform(feature.width / src_w, feature.height / src_h);
    let inverse = transform.inverse();

    let bbox = transform.transform_rect_bbox(Rect::new(0.0, 0.0, src_w, src_h));
    let x0 = bbox.x0.floor().max(0.0) as u32;
    let y0 = bbox.y0.floor().max(0.0) as u32;
    let x1 = (bbox.x1.ceil() as i64).clamp(0, target.width() as i64) as u32;
    let y1 = (bbox.y1.ceil() as i64).clamp(0, target.height() as i64) as u32;

    for y in y0..y1 {
        for x in x0..x1 {
            let src_pt = inverse * Point::new(x as f64 + 0.5, y as f64 + 0.5);
            if src_pt.x < 0.0 || src_pt.x >= src_w || src_pt.y < 0.0 || src_pt.y >= src_h {
                continue;
            }
            let mut pixel = sample_bilinear(src, src_pt.x, src_pt.y);
            pixel = apply_filters(pixel, feature.brightness, feature.contrast);
            pixel[3] = (pixel[3] as f64 * feature.opacity.clamp(0.0, 1.0)).round() as u8;
            blend_pixel(target, x, y, pixel);
        }
    }
}

/// Bilinear sample at a continuous source position (pixel centers at
/// half-integer coordinates). Edge texels clamp.
fn sample_bilinear(src: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let max_x = src.width() as i64 - 1;
    let max_y = src.height() as i64 - 1;
    let fx = x - 0.5;
    let fy = y - 0.5;
    let ix = fx.floor() as i64;
    let iy = fy.floor() as i64;
    let tx = fx - ix as f64;
    let ty = fy - iy as f64;

    let texel = |px: i64, py: i64| -> [f64; 4] {
        let px = px.clamp(0, max_x) as u32;
        let py = py.clamp(0, max_y) as u32;
        let p = src.get_pixel(px, py);
        [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
    };

    let tl = texel(ix, iy);
    let tr = texel(ix + 1, iy);
    let bl = texel(ix, iy + 1);
    let br = texel(ix + 1, iy + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = tl[c] * (1.0 - tx) + tr[c] * tx;
        let bottom = bl[c] * (1.0 - tx) + br[c] * tx;
        out[c] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

/// CSS filter chain: brightness multiplies, then contrast pivots about
/// mid-gray. Percentages, 100 = unmodified.
pub(crate) fn apply_filters(pixel: Rgba<u8>, brightness: f64, contrast: f64) -> Rgba<u8> {
    let b = brightness / 100.0;
    let c = contrast / 100.0;
    let mut out = pixel;
    for channel in 0..3 {
        let v = pixel[channel] as f64 * b;
        let v = (v - 127.5) * c + 127.5;
        out[channel] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Source-over blend of one pixel into the target.
fn blend_pixel(target: &mut RgbaImage, x: u32, y: u32, src: Rgba<u8>) {
    if x >= target.width() || y >= target.height() || src[3] == 0 {
        return;
    }
    let dst = target.get_pixel_mut(x, y);
    let sa = src[3] as f64 / 255.0;
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let sc = src[c] as f64 * sa;
        let dc = dst[c] as f64 * da * (1.0 - sa);
        dst[c] = ((sc + dc) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

fn set_pixel(target: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < target.width() && (y as u32) < target.height() {
        target.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_grid(target: &mut RgbaImage, transform: Affine, grid_size: f64) {
    let mut x = 0.0;
    while x <= CANVAS_WIDTH {
        let top = transform * Point::new(x, 0.0);
        let bottom = transform * Point::new(x, CANVAS_HEIGHT);
        let dx = top.x.round() as i64;
        for dy in (top.y.round() as i64)..=(bottom.y.round() as i64) {
            set_pixel(target, dx, dy, color::GRID);
        }
        x += grid_size;
    }
    let mut y = 0.0;
    while y <= CANVAS_HEIGHT {
        let left = transform * Point::new(0.0, y);
        let right = transform * Point::new(CANVAS_WIDTH, y);
        let dy = left.y.round() as i64;
        for dx in (left.x.round() as i64)..=(right.x.round() as i64) {
            set_pixel(target, dx, dy, color::GRID);
        }
        y += grid_size;
    }
}

fn draw_dashed_rect(target: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let x0 = rect.x0.round() as i64;
    let y0 = rect.y0.round() as i64;
    let x1 = rect.x1.round() as i64;
    let y1 = rect.y1.round() as i64;
    for x in x0..=x1 {
        if (x - x0) % DASH_PERIOD < DASH_ON {
            set_pixel(target, x, y0, color);
            set_pixel(target, x, y1, color);
        }
    }
    for y in y0..=y1 {
        if (y - y0) % DASH_PERIOD < DASH_ON {
            set_pixel(target, x0, y, color);
            set_pixel(target, x1, y, color);
        }
    }
}

fn fill_rect(target: &mut RgbaImage, cx: i64, cy: i64, half: i64, color: Rgba<u8>) {
    for y in (cy - half)..=(cy + half) {
        for x in (cx - half)..=(cx + half) {
            set_pixel(target, x, y, color);
        }
    }
}

/// Dashed outline, corner and edge handles, and a lock badge for locked
/// features. Drawn over the unrotated bounding box, matching hit-testing.
fn draw_selection(target: &mut RgbaImage, feature: &PlacedFeature, view: Affine, accent: Rgba<u8>) {
    let rect = view.transform_rect_bbox(feature.bounds());
    draw_dashed_rect(target, rect, accent);

    let x0 = rect.x0.round() as i64;
    let y0 = rect.y0.round() as i64;
    let x1 = rect.x1.round() as i64;
    let y1 = rect.y1.round() as i64;
    let xm = (x0 + x1) / 2;
    let ym = (y0 + y1) / 2;
    let half = HANDLE_SIZE / 2;
    for (hx, hy) in [
        (x0, y0),
        (xm, y0),
        (x1, y0),
        (x0, ym),
        (x1, ym),
        (x0, y1),
        (xm, y1),
        (x1, y1),
    ] {
        fill_rect(target, hx, hy, half, accent);
    }

    if feature.locked {
        fill_rect(target, x0 + half * 3, y0 + half * 3, half, color::LOCK_BADGE);
    }
}
