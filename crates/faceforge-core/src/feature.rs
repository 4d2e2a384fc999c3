//! Placed feature instances and partial updates.

use crate::asset::AssetDescriptor;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a placement (not the asset id: placing the same
/// asset twice yields two independent features).
pub type FeatureId = Uuid;

/// Minimum feature edge length in logical units.
pub const MIN_FEATURE_SIZE: f64 = 20.0;
/// Scale preset bounds.
pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 2.0;
/// Brightness/contrast percentage bounds (100 = unmodified).
pub const MIN_FILTER_PERCENT: f64 = 0.0;
pub const MAX_FILTER_PERCENT: f64 = 200.0;

/// One instance of a library asset placed on the canvas.
///
/// All geometry is in canvas logical units (unzoomed, unpanned). Selection is
/// tracked at the scene level, not on the feature, so serializing a feature
/// list is exactly the persisted project shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedFeature {
    pub id: FeatureId,
    /// The source asset (shared, read-only).
    pub asset: AssetDescriptor,
    /// Top-left corner.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees in [-180, 180], 0 = upright.
    pub rotation: f64,
    /// [0, 1].
    pub opacity: f64,
    /// Paint order, ascending; ties break by insertion order.
    pub z_index: i64,
    /// Locked features reject drag and resize but stay visible.
    pub locked: bool,
    /// Hidden features are excluded from rendering and hit-testing.
    pub visible: bool,
    /// Mirror about the feature's own center, independent of rotation.
    pub flip_h: bool,
    pub flip_v: bool,
    /// Percentages in [0, 200], 100 = unmodified.
    pub brightness: f64,
    pub contrast: f64,
    /// Advisory multiplier over the category base size. The scale presets
    /// write width/height through this; direct width/height edits leave it
    /// untouched, so it reflects the last preset, not necessarily the
    /// current rendered size.
    pub scale: f64,
}

impl PlacedFeature {
    /// Create a feature for `asset` at `position` with the category's
    /// default geometry.
    pub fn new(asset: AssetDescriptor, position: Point, z_index: i64) -> Self {
        let size = asset.category.base_size();
        let scale = asset.category.base_scale();
        Self {
            id: Uuid::new_v4(),
            asset,
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
            rotation: 0.0,
            opacity: 1.0,
            z_index,
            locked: false,
            visible: true,
            flip_h: false,
            flip_v: false,
            brightness: 100.0,
            contrast: 100.0,
            scale,
        }
    }

    /// Top-left position.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Axis-aligned bounding box. Rotation is intentionally not accounted
    /// for: hit-testing and selection use the unrotated box.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Geometric center.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Bounding-box area, used by the overlap auto-pick policy.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check whether a point (in logical units) falls inside this feature's
    /// bounding box. Hidden features never hit.
    pub fn contains(&self, point: Point) -> bool {
        self.visible && self.bounds().contains(point)
    }

    /// Set the display size, clamped to the minimum floor.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width.max(MIN_FEATURE_SIZE);
        self.height = height.max(MIN_FEATURE_SIZE);
    }

    /// Apply a scale preset: clamps the factor and recomputes width/height
    /// from the category base size.
    pub fn set_scale(&mut self, factor: f64) {
        let factor = factor.clamp(MIN_SCALE, MAX_SCALE);
        let base = self.asset.category.base_size();
        self.scale = factor;
        self.set_size(base.width * factor, base.height * factor);
    }

    /// Apply a partial update, clamping every provided field to its bounds.
    pub fn apply(&mut self, update: &FeatureUpdate) {
        if let Some(x) = update.x {
            self.x = x;
        }
        if let Some(y) = update.y {
            self.y = y;
        }
        if update.width.is_some() || update.height.is_some() {
            self.set_size(
                update.width.unwrap_or(self.width),
                update.height.unwrap_or(self.height),
            );
        }
        if let Some(rotation) = update.rotation {
            self.rotation = rotation.clamp(-180.0, 180.0);
        }
        if let Some(opacity) = update.opacity {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(brightness) = update.brightness {
            self.brightness = brightness.clamp(MIN_FILTER_PERCENT, MAX_FILTER_PERCENT);
        }
        if let Some(contrast) = update.contrast {
            self.contrast = contrast.clamp(MIN_FILTER_PERCENT, MAX_FILTER_PERCENT);
        }
        if let Some(flip_h) = update.flip_h {
            self.flip_h = flip_h;
        }
        if let Some(flip_v) = update.flip_v {
            self.flip_v = flip_v;
        }
        if let Some(visible) = update.visible {
            self.visible = visible;
        }
        if let Some(locked) = update.locked {
            self.locked = locked;
        }
    }

    /// Clone this feature as a duplicate: fresh id, offset position.
    pub fn duplicated(&self, offset: kurbo::Vec2, z_index: i64) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.x += offset.x;
        copy.y += offset.y;
        copy.z_index = z_index;
        copy
    }
}

/// A partial field update applied uniformly to a set of features.
///
/// Unset fields are left unchanged; set fields are clamped on apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub brightness: Option<f64>,
    pub contrast: Option<f64>,
    pub flip_h: Option<bool>,
    pub flip_v: Option<bool>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
}

impl FeatureUpdate {
    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }

    pub fn opacity(opacity: f64) -> Self {
        Self {
            opacity: Some(opacity),
            ..Self::default()
        }
    }

    pub fn brightness(percent: f64) -> Self {
        Self {
            brightness: Some(percent),
            ..Self::default()
        }
    }

    pub fn contrast(percent: f64) -> Self {
        Self {
            contrast: Some(percent),
            ..Self::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::FeatureCategory;
    use crate::test_util::test_asset;

    #[test]
    fn test_new_uses_category_defaults() {
        let feature = PlacedFeature::new(
            test_asset(FeatureCategory::FaceShape),
            Point::new(250.0, 300.0),
            0,
        );
        assert_eq!((feature.x, feature.y), (250.0, 300.0));
        assert_eq!((feature.width, feature.height), (400.0, 500.0));
        assert_eq!(feature.scale, 1.0);
        assert_eq!(feature.rotation, 0.0);
        assert_eq!(feature.opacity, 1.0);
        assert!(feature.visible);
        assert!(!feature.locked);
    }

    #[test]
    fn test_resize_floor() {
        let mut feature =
            PlacedFeature::new(test_asset(FeatureCategory::Eyes), Point::ZERO, 0);
        feature.set_size(5.0, -40.0);
        assert_eq!(feature.width, MIN_FEATURE_SIZE);
        assert_eq!(feature.height, MIN_FEATURE_SIZE);
    }

    #[test]
    fn test_scale_clamp_and_recompute() {
        let mut feature =
            PlacedFeature::new(test_asset(FeatureCategory::Nose), Point::ZERO, 0);
        feature.set_scale(3.0);
        assert_eq!(feature.scale, MAX_SCALE);
        assert_eq!(feature.width, 120.0 * MAX_SCALE);
        assert_eq!(feature.height, 150.0 * MAX_SCALE);

        feature.set_scale(0.1);
        assert_eq!(feature.scale, MIN_SCALE);
        assert_eq!(feature.width, 60.0);
        assert_eq!(feature.height, 75.0);
    }

    #[test]
    fn test_update_clamps() {
        let mut feature =
            PlacedFeature::new(test_asset(FeatureCategory::Lips), Point::ZERO, 0);
        feature.apply(&FeatureUpdate {
            rotation: Some(500.0),
            opacity: Some(1.8),
            brightness: Some(-10.0),
            contrast: Some(900.0),
            width: Some(1.0),
            ..FeatureUpdate::default()
        });
        assert_eq!(feature.rotation, 180.0);
        assert_eq!(feature.opacity, 1.0);
        assert_eq!(feature.brightness, 0.0);
        assert_eq!(feature.contrast, 200.0);
        assert_eq!(feature.width, MIN_FEATURE_SIZE);
        // Height was not part of the update.
        assert_eq!(feature.height, 80.0);
    }

    #[test]
    fn test_hidden_features_never_hit() {
        let mut feature =
            PlacedFeature::new(test_asset(FeatureCategory::Eyes), Point::new(10.0, 10.0), 0);
        let inside = Point::new(20.0, 20.0);
        assert!(feature.contains(inside));
        feature.visible = false;
        assert!(!feature.contains(inside));
    }

    #[test]
    fn test_duplicated_gets_fresh_id() {
        let feature =
            PlacedFeature::new(test_asset(FeatureCategory::Hair), Point::new(100.0, 100.0), 2);
        let copy = feature.duplicated(kurbo::Vec2::new(20.0, 20.0), 5);
        assert_ne!(copy.id, feature.id);
        assert_eq!((copy.x, copy.y), (120.0, 120.0));
        assert_eq!(copy.z_index, 5);
        assert_eq!(copy.asset, feature.asset);
    }
}
