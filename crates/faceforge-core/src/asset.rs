//! Feature asset descriptors and category metadata.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Category of a placeable facial feature asset.
///
/// Categories are a closed set: every asset the catalog hands out belongs to
/// one of these, and each carries the default geometry used when the asset is
/// placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureCategory {
    FaceShape,
    Eyes,
    Eyebrows,
    Nose,
    Lips,
    Hair,
    FacialHair,
    Accessory,
    /// Fallback for assets whose category is not recognized.
    Other,
}

impl FeatureCategory {
    /// All real catalog categories, in library display order.
    pub const ALL: [FeatureCategory; 8] = [
        FeatureCategory::FaceShape,
        FeatureCategory::Eyes,
        FeatureCategory::Eyebrows,
        FeatureCategory::Nose,
        FeatureCategory::Lips,
        FeatureCategory::Hair,
        FeatureCategory::FacialHair,
        FeatureCategory::Accessory,
    ];

    /// Default placement size in canvas logical units.
    pub fn base_size(self) -> Size {
        match self {
            FeatureCategory::FaceShape => Size::new(400.0, 500.0),
            FeatureCategory::Eyes => Size::new(80.0, 60.0),
            FeatureCategory::Eyebrows => Size::new(90.0, 40.0),
            FeatureCategory::Nose => Size::new(120.0, 150.0),
            FeatureCategory::Lips => Size::new(100.0, 80.0),
            FeatureCategory::Hair => Size::new(450.0, 550.0),
            FeatureCategory::FacialHair => Size::new(140.0, 120.0),
            FeatureCategory::Accessory => Size::new(200.0, 200.0),
            FeatureCategory::Other => Size::new(100.0, 100.0),
        }
    }

    /// Default scale preset applied when an asset of this category is placed.
    pub fn base_scale(self) -> f64 {
        match self {
            FeatureCategory::FaceShape => 1.0,
            FeatureCategory::Eyes => 0.8,
            FeatureCategory::Eyebrows => 0.85,
            FeatureCategory::Nose => 0.9,
            FeatureCategory::Lips => 0.75,
            FeatureCategory::Hair => 1.1,
            FeatureCategory::FacialHair => 0.8,
            FeatureCategory::Accessory => 0.9,
            FeatureCategory::Other => 1.0,
        }
    }

    /// Asset library folder name for this category.
    pub fn folder(self) -> &'static str {
        match self {
            FeatureCategory::FaceShape => "head",
            FeatureCategory::Eyes => "eyes",
            FeatureCategory::Eyebrows => "eyebrows",
            FeatureCategory::Nose => "nose",
            FeatureCategory::Lips => "lips",
            FeatureCategory::Hair => "hair",
            FeatureCategory::FacialHair => "mustach",
            FeatureCategory::Accessory => "more",
            FeatureCategory::Other => "other",
        }
    }

    /// Stable key used in asset ids and serialized documents.
    pub fn key(self) -> &'static str {
        match self {
            FeatureCategory::FaceShape => "face-shape",
            FeatureCategory::Eyes => "eyes",
            FeatureCategory::Eyebrows => "eyebrows",
            FeatureCategory::Nose => "nose",
            FeatureCategory::Lips => "lips",
            FeatureCategory::Hair => "hair",
            FeatureCategory::FacialHair => "facial-hair",
            FeatureCategory::Accessory => "accessory",
            FeatureCategory::Other => "other",
        }
    }

    /// Human-readable library name.
    pub fn display_name(self) -> &'static str {
        match self {
            FeatureCategory::FaceShape => "Face Shapes",
            FeatureCategory::Eyes => "Eyes",
            FeatureCategory::Eyebrows => "Eyebrows",
            FeatureCategory::Nose => "Nose",
            FeatureCategory::Lips => "Lips",
            FeatureCategory::Hair => "Hair",
            FeatureCategory::FacialHair => "Facial Hair",
            FeatureCategory::Accessory => "Accessories",
            FeatureCategory::Other => "Other",
        }
    }

    /// Base search tags for assets of this category.
    pub fn base_tags(self) -> &'static [&'static str] {
        match self {
            FeatureCategory::FaceShape => &["face", "shape", "structure"],
            FeatureCategory::Eyes => &["eyes", "vision", "facial"],
            FeatureCategory::Eyebrows => &["eyebrows", "brows", "facial"],
            FeatureCategory::Nose => &["nose", "nasal", "facial"],
            FeatureCategory::Lips => &["lips", "mouth", "facial"],
            FeatureCategory::Hair => &["hair", "hairstyle", "head"],
            FeatureCategory::FacialHair => &["beard", "mustache", "facial"],
            FeatureCategory::Accessory => &["accessory", "wear", "item"],
            FeatureCategory::Other => &[],
        }
    }
}

/// A named, categorized source image available for placement.
///
/// Descriptors are supplied by an [`AssetCatalog`](crate::catalog::AssetCatalog)
/// and never mutated by the editing core. This struct is also the wire format
/// of drag-and-drop payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDescriptor {
    /// Stable identity for the session.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Library category.
    pub category: FeatureCategory,
    /// Path resolving to a loadable image.
    pub image_path: String,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AssetDescriptor {
    /// Check whether this asset matches a library search term.
    ///
    /// Matches against name, tags, and description, case-insensitively.
    /// An empty term matches everything.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&term))
            || self
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
    }
}
