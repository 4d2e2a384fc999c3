//! Feature-image catalogs: where the library panel gets its assets.

use crate::asset::{AssetDescriptor, FeatureCategory};
use crate::storage::BoxFuture;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("IO error: {0}")]
    Io(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Source of feature assets for the library panel.
pub trait AssetCatalog: Send + Sync {
    /// All assets in one category, in display order.
    fn list(&self, category: FeatureCategory) -> BoxFuture<'_, CatalogResult<Vec<AssetDescriptor>>>;

    /// All assets across every category.
    fn all(&self) -> BoxFuture<'_, CatalogResult<Vec<AssetDescriptor>>>;

    /// Assets matching a free-text search over name, tags, and description.
    fn search(&self, query: &str) -> BoxFuture<'_, CatalogResult<Vec<AssetDescriptor>>>;
}

/// The built-in asset set: a fixed number of numbered images per category,
/// shipped with the application.
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog;

impl StaticCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Number of bundled images for a category.
    pub fn count(category: FeatureCategory) -> u32 {
        match category {
            FeatureCategory::FaceShape => 10,
            FeatureCategory::Accessory => 6,
            FeatureCategory::Other => 0,
            _ => 12,
        }
    }

    fn descriptor(category: FeatureCategory, n: u32) -> AssetDescriptor {
        AssetDescriptor {
            id: format!("{}-{:02}", category.key(), n),
            name: format!("{} {:02}", category.display_name(), n),
            category,
            image_path: format!("assets/{}/{:02}.png", category.folder(), n),
            tags: category.base_tags().iter().map(|t| t.to_string()).collect(),
            description: None,
        }
    }

    fn category_assets(category: FeatureCategory) -> Vec<AssetDescriptor> {
        (1..=Self::count(category))
            .map(|n| Self::descriptor(category, n))
            .collect()
    }

    fn all_assets() -> Vec<AssetDescriptor> {
        FeatureCategory::ALL
            .into_iter()
            .flat_map(Self::category_assets)
            .collect()
    }
}

impl AssetCatalog for StaticCatalog {
    fn list(&self, category: FeatureCategory) -> BoxFuture<'_, CatalogResult<Vec<AssetDescriptor>>> {
        Box::pin(async move { Ok(Self::category_assets(category)) })
    }

    fn all(&self) -> BoxFuture<'_, CatalogResult<Vec<AssetDescriptor>>> {
        Box::pin(async move { Ok(Self::all_assets()) })
    }

    fn search(&self, query: &str) -> BoxFuture<'_, CatalogResult<Vec<AssetDescriptor>>> {
        let query = query.to_string();
        Box::pin(async move {
            Ok(Self::all_assets()
                .into_iter()
                .filter(|a| a.matches_search(&query))
                .collect())
        })
    }
}

/// Catalog backed by a directory tree: one sub-folder per category holding
/// PNG images. Lets investigators drop in department-specific asset packs.
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn scan(&self, category: FeatureCategory) -> CatalogResult<Vec<AssetDescriptor>> {
        let dir = self.root.join(category.folder());
        if !dir.exists() {
            return Ok(vec![]);
        }

        let entries = fs::read_dir(&dir)
            .map_err(|e| CatalogError::Io(format!("Failed to read {}: {}", dir.display(), e)))?;

        let mut assets = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "png").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    assets.push(AssetDescriptor {
                        id: format!("{}-{}", category.key(), stem),
                        name: stem.to_string(),
                        category,
                        image_path: path.to_string_lossy().into_owned(),
                        tags: category.base_tags().iter().map(|t| t.to_string()).collect(),
                        description: None,
                    });
                }
            }
        }
        assets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(assets)
    }

    fn scan_all(&self) -> CatalogResult<Vec<AssetDescriptor>> {
        let mut assets = Vec::new();
        for category in FeatureCategory::ALL {
            assets.extend(self.scan(category)?);
        }
        Ok(assets)
    }
}

impl AssetCatalog for DirectoryCatalog {
    fn list(&self, category: FeatureCategory) -> BoxFuture<'_, CatalogResult<Vec<AssetDescriptor>>> {
        Box::pin(async move { self.scan(category) })
    }

    fn all(&self) -> BoxFuture<'_, CatalogResult<Vec<AssetDescriptor>>> {
        Box::pin(async move { self.scan_all() })
    }

    fn search(&self, query: &str) -> BoxFuture<'_, CatalogResult<Vec<AssetDescriptor>>> {
        let query = query.to_string();
        Box::pin(async move {
            Ok(self
                .scan_all()?
                .into_iter()
                .filter(|a| a.matches_search(&query))
                .collect())
        })
    }
}
