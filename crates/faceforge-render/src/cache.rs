//! Decoded feature-image cache.

use image::RgbaImage;
use log::warn;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
enum CacheEntry {
    Loaded(Arc<RgbaImage>),
    /// Decode failed; remembered so the path is not retried every frame.
    Failed,
}

/// Cache of decoded feature images, keyed by asset image path.
///
/// A path that fails to load is recorded as failed and skipped from then
/// on; renderers treat a missing image as an empty feature rather than an
/// error, so one bad asset never poisons a composition.
#[derive(Default)]
pub struct ImageCache {
    entries: HashMap<String, CacheEntry>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a decoded image, loading it from disk on first use.
    pub fn get_or_load(&mut self, path: &str) -> Option<Arc<RgbaImage>> {
        if let Some(entry) = self.entries.get(path) {
            return match entry {
                CacheEntry::Loaded(img) => Some(Arc::clone(img)),
                CacheEntry::Failed => None,
            };
        }

        match image::open(path) {
            Ok(img) => {
                let img = Arc::new(img.to_rgba8());
                self.entries
                    .insert(path.to_string(), CacheEntry::Loaded(Arc::clone(&img)));
                Some(img)
            }
            Err(err) => {
                warn!("failed to load feature image {}: {}", path, err);
                self.entries.insert(path.to_string(), CacheEntry::Failed);
                None
            }
        }
    }

    /// Pre-load a set of paths (export does this up front so the render
    /// pass itself never touches the filesystem).
    pub fn load_all<'a>(&mut self, paths: impl IntoIterator<Item = &'a str>) {
        for path in paths {
            self.get_or_load(path);
        }
    }

    /// Insert an already-decoded image, bypassing the filesystem.
    pub fn insert(&mut self, path: &str, image: RgbaImage) {
        self.entries
            .insert(path.to_string(), CacheEntry::Loaded(Arc::new(image)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_insert_and_get() {
        let mut cache = ImageCache::new();
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        cache.insert("mem://test", img);

        let got = cache.get_or_load("mem://test").unwrap();
        assert_eq!(got.dimensions(), (4, 4));
        assert_eq!(got.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_missing_file_is_remembered_as_failed() {
        let mut cache = ImageCache::new();
        assert!(cache.get_or_load("/definitely/not/here.png").is_none());
        assert_eq!(cache.len(), 1);
        assert!(cache.get_or_load("/definitely/not/here.png").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_loads_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dot.png");
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        img.save(&path).unwrap();

        let mut cache = ImageCache::new();
        let loaded = cache.get_or_load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.dimensions(), (2, 2));
    }
}
