//! Project document: the JSON save format for a sketch session.

use crate::case::CaseInfo;
use crate::feature::PlacedFeature;
use crate::scene::Scene;
use crate::view::CanvasSettings;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Save-format version written into new documents.
pub const PROJECT_VERSION: &str = "2.0";

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Bookkeeping block embedded in every project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub version: String,
    /// Creation time, epoch milliseconds.
    pub created: u64,
    /// Last save time, epoch milliseconds.
    pub last_modified: u64,
    pub feature_count: usize,
}

/// A complete, self-contained sketch project.
///
/// This is the long-lived interchange format: everything needed to rebuild
/// the scene, plus case bookkeeping. Transient editor state (selection,
/// zoom, history) is deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub case_info: CaseInfo,
    pub features: Vec<PlacedFeature>,
    pub canvas_settings: CanvasSettings,
    pub metadata: ProjectMetadata,
}

impl ProjectDocument {
    /// Snapshot the given scene into a new document.
    pub fn from_scene(scene: &Scene) -> Self {
        let now = now_ms();
        Self {
            case_info: scene.case_info.clone(),
            features: scene.features().to_vec(),
            canvas_settings: scene.settings.clone(),
            metadata: ProjectMetadata {
                version: PROJECT_VERSION.to_string(),
                created: now,
                last_modified: now,
                feature_count: scene.len(),
            },
        }
    }

    /// Rebuild a scene from this document. Selection and view state start
    /// fresh.
    pub fn into_scene(self) -> Scene {
        let mut scene = Scene::from_parts(self.features, self.canvas_settings, self.case_info);
        scene.clear_selection();
        scene
    }

    /// Refresh the save timestamp and feature count before writing.
    pub fn touch(&mut self) {
        self.metadata.last_modified = now_ms();
        self.metadata.feature_count = self.features.len();
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// A download-friendly file name derived from the case number.
    pub fn suggested_file_name(&self) -> String {
        let case = if self.case_info.case_number.is_empty() {
            "untitled".to_string()
        } else {
            self.case_info
                .case_number
                .chars()
                .map(|c| {
                    if c.is_alphanumeric() || c == '-' || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect()
        };
        format!("forensic-project-{}-{}.json", case, self.metadata.last_modified)
    }
}

/// Companion document written next to an exported image: the case record
/// and the exact composition it was rendered from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDocument {
    pub case_info: CaseInfo,
    pub features: Vec<PlacedFeature>,
    pub canvas_settings: CanvasSettings,
    /// Export time, epoch milliseconds.
    pub export_date: u64,
    pub version: String,
}

impl MetadataDocument {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            case_info: scene.case_info.clone(),
            features: scene.features().to_vec(),
            canvas_settings: scene.settings.clone(),
            export_date: now_ms(),
            version: PROJECT_VERSION.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::FeatureCategory;
    use crate::feature::FeatureUpdate;
    use crate::test_util::test_asset;
    use kurbo::Point;

    fn populated_scene() -> Scene {
        let mut scene = Scene::new();
        let categories = [
            FeatureCategory::FaceShape,
            FeatureCategory::Eyes,
            FeatureCategory::Eyebrows,
            FeatureCategory::Nose,
            FeatureCategory::Lips,
        ];
        for (i, category) in categories.into_iter().enumerate() {
            let id = scene.add_feature(
                test_asset(category),
                Some(Point::new(100.0 + i as f64 * 40.0, 200.0)),
            );
            scene.update_features(
                &[id],
                &FeatureUpdate::rotation(i as f64 * 15.0 - 30.0),
            );
            scene.update_features(&[id], &FeatureUpdate::brightness(90.0 + i as f64 * 5.0));
            if i % 2 == 0 {
                scene.flip_features(&[id], true);
            }
        }
        scene.case_info.case_number = "C-2031".to_string();
        scene.case_info.officer = "R. Vance".to_string();
        scene
    }

    #[test]
    fn test_round_trip_preserves_scene() {
        let scene = populated_scene();
        let doc = ProjectDocument::from_scene(&scene);
        let json = doc.to_json().unwrap();
        let restored = ProjectDocument::from_json(&json).unwrap().into_scene();

        assert_eq!(restored.features(), scene.features());
        assert_eq!(restored.case_info, scene.case_info);
        assert!(restored.selection().is_empty());
    }

    #[test]
    fn test_wire_format_keys() {
        let doc = ProjectDocument::from_scene(&populated_scene());
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"caseInfo\""));
        assert!(json.contains("\"canvasSettings\""));
        assert!(json.contains("\"featureCount\": 5"));
        assert!(json.contains("\"zIndex\""));
        assert!(json.contains("\"flipH\""));
        assert!(json.contains("\"imagePath\""));
        assert!(json.contains("\"version\": \"2.0\""));
    }

    #[test]
    fn test_touch_updates_count() {
        let scene = populated_scene();
        let mut doc = ProjectDocument::from_scene(&scene);
        doc.features.pop();
        doc.touch();
        assert_eq!(doc.metadata.feature_count, 4);
        assert!(doc.metadata.last_modified >= doc.metadata.created);
    }

    #[test]
    fn test_suggested_file_name() {
        let mut doc = ProjectDocument::from_scene(&populated_scene());
        doc.metadata.last_modified = 1700000000000;
        assert_eq!(
            doc.suggested_file_name(),
            "forensic-project-C-2031-1700000000000.json"
        );

        doc.case_info.case_number = String::new();
        assert!(doc
            .suggested_file_name()
            .starts_with("forensic-project-untitled-"));

        doc.case_info.case_number = "A/B 7".to_string();
        assert!(doc
            .suggested_file_name()
            .starts_with("forensic-project-A_B_7-"));
    }

    #[test]
    fn test_metadata_document() {
        let scene = populated_scene();
        let meta = MetadataDocument::from_scene(&scene);
        let json = meta.to_json().unwrap();
        assert!(json.contains("\"exportDate\""));
        assert!(json.contains("\"canvasSettings\""));
        assert!(json.contains("\"caseNumber\": \"C-2031\""));
        assert_eq!(meta.features.len(), 5);
    }
}
