//! The authoritative scene: placed features, selection, view, settings.

use crate::asset::AssetDescriptor;
use crate::case::CaseInfo;
use crate::feature::{FeatureId, FeatureUpdate, PlacedFeature};
use crate::view::{CanvasSettings, ViewState};
use kurbo::{Point, Vec2};

/// Default placement point for assets added without an explicit position.
pub const DEFAULT_PLACEMENT: Point = Point::new(250.0, 300.0);

/// Position offset applied to duplicated features.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// The complete editable state of one sketch session.
///
/// The feature list is the authoritative scene graph; selection is a set of
/// feature ids kept strictly as a subset of the list. All mutation goes
/// through the methods here so invariants (size floor, clamp ranges,
/// selection consistency) hold by construction. The scene performs no I/O
/// and no rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    features: Vec<PlacedFeature>,
    selection: Vec<FeatureId>,
    pub view: ViewState,
    pub settings: CanvasSettings,
    pub case_info: CaseInfo,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with default view and settings.
    pub fn new() -> Self {
        Self {
            features: Vec::new(),
            selection: Vec::new(),
            view: ViewState::default(),
            settings: CanvasSettings::default(),
            case_info: CaseInfo::default(),
        }
    }

    /// Rebuild a scene from persisted parts (project reload).
    pub fn from_parts(
        features: Vec<PlacedFeature>,
        settings: CanvasSettings,
        case_info: CaseInfo,
    ) -> Self {
        Self {
            features,
            selection: Vec::new(),
            view: ViewState::default(),
            settings,
            case_info,
        }
    }

    // --- read access -----------------------------------------------------

    pub fn features(&self) -> &[PlacedFeature] {
        &self.features
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn feature(&self, id: FeatureId) -> Option<&PlacedFeature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn feature_mut(&mut self, id: FeatureId) -> Option<&mut PlacedFeature> {
        self.features.iter_mut().find(|f| f.id == id)
    }

    /// Features in paint order: ascending `z_index`, ties broken by
    /// insertion order (stable sort).
    pub fn features_ordered(&self) -> Vec<&PlacedFeature> {
        let mut ordered: Vec<&PlacedFeature> = self.features.iter().collect();
        ordered.sort_by_key(|f| f.z_index);
        ordered
    }

    /// All visible features containing `point`, in list (insertion) order.
    pub fn features_at(&self, point: Point) -> Vec<&PlacedFeature> {
        self.features.iter().filter(|f| f.contains(point)).collect()
    }

    // --- selection -------------------------------------------------------

    pub fn selection(&self) -> &[FeatureId] {
        &self.selection
    }

    pub fn is_selected(&self, id: FeatureId) -> bool {
        self.selection.contains(&id)
    }

    /// Select exactly one feature, replacing the current selection.
    pub fn select(&mut self, id: FeatureId) {
        if self.feature(id).is_some() {
            self.selection = vec![id];
        }
    }

    /// Toggle a feature's membership in the selection (shift-click).
    pub fn toggle_select(&mut self, id: FeatureId) {
        if let Some(pos) = self.selection.iter().position(|&s| s == id) {
            self.selection.remove(pos);
        } else if self.feature(id).is_some() {
            self.selection.push(id);
        }
    }

    pub fn select_all(&mut self) {
        self.selection = self.features.iter().map(|f| f.id).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn set_selection(&mut self, ids: Vec<FeatureId>) {
        self.selection = ids
            .into_iter()
            .filter(|&id| self.feature(id).is_some())
            .collect();
    }

    /// Drop selection entries whose feature no longer exists. Called after
    /// any operation that replaces the feature list wholesale (undo/redo,
    /// project load).
    pub fn prune_selection(&mut self) {
        let ids: Vec<FeatureId> = self.features.iter().map(|f| f.id).collect();
        self.selection.retain(|id| ids.contains(id));
    }

    // --- mutation --------------------------------------------------------

    /// Place an asset on the canvas. Without an explicit position the
    /// feature lands at the default placement point; either way the position
    /// is grid-snapped when snapping is on. The new feature paints on top
    /// (z = current count) and becomes the sole selection.
    pub fn add_feature(&mut self, asset: AssetDescriptor, position: Option<Point>) -> FeatureId {
        let position = self.view.maybe_snap(position.unwrap_or(DEFAULT_PLACEMENT));
        let feature = PlacedFeature::new(asset, position, self.features.len() as i64);
        let id = feature.id;
        self.features.push(feature);
        self.selection = vec![id];
        id
    }

    /// Apply the same partial update to every feature in `ids`.
    pub fn update_features(&mut self, ids: &[FeatureId], update: &FeatureUpdate) {
        for feature in self.features.iter_mut().filter(|f| ids.contains(&f.id)) {
            feature.apply(update);
        }
    }

    /// Apply a partial update to the current selection.
    pub fn update_selected(&mut self, update: &FeatureUpdate) {
        let ids = self.selection.clone();
        self.update_features(&ids, update);
    }

    /// Resize features, clamped to the minimum size floor.
    pub fn resize(&mut self, ids: &[FeatureId], width: f64, height: f64) {
        for feature in self.features.iter_mut().filter(|f| ids.contains(&f.id)) {
            feature.set_size(width, height);
        }
    }

    /// Apply a scale preset to features: clamps the factor and recomputes
    /// each feature's size from its own category base.
    pub fn set_feature_scale(&mut self, ids: &[FeatureId], factor: f64) {
        for feature in self.features.iter_mut().filter(|f| ids.contains(&f.id)) {
            feature.set_scale(factor);
        }
    }

    /// Toggle horizontal or vertical mirroring per feature.
    pub fn flip_features(&mut self, ids: &[FeatureId], horizontal: bool) {
        for feature in self.features.iter_mut().filter(|f| ids.contains(&f.id)) {
            if horizontal {
                feature.flip_h = !feature.flip_h;
            } else {
                feature.flip_v = !feature.flip_v;
            }
        }
    }

    /// Duplicate features: each clone gets a fresh id, a (+20,+20) offset,
    /// and is appended after the existing features. The duplicates become
    /// the new selection.
    pub fn duplicate(&mut self, ids: &[FeatureId]) -> Vec<FeatureId> {
        let mut clones = Vec::new();
        let mut next_z = self.features.len() as i64;
        for index in 0..self.features.len() {
            if ids.contains(&self.features[index].id) {
                let clone = self.features[index].duplicated(DUPLICATE_OFFSET, next_z);
                next_z += 1;
                clones.push(clone);
            }
        }
        let clone_ids: Vec<FeatureId> = clones.iter().map(|f| f.id).collect();
        self.features.extend(clones);
        if !clone_ids.is_empty() {
            self.selection = clone_ids.clone();
        }
        clone_ids
    }

    /// Delete features and drop them from the selection.
    pub fn remove(&mut self, ids: &[FeatureId]) {
        self.features.retain(|f| !ids.contains(&f.id));
        self.selection.retain(|id| !ids.contains(id));
    }

    /// Remove every feature and clear the selection.
    pub fn clear(&mut self) {
        self.features.clear();
        self.selection.clear();
    }

    /// Paint the given features above everything else: all of them get
    /// (max existing z + 1), relative order among them preserved by the
    /// stable paint sort.
    pub fn bring_to_front(&mut self, ids: &[FeatureId]) {
        let Some(max_z) = self.features.iter().map(|f| f.z_index).max() else {
            return;
        };
        for feature in self.features.iter_mut().filter(|f| ids.contains(&f.id)) {
            feature.z_index = max_z + 1;
        }
    }

    /// Paint the given features below everything else (min existing z − 1).
    pub fn send_to_back(&mut self, ids: &[FeatureId]) {
        let Some(min_z) = self.features.iter().map(|f| f.z_index).min() else {
            return;
        };
        for feature in self.features.iter_mut().filter(|f| ids.contains(&f.id)) {
            feature.z_index = min_z - 1;
        }
    }

    /// Flip the visibility flag on exactly one feature.
    pub fn toggle_visible(&mut self, id: FeatureId) {
        if let Some(feature) = self.feature_mut(id) {
            feature.visible = !feature.visible;
        }
    }

    /// Flip the lock flag on exactly one feature.
    pub fn toggle_locked(&mut self, id: FeatureId) {
        if let Some(feature) = self.feature_mut(id) {
            feature.locked = !feature.locked;
        }
    }

    /// Replace the whole feature list (history restore, project load) and
    /// prune the selection to surviving ids.
    pub fn restore_features(&mut self, features: Vec<PlacedFeature>) {
        self.features = features;
        self.prune_selection();
    }
}
