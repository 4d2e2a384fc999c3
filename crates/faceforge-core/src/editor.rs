//! Editing session: pointer handling, hit-testing, commands, history wiring.

use crate::asset::AssetDescriptor;
use crate::feature::{FeatureId, FeatureUpdate, PlacedFeature, MAX_SCALE, MIN_SCALE};
use crate::history::History;
use crate::scene::Scene;
use kurbo::{Point, Vec2};
use log::{debug, warn};
use std::collections::HashMap;

/// Scale step applied by the `+`/`-` shortcuts.
pub const SCALE_STEP: f64 = 0.1;

/// How the current selection was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// Direct click or explicit API call.
    Explicit,
    /// Resolved from an ambiguous (overlapping) click by the smallest-area
    /// policy.
    Auto,
}

/// High-level editing commands, typically bound to keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    DeleteSelection,
    ClearSelection,
    BringToFront,
    SendToBack,
    ScaleUp,
    ScaleDown,
    FlipHorizontal,
    FlipVertical,
    Undo,
    Redo,
    Duplicate,
    SelectAll,
}

/// Keyboard modifier state. `primary` is Ctrl (or Cmd on macOS).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub primary: bool,
    pub shift: bool,
}

/// Map a key name to an editing command.
///
/// The caller is responsible for suppressing shortcuts while a text input
/// has focus.
pub fn command_for_key(key: &str, mods: Modifiers) -> Option<Command> {
    // Shifted letter keys arrive uppercased; match case-insensitively.
    let key = key.to_ascii_lowercase();
    if mods.primary {
        return match key.as_str() {
            "z" if mods.shift => Some(Command::Redo),
            "z" => Some(Command::Undo),
            "d" => Some(Command::Duplicate),
            "a" => Some(Command::SelectAll),
            _ => None,
        };
    }
    match key.as_str() {
        "delete" | "backspace" => Some(Command::DeleteSelection),
        "escape" => Some(Command::ClearSelection),
        "[" => Some(Command::BringToFront),
        "]" => Some(Command::SendToBack),
        "+" | "=" => Some(Command::ScaleUp),
        "-" => Some(Command::ScaleDown),
        "h" => Some(Command::FlipHorizontal),
        "v" => Some(Command::FlipVertical),
        _ => None,
    }
}

/// In-flight drag: per-feature grab offsets so every selected feature keeps
/// its grab point under the pointer.
#[derive(Debug, Clone)]
struct DragState {
    offsets: HashMap<FeatureId, Vec2>,
    moved: bool,
}

/// One editing session: the scene, its history, and transient interaction
/// state.
///
/// All mutation runs synchronously inside the event that triggered it and
/// commits exactly one history snapshot, except continuous drag motion,
/// which commits once at drag end.
#[derive(Debug)]
pub struct EditorSession {
    pub scene: Scene,
    history: History,
    drag: Option<DragState>,
    auto_selected: Option<FeatureId>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Start a session with an empty scene.
    pub fn new() -> Self {
        Self::with_scene(Scene::new())
    }

    /// Start a session over an existing scene (project reload). The history
    /// baseline is the loaded state rather than an empty scene.
    pub fn with_scene(scene: Scene) -> Self {
        let mut history = History::new();
        history.reset_to(scene.features());
        Self {
            scene,
            history,
            drag: None,
            auto_selected: None,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The feature picked by the last ambiguous-click auto-resolution, if
    /// the marker has not been cleared yet.
    pub fn auto_selected(&self) -> Option<FeatureId> {
        self.auto_selected
    }

    /// Clear the transient auto-selection indicator (the shell calls this
    /// a couple of seconds after the pick).
    pub fn clear_auto_selected(&mut self) {
        self.auto_selected = None;
    }

    pub fn selection_source(&self) -> SelectionSource {
        if self.auto_selected.is_some() {
            SelectionSource::Auto
        } else {
            SelectionSource::Explicit
        }
    }

    /// Record the current scene as a history snapshot. Shells that mutate
    /// `scene` directly call this once per completed edit; the session
    /// methods below do it themselves.
    pub fn commit(&mut self) {
        self.history.push(self.scene.features());
    }

    // --- asset placement -------------------------------------------------

    /// Place an asset at the default canvas position (library click).
    pub fn add_asset(&mut self, asset: AssetDescriptor) -> FeatureId {
        let id = self.scene.add_feature(asset, None);
        self.auto_selected = None;
        self.commit();
        id
    }

    /// Handle an external drop: parse the JSON payload as an asset
    /// descriptor and place it at the drop point. A malformed payload is
    /// logged and ignored.
    pub fn drop_asset(&mut self, payload: &str, screen: Point) -> Option<FeatureId> {
        let asset: AssetDescriptor = match serde_json::from_str(payload) {
            Ok(asset) => asset,
            Err(err) => {
                warn!("ignoring malformed drop payload: {err}");
                return None;
            }
        };
        let position = self.scene.view.screen_to_scene(screen);
        let id = self.scene.add_feature(asset, Some(position));
        self.auto_selected = None;
        self.commit();
        Some(id)
    }

    // --- property edits --------------------------------------------------

    /// Apply a partial update (rotation, opacity, filters, size) to the
    /// selection and commit one snapshot.
    pub fn update_selected(&mut self, update: &FeatureUpdate) {
        if self.scene.selection().is_empty() {
            return;
        }
        self.scene.update_selected(update);
        self.commit();
    }

    /// Resize the selection, clamped to the size floor, and commit.
    pub fn resize_selected(&mut self, width: f64, height: f64) {
        if self.scene.selection().is_empty() {
            return;
        }
        let ids = self.scene.selection().to_vec();
        self.scene.resize(&ids, width, height);
        self.commit();
    }

    /// Apply a scale preset to the selection and commit.
    pub fn set_selected_scale(&mut self, factor: f64) {
        if self.scene.selection().is_empty() {
            return;
        }
        let ids = self.scene.selection().to_vec();
        self.scene.set_feature_scale(&ids, factor);
        self.commit();
    }

    /// Toggle one feature's visibility and commit.
    pub fn toggle_visible(&mut self, id: FeatureId) {
        if self.scene.feature(id).is_none() {
            return;
        }
        self.scene.toggle_visible(id);
        self.commit();
    }

    /// Toggle one feature's lock and commit.
    pub fn toggle_locked(&mut self, id: FeatureId) {
        if self.scene.feature(id).is_none() {
            return;
        }
        self.scene.toggle_locked(id);
        self.commit();
    }

    // --- pointer handling ------------------------------------------------

    /// Pointer press on the canvas.
    ///
    /// Zero hits clears the selection. A single hit selects (or, with
    /// shift, toggles) the feature. Overlapping hits auto-resolve to the
    /// smallest-area candidate, ties to the highest z-index, and set the
    /// auto-selected marker. Any hit also begins drag tracking for the
    /// unlocked part of the selection.
    pub fn pointer_down(&mut self, screen: Point, shift: bool) {
        let point = self.scene.view.screen_to_scene(screen);
        self.auto_selected = None;

        let hit_ids: Vec<FeatureId> = self
            .scene
            .features_at(point)
            .iter()
            .map(|f| f.id)
            .collect();

        match hit_ids.len() {
            0 => {
                self.scene.clear_selection();
                self.drag = None;
            }
            1 => {
                let id = hit_ids[0];
                if shift {
                    self.scene.toggle_select(id);
                } else {
                    self.scene.select(id);
                }
                if self.scene.is_selected(id) {
                    self.begin_drag(point);
                } else {
                    self.drag = None;
                }
            }
            _ => {
                let picked = self.pick_smallest(&hit_ids).map(|f| f.id);
                if let Some(id) = picked {
                    debug!("auto-selected {} from {} candidates", id, hit_ids.len());
                    self.scene.select(id);
                    self.auto_selected = Some(id);
                    self.begin_drag(point);
                }
            }
        }
    }

    /// Pointer motion while a drag is active: reposition every selected,
    /// unlocked feature from the pointer and its grab offset. No history.
    pub fn pointer_move(&mut self, screen: Point) {
        let point = self.scene.view.screen_to_scene(screen);
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let offsets = drag.offsets.clone();
        let mut moved = false;
        for (id, offset) in &offsets {
            let target = self.scene.view.maybe_snap(point - *offset);
            if let Some(feature) = self.scene.feature_mut(*id) {
                if feature.x != target.x || feature.y != target.y {
                    feature.x = target.x;
                    feature.y = target.y;
                    moved = true;
                }
            }
        }
        if moved {
            if let Some(drag) = self.drag.as_mut() {
                drag.moved = true;
            }
        }
    }

    /// Pointer release: end the drag and commit a single history snapshot
    /// if anything actually moved.
    pub fn pointer_up(&mut self) {
        if let Some(drag) = self.drag.take() {
            if drag.moved {
                self.commit();
            }
        }
    }

    /// All visible features under the point, for the overlap picker UI:
    /// smallest area first, then top-most first.
    pub fn overlap_candidates(&self, screen: Point) -> Vec<&PlacedFeature> {
        let point = self.scene.view.screen_to_scene(screen);
        let mut candidates = self.scene.features_at(point);
        candidates.sort_by(|a, b| {
            a.area()
                .partial_cmp(&b.area())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.z_index.cmp(&a.z_index))
        });
        candidates
    }

    fn pick_smallest(&self, ids: &[FeatureId]) -> Option<&PlacedFeature> {
        ids.iter()
            .filter_map(|&id| self.scene.feature(id))
            .min_by(|a, b| {
                a.area()
                    .partial_cmp(&b.area())
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.z_index.cmp(&a.z_index))
            })
    }

    fn begin_drag(&mut self, point: Point) {
        let offsets: HashMap<FeatureId, Vec2> = self
            .scene
            .selection()
            .iter()
            .filter_map(|&id| self.scene.feature(id))
            .filter(|f| !f.locked)
            .map(|f| (f.id, point - f.position()))
            .collect();
        self.drag = Some(DragState {
            offsets,
            moved: false,
        });
    }

    // --- commands --------------------------------------------------------

    /// Execute an editing command. Mutating commands commit exactly one
    /// history snapshot; selection-only commands and bound-hitting
    /// undo/redo commit none.
    pub fn command(&mut self, command: Command) {
        match command {
            Command::DeleteSelection => {
                if self.scene.selection().is_empty() {
                    return;
                }
                let ids = self.scene.selection().to_vec();
                self.scene.remove(&ids);
                self.auto_selected = None;
                self.commit();
            }
            Command::ClearSelection => {
                self.scene.clear_selection();
                self.auto_selected = None;
            }
            Command::BringToFront => {
                if self.scene.selection().is_empty() {
                    return;
                }
                let ids = self.scene.selection().to_vec();
                self.scene.bring_to_front(&ids);
                self.commit();
            }
            Command::SendToBack => {
                if self.scene.selection().is_empty() {
                    return;
                }
                let ids = self.scene.selection().to_vec();
                self.scene.send_to_back(&ids);
                self.commit();
            }
            Command::ScaleUp => self.step_scale(SCALE_STEP),
            Command::ScaleDown => self.step_scale(-SCALE_STEP),
            Command::FlipHorizontal => self.flip_selection(true),
            Command::FlipVertical => self.flip_selection(false),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Duplicate => {
                if self.scene.selection().is_empty() {
                    return;
                }
                let ids = self.scene.selection().to_vec();
                self.scene.duplicate(&ids);
                self.auto_selected = None;
                self.commit();
            }
            Command::SelectAll => {
                self.scene.select_all();
                self.auto_selected = None;
            }
        }
    }

    /// Step the selection's scale preset by `delta`, using the first
    /// selected feature's current preset as the reference.
    fn step_scale(&mut self, delta: f64) {
        let Some(&first) = self.scene.selection().first() else {
            return;
        };
        let Some(reference) = self.scene.feature(first) else {
            return;
        };
        let target = (reference.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
        let ids = self.scene.selection().to_vec();
        self.scene.set_feature_scale(&ids, target);
        self.commit();
    }

    fn flip_selection(&mut self, horizontal: bool) {
        if self.scene.selection().is_empty() {
            return;
        }
        let ids = self.scene.selection().to_vec();
        self.scene.flip_features(&ids, horizontal);
        self.commit();
    }

    /// Restore the previous snapshot, if any. At the history bound this is
    /// a no-op.
    pub fn undo(&mut self) {
        let snapshot = self.history.undo().map(|s| s.to_vec());
        if let Some(features) = snapshot {
            self.scene.restore_features(features);
            self.auto_selected = None;
            self.drag = None;
        }
    }

    /// Restore the next snapshot, if any.
    pub fn redo(&mut self) {
        let snapshot = self.history.redo().map(|s| s.to_vec());
        if let Some(features) = snapshot {
            self.scene.restore_features(features);
            self.auto_selected = None;
            self.drag = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::FeatureCategory;
    use crate::test_util::test_asset;

    fn session_with_face() -> (EditorSession, FeatureId) {
        let mut session = EditorSession::new();
        let id = session.add_asset(test_asset(FeatureCategory::FaceShape));
        (session, id)
    }

    #[test]
    fn test_add_and_move_scenario() {
        let (mut session, id) = session_with_face();
        let feature = session.scene.feature(id).unwrap();
        assert_eq!((feature.x, feature.y), (250.0, 300.0));
        assert_eq!((feature.width, feature.height), (400.0, 500.0));

        session.pointer_down(Point::new(300.0, 350.0), false);
        session.pointer_move(Point::new(330.0, 340.0));
        session.pointer_up();
        let feature = session.scene.feature(id).unwrap();
        assert_eq!((feature.x, feature.y), (280.0, 290.0));

        session.command(Command::Undo);
        let feature = session.scene.feature(id).unwrap();
        assert_eq!((feature.x, feature.y), (250.0, 300.0));
    }

    #[test]
    fn test_drag_commits_one_snapshot() {
        let (mut session, _) = session_with_face();
        let before = session.history().len();
        session.pointer_down(Point::new(300.0, 350.0), false);
        session.pointer_move(Point::new(310.0, 350.0));
        session.pointer_move(Point::new(320.0, 350.0));
        session.pointer_move(Point::new(330.0, 350.0));
        session.pointer_up();
        assert_eq!(session.history().len(), before + 1);
    }

    #[test]
    fn test_click_without_motion_commits_nothing() {
        let (mut session, _) = session_with_face();
        let before = session.history().len();
        session.pointer_down(Point::new(300.0, 350.0), false);
        session.pointer_up();
        assert_eq!(session.history().len(), before);
    }

    #[test]
    fn test_overlap_auto_selects_smallest() {
        let mut session = EditorSession::new();
        let big = session.add_asset(test_asset(FeatureCategory::Accessory));
        let small = session.add_asset(test_asset(FeatureCategory::Accessory));
        // Big: 200x200 at (100,100), z 1. Small: 50x50 at (150,150), z 0.
        {
            let f = session.scene.feature_mut(big).unwrap();
            f.x = 100.0;
            f.y = 100.0;
            f.set_size(200.0, 200.0);
            f.z_index = 1;
        }
        {
            let f = session.scene.feature_mut(small).unwrap();
            f.x = 150.0;
            f.y = 150.0;
            f.set_size(50.0, 50.0);
            f.z_index = 0;
        }

        session.pointer_down(Point::new(160.0, 160.0), false);
        assert_eq!(session.scene.selection(), &[small]);
        assert_eq!(session.auto_selected(), Some(small));
        assert_eq!(session.selection_source(), SelectionSource::Auto);

        session.clear_auto_selected();
        assert_eq!(session.selection_source(), SelectionSource::Explicit);
    }

    #[test]
    fn test_overlap_ties_go_to_highest_z() {
        let mut session = EditorSession::new();
        let lower = session.add_asset(test_asset(FeatureCategory::Eyes));
        let upper = session.add_asset(test_asset(FeatureCategory::Eyes));
        for (id, z) in [(lower, 0), (upper, 1)] {
            let f = session.scene.feature_mut(id).unwrap();
            f.x = 100.0;
            f.y = 100.0;
            f.z_index = z;
        }
        session.pointer_down(Point::new(110.0, 110.0), false);
        assert_eq!(session.scene.selection(), &[upper]);
    }

    #[test]
    fn test_overlap_candidates_order() {
        let mut session = EditorSession::new();
        let big = session.add_asset(test_asset(FeatureCategory::Accessory));
        let small = session.add_asset(test_asset(FeatureCategory::Eyes));
        for id in [big, small] {
            let f = session.scene.feature_mut(id).unwrap();
            f.x = 100.0;
            f.y = 100.0;
        }
        let order: Vec<FeatureId> = session
            .overlap_candidates(Point::new(110.0, 110.0))
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(order, vec![small, big]);
    }

    #[test]
    fn test_locked_feature_rejects_drag() {
        let (mut session, id) = session_with_face();
        session.scene.toggle_locked(id);
        let before = session.history().len();

        session.pointer_down(Point::new(300.0, 350.0), false);
        session.pointer_move(Point::new(400.0, 400.0));
        session.pointer_up();

        let feature = session.scene.feature(id).unwrap();
        assert_eq!((feature.x, feature.y), (250.0, 300.0));
        assert_eq!(session.history().len(), before);
    }

    #[test]
    fn test_click_empty_space_clears_selection() {
        let (mut session, _) = session_with_face();
        assert!(!session.scene.selection().is_empty());
        session.pointer_down(Point::new(5.0, 5.0), false);
        assert!(session.scene.selection().is_empty());
    }

    #[test]
    fn test_shift_click_toggles_membership() {
        let mut session = EditorSession::new();
        let a = session.add_asset(test_asset(FeatureCategory::Eyes));
        let b = session.add_asset(test_asset(FeatureCategory::Nose));
        {
            let f = session.scene.feature_mut(a).unwrap();
            f.x = 0.0;
            f.y = 0.0;
        }
        {
            let f = session.scene.feature_mut(b).unwrap();
            f.x = 500.0;
            f.y = 500.0;
        }

        session.pointer_down(Point::new(10.0, 10.0), false);
        assert_eq!(session.scene.selection(), &[a]);
        session.pointer_down(Point::new(510.0, 510.0), true);
        assert_eq!(session.scene.selection(), &[a, b]);
        session.pointer_down(Point::new(510.0, 510.0), true);
        assert_eq!(session.scene.selection(), &[a]);
    }

    #[test]
    fn test_drag_respects_grid_snap() {
        let (mut session, id) = session_with_face();
        session.scene.view.snap_to_grid = true;
        session.scene.view.grid_size = 20.0;
        session.pointer_down(Point::new(300.0, 350.0), false);
        session.pointer_move(Point::new(333.0, 347.0));
        session.pointer_up();
        let feature = session.scene.feature(id).unwrap();
        assert_eq!(feature.x % 20.0, 0.0);
        assert_eq!(feature.y % 20.0, 0.0);
    }

    #[test]
    fn test_drop_asset_at_position() {
        let mut session = EditorSession::new();
        let payload = serde_json::to_string(&test_asset(FeatureCategory::Hair)).unwrap();
        let id = session.drop_asset(&payload, Point::new(120.0, 140.0)).unwrap();
        let feature = session.scene.feature(id).unwrap();
        assert_eq!((feature.x, feature.y), (120.0, 140.0));
        assert_eq!(session.scene.selection(), &[id]);
    }

    #[test]
    fn test_drop_asset_honors_view_transform() {
        let mut session = EditorSession::new();
        session.scene.view.zoom = 200.0;
        session.scene.view.pan = Vec2::new(50.0, 50.0);
        let payload = serde_json::to_string(&test_asset(FeatureCategory::Eyes)).unwrap();
        let id = session.drop_asset(&payload, Point::new(250.0, 250.0)).unwrap();
        let feature = session.scene.feature(id).unwrap();
        assert_eq!((feature.x, feature.y), (100.0, 100.0));
    }

    #[test]
    fn test_malformed_drop_is_ignored() {
        let mut session = EditorSession::new();
        let before = session.history().len();
        assert!(session.drop_asset("{not json", Point::ZERO).is_none());
        assert!(session.drop_asset("{\"id\": 42}", Point::ZERO).is_none());
        assert!(session.scene.is_empty());
        assert_eq!(session.history().len(), before);
    }

    #[test]
    fn test_scale_commands_step_and_clamp() {
        let (mut session, id) = session_with_face();
        session.command(Command::ScaleUp);
        assert!((session.scene.feature(id).unwrap().scale - 1.1).abs() < 1e-9);
        for _ in 0..20 {
            session.command(Command::ScaleUp);
        }
        assert_eq!(session.scene.feature(id).unwrap().scale, MAX_SCALE);
        for _ in 0..40 {
            session.command(Command::ScaleDown);
        }
        assert_eq!(session.scene.feature(id).unwrap().scale, MIN_SCALE);
    }

    #[test]
    fn test_flip_commands_toggle() {
        let (mut session, id) = session_with_face();
        session.command(Command::FlipHorizontal);
        session.command(Command::FlipVertical);
        let feature = session.scene.feature(id).unwrap();
        assert!(feature.flip_h);
        assert!(feature.flip_v);
        session.command(Command::FlipHorizontal);
        assert!(!session.scene.feature(id).unwrap().flip_h);
    }

    #[test]
    fn test_duplicate_command() {
        let (mut session, id) = session_with_face();
        session.command(Command::Duplicate);
        assert_eq!(session.scene.len(), 2);
        assert_ne!(session.scene.selection(), &[id]);
    }

    #[test]
    fn test_delete_and_empty_selection_noop() {
        let (mut session, _) = session_with_face();
        session.command(Command::DeleteSelection);
        assert!(session.scene.is_empty());

        let before = session.history().len();
        session.command(Command::DeleteSelection);
        session.command(Command::BringToFront);
        assert_eq!(session.history().len(), before);
    }

    #[test]
    fn test_loaded_scene_is_the_undo_floor() {
        let mut scene = Scene::new();
        let id = scene.add_feature(test_asset(FeatureCategory::FaceShape), None);
        scene.clear_selection();

        let mut session = EditorSession::with_scene(scene);
        assert!(!session.can_undo());
        session.command(Command::Undo);
        assert_eq!(session.scene.len(), 1);
        assert!(session.scene.feature(id).is_some());
    }

    #[test]
    fn test_undo_at_bound_is_noop() {
        let mut session = EditorSession::new();
        session.command(Command::Undo);
        session.command(Command::Redo);
        assert!(session.scene.is_empty());
    }

    #[test]
    fn test_undo_prunes_selection() {
        let mut session = EditorSession::new();
        let a = session.add_asset(test_asset(FeatureCategory::Eyes));
        let b = session.add_asset(test_asset(FeatureCategory::Nose));
        session.scene.set_selection(vec![a, b]);
        session.command(Command::Undo);
        assert_eq!(session.scene.selection(), &[a]);
        assert!(session.scene.feature(b).is_none());
    }

    #[test]
    fn test_key_bindings() {
        let plain = Modifiers::default();
        let primary = Modifiers {
            primary: true,
            shift: false,
        };
        let primary_shift = Modifiers {
            primary: true,
            shift: true,
        };
        assert_eq!(command_for_key("Delete", plain), Some(Command::DeleteSelection));
        assert_eq!(command_for_key("Backspace", plain), Some(Command::DeleteSelection));
        assert_eq!(command_for_key("Escape", plain), Some(Command::ClearSelection));
        assert_eq!(command_for_key("[", plain), Some(Command::BringToFront));
        assert_eq!(command_for_key("]", plain), Some(Command::SendToBack));
        assert_eq!(command_for_key("+", plain), Some(Command::ScaleUp));
        assert_eq!(command_for_key("=", plain), Some(Command::ScaleUp));
        assert_eq!(command_for_key("-", plain), Some(Command::ScaleDown));
        assert_eq!(command_for_key("h", plain), Some(Command::FlipHorizontal));
        assert_eq!(command_for_key("v", plain), Some(Command::FlipVertical));
        assert_eq!(command_for_key("z", primary), Some(Command::Undo));
        assert_eq!(command_for_key("z", primary_shift), Some(Command::Redo));
        assert_eq!(command_for_key("d", primary), Some(Command::Duplicate));
        assert_eq!(command_for_key("a", primary), Some(Command::SelectAll));
        assert_eq!(command_for_key("q", plain), None);
        assert_eq!(command_for_key("h", primary), None);
    }

    #[test]
    fn test_key_bindings_ignore_case() {
        let primary_shift = Modifiers {
            primary: true,
            shift: true,
        };
        // Shift+z reports "Z" on most platforms.
        assert_eq!(command_for_key("Z", primary_shift), Some(Command::Redo));
        let shift_only = Modifiers {
            primary: false,
            shift: true,
        };
        assert_eq!(command_for_key("H", shift_only), Some(Command::FlipHorizontal));
    }

    #[test]
    fn test_property_edit_commits_and_undoes() {
        let (mut session, id) = session_with_face();
        session.update_selected(&FeatureUpdate::opacity(0.3));
        assert_eq!(session.scene.feature(id).unwrap().opacity, 0.3);

        // Undo restores the opacity, not the previous committed snapshot.
        session.command(Command::Undo);
        let feature = session.scene.feature(id).unwrap();
        assert_eq!(feature.opacity, 1.0);

        session.command(Command::Redo);
        assert_eq!(session.scene.feature(id).unwrap().opacity, 0.3);
    }

    #[test]
    fn test_resize_and_scale_commit_once() {
        let (mut session, id) = session_with_face();
        let before = session.history().len();
        session.resize_selected(120.0, 90.0);
        assert_eq!(session.history().len(), before + 1);
        assert_eq!(session.scene.feature(id).unwrap().width, 120.0);

        session.set_selected_scale(1.5);
        assert_eq!(session.history().len(), before + 2);
        session.command(Command::Undo);
        let feature = session.scene.feature(id).unwrap();
        assert_eq!((feature.width, feature.height), (120.0, 90.0));
    }

    #[test]
    fn test_toggle_visible_and_locked_commit() {
        let (mut session, id) = session_with_face();
        session.toggle_visible(id);
        session.toggle_locked(id);
        assert!(!session.scene.feature(id).unwrap().visible);
        assert!(session.scene.feature(id).unwrap().locked);

        session.command(Command::Undo);
        assert!(!session.scene.feature(id).unwrap().locked);
        session.command(Command::Undo);
        assert!(session.scene.feature(id).unwrap().visible);

        // Unknown ids commit nothing.
        let before = session.history().len();
        session.toggle_visible(uuid::Uuid::new_v4());
        assert_eq!(session.history().len(), before);
    }
}
