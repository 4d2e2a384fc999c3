//! Linear undo/redo over full feature-list snapshots.

use crate::feature::PlacedFeature;

/// Maximum number of retained snapshots.
pub const MAX_HISTORY: usize = 50;

/// Bounded linear history of scene snapshots.
///
/// The history always holds at least one entry: it is seeded with the empty
/// scene so an undo right after the first edit is well-defined. Pushing
/// after an undo discards the redo branch; snapshots are deep copies, so
/// later edits to the live scene can never alter a stored state.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Vec<PlacedFeature>>,
    index: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a history seeded with one empty snapshot.
    pub fn new() -> Self {
        Self {
            snapshots: vec![Vec::new()],
            index: 0,
        }
    }

    /// Record a new snapshot after a committed mutation.
    ///
    /// Truncates any redo entries, appends, advances the cursor, and drops
    /// the oldest snapshots beyond the retention cap.
    pub fn push(&mut self, features: &[PlacedFeature]) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(features.to_vec());
        if self.snapshots.len() > MAX_HISTORY {
            let excess = self.snapshots.len() - MAX_HISTORY;
            self.snapshots.drain(..excess);
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Replace the whole history with a single baseline snapshot (project
    /// load). Undo bottoms out at the loaded state, not an empty scene.
    pub fn reset_to(&mut self, features: &[PlacedFeature]) {
        self.snapshots = vec![features.to_vec()];
        self.index = 0;
    }

    /// Step back one snapshot. Returns the state to restore, or `None` at
    /// the oldest retained entry (a no-op, not an error).
    pub fn undo(&mut self) -> Option<&[PlacedFeature]> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    /// Step forward one snapshot. Returns the state to restore, or `None`
    /// at the newest entry.
    pub fn redo(&mut self) -> Option<&[PlacedFeature]> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index])
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
