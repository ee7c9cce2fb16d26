use std::collections::VecDeque;

use image::RgbaImage;

use crate::canvas::{SurfaceArena, SurfaceId};
use crate::consts::{DEFAULT_MAX_HISTORY_MB, DEFAULT_MAX_UNDO_STEPS};

// ============================================================================
// RASTER SNAPSHOT - full copy of every drawing layer at one instant
// ============================================================================

/// Pixels of a fixed set of surfaces, captured together and restored together.
#[derive(Clone)]
pub struct RasterSnapshot {
    label: String,
    layers: Vec<(SurfaceId, RgbaImage)>,
    bytes: usize,
}

impl RasterSnapshot {
    /// Capture `ids` from `arena`. Handles that no longer resolve are skipped.
    pub fn capture(label: &str, arena: &SurfaceArena, ids: &[SurfaceId]) -> Self {
        let layers: Vec<(SurfaceId, RgbaImage)> = ids
            .iter()
            .filter_map(|&id| arena.get(id).map(|img| (id, img.clone())))
            .collect();
        let bytes = layers.iter().map(|(_, img)| img.as_raw().len()).sum();
        Self { label: label.to_string(), layers, bytes }
    }

    /// Every captured surface still exists with the captured dimensions.
    fn restorable(&self, arena: &SurfaceArena) -> bool {
        !self.layers.is_empty()
            && self.layers.iter().all(|(id, img)| {
                arena.get(*id).map(|live| live.dimensions()) == Some(img.dimensions())
            })
    }

    /// Write every layer back. All or nothing: if any surface is gone or has
    /// been resized, nothing is touched and `false` is returned.
    pub fn restore_into(&self, arena: &mut SurfaceArena) -> bool {
        if !self.restorable(arena) {
            return false;
        }
        for (id, img) in &self.layers {
            if let Some(live) = arena.get_mut(*id) {
                live.copy_from_slice(img.as_raw());
            }
        }
        true
    }
}

// ============================================================================
// HISTORY MANAGER - linear snapshot stack with a cursor
// ============================================================================

/// Linear undo/redo over raster snapshots.
///
/// `index` is the cursor into `snapshots` and is `-1` while the stack is
/// empty. Snapshots are taken *before* each action, so the caller reports
/// finished actions with [`note_mutation`](Self::note_mutation); an undo
/// issued while the live layers are ahead of the cursor first stores the live
/// pixels as the redo tip.
///
/// `max_history_size` counts undoable steps. The stack holds one entry more
/// than that, for the newest state the last step can be redone to.
pub struct HistoryManager {
    snapshots: VecDeque<RasterSnapshot>,
    index: isize,
    /// Live layers were changed after the snapshot at `index` was taken.
    live_ahead: bool,
    /// Live layers equal the snapshot at `index` because undo/redo just
    /// restored it.
    at_cursor: bool,
    max_history_size: usize,
    /// Optional memory cap in bytes.
    max_memory_bytes: Option<usize>,
    total_memory: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO_STEPS)
    }
}

impl HistoryManager {
    pub fn new(max_history_size: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            index: -1,
            live_ahead: false,
            at_cursor: false,
            max_history_size: max_history_size.max(1),
            max_memory_bytes: Some(DEFAULT_MAX_HISTORY_MB * 1024 * 1024),
            total_memory: 0,
        }
    }

    pub fn with_memory_limit(mut self, max_bytes: Option<usize>) -> Self {
        self.max_memory_bytes = max_bytes;
        self
    }

    /// Change both caps; the stack is pruned right away if it is now too big.
    pub fn set_limits(&mut self, max_history_size: usize, max_memory_bytes: Option<usize>) {
        self.max_history_size = max_history_size.max(1);
        self.max_memory_bytes = max_memory_bytes;
        self.prune();
    }

    /// Capture `ids` before a mutating action.
    ///
    /// Everything after the cursor is dropped first. Right after an undo or
    /// redo the cursor entry already holds the live pixels, so no new entry
    /// is appended in that case.
    pub fn snapshot(&mut self, label: &str, arena: &SurfaceArena, ids: &[SurfaceId]) {
        self.truncate_after_cursor();
        if !(self.at_cursor && self.index >= 0) {
            self.push(RasterSnapshot::capture(label, arena, ids));
        }
        self.live_ahead = false;
        self.at_cursor = false;
    }

    /// Report that the live layers were changed since the last snapshot.
    pub fn note_mutation(&mut self) {
        self.live_ahead = true;
        self.at_cursor = false;
        self.prune();
    }

    /// Step back one snapshot. Returns the label of the undone action, or
    /// `None` at the oldest entry or when a surface is missing.
    pub fn undo(&mut self, arena: &mut SurfaceArena, ids: &[SurfaceId]) -> Option<String> {
        if self.live_ahead {
            self.live_ahead = false;
            self.truncate_after_cursor();
            self.push(RasterSnapshot::capture("Current", arena, ids));
        }
        if self.index <= 0 {
            return None;
        }
        let target = (self.index - 1) as usize;
        let snapshot = self.snapshots.get(target)?;
        if !snapshot.restore_into(arena) {
            return None;
        }
        let label = snapshot.label.clone();
        self.index -= 1;
        self.at_cursor = true;
        Some(label)
    }

    /// Step forward one snapshot. Returns the label of the redone action.
    pub fn redo(&mut self, arena: &mut SurfaceArena) -> Option<String> {
        if self.live_ahead || self.index + 1 >= self.snapshots.len() as isize {
            return None;
        }
        let current = self.index.max(0) as usize;
        let target = (self.index + 1) as usize;
        let label = self.snapshots.get(current).map(|s| s.label.clone());
        if !self.snapshots.get(target)?.restore_into(arena) {
            return None;
        }
        self.index += 1;
        self.at_cursor = true;
        label
    }

    pub fn can_undo(&self) -> bool {
        self.live_ahead || self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.live_ahead && self.index + 1 < self.snapshots.len() as isize
    }

    /// Cursor position, `-1` when empty.
    pub fn index(&self) -> isize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.index.max(0) as usize + usize::from(self.live_ahead)
    }

    pub fn redo_count(&self) -> usize {
        if self.live_ahead {
            return 0;
        }
        (self.snapshots.len() as isize - 1 - self.index).max(0) as usize
    }

    /// Labels of undoable actions, most recent first.
    pub fn undo_history(&self) -> Vec<String> {
        let end = if self.live_ahead {
            self.index + 1
        } else {
            self.index
        };
        self.snapshots
            .iter()
            .take(end.max(0) as usize)
            .rev()
            .map(|s| s.label.clone())
            .collect()
    }

    pub fn memory_usage(&self) -> usize {
        self.total_memory
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.index = -1;
        self.live_ahead = false;
        self.at_cursor = false;
        self.total_memory = 0;
    }

    fn truncate_after_cursor(&mut self) {
        let keep = (self.index + 1).max(0) as usize;
        while self.snapshots.len() > keep {
            if let Some(removed) = self.snapshots.pop_back() {
                self.total_memory = self.total_memory.saturating_sub(removed.bytes);
            }
        }
    }

    fn push(&mut self, snapshot: RasterSnapshot) {
        self.total_memory += snapshot.bytes;
        self.snapshots.push_back(snapshot);
        self.index = self.snapshots.len() as isize - 1;
        self.prune();
    }

    /// Drop the oldest snapshots until both caps hold. The newest entry is
    /// always kept. While the live layers are ahead every entry is undoable,
    /// otherwise the newest one is the redo tip and does not count.
    fn prune(&mut self) {
        let max_entries = self.max_history_size + usize::from(!self.live_ahead);
        while self.snapshots.len() > max_entries {
            self.pop_oldest();
        }
        if let Some(max_bytes) = self.max_memory_bytes {
            while self.total_memory > max_bytes && self.snapshots.len() > 1 {
                self.pop_oldest();
            }
        }
    }

    fn pop_oldest(&mut self) {
        if let Some(removed) = self.snapshots.pop_front() {
            self.total_memory = self.total_memory.saturating_sub(removed.bytes);
            self.index = (self.index - 1).max(if self.snapshots.is_empty() { -1 } else { 0 });
        }
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;
