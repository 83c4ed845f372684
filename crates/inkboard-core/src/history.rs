//! Linear undo/redo history of full scene snapshots.

use crate::store::HistoryEntry;

/// Default maximum number of entries kept.
pub const MAX_UNDO_HISTORY: usize = 200;

/// A cursor over a list of immutable snapshots.
///
/// Entries after the cursor form the redo "future"; pushing a new entry
/// discards them. While suppressed (during an undo/redo replay) pushes are
/// ignored so that restoring a snapshot never records itself. When full,
/// the oldest entry after the first is dropped; the first entry (the scene
/// at mount) is always kept.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    suppressed: bool,
    capacity: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::with_capacity(MAX_UNDO_HISTORY)
    }
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that keeps at most `capacity` entries (at least 2).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            suppressed: false,
            capacity: capacity.max(2),
        }
    }

    /// Record a new entry at the cursor.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.suppressed {
            log::trace!("history push ignored during replay");
            return;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(entry);
        if self.entries.len() > self.capacity {
            self.entries.remove(1);
        }
        self.cursor = self.entries.len() - 1;
        log::debug!("history push: {} entries, cursor {}", self.entries.len(), self.cursor);
    }

    /// Step back one entry. Returns `None` at the start.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward one entry. Returns `None` at the end.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Entry at the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Set or clear the replay flag.
    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }
}
