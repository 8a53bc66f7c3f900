use crate::constants::MAX_HISTORY_ENTRIES;

/// One undoable edit: the state before and after it was applied.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry<S> {
    pub label: String,
    pub before: S,
    pub after: S,
}

/// Bounded undo/redo stacks of state snapshots.
///
/// The history never mutates the state itself. `undo` hands back the entry
/// whose `before` the caller restores, `redo` the entry whose `after` it
/// restores.
#[derive(Debug)]
pub struct EditHistory<S> {
    undo_stack: Vec<HistoryEntry<S>>,
    redo_stack: Vec<HistoryEntry<S>>,
    max_entries: usize,
}

impl<S> Default for EditHistory<S> {
    fn default() -> Self {
        Self::with_capacity(MAX_HISTORY_ENTRIES)
    }
}

impl<S: Clone + PartialEq> EditHistory<S> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> EditHistory<S> {
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl<S: Clone + PartialEq> EditHistory<S> {
    /// Records an edit. No-op edits are ignored; anything else clears redo.
    pub fn record(&mut self, label: impl Into<String>, before: S, after: S) {
        if before == after {
            return;
        }

        self.undo_stack.push(HistoryEntry {
            label: label.into(),
            before,
            after,
        });
        self.redo_stack.clear();

        if self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
    }

    /// Pops the last edit for undo.
    pub fn undo(&mut self) -> Option<HistoryEntry<S>> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    /// Pops the last undone edit for redo.
    pub fn redo(&mut self) -> Option<HistoryEntry<S>> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry.clone());
        Some(entry)
    }
}
