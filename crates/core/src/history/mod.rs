//! Undo/redo history for snapshot-based edits.

mod edit_history;

pub use edit_history::{EditHistory, HistoryEntry};
