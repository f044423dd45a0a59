use std::collections::VecDeque;

use crate::buffer::BufferRef;
use crate::config::HistoryConfig;

/// Linear undo/redo history of full buffer snapshots.
///
/// Pushing after an undo discards every entry past the current index, so
/// there is only ever one redo branch.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Snapshots, oldest first
    entries: VecDeque<BufferRef>,
    /// Index of the current snapshot, `None` while empty
    index: Option<usize>,
    /// Maximum number of snapshots kept, `None` for unbounded
    capacity: Option<usize>,
}

impl History {
    /// Creates a new empty, unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty history bounded as described by `config`
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            entries: VecDeque::new(),
            index: None,
            capacity: config.capacity.map(|c| c.max(1)),
        }
    }

    /// Append a snapshot after dropping any redo entries.
    ///
    /// When a capacity is set and exceeded, the oldest snapshot is evicted.
    pub fn push(&mut self, buffer: BufferRef) {
        let keep = self.index.map_or(0, |i| i + 1);
        let discarded = self.entries.len() - keep;
        if discarded > 0 {
            log::debug!("Discarding {} redo snapshot(s)", discarded);
        }
        self.entries.truncate(keep);
        self.entries.push_back(buffer);

        if let Some(capacity) = self.capacity {
            while self.entries.len() > capacity {
                self.entries.pop_front();
                log::debug!("History full ({}), evicted oldest snapshot", capacity);
            }
        }
        self.index = Some(self.entries.len() - 1);
    }

    /// Step back one snapshot, or `None` if already at the oldest entry
    pub fn undo(&mut self) -> Option<BufferRef> {
        let index = self.index?;
        if index == 0 {
            return None;
        }
        self.index = Some(index - 1);
        self.entries.get(index - 1).cloned()
    }

    /// Step forward one snapshot, or `None` if already at the newest entry
    pub fn redo(&mut self) -> Option<BufferRef> {
        let index = self.index?;
        if index + 1 >= self.entries.len() {
            return None;
        }
        self.index = Some(index + 1);
        self.entries.get(index + 1).cloned()
    }

    /// The snapshot the editor should currently display
    pub fn current(&self) -> Option<&BufferRef> {
        self.index.and_then(|i| self.entries.get(i))
    }

    /// Returns true if there is a snapshot to go back to
    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    /// Returns true if there is a snapshot to go forward to
    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Clear the history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;

    fn snapshot(value: u8) -> BufferRef {
        PixelBuffer::filled(1, 1, [value, 0, 0, 255]).unwrap().into_ref()
    }

    fn value(buffer: &BufferRef) -> u8 {
        buffer.data()[0]
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        assert!(history.current().is_none());
        assert_eq!(history.index(), None);
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_first_push_sets_index_zero() {
        let mut history = History::new();
        history.push(snapshot(1));
        assert_eq!(history.index(), Some(0));
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_push_after_undo_truncates_redo_branch() {
        let mut history = History::new();
        for v in 0..4 {
            history.push(snapshot(v));
        }
        history.undo();
        history.undo();
        history.push(snapshot(9));

        assert_eq!(history.len(), 3);
        assert_eq!(value(history.current().unwrap()), 9);
        assert!(history.redo().is_none());
        assert_eq!(value(&history.undo().unwrap()), 1);
    }

    #[test]
    fn test_bounded_history_evicts_oldest() {
        let mut history = History::with_config(HistoryConfig::bounded(3));
        for v in 0..5 {
            history.push(snapshot(v));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), Some(2));
        assert_eq!(value(&history.undo().unwrap()), 3);
        assert_eq!(value(&history.undo().unwrap()), 2);
        assert!(history.undo().is_none());
    }
}
