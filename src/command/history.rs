use log::debug;

use crate::util::time;

/// One committed snapshot. Never mutated after it is pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<T> {
    payload: T,
    timestamp: u64,
    label: String,
}

impl<T> HistoryEntry<T> {
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Milliseconds, see [`time::timestamp_millis`].
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Linear undo log of full snapshots with a pointer at the live entry.
///
/// `push` truncates everything after the pointer before appending, so once a
/// new action is committed the undone future can never be redone. When the
/// stack grows past `capacity` the oldest entries are evicted.
#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    entries: Vec<HistoryEntry<T>>,
    /// `None` iff `entries` is empty.
    pointer: Option<usize>,
    capacity: usize,
}

impl<T> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl<T> HistoryStack<T> {
    pub const DEFAULT_CAPACITY: usize = 50;

    /// `capacity` is clamped to at least one entry.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            pointer: None,
            capacity: capacity.max(1),
        }
    }

    /// Commit a snapshot, discarding any redo-reachable entries.
    pub fn push(&mut self, payload: T, label: impl Into<String>) {
        let keep = self.pointer.map_or(0, |p| p + 1);
        self.entries.truncate(keep);
        self.entries.push(HistoryEntry {
            payload,
            timestamp: time::timestamp_millis(),
            label: label.into(),
        });

        let overflow = self.entries.len().saturating_sub(self.capacity);
        if overflow > 0 {
            self.entries.drain(..overflow);
        }
        self.pointer = Some(self.entries.len() - 1);
        debug!(
            "History push '{}' ({} entries)",
            self.entries[self.entries.len() - 1].label,
            self.entries.len()
        );
    }

    /// Step back one entry. `None` at the start or when empty.
    pub fn undo(&mut self) -> Option<&T> {
        let p = self.pointer.filter(|&p| p > 0)?;
        self.pointer = Some(p - 1);
        debug!("History undo -> '{}'", self.entries[p - 1].label);
        Some(&self.entries[p - 1].payload)
    }

    /// Step forward one entry. `None` at the end or when empty.
    pub fn redo(&mut self) -> Option<&T> {
        let p = self.pointer.filter(|&p| p + 1 < self.entries.len())?;
        self.pointer = Some(p + 1);
        debug!("History redo -> '{}'", self.entries[p + 1].label);
        Some(&self.entries[p + 1].payload)
    }

    pub fn current(&self) -> Option<&T> {
        self.current_entry().map(|e| &e.payload)
    }

    pub fn current_entry(&self) -> Option<&HistoryEntry<T>> {
        self.pointer.map(|p| &self.entries[p])
    }

    pub fn pointer(&self) -> Option<usize> {
        self.pointer
    }

    pub fn entries(&self) -> &[HistoryEntry<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        self.pointer.is_some_and(|p| p > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.pointer.is_some_and(|p| p + 1 < self.entries.len())
    }

    /// Label of the action an undo would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.pointer
            .filter(|&p| p > 0)
            .map(|p| self.entries[p].label.as_str())
    }

    /// Label of the action a redo would reapply.
    pub fn redo_label(&self) -> Option<&str> {
        self.pointer
            .filter(|&p| p + 1 < self.entries.len())
            .map(|p| self.entries[p + 1].label.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.pointer = None;
    }
}
