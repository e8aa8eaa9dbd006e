use kinship_core::{IndividualId, ViewMode};
use serde::{Deserialize, Serialize};

/// One remembered view. `perspective` is `None` for the default view, which
/// re-selects its root automatically when restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEntry {
    pub perspective: Option<IndividualId>,
    pub mode: ViewMode,
}

impl ViewEntry {
    pub fn new(perspective: Option<IndividualId>, mode: ViewMode) -> Self {
        Self { perspective, mode }
    }
}

/// Bounded stack of prior views; the oldest entry is dropped when full.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewHistory {
    entries: Vec<ViewEntry>,
    max_size: usize,
}

impl Default for ViewHistory {
    fn default() -> Self {
        Self::new(50)
    }
}

impl ViewHistory {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    pub fn push(&mut self, entry: ViewEntry) {
        self.entries.push(entry);
        while self.entries.len() > self.max_size {
            self.entries.remove(0);
        }
    }

    pub fn pop(&mut self) -> Option<ViewEntry> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&ViewEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Oldest first.
    pub fn entries(&self) -> &[ViewEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry(n: u128) -> ViewEntry {
        ViewEntry::new(Some(IndividualId(Uuid::from_u128(n))), ViewMode::Both)
    }

    #[test]
    fn test_push_pop_is_lifo() {
        let mut history = ViewHistory::new(10);
        history.push(entry(1));
        history.push(entry(2));

        assert_eq!(history.peek(), Some(&entry(2)));
        assert_eq!(history.pop(), Some(entry(2)));
        assert_eq!(history.pop(), Some(entry(1)));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn test_oldest_entries_are_dropped() {
        let mut history = ViewHistory::new(3);
        for n in 1..=5 {
            history.push(entry(n));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.entries(), &[entry(3), entry(4), entry(5)]);
    }

    #[test]
    fn test_zero_limit_keeps_one_entry() {
        let mut history = ViewHistory::new(0);
        history.push(entry(1));
        history.push(entry(2));

        assert_eq!(history.max_size(), 1);
        assert_eq!(history.entries(), &[entry(2)]);
    }
}
