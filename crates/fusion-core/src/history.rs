//! Bounded focus history.

use std::collections::VecDeque;

use vigil_signal_model::focus::FocusCategory;

/// FIFO of the most recent focus categories. Never exceeds its capacity;
/// the oldest entry is evicted on overflow.
#[derive(Debug, Clone)]
pub struct FocusHistory {
    entries: VecDeque<FocusCategory>,
    capacity: usize,
}

/// Category counts over a slice of history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusCounts {
    pub focused: usize,
    pub distracted: usize,
    pub away: usize,
}

impl FocusCounts {
    pub fn total(&self) -> usize {
        self.focused + self.distracted + self.away
    }
}

impl FocusHistory {
    /// Create an empty history. A zero capacity is bumped to 1; callers
    /// validate configuration before getting here.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, category: FocusCategory) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(category);
    }

    /// The newest `n` entries (fewer if the history is shorter), oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = FocusCategory> + '_ {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).copied()
    }

    /// Category counts over the newest `n` entries.
    pub fn recent_counts(&self, n: usize) -> FocusCounts {
        let mut counts = FocusCounts::default();
        for category in self.recent(n) {
            match category {
                FocusCategory::Focused => counts.focused += 1,
                FocusCategory::Distracted => counts.distracted += 1,
                FocusCategory::Away => counts.away += 1,
            }
        }
        counts
    }

    pub fn latest(&self) -> Option<FocusCategory> {
        self.entries.back().copied()
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

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
