//! Bounded, most-recent-first log of applied operations.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of entries kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Direction of an accumulator operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// `count + n`
    Add,
    /// `count - n`
    Subtract,
}

impl Operation {
    /// Sign shown in front of the operand.
    #[must_use]
    pub const fn sign(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
        }
    }

    /// Format a history line, e.g. `"+10 → 10"`.
    #[must_use]
    pub fn describe(self, operand: i64, result: i64) -> String {
        format!("{}{operand} → {result}", self.sign())
    }
}

/// Operation log. Index 0 is the latest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// Create an empty log holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend an entry, dropping the oldest past capacity.
    pub fn record(&mut self, entry: impl Into<String>) {
        self.entries.push_front(entry.into());
        self.entries.truncate(self.capacity);
    }

    /// Latest entry, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    /// Entries from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
