//! Transition history tracking.
//!
//! The repository records every published transition as a
//! [`TransitionRecord`]. States themselves may own resources and are not
//! serializable, so records carry state names rather than state values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Why a transition ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Requested by a caller through `change_state` or one of its variants.
    Requested,
    /// Run by the repository itself while deactivating or shutting down.
    Deinitialize,
}

/// Record of a single published transition.
///
/// # Example
///
/// ```rust
/// use statehouse::core::{TransitionKind, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     sequence: 1,
///     from: "Disconnected".to_string(),
///     to: "Connecting".to_string(),
///     kind: TransitionKind::Requested,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "Connecting");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Monotonic publication number within the repository, starting at 1
    pub sequence: u64,
    /// Name of the state being transitioned from
    pub from: String,
    /// Name of the state being transitioned to
    pub to: String,
    /// What triggered the transition
    pub kind: TransitionKind,
    /// When the new state was published
    pub timestamp: DateTime<Utc>,
}

/// Bounded, ordered history of published transitions.
///
/// Once `capacity` records are held, recording a new one evicts the oldest.
/// A capacity of zero keeps nothing but still counts recorded transitions.
///
/// # Example
///
/// ```rust
/// use statehouse::core::{StateHistory, TransitionKind, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_capacity(8);
/// for (sequence, (from, to)) in [("A", "B"), ("B", "C")].into_iter().enumerate() {
///     history.record(TransitionRecord {
///         sequence: sequence as u64 + 1,
///         from: from.to_string(),
///         to: to.to_string(),
///         kind: TransitionKind::Requested,
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.get_path(), vec!["A", "B", "C"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    capacity: usize,
    total_recorded: u64,
    records: VecDeque<TransitionRecord>,
}

impl StateHistory {
    /// Create an empty history keeping at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            total_recorded: 0,
            records: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a transition, evicting the oldest record when full.
    pub fn record(&mut self, record: TransitionRecord) {
        self.total_recorded += 1;
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Get the path of state names traversed by the retained records.
    ///
    /// Returns the `from` of the oldest retained record followed by the `to`
    /// of every retained record.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from.as_str());
        }
        path.extend(self.records.iter().map(|record| record.to.as_str()));
        path
    }

    /// Time between the oldest and newest retained record.
    ///
    /// Returns `None` if no records are retained.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Retained records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    /// Most recently recorded transition.
    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of transitions ever recorded, including evicted ones.
    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }
}
