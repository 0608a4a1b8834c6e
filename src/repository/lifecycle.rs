//! Repository lifecycle: status, events and subscriber bookkeeping.

use crate::subscription::SubscriptionId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Identity of a repository instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryId(Uuid);

impl RepositoryId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where a repository is in its own lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryStatus {
    /// No current state; activates on the next subscribe
    Uninitialized,
    /// Holds a current state
    Active,
    /// Last subscriber left; teardown is running
    Deactivating,
    /// Shut down for good
    Terminated,
}

/// Lifecycle notifications for collaborators that arm or disarm platform
/// listeners alongside the repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    Activated,
    Deactivated,
    Terminated,
}

/// Point-in-time counters of a repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStats {
    pub name: String,
    pub status: RepositoryStatus,
    pub subscribers: usize,
    pub activations: u64,
    pub deactivations: u64,
    pub transitions: u64,
}

/// What a detach means for the repository.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Detach {
    /// The id was not attached (already detached)
    Unknown,
    /// Other subscribers remain, or the repository is not active
    Remaining,
    /// This was the last subscriber of an active repository
    LastSubscriber,
}

/// Subscriber set and status, guarded by the registry mutex.
#[derive(Debug)]
pub(crate) struct Registry {
    pub(crate) status: RepositoryStatus,
    subscribers: HashSet<SubscriptionId>,
    pub(crate) activations: u64,
    pub(crate) deactivations: u64,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            status: RepositoryStatus::Uninitialized,
            subscribers: HashSet::new(),
            activations: 0,
            deactivations: 0,
        }
    }

    pub(crate) fn attach(&mut self, id: SubscriptionId) {
        self.subscribers.insert(id);
    }

    pub(crate) fn detach(&mut self, id: SubscriptionId) -> Detach {
        if !self.subscribers.remove(&id) {
            return Detach::Unknown;
        }
        if self.subscribers.is_empty() && self.status == RepositoryStatus::Active {
            Detach::LastSubscriber
        } else {
            Detach::Remaining
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub(crate) fn clear(&mut self) {
        self.subscribers.clear();
    }
}
