//! Repository configuration.
//!
//! Configuration is plain serde data so it can be embedded in a larger
//! application config. Validation uses `Validation` to accumulate ALL
//! violations instead of stopping at the first one.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Largest history a repository may retain.
pub const MAX_HISTORY_CAPACITY: usize = 65_536;

/// Default number of retained transition records.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Default buffer of the lifecycle event channel.
pub const DEFAULT_LIFECYCLE_CAPACITY: usize = 16;

/// A rejected configuration value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("Repository name must not be empty")]
    EmptyName,

    #[error("Hook timeout must be greater than zero")]
    ZeroHookTimeout,

    #[error("History capacity {requested} exceeds maximum {max}")]
    HistoryTooLarge { requested: usize, max: usize },

    #[error("Lifecycle channel capacity must be greater than zero")]
    ZeroLifecycleCapacity,
}

/// Settings for a single repository.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Name used in logs and errors
    pub name: String,

    /// Upper bound for each lifecycle hook, in milliseconds. `None` waits forever.
    pub hook_timeout_ms: Option<u64>,

    /// Number of transition records retained
    pub history_capacity: usize,

    /// Buffer of the lifecycle event broadcast channel
    pub lifecycle_capacity: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            name: "repository".to_string(),
            hook_timeout_ms: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            lifecycle_capacity: DEFAULT_LIFECYCLE_CAPACITY,
        }
    }
}

impl RepositoryConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn hook_timeout(&self) -> Option<Duration> {
        self.hook_timeout_ms.map(Duration::from_millis)
    }

    /// Check every field, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

        checks.push(if self.name.trim().is_empty() {
            Validation::fail(ConfigViolation::EmptyName)
        } else {
            Validation::success(())
        });

        checks.push(if self.hook_timeout_ms == Some(0) {
            Validation::fail(ConfigViolation::ZeroHookTimeout)
        } else {
            Validation::success(())
        });

        checks.push(if self.history_capacity > MAX_HISTORY_CAPACITY {
            Validation::fail(ConfigViolation::HistoryTooLarge {
                requested: self.history_capacity,
                max: MAX_HISTORY_CAPACITY,
            })
        } else {
            Validation::success(())
        });

        checks.push(if self.lifecycle_capacity == 0 {
            Validation::fail(ConfigViolation::ZeroLifecycleCapacity)
        } else {
            Validation::success(())
        });

        Validation::all_vec(checks).map(|_| ())
    }
}
