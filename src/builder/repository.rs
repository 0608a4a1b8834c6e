//! Builder for constructing state repositories.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::repository::engine::{DeinitializeFn, InitialStateFn};
use crate::repository::{RepositoryConfig, StateRepository};
use std::sync::Arc;
use std::time::Duration;
use stillwater::validation::Validation;

/// Builder for constructing state repositories with a fluent API.
///
/// # Example
///
/// ```
/// use statehouse::builder::RepositoryBuilder;
/// use statehouse::state_enum;
/// use std::time::Duration;
///
/// state_enum! {
///     enum Service {
///         Enabled,
///         Disabled,
///     }
/// }
///
/// let repository = RepositoryBuilder::new()
///     .name("location-service")
///     .initial_state(|| Service::Disabled)
///     .deinitialize(|_| Service::Disabled)
///     .hook_timeout(Duration::from_secs(2))
///     .build()
///     .unwrap();
///
/// assert_eq!(repository.name(), "location-service");
/// ```
pub struct RepositoryBuilder<S: State> {
    config: RepositoryConfig,
    initial_state: Option<InitialStateFn<S>>,
    deinitialize: Option<DeinitializeFn<S>>,
}

impl<S: State> RepositoryBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: RepositoryConfig::default(),
            initial_state: None,
            deinitialize: None,
        }
    }

    /// Replace the whole configuration, e.g. one loaded from a file.
    pub fn config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Bound each lifecycle hook to `timeout`.
    pub fn hook_timeout(mut self, timeout: Duration) -> Self {
        self.config.hook_timeout_ms = Some(timeout.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    pub fn lifecycle_capacity(mut self, capacity: usize) -> Self {
        self.config.lifecycle_capacity = capacity;
        self
    }

    /// Set the factory for the state published on activation (required).
    ///
    /// Called again on every re-activation.
    pub fn initial_state<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
    {
        self.initial_state = Some(Box::new(factory));
        self
    }

    /// Set the transition run on deactivation and shutdown to release the
    /// current state's resources.
    pub fn deinitialize<F>(mut self, transition: F) -> Self
    where
        F: Fn(&S) -> S + Send + Sync + 'static,
    {
        self.deinitialize = Some(Arc::new(transition));
        self
    }

    /// Build the repository.
    /// Returns an error if required fields are missing or the configuration
    /// is invalid.
    pub fn build(self) -> Result<StateRepository<S>, BuildError> {
        let initial_state = self.initial_state.ok_or(BuildError::MissingInitialState)?;

        if let Validation::Failure(violations) = self.config.validate() {
            return Err(BuildError::InvalidConfig {
                violations: violations.iter().cloned().collect(),
            });
        }

        Ok(StateRepository::from_parts(
            self.config,
            initial_state,
            self.deinitialize,
        ))
    }
}

impl<S: State> Default for RepositoryBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
