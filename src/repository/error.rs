//! Repository error types.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Boxed error returned by fallible transition functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which lifecycle hook was running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookPhase {
    BeforeCreatingNewState,
    AfterCreatingNewState,
    AfterNewStateIsSet,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BeforeCreatingNewState => "before_creating_new_state",
            Self::AfterCreatingNewState => "after_creating_new_state",
            Self::AfterNewStateIsSet => "after_new_state_is_set",
        };
        f.write_str(name)
    }
}

/// Error raised by a state's lifecycle hook.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, e.g. a failed platform call.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Repository '{repository}' has been shut down")]
    Terminated { repository: String },

    #[error("Repository '{repository}' has no active state. Subscribe before requesting transitions")]
    Inactive { repository: String },

    #[error("Hook {phase} of state '{state}' failed: {source}")]
    HookFailed {
        state: String,
        phase: HookPhase,
        #[source]
        source: HookError,
    },

    #[error("Hook {phase} of state '{state}' timed out after {timeout:?}")]
    HookTimedOut {
        state: String,
        phase: HookPhase,
        timeout: Duration,
    },

    #[error("Transition from state '{from}' failed: {source}")]
    TransitionFailed {
        from: String,
        #[source]
        source: BoxError,
    },

    #[error("Transition in repository '{repository}' panicked")]
    TransitionPanicked { repository: String },

    #[error("Transition requested from inside a lifecycle hook of repository '{repository}'. Use enqueue_change instead")]
    ReentrantTransition { repository: String },
}

impl RepositoryError {
    /// Whether the failed operation left the previous state current.
    ///
    /// Only a failing `after_new_state_is_set` hook reports an error after
    /// the new state was already published.
    pub fn state_unchanged(&self) -> bool {
        !matches!(
            self,
            Self::HookFailed {
                phase: HookPhase::AfterNewStateIsSet,
                ..
            } | Self::HookTimedOut {
                phase: HookPhase::AfterNewStateIsSet,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn hook_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "adapter offline");
        let err = HookError::with_source("could not stop scan", io);

        assert_eq!(err.to_string(), "could not stop scan");
        assert_eq!(err.source().unwrap().to_string(), "adapter offline");
    }

    #[test]
    fn hook_failure_message_names_phase_and_state() {
        let err = RepositoryError::HookFailed {
            state: "Connected".to_string(),
            phase: HookPhase::AfterCreatingNewState,
            source: HookError::new("socket busy"),
        };

        assert_eq!(
            err.to_string(),
            "Hook after_creating_new_state of state 'Connected' failed: socket busy"
        );
        assert!(err.state_unchanged());
    }

    #[test]
    fn failure_after_publication_reports_changed_state() {
        let err = RepositoryError::HookTimedOut {
            state: "Connected".to_string(),
            phase: HookPhase::AfterNewStateIsSet,
            timeout: Duration::from_millis(5),
        };

        assert!(!err.state_unchanged());
    }
}
