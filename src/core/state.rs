//! Core State trait for repository states.
//!
//! Every value a [`StateRepository`](crate::repository::StateRepository) holds
//! implements this trait. Besides a display name, a state exposes three
//! asynchronous lifecycle hooks which the repository drives around every
//! transition.

use crate::repository::HookError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Trait for repository states.
///
/// States are immutable values of a closed, domain-defined variant set,
/// typically an `enum`. A state may exclusively own resources (an armed
/// timer, a platform callback handle); the hooks are where those resources
/// get released or handed over.
///
/// # Hook order
///
/// For every transition the repository runs:
///
/// 1. [`before_creating_new_state`](State::before_creating_new_state) on the old state
/// 2. the transition function
/// 3. [`after_creating_new_state`](State::after_creating_new_state) on the old state
/// 4. publication of the new state
/// 5. [`after_new_state_is_set`](State::after_new_state_is_set) on the new state
///
/// All hooks default to a no-op.
///
/// # Example
///
/// ```rust
/// use statehouse::core::State;
/// use statehouse::repository::HookError;
/// use statehouse::async_trait;
///
/// #[derive(Debug)]
/// enum Permission {
///     Allowed,
///     Denied,
/// }
///
/// #[async_trait]
/// impl State for Permission {
///     fn name(&self) -> &str {
///         match self {
///             Self::Allowed => "Allowed",
///             Self::Denied => "Denied",
///         }
///     }
///
///     async fn after_new_state_is_set(&self) -> Result<(), HookError> {
///         match self {
///             Self::Denied => Ok(()),
///             Self::Allowed => Ok(()),
///         }
///     }
/// }
///
/// assert_eq!(Permission::Allowed.name(), "Allowed");
/// ```
#[async_trait]
pub trait State: Debug + Send + Sync + 'static {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Runs on the outgoing state before the transition function is invoked.
    async fn before_creating_new_state(&self) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs on the outgoing state once the successor exists but before it is
    /// published.
    async fn after_creating_new_state(&self) -> Result<(), HookError> {
        Ok(())
    }

    /// Runs on the incoming state after it is visible to every reader and
    /// subscriber.
    async fn after_new_state_is_set(&self) -> Result<(), HookError> {
        Ok(())
    }
}
