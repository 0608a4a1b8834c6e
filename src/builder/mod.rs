//! Builder API for ergonomic repository construction.
//!
//! This module provides a fluent builder and a macro for declaring simple
//! state enums with minimal boilerplate.

pub mod error;
pub mod macros;
pub mod repository;

pub use error::BuildError;
pub use repository::RepositoryBuilder;

use crate::core::State;
use crate::repository::StateRepository;

/// Create a repository whose deactivation resets to a fresh initial state.
///
/// The deinitialize transition maps any state to `initial_state()`, so the
/// current state's hooks release its resources whenever the last subscriber
/// leaves.
///
/// # Example
///
/// ```
/// use statehouse::builder::resettable_repository;
/// use statehouse::state_enum;
///
/// state_enum! {
///     enum Availability {
///         Unknown,
///         Available,
///     }
/// }
///
/// let repository = resettable_repository("availability", || Availability::Unknown).unwrap();
/// assert_eq!(repository.name(), "availability");
/// ```
pub fn resettable_repository<S, F>(
    name: &str,
    initial_state: F,
) -> Result<StateRepository<S>, BuildError>
where
    S: State,
    F: Fn() -> S + Clone + Send + Sync + 'static,
{
    let reset = initial_state.clone();
    RepositoryBuilder::new()
        .name(name)
        .initial_state(initial_state)
        .deinitialize(move |_| reset())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransitionKind;
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Idle,
            Busy,
        }
    }

    #[tokio::test]
    async fn resettable_repository_resets_on_deactivation() {
        let repository = resettable_repository("test", || TestState::Idle).unwrap();
        let subscription = repository.subscribe().unwrap();
        repository.change_state(|_| TestState::Busy).await.unwrap();

        subscription.unsubscribe().await;

        let history = repository.history();
        let last = history.last().unwrap();
        assert_eq!(last.kind, TransitionKind::Deinitialize);
        assert_eq!(last.from, "Busy");
        assert_eq!(last.to, "Idle");
    }
}
