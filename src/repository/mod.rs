//! The state repository: a concurrent container for one current state.
//!
//! # Key Concepts
//!
//! - **Serialized transitions**: at most one transition is in flight; later
//!   requests queue in FIFO order behind it
//! - **Hook protocol**: every transition runs the old state's
//!   `before_creating_new_state` and `after_creating_new_state` hooks around
//!   the transition function, publishes, then runs the new state's
//!   `after_new_state_is_set`
//! - **Lazy lifecycle**: the first subscriber activates the repository, the
//!   last one to leave deactivates it, `shutdown` ends it
//! - **Configuration**: serde-friendly [`RepositoryConfig`], validated up front

pub mod config;
pub(crate) mod engine;
pub mod error;
pub(crate) mod lifecycle;

pub use config::{ConfigViolation, RepositoryConfig};
pub use engine::StateRepository;
pub use error::{BoxError, HookError, HookPhase, RepositoryError};
pub use lifecycle::{LifecycleEvent, RepositoryId, RepositoryStats, RepositoryStatus};
