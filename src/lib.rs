//! Statehouse: a concurrent state repository with ordered lifecycle hooks
//!
//! A [`StateRepository`] holds exactly one current state from a closed,
//! domain-defined set (permission status, a device connection, location
//! availability). Many observers subscribe and receive the current state
//! immediately and every later state in order. Transitions are serialized,
//! and each one drives a strict hook protocol so that resources owned by a
//! state are released and acquired at the right moment relative to
//! publication.
//!
//! # Core Concepts
//!
//! - **State**: a domain enum implementing [`State`], with three async hooks
//! - **Repository**: serializes transitions and publishes results
//! - **Subscription**: replay-latest cursor; slow consumers coalesce
//! - **Lifecycle**: lazy activation on first subscribe, deactivation when the
//!   last subscriber leaves, explicit shutdown
//!
//! # Example
//!
//! ```rust
//! use statehouse::{state_enum, StateRepository};
//!
//! state_enum! {
//!     pub enum Connection {
//!         Disconnected,
//!         Connecting,
//!         Connected,
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), statehouse::RepositoryError> {
//! let repository = StateRepository::new(|| Connection::Disconnected);
//!
//! let mut subscription = repository.subscribe()?;
//! assert_eq!(*subscription.recv().await.unwrap(), Connection::Disconnected);
//!
//! repository.change_state(|_| Connection::Connecting).await?;
//! repository.change_state(|_| Connection::Connected).await?;
//!
//! // Intermediate states may be skipped, the latest never is.
//! assert_eq!(*subscription.recv().await.unwrap(), Connection::Connected);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod repository;
pub mod subscription;

pub use async_trait::async_trait;

// Re-export commonly used types
pub use builder::RepositoryBuilder;
pub use crate::core::{State, StateHistory, TransitionKind, TransitionRecord};
pub use repository::{
    HookError, LifecycleEvent, RepositoryConfig, RepositoryError, RepositoryStatus,
    StateRepository,
};
pub use subscription::{Subscription, SubscriptionId};
