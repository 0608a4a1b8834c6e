//! Core state types.
//!
//! This module contains the domain-facing side of the repository:
//! - State definitions via the `State` trait and its lifecycle hooks
//! - Bounded transition history

mod history;
mod state;

pub use history::{StateHistory, TransitionKind, TransitionRecord};
pub use state::State;
