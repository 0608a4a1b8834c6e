//! Build errors for the repository builder.

use crate::repository::ConfigViolation;
use thiserror::Error;

/// Errors that can occur when building a repository.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial_state(factory) before .build()")]
    MissingInitialState,

    #[error("Invalid repository configuration: {}", join_violations(.violations))]
    InvalidConfig { violations: Vec<ConfigViolation> },
}

fn join_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
