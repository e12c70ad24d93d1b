//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `RaceError` as one
//! variant via `#[from]`, so configuration problems raised here flow up to
//! the orchestrator unchanged.

use thiserror::Error;

use crate::CarId;

/// The top-level error type for `race-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RaceError {
    #[error("car {0} not found")]
    CarNotFound(CarId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `race-core`.
pub type RaceResult<T> = Result<T, RaceError>;
