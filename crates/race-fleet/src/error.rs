use race_core::{CarId, RaceError};
use thiserror::Error;

use crate::CarPhase;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FleetError {
    #[error("a fleet needs at least one car")]
    EmptyFleet,

    #[error("car at index {expected} carries id {got}")]
    NonSequentialId { expected: usize, got: CarId },

    #[error("{car}: {reason}")]
    InvalidSpec { car: CarId, reason: &'static str },

    #[error("{car}: illegal phase transition {from:?} -> {to:?}")]
    IllegalTransition { car: CarId, from: CarPhase, to: CarPhase },

    #[error("{car} already holds finish position {existing}")]
    FinishAlreadyAssigned { car: CarId, existing: u32 },

    #[error(transparent)]
    Core(#[from] RaceError),
}

pub type FleetResult<T> = Result<T, FleetError>;
