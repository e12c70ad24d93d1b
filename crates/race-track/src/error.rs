use race_core::CarId;
use race_fleet::FleetError;
use race_sync::SyncError;
use thiserror::Error;

use crate::CrossingEvent;

/// Caller contract violations.  A crash is never an error: it is reported
/// as [`Notice::Crashed`][crate::Notice::Crashed].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackError {
    #[error("{0} entered the intersection twice without exiting")]
    DoubleEntry(CarId),

    #[error("{0} exited the intersection without entering")]
    ExitWithoutEntry(CarId),

    #[error("{0} completed the race while still inside the intersection")]
    StillInside(CarId),

    #[error("{car} sent {event:?} after reaching a terminal state")]
    AfterTerminal { car: CarId, event: CrossingEvent },

    #[error("ready barrier has {barrier} participants but the fleet has {fleet} cars")]
    ParticipantMismatch { barrier: usize, fleet: usize },

    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

pub type TrackResult<T> = Result<T, TrackError>;
