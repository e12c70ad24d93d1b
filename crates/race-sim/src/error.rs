use race_core::{CarId, RaceError};
use race_fleet::FleetError;
use race_sync::SyncError;
use race_track::{Notice, TrackError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] RaceError),

    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Track(#[from] TrackError),

    #[error("race already started")]
    AlreadyStarted,

    #[error("race has not been started")]
    NotStarted,

    #[error("{car} panicked: {message}")]
    AgentPanicked { car: CarId, message: String },

    #[error("{car} received unexpected {notice:?}")]
    UnexpectedNotice { car: CarId, notice: Notice },

    #[error("only {reported} of {expected} cars reported back")]
    Incomplete { reported: usize, expected: usize },

    #[error("race ended without a summary")]
    MissingSummary,

    #[error("failed to spawn car thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("failed to build car pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

pub type SimResult<T> = Result<T, SimError>;
