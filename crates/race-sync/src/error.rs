use race_core::CarId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("pit stop capacity must be at least 1")]
    ZeroCapacity,

    #[error("ready barrier needs at least one participant")]
    EmptyBarrier,

    #[error("{0} is not a participant of this barrier")]
    UnknownParticipant(CarId),
}

pub type SyncResult<T> = Result<T, SyncError>;
