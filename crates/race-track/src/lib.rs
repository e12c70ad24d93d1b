//! `race-track` — the intersection coordinator.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                   |
//! |-------------------|------------------------------------------------------------|
//! | [`event`]         | `CrossingEvent` (what a car reports), `Notice` (the reply) |
//! | [`coordinator`]   | `Intersection` — occupancy set, crash sets, finish order   |
//! | [`observer`]      | `RaceObserver` trait, `NoopObserver`                       |
//! | [`summary`]       | `RaceSummary` — counters recorded when the last car retires |
//! | [`error`]         | `TrackError`, `TrackResult<T>`                             |
//!
//! # Serialization
//!
//! Every notification from every car is applied inside one critical
//! section.  This is what makes crash detection well defined: no two
//! `Entering` events are ever evaluated against the same occupancy set at
//! the same time.  The crossing counter is the only state touched outside
//! that lock (a relaxed atomic, read for reporting only).

pub mod coordinator;
pub mod error;
pub mod event;
pub mod observer;
pub mod summary;


pub use coordinator::Intersection;
pub use error::{TrackError, TrackResult};
pub use event::{CrossingEvent, Notice};
pub use observer::{NoopObserver, RaceObserver};
pub use summary::RaceSummary;
