//! `race-fleet` — the cars of a race and the arena that owns them.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`car`]       | `CarSpec` (fixed at creation), `Car` (shared status), `CarPhase` |
//! | [`fleet`]     | `Fleet` arena indexed by `CarId`, `Standing`                  |
//! | [`builder`]   | `FleetBuilder`, `create_fleet` — randomized fleet generation  |
//! | [`error`]     | `FleetError`, `FleetResult<T>`                                |
//!
//! # Ownership model
//!
//! A `Fleet` is built once, wrapped in an `Arc`, and shared by every car
//! thread and the intersection coordinator.  Everything else refers to a
//! car by `CarId`; nobody holds a pointer to a `Car` outside the arena.
//! Mutable status lives in atomics so that a car's own thread, the
//! coordinator, and the orchestrator can all read it without a lock.

pub mod builder;
pub mod car;
pub mod error;
pub mod fleet;

#[cfg(test)]
mod tests;

pub use builder::{FleetBuilder, create_fleet};
pub use car::{Car, CarPhase, CarSpec};
pub use error::{FleetError, FleetResult};
pub use fleet::{Fleet, Standing};
