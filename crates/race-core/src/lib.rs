//! `race-core` — foundational types for the intersection race simulator.
//!
//! This crate is a dependency of every other `race-*` crate.  It has no
//! `race-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `CarId`                                               |
//! | [`direction`]   | `Direction` — the closed set of travel directions     |
//! | [`config`]      | `RaceConfig` — fleet ranges, delays, pit capacity     |
//! | [`rng`]         | `CarRng` (per-car), `RaceRng` (orchestrator)          |
//! | [`error`]       | `RaceError`, `RaceResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod config;
pub mod direction;
pub mod error;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RaceConfig;
pub use direction::Direction;
pub use error::{RaceError, RaceResult};
pub use ids::CarId;
pub use rng::{CarRng, RaceRng};
