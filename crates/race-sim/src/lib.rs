//! `race-sim` — race orchestrator for the intersection race simulator.
//!
//! # Race lifecycle
//!
//! ```text
//! RaceBuilder::build          — validate config, allocate the shared Circuit
//! Race::drive_all(model)      — spawn one unit per car (staggered)
//!   ① each car: signal ready, block on the start gate
//!   ② orchestrator: await all ready → reset barrier → open the gate
//!   ③ each car: drive mile by mile
//!        every pit_cycle miles          → pit stop (bounded pool)
//!        every intersection_cycle miles → [stop sign] → Entering → hold → Exiting
//!   ④ retire: Completed (finish position) or crashed inside Entering
//! Race::wait_for_completion   — collect unit reports, await terminal signals
//! Race::results               — standings of the non-crashed finishers
//! ```
//!
//! # Execution models
//!
//! | Model                     | Units                                          |
//! |---------------------------|------------------------------------------------|
//! | `ExecutionModel::Threads` | One named OS thread per car.                   |
//! | `ExecutionModel::Pool`    | A dedicated Rayon pool with one worker per car. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use race_core::RaceConfig;
//! use race_fleet::create_fleet;
//! use race_sim::{ExecutionModel, RaceBuilder};
//!
//! let config = RaceConfig::default();
//! let fleet = create_fleet(20, true, &config)?;
//! let mut race = RaceBuilder::new(fleet, config).build()?;
//! let summary = race.run(ExecutionModel::Threads)?;
//! assert_eq!(summary.crashed, 0);
//! ```

pub mod builder;
pub mod circuit;
pub mod driver;
pub mod error;
pub mod execution;
pub mod race;

#[cfg(test)]
mod tests;

pub use builder::RaceBuilder;
pub use circuit::Circuit;
pub use driver::{DriveOutcome, drive};
pub use error::{SimError, SimResult};
pub use execution::ExecutionModel;
pub use race::Race;

pub use race_fleet::Standing;
pub use race_track::{NoopObserver, RaceObserver, RaceSummary};
