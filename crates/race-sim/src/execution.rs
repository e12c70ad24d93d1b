//! Execution models: how car units are scheduled onto OS threads.

use std::fmt;
use std::thread::{self, JoinHandle};

use race_core::CarId;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::error;

use crate::SimResult;

/// How car units run.
///
/// Every car blocks at the start gate, in the pit queue, and at the stop
/// sign, so both models give each car its own OS thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionModel {
    /// One named thread per car, joined at the end of the race.
    #[default]
    Threads,
    /// A dedicated Rayon pool sized to the fleet.
    Pool,
}

impl ExecutionModel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionModel::Threads => "threads",
            ExecutionModel::Pool    => "pool",
        }
    }
}

impl fmt::Display for ExecutionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Units ─────────────────────────────────────────────────────────────────────

/// Running car units for one race.
pub(crate) enum Units {
    Threads(Vec<JoinHandle<()>>),
    Pool(ThreadPool),
}

impl Units {
    pub(crate) fn new(model: ExecutionModel, cars: usize) -> SimResult<Self> {
        Ok(match model {
            ExecutionModel::Threads => Units::Threads(Vec::with_capacity(cars)),
            ExecutionModel::Pool => Units::Pool(
                ThreadPoolBuilder::new()
                    .num_threads(cars)
                    .thread_name(|i| format!("car-pool-{i}"))
                    .build()?,
            ),
        })
    }

    /// Start `unit` for `car`.
    pub(crate) fn spawn<F>(&mut self, car: CarId, unit: F) -> SimResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Units::Threads(handles) => {
                let handle = thread::Builder::new().name(format!("car-{}", car.0)).spawn(unit)?;
                handles.push(handle);
            }
            Units::Pool(pool) => pool.spawn(unit),
        }
        Ok(())
    }

    /// Join every thread.  Units catch their own panics, so a failed join
    /// is only logged.
    pub(crate) fn join(self) {
        match self {
            Units::Threads(handles) => {
                for handle in handles {
                    let name = handle.thread().name().unwrap_or("car").to_owned();
                    if handle.join().is_err() {
                        error!(thread = %name, "car thread panicked outside its unit");
                    }
                }
            }
            // Every spawned job has reported by now; dropping the pool
            // lets its workers exit.
            Units::Pool(pool) => drop(pool),
        }
    }
}
