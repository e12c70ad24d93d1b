//! Per-car readiness flags and the barrier that waits on all of them.
//!
//! The same barrier serves two rendezvous per race:
//!
//! 1. **Start** — each car signals as soon as its thread is running; the
//!    orchestrator waits for all of them, then [`reset`](ReadyBarrier::reset)s
//!    the barrier *before* opening the start gate.
//! 2. **Finish** — each car's terminal state (completed or crashed) raises
//!    its signal again; the orchestrator waits for all of them to detect the
//!    end of the race.
//!
//! Resetting before the gate opens guarantees no terminal signal is wiped:
//! no car can reach a terminal state while the gate is still closed.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use race_core::CarId;
use tracing::trace;

use crate::{SyncError, SyncResult};

// ── ReadySignal ───────────────────────────────────────────────────────────────

/// A single resettable "I am ready" flag.
#[derive(Debug, Default)]
pub struct ReadySignal {
    set: Mutex<bool>,
    cv:  Condvar,
}

impl ReadySignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake every waiter.  Raising an already raised flag
    /// is harmless.
    pub fn signal(&self) {
        *self.set.lock() = true;
        self.cv.notify_all();
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        *self.set.lock()
    }

    /// Lower the flag for the next rendezvous.
    pub fn reset(&self) {
        *self.set.lock() = false;
    }

    /// Block until the flag is raised.
    pub fn wait(&self) {
        let mut set = self.set.lock();
        self.cv.wait_while(&mut set, |set| !*set);
    }

    /// Block until the flag is raised or `deadline` passes.  Returns `true`
    /// if the flag is raised.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut set = self.set.lock();
        self.cv.wait_while_until(&mut set, |set| !*set, deadline);
        *set
    }
}

// ── ReadyBarrier ──────────────────────────────────────────────────────────────

/// One [`ReadySignal`] per car, indexed by `CarId`.
#[derive(Debug)]
pub struct ReadyBarrier {
    signals: Vec<ReadySignal>,
}

impl ReadyBarrier {
    /// Create a barrier for cars `0..participants`.
    pub fn new(participants: usize) -> SyncResult<Self> {
        if participants == 0 {
            return Err(SyncError::EmptyBarrier);
        }
        let signals = (0..participants).map(|_| ReadySignal::new()).collect();
        Ok(Self { signals })
    }

    pub fn participants(&self) -> usize {
        self.signals.len()
    }

    fn signal_for(&self, car: CarId) -> SyncResult<&ReadySignal> {
        self.signals
            .get(car.index())
            .ok_or(SyncError::UnknownParticipant(car))
    }

    /// Mark `car` as ready.
    pub fn signal_ready(&self, car: CarId) -> SyncResult<()> {
        self.signal_for(car)?.signal();
        trace!(%car, "ready");
        Ok(())
    }

    pub fn is_ready(&self, car: CarId) -> SyncResult<bool> {
        Ok(self.signal_for(car)?.is_set())
    }

    /// Number of participants currently signalled.
    pub fn ready_count(&self) -> usize {
        self.signals.iter().filter(|s| s.is_set()).count()
    }

    /// Block until every car in `cars` has signalled.
    pub fn await_all_ready(&self, cars: &[CarId]) -> SyncResult<()> {
        let signals = cars
            .iter()
            .map(|&car| self.signal_for(car))
            .collect::<SyncResult<Vec<_>>>()?;
        for signal in signals {
            signal.wait();
        }
        Ok(())
    }

    /// Like [`await_all_ready`](Self::await_all_ready) but gives up after
    /// `timeout`.  Returns `true` if every car signalled in time.
    pub fn await_all_ready_timeout(&self, cars: &[CarId], timeout: Duration) -> SyncResult<bool> {
        let deadline = Instant::now() + timeout;
        let signals = cars
            .iter()
            .map(|&car| self.signal_for(car))
            .collect::<SyncResult<Vec<_>>>()?;
        for signal in signals {
            if !signal.wait_until(deadline) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Lower every flag.
    pub fn reset(&self) {
        for signal in &self.signals {
            signal.reset();
        }
    }
}
