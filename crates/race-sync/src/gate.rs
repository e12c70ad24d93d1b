//! The start gate: one broadcast that releases every waiting car at once.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// One-shot broadcast release.
///
/// Cars call [`wait`](Self::wait) without registering first; the
/// orchestrator calls [`open`](Self::open) once every car is ready.  Opening
/// wakes all waiters with a single `notify_all`, and any car that arrives
/// after the gate opened passes straight through.  The gate never closes.
#[derive(Debug, Default)]
pub struct StartGate {
    open: Mutex<bool>,
    cv:   Condvar,
}

impl StartGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate.  Idempotent: returns `true` only for the call that
    /// actually opened it; later calls do nothing.
    pub fn open(&self) -> bool {
        let mut open = self.open.lock();
        if *open {
            return false;
        }
        *open = true;
        drop(open);
        self.cv.notify_all();
        true
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        *self.open.lock()
    }

    /// Block until the gate has been opened.
    pub fn wait(&self) {
        let mut open = self.open.lock();
        self.cv.wait_while(&mut open, |open| !*open);
    }

    /// Block for at most `timeout`.  Returns `true` if the gate is open.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut open = self.open.lock();
        self.cv.wait_while_for(&mut open, |open| !*open, timeout);
        *open
    }
}
