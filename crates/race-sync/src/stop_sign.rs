//! The stop sign: binary admission in front of the intersection.
//!
//! Honoring it is a per-car choice.  When every car honors it, at most one
//! car is ever inside the intersection and crashes become impossible.

use parking_lot::{Condvar, Mutex};

/// Binary gate, initially available.
#[derive(Debug)]
pub struct StopSign {
    available: Mutex<bool>,
    cv:        Condvar,
}

impl Default for StopSign {
    fn default() -> Self {
        Self {
            available: Mutex::new(true),
            cv:        Condvar::new(),
        }
    }
}

impl StopSign {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        *self.available.lock()
    }

    /// Block until the sign is available, then take it.
    pub fn acquire(&self) -> StopSignGuard<'_> {
        let mut available = self.available.lock();
        self.cv.wait_while(&mut available, |available| !*available);
        *available = false;
        StopSignGuard { sign: self }
    }

    /// Take the sign only if it is available right now.
    pub fn try_acquire(&self) -> Option<StopSignGuard<'_>> {
        let mut available = self.available.lock();
        if !*available {
            return None;
        }
        *available = false;
        Some(StopSignGuard { sign: self })
    }

    fn release(&self) {
        *self.available.lock() = true;
        self.cv.notify_one();
    }
}

/// Held while a car is at (or through) the intersection.  Released on drop,
/// waking exactly one waiting car.
#[must_use = "dropping the guard immediately releases the stop sign"]
#[derive(Debug)]
pub struct StopSignGuard<'a> {
    sign: &'a StopSign,
}

impl Drop for StopSignGuard<'_> {
    fn drop(&mut self) {
        self.sign.release();
    }
}
