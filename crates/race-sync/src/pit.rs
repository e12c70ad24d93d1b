//! The pit stop: a fixed-capacity admission pool served in arrival order.
//!
//! # Permits
//!
//! [`PitStop::acquire`] returns a [`PitPermit`]; dropping the permit is the
//! only way to give the slot back.  Because permits cannot be cloned or
//! forged, outstanding permits never exceed the capacity and a release can
//! never outnumber its acquire.  If the internal count is ever found to be
//! zero on release anyway, the release is dropped (the count saturates at
//! capacity) and logged at `error` level; debug builds assert instead.
//!
//! # Fairness
//!
//! Waiters take a ticket on arrival and are admitted strictly in ticket
//! order, so no car can be starved by later arrivals.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};
use tracing::error;

use crate::{SyncError, SyncResult};

#[derive(Debug)]
struct PitState {
    available:   usize,
    in_use:      usize,
    peak_in_use: usize,
    next_ticket: u64,
    queue:       VecDeque<u64>,
}

/// Bounded-capacity admission pool.
#[derive(Debug)]
pub struct PitStop {
    capacity: usize,
    state:    Mutex<PitState>,
    cv:       Condvar,
}

impl PitStop {
    /// Create a pit stop that services up to `capacity` cars at once.
    pub fn new(capacity: usize) -> SyncResult<Self> {
        if capacity == 0 {
            return Err(SyncError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            state: Mutex::new(PitState {
                available:   capacity,
                in_use:      0,
                peak_in_use: 0,
                next_ticket: 0,
                queue:       VecDeque::new(),
            }),
            cv: Condvar::new(),
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently held.
    pub fn in_use(&self) -> usize {
        self.state.lock().in_use
    }

    /// Highest number of permits ever held at the same instant.
    pub fn peak_in_use(&self) -> usize {
        self.state.lock().peak_in_use
    }

    /// Cars currently queued for a permit.
    pub fn waiting(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Block until a slot is free and every earlier arrival has been served.
    pub fn acquire(&self) -> PitPermit<'_> {
        let mut state = self.state.lock();
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.queue.push_back(ticket);

        self.cv.wait_while(&mut state, |s| {
            s.available == 0 || s.queue.front() != Some(&ticket)
        });

        state.queue.pop_front();
        state.available -= 1;
        state.in_use += 1;
        state.peak_in_use = state.peak_in_use.max(state.in_use);

        // The next ticket may be admissible too if capacity remains.
        let wake_next = state.available > 0 && !state.queue.is_empty();
        drop(state);
        if wake_next {
            self.cv.notify_all();
        }
        PitPermit { pit: self }
    }

    fn release(&self) {
        let mut state = self.state.lock();
        debug_assert!(state.in_use > 0, "pit permit released more often than acquired");
        if state.in_use == 0 {
            error!("pit permit released more often than acquired; ignoring");
            return;
        }
        state.in_use -= 1;
        state.available = (state.available + 1).min(self.capacity);
        drop(state);
        // Waiters check their own ticket, so all must re-evaluate.
        self.cv.notify_all();
    }
}

/// Proof of a held pit slot.  Released on drop.
#[must_use = "dropping the permit immediately releases the pit slot"]
#[derive(Debug)]
pub struct PitPermit<'a> {
    pit: &'a PitStop,
}

impl Drop for PitPermit<'_> {
    fn drop(&mut self) {
        self.pit.release();
    }
}
