//! Per-car parameters, shared status, and the phase state machine.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::time::Duration;

use race_core::{CarId, Direction};

use crate::{FleetError, FleetResult};

// ── CarSpec ───────────────────────────────────────────────────────────────────

/// Parameters fixed when the car is created.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarSpec {
    pub id:                 CarId,
    pub direction:          Direction,
    /// Miles to drive before the car completes the race.
    pub trip_miles:         u32,
    /// The car crosses the intersection at every multiple of this mileage.
    pub intersection_cycle: u32,
    /// The car visits the pit stop at every multiple of this mileage.
    pub pit_cycle:          u32,
    /// Simulated travel time per mile.
    pub mile_delay:         Duration,
    /// Whether the car waits at the stop sign before entering the
    /// intersection.
    pub honors_stop_sign:   bool,
}

impl CarSpec {
    pub(crate) fn validate(&self) -> FleetResult<()> {
        let reason = if self.trip_miles == 0 {
            "trip length must be at least one mile"
        } else if self.intersection_cycle == 0 {
            "intersection cycle must be at least one mile"
        } else if self.pit_cycle == 0 {
            "pit cycle must be at least one mile"
        } else {
            return Ok(());
        };
        Err(FleetError::InvalidSpec { car: self.id, reason })
    }

    /// `true` if the car crosses the intersection when its odometer reads
    /// `mile`.
    #[inline]
    pub fn crosses_intersection_at(&self, mile: u32) -> bool {
        mile.is_multiple_of(self.intersection_cycle)
    }

    /// `true` if the car visits the pit stop when its odometer reads `mile`.
    #[inline]
    pub fn visits_pit_at(&self, mile: u32) -> bool {
        mile.is_multiple_of(self.pit_cycle)
    }
}

// ── CarPhase ──────────────────────────────────────────────────────────────────

/// Lifecycle of a car.
///
/// ```text
/// Created → WaitingToStart → Driving ⇄ CyclingPitStop
///                               ⇅
///                       CyclingIntersection → Crashed
///
///                    Driving → Completed
/// ```
///
/// `Crashed` and `Completed` are terminal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CarPhase {
    Created             = 0,
    WaitingToStart      = 1,
    Driving             = 2,
    CyclingIntersection = 3,
    CyclingPitStop      = 4,
    Crashed             = 5,
    Completed           = 6,
}

impl CarPhase {
    fn from_u8(raw: u8) -> CarPhase {
        match raw {
            0 => CarPhase::Created,
            1 => CarPhase::WaitingToStart,
            2 => CarPhase::Driving,
            3 => CarPhase::CyclingIntersection,
            4 => CarPhase::CyclingPitStop,
            5 => CarPhase::Crashed,
            _ => CarPhase::Completed,
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, CarPhase::Crashed | CarPhase::Completed)
    }

    pub fn can_transition_to(self, next: CarPhase) -> bool {
        use CarPhase::*;
        matches!(
            (self, next),
            (Created, WaitingToStart)
                | (WaitingToStart, Driving)
                | (Driving, CyclingPitStop | CyclingIntersection | Completed)
                | (CyclingPitStop, Driving)
                | (CyclingIntersection, Driving | Crashed)
        )
    }
}

// ── Car ───────────────────────────────────────────────────────────────────────

/// A car's fixed spec plus its live status.
///
/// Writers:
/// - the car's own thread: phase, mileage, pit-stop count, in-intersection;
/// - the intersection coordinator, under its lock: `crashed` and the finish
///   position, each written at most once.
#[derive(Debug)]
pub struct Car {
    spec:            CarSpec,
    phase:           AtomicU8,
    miles:           AtomicU32,
    pit_stops:       AtomicU32,
    in_intersection: AtomicBool,
    crashed:         AtomicBool,
    /// 0 = no position assigned.
    finish_position: AtomicU32,
}

impl Car {
    pub fn new(spec: CarSpec) -> Self {
        Self {
            spec,
            phase:           AtomicU8::new(CarPhase::Created as u8),
            miles:           AtomicU32::new(0),
            pit_stops:       AtomicU32::new(0),
            in_intersection: AtomicBool::new(false),
            crashed:         AtomicBool::new(false),
            finish_position: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn spec(&self) -> &CarSpec {
        &self.spec
    }

    #[inline]
    pub fn id(&self) -> CarId {
        self.spec.id
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.spec.direction
    }

    // ── Phase ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn phase(&self) -> CarPhase {
        CarPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Move to `next`, returning the phase left behind.
    ///
    /// # Errors
    ///
    /// [`FleetError::IllegalTransition`] if the state machine has no edge
    /// from the current phase to `next` (in particular, out of a terminal
    /// phase).
    pub fn transition(&self, next: CarPhase) -> FleetResult<CarPhase> {
        let mut current = self.phase.load(Ordering::Acquire);
        loop {
            let from = CarPhase::from_u8(current);
            if !from.can_transition_to(next) {
                return Err(FleetError::IllegalTransition { car: self.id(), from, to: next });
            }
            match self.phase.compare_exchange_weak(
                current,
                next as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(from),
                Err(actual) => current = actual,
            }
        }
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.phase() == CarPhase::Completed
    }

    // ── Odometer and pit stops ────────────────────────────────────────────

    #[inline]
    pub fn miles(&self) -> u32 {
        self.miles.load(Ordering::Acquire)
    }

    /// Advance one mile and return the new odometer reading.
    #[inline]
    pub fn advance_mile(&self) -> u32 {
        self.miles.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[inline]
    pub fn trip_done(&self) -> bool {
        self.miles() >= self.spec.trip_miles
    }

    #[inline]
    pub fn pit_stops(&self) -> u32 {
        self.pit_stops.load(Ordering::Acquire)
    }

    #[inline]
    pub fn record_pit_stop(&self) -> u32 {
        self.pit_stops.fetch_add(1, Ordering::AcqRel) + 1
    }

    // ── Intersection and crash ────────────────────────────────────────────

    #[inline]
    pub fn in_intersection(&self) -> bool {
        self.in_intersection.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set_in_intersection(&self, inside: bool) {
        self.in_intersection.store(inside, Ordering::Release);
    }

    #[inline]
    pub fn is_crashed(&self) -> bool {
        self.crashed.load(Ordering::Acquire)
    }

    /// Set the crash flag.  Returns `true` only the first time.
    #[inline]
    pub fn mark_crashed(&self) -> bool {
        !self.crashed.swap(true, Ordering::AcqRel)
    }

    // ── Finish position ───────────────────────────────────────────────────

    pub fn finish_position(&self) -> Option<u32> {
        match self.finish_position.load(Ordering::Acquire) {
            0 => None,
            p => Some(p),
        }
    }

    /// Record the car's finishing place (1-based).  Write-once.
    pub fn assign_finish(&self, position: u32) -> FleetResult<()> {
        debug_assert!(position > 0, "finish positions are 1-based");
        self.finish_position
            .compare_exchange(0, position, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|existing| FleetError::FinishAlreadyAssigned { car: self.id(), existing })
    }
}
