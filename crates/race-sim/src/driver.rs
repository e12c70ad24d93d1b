//! The per-car drive loop.
//!
//! # Mile loop
//!
//! ```text
//! sleep(mile_delay) → advance odometer
//!   └─ pit due?          → CyclingPitStop  → hold a pit permit → Driving
//!   └─ intersection due? → CyclingIntersection
//!        [stop sign] → Entering ─┬─ crashed → retire
//!                                └─ clear   → hold ─┬─ crashed meanwhile → retire
//!                                                   └─ Exiting → Driving
//! trip done → Completed (finish position)
//! ```
//!
//! A car raises its terminal signal on every way out of [`drive`], error
//! and panic included, so the orchestrator never waits on a car that has
//! gone away.

use std::thread;

use race_core::CarId;
use race_fleet::{Car, CarPhase};
use race_sync::ReadyBarrier;
use race_track::{CrossingEvent, Notice};
use tracing::{debug, error, trace};

use crate::{Circuit, SimError, SimResult};

/// How a car's race ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveOutcome {
    Completed { position: u32 },
    Crashed,
}

/// Result of one intersection crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Crossing {
    Clear,
    Crashed,
}

/// Raises the car's ready signal when dropped.
struct TerminalSignal<'a> {
    ready: &'a ReadyBarrier,
    car:   CarId,
}

impl Drop for TerminalSignal<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.ready.signal_ready(self.car) {
            error!(car = %self.car, error = %e, "could not raise terminal signal");
        }
    }
}

/// Drive car `id` around `circuit` until it completes or crashes.
///
/// Blocks on the start gate after signalling ready; the caller opens the
/// gate once every car has done so.
pub fn drive(circuit: &Circuit, id: CarId) -> SimResult<DriveOutcome> {
    let _terminal = TerminalSignal { ready: &circuit.ready, car: id };
    let car = circuit.fleet.car(id)?;
    let spec = car.spec();

    car.transition(CarPhase::WaitingToStart)?;
    circuit.ready.signal_ready(id)?;
    circuit.gate.wait();
    car.transition(CarPhase::Driving)?;
    trace!(car = %id, direction = %spec.direction, trip = spec.trip_miles, "green flag");

    while !car.trip_done() {
        if !spec.mile_delay.is_zero() {
            thread::sleep(spec.mile_delay);
        }
        let mile = car.advance_mile();

        if spec.visits_pit_at(mile) {
            pit_stop(circuit, car)?;
        }
        if spec.crosses_intersection_at(mile) && cross_intersection(circuit, car)? == Crossing::Crashed {
            car.transition(CarPhase::Crashed)?;
            debug!(car = %id, mile, "out of the race");
            return Ok(DriveOutcome::Crashed);
        }
    }

    match circuit.intersection.notify(id, CrossingEvent::Completed)? {
        Notice::Finished { position } => {
            car.transition(CarPhase::Completed)?;
            Ok(DriveOutcome::Completed { position })
        }
        notice => Err(SimError::UnexpectedNotice { car: id, notice }),
    }
}

fn pit_stop(circuit: &Circuit, car: &Car) -> SimResult<()> {
    car.transition(CarPhase::CyclingPitStop)?;
    {
        let _permit = circuit.pit.acquire();
        let stops = car.record_pit_stop();
        trace!(car = %car.id(), stops, "pitting");
        if !circuit.pit_hold.is_zero() {
            thread::sleep(circuit.pit_hold);
        }
    }
    car.transition(CarPhase::Driving)?;
    Ok(())
}

/// One pass through the intersection.  Leaves the car in
/// `CyclingIntersection` when it crashed, `Driving` otherwise.
fn cross_intersection(circuit: &Circuit, car: &Car) -> SimResult<Crossing> {
    let id = car.id();
    car.transition(CarPhase::CyclingIntersection)?;

    // Held until this function returns, crash or not.
    let _stop_sign = car.spec().honors_stop_sign.then(|| circuit.stop_sign.acquire());

    car.set_in_intersection(true);
    if circuit.intersection.notify(id, CrossingEvent::Entering)?.crashed(id) {
        return Ok(Crossing::Crashed);
    }

    if !circuit.intersection_hold.is_zero() {
        thread::sleep(circuit.intersection_hold);
    }
    // Crashed by another car's entry during the hold: the wreck stays put.
    if car.is_crashed() {
        return Ok(Crossing::Crashed);
    }
    car.set_in_intersection(false);

    match circuit.intersection.notify(id, CrossingEvent::Exiting)? {
        Notice::Exited => {
            car.transition(CarPhase::Driving)?;
            Ok(Crossing::Clear)
        }
        Notice::Ignored => Ok(Crossing::Crashed),
        notice => Err(SimError::UnexpectedNotice { car: id, notice }),
    }
}
