//! Unit tests for race-sim.

use std::io;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use race_core::{CarId, Direction, RaceConfig};
use race_fleet::{CarPhase, CarSpec, Fleet, FleetError, create_fleet};
use race_track::{CrossingEvent, Notice};

use crate::execution::Units;
use crate::{
    Circuit, DriveOutcome, ExecutionModel, NoopObserver, Race, RaceBuilder, RaceObserver,
    RaceSummary, SimError, drive,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Short trips and millisecond delays.
fn quick_config(seed: u64) -> RaceConfig {
    RaceConfig {
        seed,
        trip_miles:               20..=40,
        intersection_cycle_miles: 2..=4,
        pit_cycle_miles:          5..=8,
        mile_delay_ms:            0..=1,
        pit_capacity:             1,
        pit_hold_ms:              1,
        intersection_hold_ms:     1,
        stagger_ms:               0..=1,
    }
}

/// Every car crosses every mile and lingers inside; no pit visits.
fn crashy_config(seed: u64) -> RaceConfig {
    RaceConfig {
        seed,
        trip_miles:               30..=30,
        intersection_cycle_miles: 1..=1,
        pit_cycle_miles:          100..=100,
        mile_delay_ms:            0..=1,
        intersection_hold_ms:     3,
        stagger_ms:               0..=0,
        ..quick_config(seed)
    }
}

fn race(cars: usize, honor_stop_sign: bool, config: RaceConfig) -> Race {
    let fleet = create_fleet(cars, honor_stop_sign, &config).unwrap();
    RaceBuilder::new(fleet, config).build().unwrap()
}

fn spec(id: u32, direction: Direction, trip_miles: u32) -> CarSpec {
    CarSpec {
        id: CarId(id),
        direction,
        trip_miles,
        intersection_cycle: 5,
        pit_cycle:          4,
        mile_delay:         Duration::ZERO,
        honors_stop_sign:   true,
    }
}

/// A circuit with the gate already open, so `drive` runs straight through.
fn open_circuit(specs: Vec<CarSpec>, config: &RaceConfig) -> Circuit {
    let fleet = Arc::new(Fleet::from_specs(specs).unwrap());
    let circuit = Circuit::new(fleet, config, Arc::new(NoopObserver)).unwrap();
    circuit.gate.open();
    circuit
}

fn wait_for(mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "condition not met within 5s");
        thread::sleep(Duration::from_millis(1));
    }
}

/// Checks that must hold after any finished race.
fn assert_consistent(race: &Race, summary: &RaceSummary) {
    let fleet = race.fleet();
    assert_eq!(summary.cars, fleet.len());
    assert_eq!(summary.completed + summary.crashed, fleet.len());
    assert_eq!(summary.crashed, fleet.crashed_count());
    assert_eq!(summary.completed, fleet.finished_count());

    for car in fleet.iter() {
        // Exactly one terminal state per car.
        match car.phase() {
            CarPhase::Completed => {
                assert!(!car.is_crashed(), "{} both completed and crashed", car.id());
                assert!(car.finish_position().is_some());
            }
            CarPhase::Crashed => {
                assert!(car.is_crashed());
                assert_eq!(car.finish_position(), None, "{} crashed with a position", car.id());
            }
            phase => panic!("{} ended in non-terminal {phase:?}", car.id()),
        }
    }

    let standings = race.results();
    assert_eq!(standings.len(), summary.completed);
    let positions: Vec<u32> = standings.iter().map(|s| s.position).collect();
    assert_eq!(positions, (1..=summary.completed as u32).collect::<Vec<_>>());
    let order: Vec<CarId> = standings.iter().map(|s| s.car).collect();
    assert_eq!(order, summary.finish_order);

    assert!(race.circuit().pit.peak_in_use() <= race.circuit().pit.capacity());
    assert_eq!(race.circuit().pit.in_use(), 0);
    assert!(race.circuit().stop_sign.is_available());
    assert!(race.circuit().intersection.occupants().is_empty());
}

/// Observer that keeps every crash set.
#[derive(Default)]
struct CrashLog {
    sets: Mutex<Vec<Vec<CarId>>>,
}

impl RaceObserver for CrashLog {
    fn on_crash(&self, crash_set: &[CarId]) {
        self.sets.lock().push(crash_set.to_vec());
    }
}

// ── Drive loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod driver_tests {
    use super::*;

    #[test]
    fn lone_car_visits_pit_and_intersection_on_schedule() {
        let config = RaceConfig { pit_hold_ms: 0, intersection_hold_ms: 0, ..quick_config(1) };
        let circuit = open_circuit(vec![spec(0, Direction::NorthSouth, 12)], &config);

        let outcome = drive(&circuit, CarId(0)).unwrap();

        assert_eq!(outcome, DriveOutcome::Completed { position: 1 });
        let car = circuit.fleet.get(CarId(0)).unwrap();
        assert_eq!(car.miles(), 12);
        assert_eq!(car.pit_stops(), 3, "miles 4, 8, 12");
        assert_eq!(circuit.intersection.crossings(), 2, "miles 5, 10");
        assert_eq!(car.phase(), CarPhase::Completed);
        assert!(!car.in_intersection());
        assert!(circuit.ready.is_ready(CarId(0)).unwrap());
        assert!(circuit.stop_sign.is_available());
    }

    #[test]
    fn crash_during_hold_retires_the_car() {
        let config = RaceConfig { intersection_hold_ms: 200, ..quick_config(2) };
        let mut first = spec(0, Direction::NorthSouth, 5);
        first.pit_cycle = 100;
        let circuit = open_circuit(vec![first, spec(1, Direction::EastWest, 5)], &config);

        thread::scope(|s| {
            let driver = s.spawn(|| drive(&circuit, CarId(0)));

            wait_for(|| circuit.intersection.occupants() == vec![CarId(0)]);
            let notice = circuit.intersection.notify(CarId(1), CrossingEvent::Entering).unwrap();
            assert_eq!(notice, Notice::Crashed(vec![CarId(0), CarId(1)]));

            assert_eq!(driver.join().unwrap().unwrap(), DriveOutcome::Crashed);
        });

        let car = circuit.fleet.get(CarId(0)).unwrap();
        assert_eq!(car.phase(), CarPhase::Crashed);
        assert_eq!(car.finish_position(), None);
        // Nothing after the crash: the wreck never clears its flag.
        assert!(car.in_intersection(), "crashed car ran its exit steps");
        assert!(circuit.stop_sign.is_available(), "stop sign released after the crash");
        assert!(circuit.ready.is_ready(CarId(0)).unwrap());
    }

    #[test]
    fn illegal_phase_is_an_error_and_still_signals() {
        let circuit = open_circuit(vec![spec(0, Direction::NorthSouth, 10)], &quick_config(3));
        circuit.fleet.get(CarId(0)).unwrap().transition(CarPhase::WaitingToStart).unwrap();

        let err = drive(&circuit, CarId(0)).unwrap_err();
        assert!(matches!(err, SimError::Fleet(_)));
        // The terminal signal is raised even on the error path.
        assert!(circuit.ready.is_ready(CarId(0)).unwrap());
    }
}

// ── Whole races ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod race_tests {
    use super::*;

    #[test]
    fn single_car_always_finishes_first() {
        for model in [ExecutionModel::Threads, ExecutionModel::Pool] {
            let mut race = race(1, false, quick_config(7));
            let summary = race.run(model).unwrap();

            assert_eq!(summary.completed, 1);
            assert_eq!(summary.crashed, 0);
            assert_eq!(summary.winner(), Some(CarId(0)));
            assert_consistent(&race, &summary);
        }
    }

    #[test]
    fn stop_sign_prevents_every_crash() {
        for seed in 0..3 {
            let mut race = race(20, true, quick_config(seed));
            let summary = race.run(ExecutionModel::Threads).unwrap();

            assert_eq!(summary.crashed, 0, "seed {seed}");
            assert_eq!(summary.completed, 20);
            assert_consistent(&race, &summary);
        }
    }

    #[test]
    fn stop_sign_holds_under_pool_model() {
        let mut race = race(20, true, quick_config(11));
        let summary = race.run(ExecutionModel::Pool).unwrap();
        assert_eq!(summary.crashed, 0);
        assert_consistent(&race, &summary);
    }

    #[test]
    fn ignoring_the_stop_sign_causes_crashes() {
        let crashed: usize = (0..5)
            .map(|seed| {
                let mut race = race(20, false, crashy_config(seed));
                let summary = race.run(ExecutionModel::Threads).unwrap();
                assert_consistent(&race, &summary);
                summary.crashed
            })
            .sum();
        assert!(crashed > 0, "no crash in 5 races of 20 cars crossing every mile");
    }

    #[test]
    fn crash_sets_always_mix_directions() {
        let log = Arc::new(CrashLog::default());
        let config = crashy_config(5);
        let fleet = create_fleet(20, false, &config).unwrap();
        let mut race = RaceBuilder::new(fleet, config).observer(log.clone()).build().unwrap();
        let summary = race.run(ExecutionModel::Threads).unwrap();
        assert_consistent(&race, &summary);

        let sets = log.sets.lock();
        assert_eq!(sets.iter().map(Vec::len).sum::<usize>(), summary.crashed);
        for set in sets.iter() {
            // The entering car is last and conflicts with everyone it hit.
            let (&entering, hit) = set.split_last().unwrap();
            assert!(!hit.is_empty());
            let dir = race.fleet().get(entering).unwrap().direction();
            for &other in hit {
                assert!(race.fleet().get(other).unwrap().direction().conflicts_with(dir));
            }
        }
    }

    #[test]
    fn pit_capacity_never_exceeded() {
        let config = RaceConfig { pit_capacity: 2, pit_cycle_miles: 1..=2, pit_hold_ms: 2, ..quick_config(9) };
        let mut race = race(12, true, config);
        let summary = race.run(ExecutionModel::Threads).unwrap();

        assert_consistent(&race, &summary);
        assert!(race.circuit().pit.peak_in_use() <= 2);
        assert!(race.fleet().iter().all(|car| car.pit_stops() > 0));
    }

    #[test]
    fn same_seed_same_fleet() {
        let a = race(8, true, quick_config(21));
        let b = race(8, true, quick_config(21));
        let specs = |r: &Race| r.fleet().iter().map(|c| c.spec().clone()).collect::<Vec<_>>();
        assert_eq!(specs(&a), specs(&b));
    }
}

// ── Lifecycle errors ──────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn drive_all_twice_rejected() {
        let mut race = race(2, true, quick_config(1));
        race.drive_all(ExecutionModel::Threads).unwrap();
        assert!(matches!(race.drive_all(ExecutionModel::Threads), Err(SimError::AlreadyStarted)));
        race.wait_for_completion().unwrap();
        assert!(matches!(race.drive_all(ExecutionModel::Pool), Err(SimError::AlreadyStarted)));
    }

    #[test]
    fn wait_before_drive_rejected() {
        let mut race = race(2, true, quick_config(1));
        assert!(matches!(race.wait_for_completion(), Err(SimError::NotStarted)));
    }

    #[test]
    fn results_empty_before_start() {
        let race = race(3, true, quick_config(1));
        assert!(race.results().is_empty());
    }

    #[test]
    fn invalid_config_rejected_at_build() {
        let config = RaceConfig { pit_capacity: 0, ..quick_config(1) };
        let fleet = create_fleet(2, true, &quick_config(1)).unwrap();
        assert!(RaceBuilder::new(fleet, config).build().is_err());
    }

    #[test]
    fn car_failing_before_the_start_ends_the_wait() {
        let mut race = race(3, true, quick_config(8));
        // Car 1 cannot leave `Created`, so its unit fails before the gate
        // and its ready signal is wiped by the start reset.
        race.fleet().get(CarId(1)).unwrap().transition(CarPhase::WaitingToStart).unwrap();

        let err = race.run(ExecutionModel::Threads).unwrap_err();

        assert!(matches!(err, SimError::Fleet(FleetError::IllegalTransition { car: CarId(1), .. })));
        for id in [CarId(0), CarId(2)] {
            assert_eq!(race.fleet().get(id).unwrap().phase(), CarPhase::Completed);
        }
        assert!(race.circuit().intersection.summary().is_none(), "car 1 never retired");
    }

    #[test]
    fn failed_start_still_drains_spawned_cars() {
        let mut race = race(2, true, quick_config(6));
        let (tx, rx) = mpsc::channel();
        let mut units = Units::new(ExecutionModel::Threads, 2).unwrap();
        race.spawn_unit(&mut units, CarId(0), tx).unwrap();

        let err = race.abandon_start(units, rx, SimError::Spawn(io::Error::other("out of threads")));
        assert!(matches!(err, SimError::Spawn(_)));

        match race.wait_for_completion() {
            Err(SimError::Incomplete { reported: 1, expected: 2 }) => {}
            other => panic!("expected Incomplete, got {other:?}"),
        }
        let car = race.fleet().get(CarId(0)).unwrap();
        assert_eq!(car.phase(), CarPhase::Completed);
        assert_eq!(car.finish_position(), Some(1));
        assert!(matches!(race.drive_all(ExecutionModel::Threads), Err(SimError::AlreadyStarted)));
    }

    #[test]
    fn panicking_observer_surfaces_as_agent_panic() {
        struct Exploding;
        impl RaceObserver for Exploding {
            fn on_finish(&self, _car: CarId, _position: u32) {
                panic!("boom");
            }
        }

        let config = quick_config(4);
        let fleet = create_fleet(1, true, &config).unwrap();
        let mut race = RaceBuilder::new(fleet, config).observer(Arc::new(Exploding)).build().unwrap();

        match race.run(ExecutionModel::Threads) {
            Err(SimError::AgentPanicked { car, message }) => {
                assert_eq!(car, CarId(0));
                assert_eq!(message, "boom");
            }
            other => panic!("expected AgentPanicked, got {other:?}"),
        }
    }
}
