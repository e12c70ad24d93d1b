//! Unit tests for race-fleet.

use std::time::Duration;

use race_core::{CarId, Direction, RaceConfig};

use crate::{CarSpec, Fleet};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn spec(id: u32) -> CarSpec {
    CarSpec {
        id:                 CarId(id),
        direction:          Direction::alternating(id as usize),
        trip_miles:         10,
        intersection_cycle: 3,
        pit_cycle:          4,
        mile_delay:         Duration::ZERO,
        honors_stop_sign:   false,
    }
}

// ── CarSpec / CarPhase ────────────────────────────────────────────────────────

#[cfg(test)]
mod car_tests {
    use super::*;
    use crate::{Car, CarPhase, FleetError};

    #[test]
    fn cycle_predicates() {
        let s = spec(0);
        assert!(s.crosses_intersection_at(3));
        assert!(s.crosses_intersection_at(9));
        assert!(!s.crosses_intersection_at(4));
        assert!(s.visits_pit_at(8));
        assert!(!s.visits_pit_at(6));
    }

    #[test]
    fn happy_path_transitions() {
        let car = Car::new(spec(0));
        assert_eq!(car.phase(), CarPhase::Created);
        car.transition(CarPhase::WaitingToStart).unwrap();
        car.transition(CarPhase::Driving).unwrap();
        car.transition(CarPhase::CyclingPitStop).unwrap();
        car.transition(CarPhase::Driving).unwrap();
        car.transition(CarPhase::CyclingIntersection).unwrap();
        car.transition(CarPhase::Driving).unwrap();
        assert_eq!(car.transition(CarPhase::Completed).unwrap(), CarPhase::Driving);
        assert!(car.is_completed());
        assert!(car.phase().is_terminal());
    }

    #[test]
    fn terminal_phases_are_final() {
        let car = Car::new(spec(1));
        car.transition(CarPhase::WaitingToStart).unwrap();
        car.transition(CarPhase::Driving).unwrap();
        car.transition(CarPhase::CyclingIntersection).unwrap();
        car.transition(CarPhase::Crashed).unwrap();
        for next in [CarPhase::Driving, CarPhase::Completed, CarPhase::Crashed] {
            assert!(matches!(
                car.transition(next),
                Err(FleetError::IllegalTransition { from: CarPhase::Crashed, .. })
            ));
        }
    }

    #[test]
    fn cannot_skip_the_start_gate() {
        let car = Car::new(spec(0));
        assert!(car.transition(CarPhase::Driving).is_err());
        assert_eq!(car.phase(), CarPhase::Created);
    }

    #[test]
    fn crash_flag_is_write_once() {
        let car = Car::new(spec(0));
        assert!(!car.is_crashed());
        assert!(car.mark_crashed());
        assert!(!car.mark_crashed());
        assert!(car.is_crashed());
    }

    #[test]
    fn finish_position_is_write_once() {
        let car = Car::new(spec(0));
        assert_eq!(car.finish_position(), None);
        car.assign_finish(3).unwrap();
        assert_eq!(
            car.assign_finish(4),
            Err(FleetError::FinishAlreadyAssigned { car: CarId(0), existing: 3 })
        );
        assert_eq!(car.finish_position(), Some(3));
    }

    #[test]
    fn odometer_and_pit_counter() {
        let car = Car::new(spec(0));
        for expected in 1..=10 {
            assert_eq!(car.advance_mile(), expected);
        }
        assert!(car.trip_done());
        assert_eq!(car.record_pit_stop(), 1);
        assert_eq!(car.pit_stops(), 1);
    }
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fleet_tests {
    use super::*;
    use crate::FleetError;

    #[test]
    fn empty_fleet_rejected() {
        assert_eq!(Fleet::from_specs(vec![]).unwrap_err(), FleetError::EmptyFleet);
    }

    #[test]
    fn ids_must_match_indices() {
        let err = Fleet::from_specs(vec![spec(0), spec(2)]).unwrap_err();
        assert_eq!(err, FleetError::NonSequentialId { expected: 1, got: CarId(2) });
    }

    #[test]
    fn zero_cycle_rejected() {
        let mut bad = spec(0);
        bad.pit_cycle = 0;
        assert!(matches!(
            Fleet::from_specs(vec![bad]),
            Err(FleetError::InvalidSpec { car: CarId(0), .. })
        ));
    }

    #[test]
    fn lookup_and_ids() {
        let fleet = Fleet::from_specs(vec![spec(0), spec(1), spec(2)]).unwrap();
        assert_eq!(fleet.len(), 3);
        assert_eq!(fleet.ids(), vec![CarId(0), CarId(1), CarId(2)]);
        assert_eq!(fleet.get(CarId(1)).unwrap().direction(), Direction::EastWest);
        assert!(fleet.get(CarId(3)).is_none());
        assert!(fleet.car(CarId(3)).is_err());
    }

    #[test]
    fn standings_sorted_and_exclude_crashed() {
        let fleet = Fleet::from_specs((0..4).map(spec).collect()).unwrap();
        fleet.get(CarId(2)).unwrap().assign_finish(1).unwrap();
        fleet.get(CarId(0)).unwrap().assign_finish(2).unwrap();
        fleet.get(CarId(0)).unwrap().record_pit_stop();
        fleet.get(CarId(1)).unwrap().mark_crashed();

        let standings = fleet.standings();
        let order: Vec<_> = standings.iter().map(|s| (s.car, s.position, s.pit_stops)).collect();
        assert_eq!(order, vec![(CarId(2), 1, 0), (CarId(0), 2, 1)]);
        assert_eq!(fleet.crashed_count(), 1);
        assert_eq!(fleet.finished_count(), 2);
    }
}

// ── FleetBuilder ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::{FleetBuilder, FleetError, create_fleet};

    #[test]
    fn parameters_within_configured_ranges() {
        let config = RaceConfig::default();
        let fleet = create_fleet(50, false, &config).unwrap();
        for car in fleet.iter() {
            let s = car.spec();
            assert!(config.trip_miles.contains(&s.trip_miles));
            assert!(config.intersection_cycle_miles.contains(&s.intersection_cycle));
            assert!(config.pit_cycle_miles.contains(&s.pit_cycle));
            let ms = s.mile_delay.as_millis() as u64;
            assert!(config.mile_delay_ms.contains(&ms));
            assert!(!s.honors_stop_sign);
        }
    }

    #[test]
    fn directions_alternate() {
        let fleet = create_fleet(4, true, &RaceConfig::default()).unwrap();
        let dirs: Vec<_> = fleet.iter().map(|c| c.direction()).collect();
        assert_eq!(
            dirs,
            vec![Direction::NorthSouth, Direction::EastWest, Direction::NorthSouth, Direction::EastWest]
        );
        assert!(fleet.iter().all(|c| c.spec().honors_stop_sign));
    }

    #[test]
    fn same_seed_same_fleet() {
        let config = RaceConfig { seed: 7, ..RaceConfig::default() };
        let a = FleetBuilder::new(10, &config).specs().unwrap();
        let b = FleetBuilder::new(10, &config).specs().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_fleet_rejected() {
        assert_eq!(
            create_fleet(0, false, &RaceConfig::default()).unwrap_err(),
            FleetError::EmptyFleet
        );
    }

    #[test]
    fn invalid_config_rejected() {
        let config = RaceConfig { pit_capacity: 0, ..RaceConfig::default() };
        assert!(matches!(create_fleet(3, false, &config), Err(FleetError::Core(_))));
    }
}
