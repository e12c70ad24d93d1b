//! The fleet arena: every car of one race, indexed by `CarId`.

use race_core::{CarId, RaceError};

use crate::{Car, CarSpec, FleetError, FleetResult};

/// One finisher's line in the final results.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Standing {
    pub car:       CarId,
    pub position:  u32,
    pub pit_stops: u32,
}

/// Fixed-size arena of cars.  `cars[i].id() == CarId(i)` for every `i`.
#[derive(Debug)]
pub struct Fleet {
    cars: Vec<Car>,
}

impl Fleet {
    /// Build an arena from explicit specs.
    ///
    /// # Errors
    ///
    /// - [`FleetError::EmptyFleet`] if `specs` is empty.
    /// - [`FleetError::NonSequentialId`] unless the specs carry ids
    ///   `0, 1, 2, …` in order.
    /// - [`FleetError::InvalidSpec`] for a zero trip length or cycle.
    pub fn from_specs(specs: Vec<CarSpec>) -> FleetResult<Self> {
        if specs.is_empty() {
            return Err(FleetError::EmptyFleet);
        }
        for (i, spec) in specs.iter().enumerate() {
            if spec.id.index() != i {
                return Err(FleetError::NonSequentialId { expected: i, got: spec.id });
            }
            spec.validate()?;
        }
        Ok(Self { cars: specs.into_iter().map(Car::new).collect() })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    #[inline]
    pub fn get(&self, car: CarId) -> Option<&Car> {
        self.cars.get(car.index())
    }

    /// Like [`get`](Self::get) but an unknown id is an error.
    pub fn car(&self, car: CarId) -> FleetResult<&Car> {
        self.get(car).ok_or(FleetError::Core(RaceError::CarNotFound(car)))
    }

    /// Every `CarId` in ascending order.
    pub fn ids(&self) -> Vec<CarId> {
        (0..self.cars.len() as u32).map(CarId).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Car> + '_ {
        self.cars.iter()
    }

    pub fn crashed_count(&self) -> usize {
        self.cars.iter().filter(|c| c.is_crashed()).count()
    }

    /// Cars that were handed a finish position.
    pub fn finished_count(&self) -> usize {
        self.cars.iter().filter(|c| c.finish_position().is_some()).count()
    }

    /// Non-crashed finishers, ascending by finish position.
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .cars
            .iter()
            .filter(|c| !c.is_crashed())
            .filter_map(|c| {
                c.finish_position().map(|position| Standing {
                    car: c.id(),
                    position,
                    pit_stops: c.pit_stops(),
                })
            })
            .collect();
        standings.sort_unstable_by_key(|s| s.position);
        standings
    }
}
