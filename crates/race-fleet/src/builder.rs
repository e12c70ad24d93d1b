//! Randomized fleet generation.
//!
//! # Usage
//!
//! ```rust
//! use race_core::RaceConfig;
//! use race_fleet::FleetBuilder;
//!
//! let config = RaceConfig::default();
//! let fleet = FleetBuilder::new(20, &config)
//!     .honor_stop_sign(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(fleet.len(), 20);
//! ```

use std::time::Duration;

use race_core::{CarId, CarRng, Direction, RaceConfig};
use tracing::debug;

use crate::{CarSpec, Fleet, FleetError, FleetResult};

/// Fluent builder for a [`Fleet`] whose per-car parameters are drawn from a
/// [`RaceConfig`]'s ranges.
///
/// Directions alternate by id.  Every other parameter comes from the car's
/// own [`CarRng`], so the same seed always yields the same fleet.
pub struct FleetBuilder<'a> {
    count:           usize,
    config:          &'a RaceConfig,
    honor_stop_sign: bool,
}

impl<'a> FleetBuilder<'a> {
    pub fn new(count: usize, config: &'a RaceConfig) -> Self {
        Self { count, config, honor_stop_sign: false }
    }

    /// Whether every car waits at the stop sign.  Default: `false`.
    pub fn honor_stop_sign(mut self, honor: bool) -> Self {
        self.honor_stop_sign = honor;
        self
    }

    /// Draw one [`CarSpec`] per car.
    pub fn specs(&self) -> FleetResult<Vec<CarSpec>> {
        if self.count == 0 {
            return Err(FleetError::EmptyFleet);
        }
        self.config.validate()?;
        let cfg = self.config;

        (0..self.count)
            .map(|i| {
                let id = CarId::try_from(i).map_err(|_| FleetError::InvalidSpec {
                    car:    CarId::INVALID,
                    reason: "fleet too large for 32-bit car ids",
                })?;
                let mut rng = CarRng::new(cfg.seed, id);
                Ok(CarSpec {
                    id,
                    direction:          Direction::alternating(i),
                    trip_miles:         rng.gen_range(cfg.trip_miles.clone()),
                    intersection_cycle: rng.gen_range(cfg.intersection_cycle_miles.clone()),
                    pit_cycle:          rng.gen_range(cfg.pit_cycle_miles.clone()),
                    mile_delay:         Duration::from_millis(rng.gen_range(cfg.mile_delay_ms.clone())),
                    honors_stop_sign:   self.honor_stop_sign,
                })
            })
            .collect()
    }

    pub fn build(self) -> FleetResult<Fleet> {
        let fleet = Fleet::from_specs(self.specs()?)?;
        debug!(
            cars = fleet.len(),
            honor_stop_sign = self.honor_stop_sign,
            seed = self.config.seed,
            "fleet created"
        );
        Ok(fleet)
    }
}

/// Create `count` cars with randomized parameters; `honor_stop_sign` applies
/// to every car.
pub fn create_fleet(count: usize, honor_stop_sign: bool, config: &RaceConfig) -> FleetResult<Fleet> {
    FleetBuilder::new(count, config)
        .honor_stop_sign(honor_stop_sign)
        .build()
}
