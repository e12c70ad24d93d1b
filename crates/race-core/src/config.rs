//! Race configuration.
//!
//! Every car draws its fixed parameters uniformly from the ranges below when
//! the fleet is created.  The ranges are policy, not protocol: tests shrink
//! them to millisecond-scale races, the demo binary uses the defaults.

use std::ops::RangeInclusive;
use std::time::Duration;

use crate::{RaceError, RaceResult};

/// Top-level race configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaceConfig {
    /// Master RNG seed.  The same seed always produces the same fleet.
    pub seed: u64,

    /// Trip length in miles.  Default: 200–500.
    pub trip_miles: RangeInclusive<u32>,

    /// A car crosses the intersection every N miles.  Default: 10–50.
    pub intersection_cycle_miles: RangeInclusive<u32>,

    /// A car visits the pit stop every N miles.  Default: 10–50.
    pub pit_cycle_miles: RangeInclusive<u32>,

    /// Simulated travel time per mile, in milliseconds.  Default: 50–100.
    pub mile_delay_ms: RangeInclusive<u64>,

    /// Number of cars the pit stop can service at once.  Default: 1.
    pub pit_capacity: usize,

    /// How long a car holds its pit permit, in milliseconds.
    pub pit_hold_ms: u64,

    /// How long a car stays inside the intersection, in milliseconds.
    pub intersection_hold_ms: u64,

    /// Random delay between spawning consecutive cars, in milliseconds.
    pub stagger_ms: RangeInclusive<u64>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            seed:                     42,
            trip_miles:               200..=500,
            intersection_cycle_miles: 10..=50,
            pit_cycle_miles:          10..=50,
            mile_delay_ms:            50..=100,
            pit_capacity:             1,
            pit_hold_ms:              50,
            intersection_hold_ms:     25,
            stagger_ms:               0..=20,
        }
    }
}

impl RaceConfig {
    /// Reject configurations that cannot produce a well-formed race.
    pub fn validate(&self) -> RaceResult<()> {
        non_empty("trip_miles", &self.trip_miles, 1)?;
        non_empty("intersection_cycle_miles", &self.intersection_cycle_miles, 1)?;
        non_empty("pit_cycle_miles", &self.pit_cycle_miles, 1)?;
        non_empty("mile_delay_ms", &self.mile_delay_ms, 0)?;
        non_empty("stagger_ms", &self.stagger_ms, 0)?;
        if self.pit_capacity == 0 {
            return Err(RaceError::Config("pit_capacity must be at least 1".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn pit_hold(&self) -> Duration {
        Duration::from_millis(self.pit_hold_ms)
    }

    #[inline]
    pub fn intersection_hold(&self) -> Duration {
        Duration::from_millis(self.intersection_hold_ms)
    }
}

fn non_empty<T>(name: &str, range: &RangeInclusive<T>, min: T) -> RaceResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.is_empty() {
        return Err(RaceError::Config(format!(
            "{name} range {}..={} is empty",
            range.start(),
            range.end()
        )));
    }
    if *range.start() < min {
        return Err(RaceError::Config(format!(
            "{name} must start at {min} or more, got {}",
            range.start()
        )));
    }
    Ok(())
}
