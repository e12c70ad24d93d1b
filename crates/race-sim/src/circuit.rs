//! Everything a car shares with the other cars during one race.

use std::sync::Arc;
use std::time::Duration;

use race_core::RaceConfig;
use race_fleet::Fleet;
use race_sync::{PitStop, ReadyBarrier, StartGate, StopSign};
use race_track::{Intersection, RaceObserver};

use crate::SimResult;

/// The shared facilities of one race.
///
/// Built once per race and handed to every car unit behind an `Arc`.  Each
/// facility carries its own synchronization; none of them shares a lock
/// with another.
pub struct Circuit {
    pub fleet:             Arc<Fleet>,
    /// Start rendezvous, then terminal signals (reset in between).
    pub ready:             Arc<ReadyBarrier>,
    pub gate:              StartGate,
    pub pit:               PitStop,
    pub stop_sign:         StopSign,
    pub intersection:      Intersection,
    pub pit_hold:          Duration,
    pub intersection_hold: Duration,
}

impl Circuit {
    pub fn new(fleet: Arc<Fleet>, config: &RaceConfig, observer: Arc<dyn RaceObserver>) -> SimResult<Self> {
        config.validate()?;
        let ready = Arc::new(ReadyBarrier::new(fleet.len())?);
        let intersection = Intersection::new(Arc::clone(&fleet), Arc::clone(&ready))?
            .with_observer(observer);
        Ok(Self {
            fleet,
            ready,
            gate: StartGate::new(),
            pit: PitStop::new(config.pit_capacity)?,
            stop_sign: StopSign::new(),
            intersection,
            pit_hold: config.pit_hold(),
            intersection_hold: config.intersection_hold(),
        })
    }
}
