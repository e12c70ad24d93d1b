//! Fluent builder for [`Race`].
//!
//! # Usage
//!
//! ```rust,ignore
//! let race = RaceBuilder::new(fleet, config)
//!     .observer(Arc::new(MyObserver))
//!     .build()?;
//! ```

use std::sync::Arc;

use race_core::RaceConfig;
use race_fleet::Fleet;
use race_track::{NoopObserver, RaceObserver};

use crate::{Circuit, Race, SimResult};

pub struct RaceBuilder {
    fleet:    Fleet,
    config:   RaceConfig,
    observer: Arc<dyn RaceObserver>,
}

impl RaceBuilder {
    pub fn new(fleet: Fleet, config: RaceConfig) -> Self {
        Self { fleet, config, observer: Arc::new(NoopObserver) }
    }

    /// Attach an observer for crossings, crashes, finishes, and race end.
    pub fn observer(mut self, observer: Arc<dyn RaceObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Validate the config and allocate the race's shared circuit.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`](crate::SimError::Config) if the config fails
    /// validation, zero pit capacity included.
    pub fn build(self) -> SimResult<Race> {
        let circuit = Circuit::new(Arc::new(self.fleet), &self.config, self.observer)?;
        Ok(Race::new(circuit, self.config))
    }
}
