//! The `Intersection` coordinator.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use race_core::CarId;
use race_fleet::{Car, Fleet};
use race_sync::ReadyBarrier;
use tracing::{debug, info, trace, warn};

use crate::{CrossingEvent, NoopObserver, Notice, RaceObserver, RaceSummary, TrackError, TrackResult};

// ── Critical-section state ────────────────────────────────────────────────────

/// Everything guarded by the coordinator lock.
struct TrackState {
    /// Cars currently inside the intersection.  Invariant: `c` is here iff
    /// `c.in_intersection()` and `!c.is_crashed()`.
    occupants:     BTreeSet<CarId>,
    /// Cars that have neither completed nor crashed.
    active:        BTreeSet<CarId>,
    crashed:       usize,
    /// Finish position handed to the next car that completes.
    next_position: u32,
    finish_order:  Vec<CarId>,
    summary:       Option<RaceSummary>,
}

// ── Intersection ──────────────────────────────────────────────────────────────

/// Single source of truth for who is inside the intersection.
///
/// One `Intersection` is built per race and shared (`Arc`) by every car.
/// [`notify`](Self::notify) applies each car's [`CrossingEvent`] under one
/// mutex, computing crash sets, awarding finish positions, and raising the
/// car's terminal signal on the shared [`ReadyBarrier`] when it retires.
///
/// Terminal signals are raised after the lock is released, so the
/// coordinator never holds its own lock and a barrier lock together.
pub struct Intersection {
    fleet:     Arc<Fleet>,
    ready:     Arc<ReadyBarrier>,
    observer:  Arc<dyn RaceObserver>,
    crossings: AtomicU64,
    state:     Mutex<TrackState>,
}

impl Intersection {
    /// Build a coordinator for `fleet`.  `ready` must have one participant
    /// per car: it receives each car's terminal signal.
    pub fn new(fleet: Arc<Fleet>, ready: Arc<ReadyBarrier>) -> TrackResult<Self> {
        if ready.participants() != fleet.len() {
            return Err(TrackError::ParticipantMismatch {
                barrier: ready.participants(),
                fleet:   fleet.len(),
            });
        }
        let active = fleet.ids().into_iter().collect();
        Ok(Self {
            fleet,
            ready,
            observer:  Arc::new(NoopObserver),
            crossings: AtomicU64::new(0),
            state:     Mutex::new(TrackState {
                occupants:     BTreeSet::new(),
                active,
                crashed:       0,
                next_position: 1,
                finish_order:  Vec::new(),
                summary:       None,
            }),
        })
    }

    /// Replace the default [`NoopObserver`].
    pub fn with_observer(mut self, observer: Arc<dyn RaceObserver>) -> Self {
        self.observer = observer;
        self
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Apply one notification from `car`.
    ///
    /// # Errors
    ///
    /// Only caller contract violations: entering twice, exiting without
    /// entering, completing while inside, or notifying after a terminal
    /// state.  Collisions are reported as [`Notice::Crashed`].
    pub fn notify(&self, car: CarId, event: CrossingEvent) -> TrackResult<Notice> {
        let entry = self.fleet.car(car)?;

        let (notice, retired) = {
            let mut state = self.state.lock();
            match event {
                CrossingEvent::Entering  => self.enter(&mut state, entry)?,
                CrossingEvent::Exiting   => (self.exit(&mut state, entry)?, Vec::new()),
                CrossingEvent::Completed => self.complete(&mut state, entry)?,
            }
        };

        for retired_car in retired {
            self.ready.signal_ready(retired_car)?;
        }
        Ok(notice)
    }

    /// Total accepted `Entering` notifications.
    #[inline]
    pub fn crossings(&self) -> u64 {
        self.crossings.load(Ordering::Relaxed)
    }

    /// Cars currently inside, ascending by id.
    pub fn occupants(&self) -> Vec<CarId> {
        self.state.lock().occupants.iter().copied().collect()
    }

    /// Cars that have not yet completed or crashed.
    pub fn active(&self) -> usize {
        self.state.lock().active.len()
    }

    pub fn crashed(&self) -> usize {
        self.state.lock().crashed
    }

    /// Final counters; `None` until the last active car retires.
    pub fn summary(&self) -> Option<RaceSummary> {
        self.state.lock().summary.clone()
    }

    // ── Event handlers (lock held) ────────────────────────────────────────

    fn enter(&self, state: &mut TrackState, car: &Car) -> TrackResult<(Notice, Vec<CarId>)> {
        let id = car.id();
        if car.is_crashed() || !state.active.contains(&id) {
            return Err(TrackError::AfterTerminal { car: id, event: CrossingEvent::Entering });
        }
        if state.occupants.contains(&id) {
            return Err(TrackError::DoubleEntry(id));
        }
        self.crossings.fetch_add(1, Ordering::Relaxed);

        let direction = car.direction();
        let mut crash_set: Vec<CarId> = state
            .occupants
            .iter()
            .copied()
            .filter(|&other| {
                self.fleet
                    .get(other)
                    .is_some_and(|o| o.direction().conflicts_with(direction))
            })
            .collect();

        if crash_set.is_empty() {
            state.occupants.insert(id);
            trace!(car = %id, %direction, occupants = state.occupants.len(), "entered intersection");
            self.observer.on_enter(id);
            return Ok((Notice::Clear, Vec::new()));
        }

        crash_set.push(id);
        for &victim in &crash_set {
            state.occupants.remove(&victim);
            state.active.remove(&victim);
            if self.fleet.car(victim)?.mark_crashed() {
                state.crashed += 1;
            }
        }
        warn!(car = %id, %direction, crash_set = ?crash_set, "collision in intersection");
        self.observer.on_crash(&crash_set);
        self.record_summary_if_done(state);

        Ok((Notice::Crashed(crash_set.clone()), crash_set))
    }

    fn exit(&self, state: &mut TrackState, car: &Car) -> TrackResult<Notice> {
        let id = car.id();
        if car.is_crashed() {
            // Crashed by another car's entry while inside; already removed.
            return Ok(Notice::Ignored);
        }
        if !state.occupants.remove(&id) {
            return Err(TrackError::ExitWithoutEntry(id));
        }
        trace!(car = %id, "left intersection");
        Ok(Notice::Exited)
    }

    fn complete(&self, state: &mut TrackState, car: &Car) -> TrackResult<(Notice, Vec<CarId>)> {
        let id = car.id();
        if car.is_crashed() || !state.active.contains(&id) {
            return Err(TrackError::AfterTerminal { car: id, event: CrossingEvent::Completed });
        }
        if state.occupants.contains(&id) {
            return Err(TrackError::StillInside(id));
        }

        let position = state.next_position;
        car.assign_finish(position)?;
        state.next_position += 1;
        state.active.remove(&id);
        state.finish_order.push(id);

        debug!(car = %id, position, pit_stops = car.pit_stops(), "finished");
        self.observer.on_finish(id, position);
        self.record_summary_if_done(state);

        Ok((Notice::Finished { position }, vec![id]))
    }

    fn record_summary_if_done(&self, state: &mut TrackState) {
        if !state.active.is_empty() || state.summary.is_some() {
            return;
        }
        let summary = RaceSummary {
            cars:         self.fleet.len(),
            completed:    state.finish_order.len(),
            crashed:      state.crashed,
            crossings:    self.crossings(),
            finish_order: state.finish_order.clone(),
        };
        info!(
            completed = summary.completed,
            crashed = summary.crashed,
            crossings = summary.crossings,
            "race over"
        );
        self.observer.on_race_end(&summary);
        state.summary = Some(summary);
    }
}
