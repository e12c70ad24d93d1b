//! Race observer trait for progress reporting and data collection.

use race_core::CarId;

use crate::RaceSummary;

/// Callbacks invoked by the [`Intersection`][crate::Intersection] from
/// inside its critical section, so calls arrive in the same total order as
/// the notifications that caused them.
///
/// Callbacks run on car threads while the coordinator lock is held: keep
/// them short and never call back into the coordinator.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — crash counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct CrashCounter(AtomicUsize);
///
/// impl RaceObserver for CrashCounter {
///     fn on_crash(&self, crash_set: &[CarId]) {
///         self.0.fetch_add(crash_set.len(), Ordering::Relaxed);
///     }
/// }
/// ```
pub trait RaceObserver: Send + Sync {
    /// A car entered the intersection without conflict.
    fn on_enter(&self, _car: CarId) {}

    /// One entry produced a collision.  The entering car is last.
    fn on_crash(&self, _crash_set: &[CarId]) {}

    /// A car finished the race.
    fn on_finish(&self, _car: CarId, _position: u32) {}

    /// The last active car retired; called exactly once per race.
    fn on_race_end(&self, _summary: &RaceSummary) {}
}

/// A [`RaceObserver`] that does nothing.
pub struct NoopObserver;

impl RaceObserver for NoopObserver {}
