//! Notifications a car sends to the intersection, and the replies.

use race_core::CarId;

/// What a car reports to the [`Intersection`][crate::Intersection].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CrossingEvent {
    /// The car is driving into the intersection.
    Entering,
    /// The car has cleared the intersection.
    Exiting,
    /// The car finished its trip without crashing.
    Completed,
}

/// The coordinator's answer to one notification.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Notice {
    /// Entered without conflict; the car is now an occupant.
    Clear,
    /// Entering caused a collision.  Holds every car marked crashed by this
    /// entry, the entering car last.
    Crashed(Vec<CarId>),
    /// Left the intersection.
    Exited,
    /// The car was crashed while inside; its `Exiting` changes nothing.
    Ignored,
    /// The car finished the race in `position` (1-based).
    Finished { position: u32 },
}

impl Notice {
    /// `true` if this notice crashed `car`.
    pub fn crashed(&self, car: CarId) -> bool {
        matches!(self, Notice::Crashed(set) if set.contains(&car))
    }
}
