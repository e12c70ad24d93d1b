//! Strongly typed car identifier.
//!
//! Cars live in a fixed arena (`race_fleet::Fleet`) and are referenced by
//! index everywhere else, so `CarId` is a zero-cost `u32` wrapper that is
//! `Copy + Ord + Hash` and converts to `usize` for direct indexing.

use std::fmt;

/// Index of a car in the fleet arena.  Max ~4.3 billion cars.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarId(pub u32);

impl CarId {
    /// Sentinel meaning "no valid car" — equivalent to `u32::MAX`.
    pub const INVALID: CarId = CarId(u32::MAX);

    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for CarId {
    /// Returns the `INVALID` sentinel so uninitialized ids are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Car({})", self.0)
    }
}

impl From<CarId> for usize {
    #[inline(always)]
    fn from(id: CarId) -> usize {
        id.0 as usize
    }
}

impl TryFrom<usize> for CarId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<CarId, Self::Error> {
        u32::try_from(n).map(CarId)
    }
}
