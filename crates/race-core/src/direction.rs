//! Travel direction through the shared intersection.
//!
//! Two cars conflict if and only if their directions differ.  Cars sharing a
//! direction flow through the intersection side by side and never collide.

/// The axis along which a car crosses the intersection.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    NorthSouth,
    EastWest,
}

impl Direction {
    /// Every direction, in fleet-assignment order.
    pub const ALL: [Direction; 2] = [Direction::NorthSouth, Direction::EastWest];

    /// Direction for the `n`-th car of a fleet: directions alternate so a
    /// fleet of two or more always contains conflicting traffic.
    #[inline]
    pub fn alternating(n: usize) -> Direction {
        Self::ALL[n % Self::ALL.len()]
    }

    /// `true` if a car travelling `self` collides with one travelling `other`
    /// when both occupy the intersection.
    #[inline]
    pub fn conflicts_with(self, other: Direction) -> bool {
        self != other
    }

    /// Human-readable label for logs and tables.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::NorthSouth => "north-south",
            Direction::EastWest   => "east-west",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
