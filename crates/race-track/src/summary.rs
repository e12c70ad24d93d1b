use race_core::CarId;

/// Final counters, recorded by the coordinator once no car is active.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaceSummary {
    /// Fleet size.
    pub cars:         usize,
    pub completed:    usize,
    pub crashed:      usize,
    /// Total `Entering` notifications accepted.
    pub crossings:    u64,
    /// Completed cars in finishing order; `finish_order[0]` won.
    pub finish_order: Vec<CarId>,
}

impl RaceSummary {
    /// The winner, if anyone finished.
    pub fn winner(&self) -> Option<CarId> {
        self.finish_order.first().copied()
    }
}
