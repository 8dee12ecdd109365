//! Per-agent movement state.

use npc_behavior::MoveGoal;
use npc_core::TimeOfDay;

/// The movement state for a single agent.
///
/// `goal` is `Some` while a command is in flight.  A blocked command keeps
/// its goal until `poll` reports it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementState {
    pub goal:      Option<MoveGoal>,
    pub blocked:   bool,
    pub departure: TimeOfDay,
    pub arrival:   TimeOfDay,
}

impl MovementState {
    #[inline]
    pub fn in_transit(&self) -> bool {
        self.goal.is_some() && !self.blocked
    }

    /// Fraction of the journey completed at `now`, in `[0, 1]`.
    ///
    /// `1.0` for idle agents or once `now >= arrival`.
    pub fn progress(&self, now: TimeOfDay) -> f64 {
        if !self.in_transit() || self.arrival <= self.departure {
            return 1.0;
        }
        let elapsed = now.since(self.departure) as f64;
        let total = (self.arrival - self.departure) as f64;
        (elapsed / total).min(1.0)
    }
}
