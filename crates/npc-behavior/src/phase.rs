//! Behavior phases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The state-machine state governing movement/interaction sequencing.
///
/// Exactly one phase is active per agent.  Agents spawn in `Waiting`; there
/// is no terminal phase.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorPhase {
    #[default]
    Waiting,
    /// Locked until the decision-maker resolves.
    WaitingForExternalDecision,
    MovingToLocation,
    MovingToInteractable,
    Interacting,
}

impl BehaviorPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorPhase::Waiting                    => "waiting",
            BehaviorPhase::WaitingForExternalDecision => "waiting_for_decision",
            BehaviorPhase::MovingToLocation           => "moving_to_location",
            BehaviorPhase::MovingToInteractable       => "moving_to_interactable",
            BehaviorPhase::Interacting                => "interacting",
        }
    }

    /// `true` for the two phases that own an in-flight movement command.
    #[inline]
    pub fn is_moving(self) -> bool {
        matches!(self, BehaviorPhase::MovingToLocation | BehaviorPhase::MovingToInteractable)
    }
}

impl fmt::Display for BehaviorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
