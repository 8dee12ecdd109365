//! Side effects requested by phase transitions.

/// Where a movement command should take the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveGoal {
    /// A named location (room, building, map cell group).
    Location(String),

    /// A named interactable inside `location`.
    Target {
        location: String,
        target:   String,
    },
}

/// An exit or entry action produced by a [`BehaviorMachine`] transition.
///
/// Intents are returned in execution order: every exit action of the phase
/// being left precedes every entry action of the phase being entered.
///
/// [`BehaviorMachine`]: crate::BehaviorMachine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Cancel any in-flight movement (exit action of both moving phases).
    StopMovement,

    /// Issue a movement command (entry action of both moving phases).
    MoveTo(MoveGoal),

    /// Begin an interaction session with `target` (entry action of
    /// `Interacting`).
    OpenInteraction { target: String },

    /// Tear down the interaction session (exit action of `Interacting`).
    CloseInteraction,
}
