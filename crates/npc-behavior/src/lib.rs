//! `npc-behavior` — the per-agent behavior state machine and the seam to the
//! external decision-maker.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`phase`]    | `BehaviorPhase` enum                                              |
//! | [`machine`]  | `BehaviorMachine`, `Engagement`, `Transition`, `Blocked`          |
//! | [`intent`]   | `Intent` (exit/entry actions), `MoveGoal`                         |
//! | [`event`]    | `FeedbackRecord`, `PerceptionEvent`, `PerceptionKind`             |
//! | [`channel`]  | `EventChannel`, `OutboundEvent` — per-tick outbound buffer        |
//! | [`decision`] | `DecisionMaker` trait, `DecisionCommand`                          |
//! | [`context`]  | `DecisionContext<'a>` — read-only view handed to the decision-maker |
//! | [`noop`]     | `NoopDecisionMaker` — declines every perception                   |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                              |
//!
//! # Design notes
//!
//! The machine never talks to a collaborator directly.  Every trigger
//! returns a [`Transition`] whose `intents` list the old phase's exit
//! actions followed by the new phase's entry actions; npc-sim executes them
//! in that order against the movement executor and the interaction layer.
//!
//! ```text
//!            start (location differs)            arrived_at_location
//!  Waiting ─────────────────────────▶ MovingToLocation ───────────────┐
//!     │  ▲   start (already there)                                    ▼
//!     │  └──────────────────────────── MovingToInteractable ◀── blocked, alternate
//!     │  ▲ finish / blocked, none           │ arrived_at_target
//!     │  └─────────────────────────── Interacting ◀┘
//!     │ idle ≥ threshold, decision-maker accepts
//!     ▼
//!  WaitingForExternalDecision  (locked until resolve)
//! ```

pub mod channel;
pub mod context;
pub mod decision;
pub mod error;
pub mod event;
pub mod intent;
pub mod machine;
pub mod noop;
pub mod phase;

#[cfg(test)]
mod tests;

pub use channel::{EventChannel, OutboundEvent};
pub use context::DecisionContext;
pub use decision::{DecisionCommand, DecisionMaker};
pub use error::{BehaviorError, BehaviorResult};
pub use event::{FeedbackRecord, PerceptionEvent, PerceptionKind};
pub use intent::{Intent, MoveGoal};
pub use machine::{BehaviorMachine, Blocked, Engagement, Transition};
pub use noop::NoopDecisionMaker;
pub use phase::BehaviorPhase;
