//! `npc-sim` — tick loop orchestrator for the rust_npc behavior core.
//!
//! # Tick loop
//!
//! ```text
//! step(now):
//!   ① Commands   — apply queued DecisionCommands (submitted since the last
//!                  tick, plus DecisionMaker::poll output).
//!   ② Movement   — MovementExecutor::poll → arrived / blocked triggers.
//!   ③ Selection  — per unlocked agent: Schedule::update; preempt the
//!                  machine if its activity is no longer current; start the
//!                  newly selected activity.
//!   ④ Sessions   — tick every live InteractionSession; terminations emit
//!                  feedback, return the machine to Waiting, and complete the
//!                  schedule's current activity.
//!   ⑤ Idle       — agents Waiting past the idle threshold emit a perception.
//!   ⑥ Dispatch   — deliver this tick's feedback and perceptions to the
//!                  DecisionMaker and the observer; advance the clock.
//! ```
//!
//! Machine transitions return exit/entry [`Intent`]s which the loop executes
//! immediately and in order against the movement executor and the session
//! slot, so resources are always released before they are reacquired.
//!
//! Nothing inside the loop is fatal to an agent: illegal or stale triggers
//! are logged and ignored, and every failure resolves to a phase change plus
//! an outbound event.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let (arena, rngs) = AgentArenaBuilder::new(config.seed)
//!     .start_time(config.start_time)
//!     .agent("ada", "house")
//!     .build();
//! let movement = TimedMovement::new(MovementConfig::default(), arena.count);
//! let mut sim = SimBuilder::new(config, arena, rngs, NoopDecisionMaker, movement, effects)
//!     .targets(targets)
//!     .schedules(activities)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```
//!
//! [`Intent`]: npc_behavior::Intent

pub mod builder;
pub mod error;
pub mod observer;
pub mod report;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use report::{PhaseChange, TickSummary};
pub use sim::Sim;
