//! Simulation observer trait for progress reporting and data collection.

use npc_agent::AgentArena;
use npc_behavior::{FeedbackRecord, PerceptionEvent};
use npc_core::TimeOfDay;

use crate::{PhaseChange, TickSummary};

/// Callbacks invoked by [`Sim::step`](crate::Sim::step) and
/// [`Sim::run`](crate::Sim::run).
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Event callbacks fire during the
/// dispatch stage at the end of the tick, in emission order.
///
/// # Example — feedback printer
///
/// ```rust,ignore
/// struct PrintFeedback;
///
/// impl SimObserver for PrintFeedback {
///     fn on_feedback(&mut self, record: &FeedbackRecord) {
///         println!("{} {}: {}", record.time, record.action, record.description);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each processed tick.
    fn on_tick_start(&mut self, _tick: u64, _now: TimeOfDay) {}

    fn on_phase_change(&mut self, _change: &PhaseChange) {}

    fn on_feedback(&mut self, _record: &FeedbackRecord) {}

    fn on_perception(&mut self, _event: &PerceptionEvent) {}

    /// Called at the end of each processed tick.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called every `config.output_interval_ticks` ticks with read-only
    /// access to every agent.
    fn on_snapshot(&mut self, _tick: u64, _now: TimeOfDay, _agents: &AgentArena) {}

    /// Called once when [`Sim::run`](crate::Sim::run) returns.
    fn on_sim_end(&mut self, _now: TimeOfDay) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
