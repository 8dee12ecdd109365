//! The `DecisionMaker` trait — the seam to the external planner.

use npc_core::{ActivityId, AgentId, TimeOfDay};
use npc_schedule::Activity;

use crate::{DecisionContext, FeedbackRecord, PerceptionEvent};

/// An inbound instruction from the decision-maker.
///
/// Commands are queued and applied at the start of the next tick, never
/// while an agent is being stepped.
#[derive(Clone, Debug, PartialEq)]
pub enum DecisionCommand {
    /// `Schedule::add`: subject to priority rejection and push-back.
    Add(Activity),

    /// `Schedule::remove`.
    Remove(ActivityId),

    /// `Schedule::replace_all`: wholesale re-plan.
    ReplaceAll(Vec<Activity>),

    /// Answer a pending reactive decision.  Ignored unless the agent is
    /// locked in `WaitingForExternalDecision`.
    Resolve {
        accept:   bool,
        activity: Option<Activity>,
    },

    /// Preempt whatever the agent is doing and run `activity` now,
    /// regardless of priority.
    Override(Activity),
}

/// Pluggable decision service.
///
/// The simulation calls [`on_perception`](Self::on_perception) and
/// [`on_feedback`](Self::on_feedback) at the end of every tick for each
/// event emitted during it, then [`poll`](Self::poll) at the start of the
/// next tick to collect commands.  An implementation backed by a remote
/// service would send requests from the callbacks and return responses from
/// `poll` whenever they arrive.
///
/// # Example
///
/// ```rust,ignore
/// struct AlwaysNap;
///
/// impl DecisionMaker for AlwaysNap {
///     fn on_perception(&mut self, event: &PerceptionEvent, _ctx: &DecisionContext<'_>) -> bool {
///         self.pending.push(event.agent);
///         true
///     }
///
///     fn poll(&mut self, now: TimeOfDay) -> Vec<(AgentId, DecisionCommand)> {
///         self.pending.drain(..).map(|a| (a, nap_at(now))).collect()
///     }
/// }
/// ```
pub trait DecisionMaker: 'static {
    /// A perception fired for `event.agent`.
    ///
    /// Return `true` to take responsibility for a decision: the agent is
    /// locked in `WaitingForExternalDecision` until a
    /// [`DecisionCommand::Resolve`] (or an override) arrives.  Return
    /// `false` to leave the agent where it is.
    fn on_perception(&mut self, event: &PerceptionEvent, ctx: &DecisionContext<'_>) -> bool;

    /// An activity terminated.  Default: ignored.
    fn on_feedback(&mut self, _record: &FeedbackRecord) {}

    /// Commands ready for delivery.  Default: none.
    fn poll(&mut self, _now: TimeOfDay) -> Vec<(AgentId, DecisionCommand)> {
        vec![]
    }
}
