//! A decision-maker that never takes a decision.

use crate::{DecisionContext, DecisionMaker, PerceptionEvent};

/// Declines every perception, so agents are never locked and simply follow
/// their schedules.
pub struct NoopDecisionMaker;

impl DecisionMaker for NoopDecisionMaker {
    fn on_perception(&mut self, _event: &PerceptionEvent, _ctx: &DecisionContext<'_>) -> bool {
        false
    }
}
