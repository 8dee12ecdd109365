//! Read-only state handed to the decision-maker with each perception.

use npc_core::{AgentId, TimeOfDay};
use npc_schedule::Schedule;

use crate::BehaviorPhase;

/// A borrowed view of one agent at dispatch time.
///
/// Built by npc-sim at the end of a tick; nothing in it can be mutated while
/// the decision-maker holds it.  To change the agent, return a
/// [`DecisionCommand`](crate::DecisionCommand) from
/// [`DecisionMaker::poll`](crate::DecisionMaker::poll).
pub struct DecisionContext<'a> {
    pub now:      TimeOfDay,
    pub agent:    AgentId,
    pub name:     &'a str,
    pub phase:    BehaviorPhase,
    pub location: &'a str,
    pub schedule: &'a Schedule,
}

impl<'a> DecisionContext<'a> {
    #[inline]
    pub fn new(
        now:      TimeOfDay,
        agent:    AgentId,
        name:     &'a str,
        phase:    BehaviorPhase,
        location: &'a str,
        schedule: &'a Schedule,
    ) -> Self {
        Self { now, agent, name, phase, location, schedule }
    }
}
