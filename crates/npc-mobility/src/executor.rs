//! The `MovementExecutor` trait — the seam to whatever moves agents.

use npc_behavior::MoveGoal;
use npc_core::{AgentId, TimeOfDay};

use crate::MobilityResult;

/// Asynchronous completion of a movement command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MovementEvent {
    Arrived { agent: AgentId, goal: MoveGoal },
    Blocked { agent: AgentId, goal: MoveGoal },
}

impl MovementEvent {
    pub fn agent(&self) -> AgentId {
        match self {
            MovementEvent::Arrived { agent, .. } | MovementEvent::Blocked { agent, .. } => *agent,
        }
    }
}

/// Moves agents.  Implementations range from a timer table (see
/// [`TimedMovement`](crate::TimedMovement)) to a real pathfinder.
pub trait MovementExecutor {
    /// Start moving `agent` from `from` toward `goal`.  A new command
    /// replaces any in-flight one for the same agent.
    fn move_to(
        &mut self,
        agent: AgentId,
        from:  &str,
        goal:  &MoveGoal,
        now:   TimeOfDay,
    ) -> MobilityResult<()>;

    /// Cancel any in-flight movement.  No event is produced.  Stopping an
    /// idle agent is a no-op.
    fn stop(&mut self, agent: AgentId);

    /// Events that have become due by `now`, in agent order.
    fn poll(&mut self, now: TimeOfDay) -> Vec<MovementEvent>;
}
