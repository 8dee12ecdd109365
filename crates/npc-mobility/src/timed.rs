//! `TimedMovement` — a reference executor that only keeps time.
//!
//! Travel between locations takes the configured route time; approaching
//! an interactable inside the current location takes `approach_minutes`.
//! Every journey lasts at least one minute.  Goals can be marked blocked to
//! exercise the failure paths.

use tracing::trace;

use npc_behavior::MoveGoal;
use npc_core::{AgentId, TimeOfDay};

use crate::{MobilityError, MobilityResult, MovementConfig, MovementEvent, MovementExecutor, MovementState, NameSet};

pub struct TimedMovement {
    pub config: MovementConfig,
    /// Per-agent state, indexed by `AgentId`.
    states: Vec<MovementState>,
    blocked_locations: NameSet,
    blocked_targets:   NameSet,
}

impl TimedMovement {
    pub fn new(config: MovementConfig, agent_count: usize) -> Self {
        Self {
            config,
            states: vec![MovementState::default(); agent_count],
            blocked_locations: NameSet::default(),
            blocked_targets: NameSet::default(),
        }
    }

    /// Grow the state table to cover `agent_count` agents.
    pub fn ensure_agents(&mut self, agent_count: usize) {
        if self.states.len() < agent_count {
            self.states.resize(agent_count, MovementState::default());
        }
    }

    /// Any later `MoveTo(Location(name))` is reported blocked.
    pub fn block_location(&mut self, name: impl Into<String>) {
        self.blocked_locations.insert(name.into());
    }

    /// Any later `MoveTo(Target { target: name, .. })` is reported blocked.
    pub fn block_target(&mut self, name: impl Into<String>) {
        self.blocked_targets.insert(name.into());
    }

    pub fn unblock(&mut self, name: &str) {
        self.blocked_locations.remove(name);
        self.blocked_targets.remove(name);
    }

    pub fn state(&self, agent: AgentId) -> Option<&MovementState> {
        self.states.get(agent.index())
    }

    /// Journey progress for `agent` at `now`; `1.0` when idle or unknown.
    pub fn progress(&self, agent: AgentId, now: TimeOfDay) -> f64 {
        self.state(agent).map_or(1.0, |s| s.progress(now))
    }

    fn is_blocked(&self, goal: &MoveGoal) -> bool {
        match goal {
            MoveGoal::Location(name) => self.blocked_locations.contains(name),
            MoveGoal::Target { target, .. } => self.blocked_targets.contains(target),
        }
    }

    fn travel_minutes(&self, from: &str, goal: &MoveGoal) -> u64 {
        match goal {
            MoveGoal::Location(to) => self.config.travel_minutes(from, to),
            MoveGoal::Target { location, .. } => {
                self.config.travel_minutes(from, location) + self.config.approach_minutes
            }
        }
    }
}

impl MovementExecutor for TimedMovement {
    fn move_to(
        &mut self,
        agent: AgentId,
        from:  &str,
        goal:  &MoveGoal,
        now:   TimeOfDay,
    ) -> MobilityResult<()> {
        if agent.index() >= self.states.len() {
            return Err(MobilityError::UnknownAgent(agent));
        }
        let blocked = self.is_blocked(goal);
        let arrival = now + self.travel_minutes(from, goal).max(1);
        trace!(%agent, ?goal, %arrival, blocked, "movement issued");

        self.states[agent.index()] = MovementState {
            goal:      Some(goal.clone()),
            blocked,
            departure: now,
            arrival:   if blocked { now } else { arrival },
        };
        Ok(())
    }

    fn stop(&mut self, agent: AgentId) {
        if let Some(state) = self.states.get_mut(agent.index()) {
            *state = MovementState::default();
        }
    }

    fn poll(&mut self, now: TimeOfDay) -> Vec<MovementEvent> {
        let mut events = Vec::new();
        for (i, state) in self.states.iter_mut().enumerate() {
            let due = state.blocked || state.arrival <= now;
            if !due {
                continue;
            }
            let Some(goal) = state.goal.take() else {
                continue;
            };
            let agent = AgentId(i as u32);
            events.push(if state.blocked {
                MovementEvent::Blocked { agent, goal }
            } else {
                MovementEvent::Arrived { agent, goal }
            });
            *state = MovementState::default();
        }
        events
    }
}
