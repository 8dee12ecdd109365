//! `AgentArena` (per-agent state) and `AgentRngs` (per-agent RNG).
//!
//! RNGs live in their own struct so the simulation can hold `&mut AgentRngs`
//! while reading the arena, e.g. to pick an alternate target from
//! `arena.locations[i]` with `rngs.get_mut(agent)`.

use npc_behavior::BehaviorMachine;
use npc_core::{AgentId, AgentRng, TimeOfDay};
use npc_interaction::{InteractionSession, StatBlock};
use npc_schedule::Schedule;

use crate::AgentView;

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separate from [`AgentArena`].
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentArena ────────────────────────────────────────────────────────────────

/// Parallel per-agent vectors.
///
/// Every `Vec` has exactly `count` elements and `AgentId` is the index into
/// all of them.
pub struct AgentArena {
    pub count: usize,

    pub names: Vec<String>,

    /// Where each agent currently stands.  Updated on arrival events only.
    pub locations: Vec<String>,

    pub schedules: Vec<Schedule>,

    pub machines: Vec<BehaviorMachine>,

    /// `Some` only while the agent's machine is `Interacting`.
    pub sessions: Vec<Option<InteractionSession>>,

    pub stats: Vec<StatBlock>,
}

impl AgentArena {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// Find an agent by name.
    pub fn find(&self, name: &str) -> Option<AgentId> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| AgentId::try_from(i).ok())
    }

    /// Read-only snapshot of one agent, or `None` if out of range.
    pub fn view(&self, agent: AgentId) -> Option<AgentView> {
        if !self.contains(agent) {
            return None;
        }
        let i = agent.index();
        let machine = &self.machines[i];
        let schedule = &self.schedules[i];

        // Prefer what the machine is servicing; fall back to the schedule's
        // selection (they differ only transiently within a tick).
        let (activity, action) = match machine.engagement() {
            Some(e) => (Some(e.activity), Some(e.action_name.clone())),
            None => match schedule.current_activity() {
                Some(a) => (Some(a.id), Some(a.action_name.clone())),
                None => (None, None),
            },
        };

        Some(AgentView {
            agent,
            name:     self.names[i].clone(),
            location: self.locations[i].clone(),
            phase:    machine.phase(),
            locked:   machine.is_locked(),
            activity,
            action,
            progress: self.sessions[i].as_ref().map(InteractionSession::progress),
            upcoming: schedule.upcoming(),
        })
    }

    /// Append an agent spawned at `now`.  Returns its id.
    pub(crate) fn push(
        &mut self,
        name:          String,
        location:      String,
        stats:         StatBlock,
        push_back_gap: u64,
        now:           TimeOfDay,
    ) -> AgentId {
        let id = AgentId(self.count as u32);
        self.names.push(name);
        self.locations.push(location);
        self.schedules.push(Schedule::with_gap(push_back_gap));
        self.machines.push(BehaviorMachine::new(now));
        self.sessions.push(None);
        self.stats.push(stats);
        self.count += 1;
        id
    }

    pub(crate) fn empty() -> Self {
        Self {
            count:     0,
            names:     Vec::new(),
            locations: Vec::new(),
            schedules: Vec::new(),
            machines:  Vec::new(),
            sessions:  Vec::new(),
            stats:     Vec::new(),
        }
    }
}
