//! Per-tick records handed to observers.

use serde::Serialize;

use npc_behavior::BehaviorPhase;
use npc_core::{AgentId, TimeOfDay};

/// One agent changed phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseChange {
    pub agent: AgentId,
    pub time:  TimeOfDay,
    pub from:  BehaviorPhase,
    pub to:    BehaviorPhase,
}

/// Counters for one processed tick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    pub tick:          u64,
    pub time:          TimeOfDay,
    /// Activities newly started this tick.
    pub started:       usize,
    pub phase_changes: usize,
    pub feedback:      usize,
    pub perceptions:   usize,
    /// Agents with a live interaction session at the end of the tick.
    pub interacting:   usize,
    /// Agents locked awaiting a decision at the end of the tick.
    pub locked:        usize,
}
