//! Per-frame read-only agent snapshot.

use serde::Serialize;

use npc_behavior::BehaviorPhase;
use npc_core::{ActivityId, AgentId};

/// What a UI polls each frame: phase, current activity, interaction
/// progress.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AgentView {
    pub agent:    AgentId,
    pub name:     String,
    pub location: String,
    pub phase:    BehaviorPhase,
    pub locked:   bool,
    pub activity: Option<ActivityId>,
    pub action:   Option<String>,
    /// Fraction of the current interaction cycle, while interacting.
    pub progress: Option<f64>,
    pub upcoming: Option<ActivityId>,
}
