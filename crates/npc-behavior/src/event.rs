//! Outbound records: activity outcomes and perceptions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use npc_core::{ActivityId, AgentId, TimeOfDay};

use crate::Engagement;

// ── FeedbackRecord ────────────────────────────────────────────────────────────

/// Outcome of one activity termination, normal or abnormal.
///
/// Exactly one record is produced per termination.  `deltas` carries the
/// cumulative effect actually applied (after clamping), keyed by stat name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub agent:        AgentId,
    pub activity:     ActivityId,
    pub time:         TimeOfDay,
    pub location:     String,
    pub target:       String,
    pub action:       String,
    pub success:      bool,
    pub description:  String,
    #[serde(default)]
    pub deltas:       BTreeMap<String, f64>,
    #[serde(default)]
    pub reference_id: Option<String>,
}

impl FeedbackRecord {
    /// A record describing `engagement`, with no effect deltas.
    pub fn for_engagement(
        agent:       AgentId,
        time:        TimeOfDay,
        engagement:  &Engagement,
        success:     bool,
        description: impl Into<String>,
    ) -> Self {
        Self {
            agent,
            activity:     engagement.activity,
            time,
            location:     engagement.location_name.clone(),
            target:       engagement.target_name.clone(),
            action:       engagement.action_name.clone(),
            success,
            description:  description.into(),
            deltas:       BTreeMap::new(),
            reference_id: engagement.reference_id.clone(),
        }
    }

    pub fn with_deltas(mut self, deltas: BTreeMap<String, f64>) -> Self {
        self.deltas = deltas;
        self
    }
}

// ── PerceptionEvent ───────────────────────────────────────────────────────────

/// Why a perception was raised.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerceptionKind {
    /// The agent has sat in `Waiting` for the configured idle threshold.
    IdleTimeout,
    /// Movement to the target was blocked and no alternate exists.
    NoReachableInteractable,
    /// Movement to the activity's location was blocked.
    NoPathToLocation,
}

impl PerceptionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PerceptionKind::IdleTimeout             => "idle_timeout",
            PerceptionKind::NoReachableInteractable => "no_reachable_interactable",
            PerceptionKind::NoPathToLocation        => "no_path_to_location",
        }
    }
}

impl fmt::Display for PerceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something happened that may warrant a new decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerceptionEvent {
    pub agent:       AgentId,
    pub time:        TimeOfDay,
    pub kind:        PerceptionKind,
    /// Where the agent is standing when the perception fires.
    pub location:    String,
    pub description: String,
    /// The activity that failed, for movement perceptions.
    #[serde(default)]
    pub activity:    Option<ActivityId>,
}
