//! Plain data row types written by output backends.
//!
//! Times are written twice: `time` as absolute simulated minutes (sortable,
//! joinable) and `clock` as the `HH:MM` / `dN HH:MM` rendering.

use npc_agent::AgentView;
use npc_behavior::{FeedbackRecord, PerceptionEvent};
use npc_core::TimeOfDay;
use npc_sim::TickSummary;

use crate::OutputResult;

/// One activity outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRow {
    pub agent_id:     u32,
    pub activity_id:  u32,
    pub time:         u64,
    pub clock:        String,
    pub action:       String,
    pub location:     String,
    pub target:       String,
    pub success:      bool,
    pub description:  String,
    /// Applied stat deltas as a JSON object, e.g. `{"hunger":-5.0}`.
    pub deltas:       String,
    /// Empty when the activity carried no reference.
    pub reference_id: String,
}

impl FeedbackRow {
    pub fn from_record(record: &FeedbackRecord) -> OutputResult<Self> {
        Ok(Self {
            agent_id:     record.agent.0,
            activity_id:  record.activity.0,
            time:         record.time.0,
            clock:        record.time.to_string(),
            action:       record.action.clone(),
            location:     record.location.clone(),
            target:       record.target.clone(),
            success:      record.success,
            description:  record.description.clone(),
            deltas:       serde_json::to_string(&record.deltas)?,
            reference_id: record.reference_id.clone().unwrap_or_default(),
        })
    }
}

/// One perception event.
#[derive(Debug, Clone, PartialEq)]
pub struct PerceptionRow {
    pub agent_id:    u32,
    pub time:        u64,
    pub clock:       String,
    pub kind:        &'static str,
    pub location:    String,
    pub description: String,
    /// The failed activity, for movement perceptions.
    pub activity_id: Option<u32>,
}

impl From<&PerceptionEvent> for PerceptionRow {
    fn from(event: &PerceptionEvent) -> Self {
        Self {
            agent_id:    event.agent.0,
            time:        event.time.0,
            clock:       event.time.to_string(),
            kind:        event.kind.as_str(),
            location:    event.location.clone(),
            description: event.description.clone(),
            activity_id: event.activity.map(|a| a.0),
        }
    }
}

/// Summary counters for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:          u64,
    pub time:          u64,
    pub started:       u64,
    pub phase_changes: u64,
    pub feedback:      u64,
    pub perceptions:   u64,
    pub interacting:   u64,
    pub locked:        u64,
}

impl From<&TickSummary> for TickSummaryRow {
    fn from(s: &TickSummary) -> Self {
        Self {
            tick:          s.tick,
            time:          s.time.0,
            started:       s.started as u64,
            phase_changes: s.phase_changes as u64,
            feedback:      s.feedback as u64,
            perceptions:   s.perceptions as u64,
            interacting:   s.interacting as u64,
            locked:        s.locked as u64,
        }
    }
}

/// A snapshot of one agent at a given tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id:    u32,
    pub tick:        u64,
    pub time:        u64,
    pub name:        String,
    pub location:    String,
    pub phase:       &'static str,
    pub locked:      bool,
    pub activity_id: Option<u32>,
    pub action:      Option<String>,
    /// Fraction of the current interaction cycle, while interacting.
    pub progress:    Option<f64>,
}

impl AgentSnapshotRow {
    pub fn from_view(view: &AgentView, tick: u64, now: TimeOfDay) -> Self {
        Self {
            agent_id:    view.agent.0,
            tick,
            time:        now.0,
            name:        view.name.clone(),
            location:    view.location.clone(),
            phase:       view.phase.as_str(),
            locked:      view.locked,
            activity_id: view.activity.map(|a| a.0),
            action:      view.action.clone(),
            progress:    view.progress,
        }
    }
}
