//! CSV activity loader.
//!
//! # CSV format
//!
//! One row per activity.  `start` / `end` accept `HH:MM` or `dN HH:MM`.
//! `flexible`, `reference_id`, and `rationale` may be left empty.
//!
//! ```csv
//! agent_id,activity_id,action,location,target,start,end,priority,flexible,reference_id,rationale
//! 0,1,sleep,house,bed,00:00,06:59,3,false,,
//! 0,2,eat,tavern,table,07:00,07:30,2,true,mem-17,hungry after waking
//! 1,1,work,smithy,anvil,08:00,12:00,4,,,
//! ```
//!
//! The loader returns raw per-agent lists in file order.  It does **not**
//! resolve conflicts; feed each list through [`Schedule::add`] so priority
//! rejection and push-back apply exactly as they would for live planning.
//!
//! [`Schedule::add`]: crate::Schedule::add

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use npc_core::{ActivityId, TimeOfDay};

use crate::{Activity, ActivityPayload, ScheduleError};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ActivityRecord {
    agent_id:     u32,
    activity_id:  u32,
    action:       String,
    location:     String,
    target:       String,
    start:        String,
    end:          String,
    priority:     i32,
    flexible:     Option<bool>,
    reference_id: Option<String>,
    rationale:    Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load per-agent activity lists from a CSV file.
///
/// Returns a `Vec` of length `agent_count`, indexed by `AgentId`.  Agents
/// with no rows receive an empty list; rows for agents `>= agent_count` are
/// an error.
pub fn load_activities_csv(
    path:        &Path,
    agent_count: usize,
) -> Result<Vec<Vec<Activity>>, ScheduleError> {
    let file = std::fs::File::open(path)?;
    load_activities_reader(file, agent_count)
}

/// Like [`load_activities_csv`] but accepts any `Read` source.
pub fn load_activities_reader<R: Read>(
    reader:      R,
    agent_count: usize,
) -> Result<Vec<Vec<Activity>>, ScheduleError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_agent: HashMap<u32, Vec<Activity>> = HashMap::new();

    for result in csv_reader.deserialize::<ActivityRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        if row.agent_id as usize >= agent_count {
            return Err(ScheduleError::Parse(format!(
                "agent_id {} out of range (agent_count = {agent_count})",
                row.agent_id
            )));
        }
        let agent_id = row.agent_id;
        by_agent.entry(agent_id).or_default().push(to_activity(row)?);
    }

    Ok((0..agent_count as u32)
        .map(|i| by_agent.remove(&i).unwrap_or_default())
        .collect())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn to_activity(row: ActivityRecord) -> Result<Activity, ScheduleError> {
    let start = parse_time(&row.start)?;
    let end = parse_time(&row.end)?;

    let mut activity = Activity::new(ActivityId(row.activity_id), row.action, start, end, row.priority)
        .at(row.location, row.target)
        .flexible(row.flexible.unwrap_or(false));

    if let Some(reference_id) = row.reference_id.filter(|r| !r.is_empty()) {
        activity = activity.with_reference(reference_id);
    }
    if let Some(rationale) = row.rationale.filter(|r| !r.is_empty()) {
        activity = activity.with_payload(ActivityPayload {
            rationale: Some(rationale),
            ..ActivityPayload::default()
        });
    }
    Ok(activity)
}

fn parse_time(s: &str) -> Result<TimeOfDay, ScheduleError> {
    s.parse::<TimeOfDay>()
        .map_err(|e| ScheduleError::Parse(e.to_string()))
}
