//! Persistence hook: the activity list and current selection, verbatim.
//!
//! The core does not decide where snapshots are stored.  It hands out a
//! plain serde structure plus JSON helpers; save-game code can embed the
//! struct in its own format instead.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use npc_core::ActivityId;

use crate::{Activity, ScheduleResult};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub current: Option<ActivityId>,
}

impl ScheduleSnapshot {
    pub fn to_json(&self) -> ScheduleResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> ScheduleResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> ScheduleResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: R) -> ScheduleResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}
