use npc_core::{ActivityId, TimeOfDay};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("activity {0} is already scheduled")]
    DuplicateId(ActivityId),

    #[error("activity {id} (priority {priority}) rejected: conflicts with more important {blocker} (priority {blocker_priority})")]
    RejectedByPriority {
        id:               ActivityId,
        priority:         i32,
        blocker:          ActivityId,
        blocker_priority: i32,
    },

    #[error("activity {id} has an empty window: {start} .. {end}")]
    InvalidWindow {
        id:    ActivityId,
        start: TimeOfDay,
        end:   TimeOfDay,
    },

    #[error("schedule parse error: {0}")]
    Parse(String),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
