use npc_core::{AgentId, CoreError};
use npc_mobility::MobilityError;
use npc_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("agent {0} does not exist")]
    UnknownAgent(AgentId),

    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("movement error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
