use npc_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("agent {0} is not known to the movement executor")]
    UnknownAgent(AgentId),

    #[error("movement configuration error: {0}")]
    Config(String),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
