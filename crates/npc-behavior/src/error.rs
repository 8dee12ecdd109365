use thiserror::Error;

use crate::BehaviorPhase;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("`{trigger}` rejected: agent is locked awaiting an external decision")]
    Locked { trigger: &'static str },

    #[error("`{trigger}` is not legal in phase {phase}")]
    IllegalTrigger {
        phase:   BehaviorPhase,
        trigger: &'static str,
    },

    #[error("`{trigger}` requires an activity in service")]
    NotServicing { trigger: &'static str },
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
