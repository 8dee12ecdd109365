use thiserror::Error;

/// Failure reported by an [`EffectExecutor`](crate::EffectExecutor).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EffectError {
    #[error("no effect registered for action {0:?}")]
    UnknownAction(String),

    #[error("action {action:?} touches unknown stat {stat:?}")]
    UnknownStat { action: String, stat: String },

    #[error("effect rejected: {0}")]
    Rejected(String),
}

pub type EffectResult<T> = Result<T, EffectError>;

/// Why an interaction session terminated abnormally.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionAbort {
    #[error("invalid cycle duration {0} min (must be positive)")]
    InvalidCycleDuration(i64),

    #[error("activity ended before interaction began")]
    WindowElapsed,

    #[error("target {0:?} no longer exists or is inactive")]
    TargetLost(String),

    #[error("effect failed: {0}")]
    EffectFailed(#[from] EffectError),
}
