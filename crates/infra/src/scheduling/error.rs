//! Scheduler error types

use smartcon_domain::SmartconError;
use thiserror::Error;

use crate::errors::InfraError;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Scheduler already running")]
    AlreadyRunning,

    #[error("Scheduler not running")]
    NotRunning,

    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let smartcon_err = match err {
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                SmartconError::InvalidInput(err.to_string())
            }
            _ => SmartconError::Internal(err.to_string()),
        };
        InfraError(smartcon_err)
    }
}

impl From<SchedulerError> for SmartconError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
