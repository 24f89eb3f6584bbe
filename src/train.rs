/// Retraining job interface.
///
/// The training pipeline itself is an external collaborator; this module
/// only defines the seam the API layer talks to, decoupling it from
/// process-launch mechanics. Implementations start a retraining run and
/// hand back an opaque job handle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logging::{self, Component};

/// New readings accumulated since the last run before retraining is
/// worthwhile.
pub const MIN_RECORDS_FOR_TRAINING: u64 = 10;

/// Handle to an asynchronously running training job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobHandle {
    pub job_id: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, PartialEq)]
pub enum TrainError {
    /// The trainer backend could not accept the job.
    Unavailable(String),
}

impl std::fmt::Display for TrainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainError::Unavailable(msg) => write!(f, "Trainer unavailable: {}", msg),
        }
    }
}

impl std::error::Error for TrainError {}

/// Starts retraining runs. One bounded attempt per trigger; callers poll
/// readiness separately via `needs_training`.
pub trait Trainer {
    fn trigger(&mut self) -> Result<JobHandle, TrainError>;
}

/// Whether enough new data has accumulated to justify a retraining run.
pub fn needs_training(new_records: u64) -> bool {
    new_records >= MIN_RECORDS_FOR_TRAINING
}

/// Trainer that records the request and mints a handle without launching
/// anything. Stands in wherever the real training backend is not wired up,
/// keeping the call sites identical.
pub struct LoggingTrainer {
    counter: u64,
}

impl LoggingTrainer {
    pub fn new() -> Self {
        Self { counter: 0 }
    }
}

impl Default for LoggingTrainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Trainer for LoggingTrainer {
    fn trigger(&mut self) -> Result<JobHandle, TrainError> {
        self.counter += 1;
        let handle = JobHandle {
            job_id: format!("train-{}", self.counter),
            started_at: Utc::now(),
        };
        logging::info(
            Component::System,
            Some(&handle.job_id),
            "Retraining triggered",
        );
        Ok(handle)
    }
}
