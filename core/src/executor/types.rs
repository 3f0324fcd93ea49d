use serde::Serialize;

use crate::config::BatchConfig;
use crate::error::BatchError;

/// Execution options for a batch run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOpts {
    /// Cap on in-flight requests; `None` dispatches every eligible task at once.
    pub max_concurrency: Option<usize>,
    pub progress_bar: bool,
}

impl ExecutionOpts {
    pub fn from_config(cfg: &BatchConfig) -> Self {
        Self {
            max_concurrency: cfg.max_concurrency,
            progress_bar: cfg.progress_bar,
        }
    }

    pub fn validate(&self) -> Result<(), BatchError> {
        if self.max_concurrency == Some(0) {
            return Err(BatchError::Config(
                "max_concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// One request to dispatch.
#[derive(Debug, Clone)]
pub struct DispatchJob {
    pub task_id: String,
    /// Display label for progress output.
    pub title: String,
    pub prompt: String,
}

/// Settlement of one dispatched request.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub task_id: String,
    /// Image reference, or the failure message recorded on the task.
    pub result: Result<String, String>,
    pub duration_ms: u64,
}

/// Summary of one engine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: String,
    /// Tasks moved to pending by this run.
    pub dispatched: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Tasks left out because they were already finished or in flight.
    pub skipped: usize,
    pub duration_ms: u64,
}

impl RunReport {
    pub(crate) fn empty(run_id: String, skipped: usize) -> Self {
        Self {
            run_id,
            dispatched: 0,
            succeeded: 0,
            failed: 0,
            skipped,
            duration_ms: 0,
        }
    }

    /// Settlements dropped because the task was removed or re-imported
    /// mid-run count as neither succeeded nor failed.
    pub fn dropped(&self) -> usize {
        self.dispatched
            .saturating_sub(self.succeeded)
            .saturating_sub(self.failed)
    }
}
