use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::error::BatchError;
use crate::queue::{QueueHandle, TaskStatus};
use crate::service::GenerationService;

use super::context::ReferenceImage;
use super::progress::ProgressMonitor;
use super::scheduler::dispatch_parallel;
use super::types::{DispatchJob, ExecutionOpts, RunReport};

/// Moves the eligible tasks to pending and turns them into dispatch jobs.
fn select_jobs(queue: &QueueHandle) -> Vec<DispatchJob> {
    queue
        .begin_run()
        .into_iter()
        .map(|task| DispatchJob {
            task_id: task.id,
            title: task.title,
            prompt: task.prompt,
        })
        .collect()
}

/// Runs the eligible part of a queue against a generation collaborator.
///
/// The engine is the only writer of task status and result fields, and only
/// for the tasks it selected itself. Per-task failures are recorded on the
/// task; `run` itself only fails for run-level problems.
pub struct BatchExecutionEngine {
    generator: Arc<dyn GenerationService>,
    opts: ExecutionOpts,
    running: AtomicBool,
}

/// Clears the in-progress flag when the run future completes or is dropped.
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, BatchError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BatchError::RunInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl BatchExecutionEngine {
    pub fn new(generator: Arc<dyn GenerationService>, opts: ExecutionOpts) -> Self {
        Self {
            generator,
            opts,
            running: AtomicBool::new(false),
        }
    }

    pub fn opts(&self) -> &ExecutionOpts {
        &self.opts
    }

    /// True from the moment a run starts until every request it dispatched
    /// has settled.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Executes one batch run.
    ///
    /// 1. Resolve the shared reference once; failure aborts before any task
    ///    changes state.
    /// 2. Move every idle/error task to pending, in queue order.
    /// 3. Dispatch one request per selected task and reconcile each
    ///    settlement by id as it lands.
    #[tracing::instrument(skip_all, fields(run_id = tracing::field::Empty))]
    pub async fn run(
        &self,
        queue: &QueueHandle,
        reference: Option<&ReferenceImage>,
    ) -> Result<RunReport, BatchError> {
        self.opts.validate()?;
        let _guard = RunningGuard::acquire(&self.running)?;

        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());
        let start = Instant::now();

        let counts = queue.counts();
        if counts.idle + counts.error == 0 {
            tracing::info!(total = counts.total(), "no eligible tasks");
            return Ok(RunReport::empty(run_id, counts.total()));
        }

        let shared = match reference {
            Some(image) => Some(image.resolve().await.inspect_err(|e| {
                tracing::error!(error = %e, "shared context failed, nothing dispatched");
            })?),
            None => None,
        };

        let jobs = select_jobs(queue);
        let dispatched = jobs.len();
        let skipped = queue.len().saturating_sub(dispatched);

        tracing::info!(
            dispatched,
            skipped,
            max_concurrency = ?self.opts.max_concurrency,
            generator = self.generator.name(),
            "batch run started"
        );

        let mut progress = ProgressMonitor::new(dispatched, self.opts.progress_bar);
        for job in &jobs {
            progress.add_task(&job.task_id, &job.title);
        }

        let shared = shared.as_ref();
        let mut succeeded = 0;
        let mut failed = 0;

        dispatch_parallel(
            jobs,
            self.opts.max_concurrency,
            |job| {
                let generator = self.generator.clone();
                async move {
                    generator
                        .generate(&job.prompt, shared)
                        .await
                        .map_err(|e| format!("{e:#}"))
                }
            },
            |outcome| {
                let ok = outcome.result.is_ok();
                match &outcome.result {
                    Ok(_) => tracing::debug!(task_id = %outcome.task_id, duration_ms = outcome.duration_ms, "task succeeded"),
                    Err(message) => tracing::warn!(task_id = %outcome.task_id, error = %message, "task failed"),
                }

                match queue.settle(&outcome.task_id, outcome.result) {
                    Some(TaskStatus::Success) => succeeded += 1,
                    Some(TaskStatus::Error) => failed += 1,
                    _ => {}
                }
                progress.complete_task(&outcome.task_id, ok, outcome.duration_ms);
            },
        )
        .await;

        progress.finish(succeeded, failed);

        let report = RunReport {
            run_id,
            dispatched,
            succeeded,
            failed,
            skipped,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            succeeded,
            failed,
            duration_ms = report.duration_ms,
            "batch run finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedTask;

    #[test]
    fn jobs_carry_title_for_progress_labels() {
        let queue = QueueHandle::new();
        queue.import(vec![
            ParsedTask::new("a".into(), "Summer Sale".into(), "fruit on ice".into()),
            ParsedTask::new("b".into(), "Winter Sale".into(), "snow globe".into()),
        ]);

        let jobs = select_jobs(&queue);
        let labels: Vec<_> = jobs.iter().map(|j| (j.task_id.as_str(), j.title.as_str())).collect();
        assert_eq!(labels, vec![("a", "Summer Sale"), ("b", "Winter Sale")]);
        assert_eq!(jobs[1].prompt, "snow globe");
        assert_eq!(queue.counts().pending, 2);
    }
}
