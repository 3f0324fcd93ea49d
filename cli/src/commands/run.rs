use std::sync::Arc;

use serde::Serialize;

use batchgen_core::api::{
    AppConfig, BatchExecutionEngine, BatchTask, CliError, ExecutionOpts, GenerationService,
    QueueEvent, QueueHandle, ReferenceImage, RunReport, StatusCounts,
};
use batchgen_plugins::build_services;

use super::cli::RunArgs;
use crate::utils::{read_task_list, save_images, write_json};

/// Exit code when the run finished but at least one task ended in error.
pub const EXIT_TASKS_FAILED: i32 = 2;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub runs: Vec<RunReport>,
    pub counts: StatusCounts,
    pub tasks: Vec<BatchTask>,
}

fn log_queue_events(queue: &QueueHandle) {
    let mut event_rx = queue.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            match event {
                QueueEvent::Imported { count } => tracing::debug!("{} task(s) imported", count),
                QueueEvent::StatusChanged { id, status } => {
                    tracing::debug!("task {} -> {}", id, status.as_str())
                }
                _ => {}
            }
        }
    });
}

/// Runs the queue, then re-runs it while error tasks remain and retries are left.
pub async fn execute(
    engine: &BatchExecutionEngine,
    queue: &QueueHandle,
    reference: Option<&ReferenceImage>,
    retry_failed: u32,
) -> Result<Vec<RunReport>, CliError> {
    let mut runs = Vec::new();
    let mut attempt = 0;
    loop {
        let report = engine.run(queue, reference).await?;
        tracing::info!(
            attempt,
            succeeded = report.succeeded,
            failed = report.failed,
            "run attempt finished"
        );
        runs.push(report);

        if queue.counts().error == 0 || attempt >= retry_failed {
            break;
        }
        attempt += 1;
        tracing::warn!(attempt, retry_failed, "retrying failed tasks");
    }
    Ok(runs)
}

pub async fn run_batch(
    args: &RunArgs,
    cfg: &AppConfig,
    generator: Arc<dyn GenerationService>,
) -> Result<RunSummary, CliError> {
    let tasks = read_task_list(&args.tasks).await?;

    let queue = QueueHandle::new();
    log_queue_events(&queue);
    let imported = queue.import(tasks);
    if imported == 0 {
        tracing::warn!(path = %args.tasks.display(), "task list is empty");
    }

    let mut opts = ExecutionOpts::from_config(&cfg.batch);
    if args.max_concurrency.is_some() {
        opts.max_concurrency = args.max_concurrency;
    }
    let engine = BatchExecutionEngine::new(generator, opts);
    let reference = args.reference.as_ref().map(ReferenceImage::from_path);

    let runs = execute(&engine, &queue, reference.as_ref(), args.retry_failed).await?;
    Ok(RunSummary {
        runs,
        counts: queue.counts(),
        tasks: queue.snapshot(),
    })
}

#[tracing::instrument(skip_all, fields(tasks = %args.tasks.display()))]
pub async fn handle_run(args: RunArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let services = build_services(cfg).map_err(super::into_service_error)?;
    let summary = run_batch(&args, cfg, services.generation).await?;

    if let Some(dir) = args.save_dir.as_deref() {
        let written = save_images(dir, &summary.tasks).await?;
        eprintln!("{} image(s) saved to {}", written.len(), dir.display());
    }

    match args.out.as_deref() {
        Some(out) => {
            write_json(out, &summary).await?;
            eprintln!("queue written to {}", out.display());
        }
        None => {
            for task in &summary.tasks {
                let detail = task.error().unwrap_or("");
                println!("{:<8} {}  {}", task.status().as_str(), task.title(), detail);
            }
        }
    }

    let counts = summary.counts;
    println!(
        "success={} error={} idle={}",
        counts.success, counts.error, counts.idle
    );
    Ok(if counts.error > 0 { EXIT_TASKS_FAILED } else { 0 })
}
