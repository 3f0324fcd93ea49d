use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::Semaphore;

use super::types::{DispatchJob, TaskOutcome};

/// Dispatches every job concurrently and reports each settlement as it lands.
///
/// # Arguments
///
/// * `jobs` - Requests to issue, in queue order
/// * `max_concurrency` - Optional cap on in-flight requests (must be >= 1)
/// * `executor_fn` - Issues one request
/// * `on_settled` - Called once per job, in completion order
///
/// All futures are multiplexed on the calling task; nothing is spawned. A
/// failing job never cancels its siblings, and the function only returns once
/// every job has settled.
pub async fn dispatch_parallel<F, Fut, S>(
    jobs: Vec<DispatchJob>,
    max_concurrency: Option<usize>,
    executor_fn: F,
    mut on_settled: S,
) where
    F: Fn(DispatchJob) -> Fut,
    Fut: Future<Output = Result<String, String>>,
    S: FnMut(TaskOutcome),
{
    let sem = max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
    let mut futs: FuturesUnordered<_> = FuturesUnordered::new();

    for job in jobs {
        let task_id = job.task_id.clone();
        let sem = sem.clone();
        let request = executor_fn(job);

        futs.push(async move {
            let _permit = match sem {
                Some(sem) => match sem.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => {
                        return TaskOutcome {
                            task_id,
                            result: Err("semaphore closed unexpectedly".into()),
                            duration_ms: 0,
                        }
                    }
                },
                None => None,
            };

            let started = Instant::now();
            let result = request.await;
            TaskOutcome {
                task_id,
                result,
                duration_ms: started.elapsed().as_millis() as u64,
            }
        });
    }

    while let Some(outcome) = futs.next().await {
        on_settled(outcome);
    }
}
