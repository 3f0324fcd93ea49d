mod common;

use std::io::Write;
use std::sync::Arc;

use batchgen_core::api::{
    BatchError, BatchExecutionEngine, ExecutionOpts, QueueEvent, ReferenceImage, TaskStatus,
};
use common::{queue_of, wait_until, GatedGenerator, ScriptedGenerator};
use pretty_assertions::assert_eq;

fn opts() -> ExecutionOpts {
    ExecutionOpts::default()
}

#[tokio::test]
async fn runs_idle_and_error_tasks_and_leaves_success_alone() {
    // Build [b: error, c: success, a: idle].
    let scripted = Arc::new(ScriptedGenerator::new().failing("b", "quota exceeded"));
    let first = BatchExecutionEngine::new(scripted.clone(), opts());
    let queue = queue_of(&["b", "c"]);
    first.run(&queue, None).await.unwrap();
    let a = queue.add("Poster a", "a").unwrap();

    let gated = Arc::new(GatedGenerator::new());
    let release_b = gated.gate("b");
    let release_a = gated.gate("a");
    let engine = Arc::new(BatchExecutionEngine::new(gated.clone(), opts()));
    let mut events = queue.subscribe();

    let run = tokio::spawn({
        let engine = engine.clone();
        let queue = queue.clone();
        async move { engine.run(&queue, None).await }
    });

    wait_until(|| queue.counts().pending == 2).await;
    assert_eq!(queue.get("b").unwrap().error(), None);
    let c = queue.get("c").unwrap();
    assert_eq!(c.status(), TaskStatus::Success);
    assert_eq!(c.image_url(), Some("img://c"));

    // Pending transitions follow queue order.
    let mut pending = Vec::new();
    while pending.len() < 2 {
        if let QueueEvent::StatusChanged { id, status: TaskStatus::Pending } = events.recv().await.unwrap() {
            pending.push(id);
        }
    }
    assert_eq!(pending, vec!["b".to_string(), a.clone()]);

    release_b.send(Ok("img://b-retry".into())).unwrap();
    release_a.send(Err("content filtered".into())).unwrap();
    let report = run.await.unwrap().unwrap();

    assert_eq!((report.dispatched, report.skipped), (2, 1));
    assert_eq!((report.succeeded, report.failed), (1, 1));
    assert_eq!(queue.get("b").unwrap().image_url(), Some("img://b-retry"));
    assert_eq!(queue.get(&a).unwrap().error(), Some("content filtered"));
    assert_eq!(queue.get("c").unwrap(), c);
}

#[tokio::test]
async fn in_progress_flag_clears_only_after_every_request_settles() {
    let gated = Arc::new(GatedGenerator::new());
    let release_1 = gated.gate("1");
    let release_2 = gated.gate("2");
    let engine = Arc::new(BatchExecutionEngine::new(gated.clone(), opts()));
    let queue = queue_of(&["1", "2"]);

    let run = tokio::spawn({
        let engine = engine.clone();
        let queue = queue.clone();
        async move { engine.run(&queue, None).await }
    });

    wait_until(|| queue.counts().pending == 2).await;
    assert!(engine.is_running());

    release_1.send(Err("upstream 500".into())).unwrap();
    wait_until(|| queue.get("1").unwrap().status() == TaskStatus::Error).await;
    assert!(engine.is_running());
    assert_eq!(queue.get("2").unwrap().status(), TaskStatus::Pending);

    release_2.send(Ok("img://2".into())).unwrap();
    let report = run.await.unwrap().unwrap();
    assert!(!engine.is_running());

    let t1 = queue.get("1").unwrap();
    assert_eq!((t1.image_url(), t1.error()), (None, Some("upstream 500")));
    let t2 = queue.get("2").unwrap();
    assert_eq!((t2.image_url(), t2.error()), (Some("img://2"), None));
    assert_eq!((report.succeeded, report.failed), (1, 1));
}

#[tokio::test]
async fn second_run_is_rejected_while_one_is_in_flight() {
    let gated = Arc::new(GatedGenerator::new());
    let release = gated.gate("only");
    let engine = Arc::new(BatchExecutionEngine::new(gated.clone(), opts()));
    let queue = queue_of(&["only"]);

    let run = tokio::spawn({
        let engine = engine.clone();
        let queue = queue.clone();
        async move { engine.run(&queue, None).await }
    });
    wait_until(|| engine.is_running() && queue.counts().pending == 1).await;

    let err = engine.run(&queue, None).await.unwrap_err();
    assert!(matches!(err, BatchError::RunInProgress));

    release.send(Ok("img://only".into())).unwrap();
    run.await.unwrap().unwrap();
    assert!(!engine.is_running());
}

#[tokio::test]
async fn shared_context_failure_aborts_before_any_dispatch() {
    let scripted = Arc::new(ScriptedGenerator::new());
    let engine = BatchExecutionEngine::new(scripted.clone(), opts());
    let queue = queue_of(&["x", "y"]);
    let reference = ReferenceImage::from_path("/no/such/dir/reference.png");

    let err = engine.run(&queue, Some(&reference)).await.unwrap_err();

    assert!(matches!(err, BatchError::SharedContext(_)));
    assert!(scripted.calls().is_empty());
    assert_eq!(queue.counts().idle, 2);
    assert!(!engine.is_running());
}

#[tokio::test]
async fn shared_context_is_resolved_once_and_sent_with_every_task() {
    let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    file.write_all(&[0xFF, 0xD8, 0xFF]).unwrap();

    let scripted = Arc::new(ScriptedGenerator::new());
    let engine = BatchExecutionEngine::new(scripted.clone(), opts());
    let queue = queue_of(&["p1", "p2", "p3"]);
    let reference = ReferenceImage::from_path(file.path());

    engine.run(&queue, Some(&reference)).await.unwrap();

    let calls = scripted.calls();
    assert_eq!(calls.len(), 3);
    for (_, shared) in calls {
        let shared = shared.expect("shared context on every call");
        assert_eq!(shared.mime_type, "image/jpeg");
        assert_eq!(shared.data_base64, "/9j/");
    }
}

#[tokio::test]
async fn rerun_retries_only_failed_tasks() {
    let scripted = Arc::new(ScriptedGenerator::new().failing("b", "timeout"));
    let engine = BatchExecutionEngine::new(scripted.clone(), opts());
    let queue = queue_of(&["a", "b", "c"]);

    let first = engine.run(&queue, None).await.unwrap();
    assert_eq!((first.succeeded, first.failed, first.skipped), (2, 1, 0));

    let second = engine.run(&queue, None).await.unwrap();
    assert_eq!((second.dispatched, second.skipped), (1, 2));
    assert_eq!(second.failed, 1);

    let mut prompts = scripted.prompts();
    prompts.sort();
    assert_eq!(prompts, vec!["a", "b", "b", "c"]);
    assert_eq!(queue.get("b").unwrap().error(), Some("timeout"));
}

#[tokio::test]
async fn nothing_eligible_is_an_empty_run() {
    let scripted = Arc::new(ScriptedGenerator::new());
    let engine = BatchExecutionEngine::new(scripted.clone(), opts());

    let empty = engine.run(&queue_of(&[]), None).await.unwrap();
    assert_eq!((empty.dispatched, empty.skipped), (0, 0));

    let queue = queue_of(&["done"]);
    engine.run(&queue, None).await.unwrap();
    let again = engine.run(&queue, None).await.unwrap();
    assert_eq!((again.dispatched, again.skipped), (0, 1));
    assert_eq!(scripted.prompts(), vec!["done"]);
}

#[tokio::test]
async fn concurrency_cap_bounds_in_flight_requests() {
    let capped = Arc::new(ScriptedGenerator::new());
    let engine = BatchExecutionEngine::new(
        capped.clone(),
        ExecutionOpts {
            max_concurrency: Some(2),
            progress_bar: false,
        },
    );
    let report = engine
        .run(&queue_of(&["1", "2", "3", "4", "5"]), None)
        .await
        .unwrap();
    assert_eq!(report.succeeded, 5);
    assert_eq!(capped.peak(), 2);

    let unbounded = Arc::new(ScriptedGenerator::new());
    let engine = BatchExecutionEngine::new(unbounded.clone(), opts());
    engine
        .run(&queue_of(&["1", "2", "3", "4", "5"]), None)
        .await
        .unwrap();
    assert_eq!(unbounded.peak(), 5);
}

#[tokio::test]
async fn zero_concurrency_is_a_config_error() {
    let engine = BatchExecutionEngine::new(
        Arc::new(ScriptedGenerator::new()),
        ExecutionOpts {
            max_concurrency: Some(0),
            progress_bar: false,
        },
    );
    let queue = queue_of(&["a"]);

    let err = engine.run(&queue, None).await.unwrap_err();
    assert!(matches!(err, BatchError::Config(_)));
    assert_eq!(queue.counts().idle, 1);
}

#[tokio::test]
async fn task_removed_mid_run_is_not_resurrected() {
    let gated = Arc::new(GatedGenerator::new());
    let keep = gated.gate("keep");
    let gone = gated.gate("gone");
    let engine = Arc::new(BatchExecutionEngine::new(gated.clone(), opts()));
    let queue = queue_of(&["keep", "gone"]);

    let run = tokio::spawn({
        let engine = engine.clone();
        let queue = queue.clone();
        async move { engine.run(&queue, None).await }
    });
    wait_until(|| queue.counts().pending == 2).await;

    assert!(queue.remove("gone"));
    gone.send(Ok("img://gone".into())).unwrap();
    keep.send(Ok("img://keep".into())).unwrap();
    let report = run.await.unwrap().unwrap();

    assert_eq!(queue.len(), 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.dropped(), 1);
}
