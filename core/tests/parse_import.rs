mod common;

use std::sync::Arc;

use batchgen_core::api::{
    normalize_escapes, parse_prompts, BatchExecutionEngine, DraftField, ExecutionOpts,
    QueueHandle, ReviewDraft, TaskStatus,
};
use common::ScriptedGenerator;
use pretty_assertions::assert_eq;

const MODEL_OUTPUT: &str = r"# Product Analysis Report\n- Product: ceramic mug\n---\n### Title: 1. Morning Ritual (hero)\n**{Generate Prompt: a steaming mug on a sunlit table}**\n### Title: Night Owl\n**{Generate Prompt: the mug beside a desk lamp}**";

#[tokio::test]
async fn parsed_and_reviewed_tasks_run_end_to_end() {
    let tasks = parse_prompts(&normalize_escapes(MODEL_OUTPUT));
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].title, "Morning Ritual");

    let mut draft = ReviewDraft::from_parsed(tasks);
    draft.edit(1, DraftField::Title, "Late Night");
    let manual = draft.add_manual();
    draft.edit(manual, DraftField::Prompt, "the mug in the snow");

    let queue = QueueHandle::new();
    assert_eq!(queue.import(draft.into_tasks()), 3);

    let titles: Vec<_> = queue.snapshot().iter().map(|t| t.title().to_string()).collect();
    assert_eq!(titles, vec!["Morning Ritual", "Late Night", "New poster 3"]);

    let scripted = Arc::new(ScriptedGenerator::new().failing("the mug in the snow", "blocked"));
    let engine = BatchExecutionEngine::new(scripted.clone(), ExecutionOpts::default());
    let report = engine.run(&queue, None).await.unwrap();

    assert_eq!((report.succeeded, report.failed), (2, 1));
    let statuses: Vec<_> = queue.snapshot().iter().map(|t| t.status()).collect();
    assert_eq!(
        statuses,
        vec![TaskStatus::Success, TaskStatus::Success, TaskStatus::Error]
    );
}

#[test]
fn reimport_replaces_queue_and_resets_status() {
    let queue = QueueHandle::new();
    queue.import(parse_prompts("### A\nPrompt: one\n### B\nPrompt: two"));
    assert_eq!(queue.len(), 2);

    queue.import(parse_prompts("### C\nPrompt: three"));
    let tasks = queue.snapshot();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title(), "C");
    assert_eq!(tasks[0].status(), TaskStatus::Idle);
}

#[test]
fn unparseable_text_imports_nothing() {
    let queue = QueueHandle::new();
    assert_eq!(queue.import(parse_prompts("I'm sorry, I can't help with that.")), 0);
    assert!(queue.is_empty());
}
