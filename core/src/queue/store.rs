use std::collections::HashSet;

use super::transitions::TaskTransition;
use super::types::{BatchTask, RunSelection, StatusCounts, TaskField, TaskStatus};
use crate::parser::{generate_task_id, ParsedTask};

/// Ordered in-memory task collection.
///
/// Every public operation is total: unknown ids and blank payloads are
/// silent no-ops. Insertion order is the presentation and dispatch order.
#[derive(Debug, Clone, Default)]
pub struct TaskQueueStore {
    tasks: Vec<BatchTask>,
}

impl TaskQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[BatchTask] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&BatchTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for task in &self.tasks {
            match task.status {
                TaskStatus::Idle => counts.idle += 1,
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::Success => counts.success += 1,
                TaskStatus::Error => counts.error += 1,
            }
        }
        counts
    }

    /// Replaces the whole collection; every entry starts idle.
    ///
    /// Parsed ids are only unique per parse call, so blank or repeated ids are
    /// swapped for fresh ones.
    pub fn import(&mut self, tasks: Vec<ParsedTask>) -> usize {
        let mut seen = HashSet::with_capacity(tasks.len());
        self.tasks = tasks
            .into_iter()
            .map(|t| {
                let id = if t.id.trim().is_empty() || seen.contains(&t.id) {
                    generate_task_id()
                } else {
                    t.id
                };
                seen.insert(id.clone());
                BatchTask::idle(id, t.title, t.prompt)
            })
            .collect();
        self.tasks.len()
    }

    /// Appends an idle task under a fresh id. Returns `None` when both fields
    /// are blank.
    pub fn add(&mut self, title: &str, prompt: &str) -> Option<String> {
        if title.trim().is_empty() && prompt.trim().is_empty() {
            return None;
        }
        let id = generate_task_id();
        self.tasks.push(BatchTask::idle(
            id.clone(),
            title.to_string(),
            prompt.to_string(),
        ));
        Some(id)
    }

    /// Rewrites a text field. Only idle and error tasks are editable; the
    /// status is left as is.
    pub fn edit(&mut self, id: &str, field: TaskField, value: &str) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if !TaskTransition::is_eligible(task.status) {
            return false;
        }
        match field {
            TaskField::Title => task.title = value.to_string(),
            TaskField::Prompt => task.prompt = value.to_string(),
        }
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Moves every eligible task to pending, in queue order, and returns the
    /// selection to dispatch.
    pub(crate) fn begin_run(&mut self) -> Vec<RunSelection> {
        let mut selected = Vec::new();
        for task in &mut self.tasks {
            if TaskTransition::validate(task.status, TaskStatus::Pending).is_err() {
                continue;
            }
            task.status = TaskStatus::Pending;
            task.error = None;
            task.image_url = None;
            selected.push(RunSelection {
                id: task.id.clone(),
                title: task.title.clone(),
                prompt: task.prompt.clone(),
            });
        }
        selected
    }

    /// Records the outcome of one request. Only a task still pending is
    /// touched; a task removed or re-imported meanwhile is left alone.
    pub(crate) fn settle(&mut self, id: &str, outcome: Result<String, String>) -> Option<TaskStatus> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        let target = if outcome.is_ok() {
            TaskStatus::Success
        } else {
            TaskStatus::Error
        };
        TaskTransition::validate(task.status, target).ok()?;

        task.status = target;
        match outcome {
            Ok(url) => {
                task.image_url = Some(url);
                task.error = None;
            }
            Err(message) => {
                task.image_url = None;
                task.error = Some(message);
            }
        }
        Some(target)
    }
}
