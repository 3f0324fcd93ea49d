//! 共享队列句柄

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;

use super::store::TaskQueueStore;
use super::types::{BatchTask, QueueEvent, RunSelection, StatusCounts, TaskField, TaskStatus};
use crate::parser::ParsedTask;

const EVENT_CAPACITY: usize = 1000;

/// Cloneable, thread-safe access to one [`TaskQueueStore`].
///
/// Every mutation runs under a synchronous lock that is never held across an
/// await point, so two status transitions can never interleave. Each change
/// is broadcast as a [`QueueEvent`]; sending without subscribers is fine.
#[derive(Clone)]
pub struct QueueHandle {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    store: Mutex<TaskQueueStore>,
    event_tx: broadcast::Sender<QueueEvent>,
}

impl Default for QueueHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueHandle {
    pub fn new() -> Self {
        Self::from_store(TaskQueueStore::new())
    }

    pub fn from_store(store: TaskQueueStore) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(QueueInner {
                store: Mutex::new(store),
                event_tx,
            }),
        }
    }

    /// 订阅队列事件
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.inner.event_tx.subscribe()
    }

    fn store(&self) -> MutexGuard<'_, TaskQueueStore> {
        // A panic elsewhere cannot leave the Vec half-written, so a poisoned
        // lock is still usable.
        self.inner
            .store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: QueueEvent) {
        let _ = self.inner.event_tx.send(event);
    }

    pub fn snapshot(&self) -> Vec<BatchTask> {
        self.store().tasks().to_vec()
    }

    pub fn get(&self, id: &str) -> Option<BatchTask> {
        self.store().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    pub fn counts(&self) -> StatusCounts {
        self.store().counts()
    }

    pub fn import(&self, tasks: Vec<ParsedTask>) -> usize {
        let count = self.store().import(tasks);
        tracing::info!(count, "queue imported");
        self.emit(QueueEvent::Imported { count });
        count
    }

    pub fn add(&self, title: &str, prompt: &str) -> Option<String> {
        let id = self.store().add(title, prompt)?;
        self.emit(QueueEvent::Added { id: id.clone() });
        Some(id)
    }

    pub fn edit(&self, id: &str, field: TaskField, value: &str) -> bool {
        let changed = self.store().edit(id, field, value);
        if changed {
            self.emit(QueueEvent::Edited {
                id: id.to_string(),
                field,
            });
        }
        changed
    }

    pub fn remove(&self, id: &str) -> bool {
        let removed = self.store().remove(id);
        if removed {
            self.emit(QueueEvent::Removed { id: id.to_string() });
        }
        removed
    }

    pub fn clear(&self) {
        self.store().clear();
        self.emit(QueueEvent::Cleared);
    }

    pub(crate) fn begin_run(&self) -> Vec<RunSelection> {
        let selected = self.store().begin_run();
        for task in &selected {
            self.emit(QueueEvent::StatusChanged {
                id: task.id.clone(),
                status: TaskStatus::Pending,
            });
        }
        selected
    }

    pub(crate) fn settle(&self, id: &str, outcome: Result<String, String>) -> Option<TaskStatus> {
        let status = self.store().settle(id, outcome);
        match status {
            Some(status) => self.emit(QueueEvent::StatusChanged {
                id: id.to_string(),
                status,
            }),
            None => tracing::debug!(task_id = %id, "settlement dropped, task no longer pending"),
        }
        status
    }
}
