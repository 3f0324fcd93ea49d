//! 队列类型定义

use serde::{Deserialize, Serialize};

/// 任务生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// 等待执行
    Idle,
    /// 请求已发出
    Pending,
    /// 生成成功，携带图片引用
    Success,
    /// 生成失败，携带错误信息
    Error,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One queued generation task.
///
/// Status and result fields are only reachable through the store, which keeps
/// `image_url` set iff the status is `Success` and `error` set iff it is
/// `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTask {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) prompt: String,
    pub(crate) status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

impl BatchTask {
    pub(crate) fn idle(id: String, title: String, prompt: String) -> Self {
        Self {
            id,
            title,
            prompt,
            status: TaskStatus::Idle,
            image_url: None,
            error: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Editable text fields of a queued task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskField {
    Title,
    Prompt,
}

/// 队列事件，供前端渲染进度
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    Imported { count: usize },
    Added { id: String },
    Edited { id: String, field: TaskField },
    Removed { id: String },
    Cleared,
    StatusChanged { id: String, status: TaskStatus },
}

/// A task moved to pending by `begin_run`, as handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunSelection {
    pub id: String,
    pub title: String,
    pub prompt: String,
}

/// Per-status totals of the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub idle: usize,
    pub pending: usize,
    pub success: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.idle + self.pending + self.success + self.error
    }
}
