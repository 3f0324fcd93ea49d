//! # 任务队列模块
//!
//! 保存有序的批量任务集合，并负责每个任务的状态机：
//! idle → pending → {success, error}，error 可在下一轮重新进入 pending，
//! success 为终态。

mod handle;
mod store;
pub mod transitions;
mod types;

pub use handle::QueueHandle;
pub use store::TaskQueueStore;
pub use transitions::{TaskTransition, TransitionError};
pub use types::{BatchTask, QueueEvent, StatusCounts, TaskField, TaskStatus};
pub(crate) use types::RunSelection;
