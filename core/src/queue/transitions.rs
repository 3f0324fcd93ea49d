//! 任务状态转换规则和验证

use super::types::TaskStatus;
use thiserror::Error;

/// 状态转换错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },
    #[error("Cannot transition from terminal state {state:?}")]
    FromTerminalState { state: TaskStatus },
}

/// 状态转换
pub struct TaskTransition;

impl TaskTransition {
    /// 验证状态转换是否合法
    pub fn validate(from: TaskStatus, to: TaskStatus) -> Result<(), TransitionError> {
        // 成功为终态，只能删除
        if Self::is_terminal(from) {
            return Err(TransitionError::FromTerminalState { state: from });
        }

        let is_valid = match (from, to) {
            // 入选本轮执行
            (TaskStatus::Idle, TaskStatus::Pending) => true,
            // 失败任务在下一轮重新入选
            (TaskStatus::Error, TaskStatus::Pending) => true,
            // 请求结算
            (TaskStatus::Pending, TaskStatus::Success) | (TaskStatus::Pending, TaskStatus::Error) => {
                true
            }
            _ => false,
        };

        if is_valid {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from, to })
        }
    }

    /// 是否可被下一轮执行选中
    pub fn is_eligible(status: TaskStatus) -> bool {
        matches!(status, TaskStatus::Idle | TaskStatus::Error)
    }

    /// 判断是否为终态
    pub fn is_terminal(status: TaskStatus) -> bool {
        matches!(status, TaskStatus::Success)
    }
}
