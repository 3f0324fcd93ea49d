use chrono::{Local, Utc};
use uuid::Uuid;

use super::types::StrategyKind;

/// 生成格式: task-{YYYYMMDDHHmmss}-{random8}
pub fn generate_task_id() -> String {
    let ts = Local::now().format("%Y%m%d%H%M%S");
    let uuid = Uuid::new_v4().simple().to_string();
    let suffix = &uuid[..8];
    format!("task-{}-{}", ts, suffix)
}

/// Millisecond stamp shared by every id of one parse call.
pub fn parse_stamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// `{tag}-{stamp}-{index}`, unique within a single parse call.
pub fn strategy_task_id(kind: StrategyKind, stamp: i64, index: usize) -> String {
    format!("{}-{}-{}", kind.id_tag(), stamp, index)
}

/// `manual-{stamp}-{random8}` for entries added by hand during review.
pub fn manual_task_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("manual-{}-{}", parse_stamp(), &uuid[..8])
}
