//! Prompt extraction strategy trait.
//!
//! Each strategy is a self-contained extraction algorithm. The cascade in
//! `cascade.rs` tries them in priority order and keeps the first non-empty
//! result.

use super::types::{ParsedTask, StrategyKind};

/// Prompt extraction strategy.
///
/// Implementations must be thread-safe (Send + Sync) so a single parser can be
/// shared across tasks.
pub trait PromptStrategy: Send + Sync {
    /// Which strategy this is; also tags the ids it produces.
    fn kind(&self) -> StrategyKind;

    /// Extracts tasks in source order. `stamp` is shared by all ids of the call.
    ///
    /// Never fails: text the strategy does not recognise yields an empty list.
    fn extract(&self, text: &str, stamp: i64) -> Vec<ParsedTask>;
}
