//! Turns free-form model output into an ordered list of [`ParsedTask`]s.

mod cascade;
mod id_gen;
mod protocol;
mod review;
pub mod strategies;
mod title;
mod types;

pub use cascade::{parse_prompts, MultiStrategyPromptParser};
pub use id_gen::{generate_task_id, manual_task_id, parse_stamp, strategy_task_id};
pub use protocol::PromptStrategy;
pub use review::{DraftField, ReviewDraft, PLACEHOLDER_PROMPT};
pub use title::{clean_title, fallback_title};
pub use types::{ParseOutcome, ParsedTask, StrategyKind};
