use regex::Regex;
use std::sync::OnceLock;

use crate::parser::id_gen::strategy_task_id;
use crate::parser::protocol::PromptStrategy;
use crate::parser::title::title_or_fallback;
use crate::parser::types::{ParsedTask, StrategyKind};

/// Title marker, then (possibly after other lines) a brace-delimited block
/// whose content starts with a recognised prompt keyword.
fn delimited_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)(?:###|\*\*Title\*\*:?|\*\*标题\*\*:?)\s*(.*?)\s*\n(?s:.*?)",
            r"(?:\*\*\{|\{)\s*(?:生成提示词|English Prompt|Prompt|Generate Prompt)[:：]?\s*",
            r"((?s:.*?))(?:\}\*\*|\})",
        ))
        .expect("delimited block regex")
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedBlockStrategy;

impl PromptStrategy for DelimitedBlockStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Delimited
    }

    fn extract(&self, text: &str, stamp: i64) -> Vec<ParsedTask> {
        let mut tasks = Vec::new();

        for caps in delimited_block().captures_iter(text) {
            let prompt = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            if prompt.is_empty() {
                continue;
            }
            let raw_title = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let index = tasks.len();
            tasks.push(ParsedTask::new(
                strategy_task_id(self.kind(), stamp, index),
                title_or_fallback(raw_title, index + 1),
                prompt.to_string(),
            ));
        }

        tasks
    }
}
