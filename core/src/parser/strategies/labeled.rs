use regex::Regex;
use std::sync::OnceLock;

use crate::parser::id_gen::strategy_task_id;
use crate::parser::protocol::PromptStrategy;
use crate::parser::title::title_or_fallback;
use crate::parser::types::{ParsedTask, StrategyKind};

fn block_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"###|\*\*Title\*\*[:：]?|\*\*标题\*\*[:：]?").expect("block marker regex")
    })
}

/// A marker at the start of a line ends the current block.
fn next_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n(?:###|\*\*Title\*\*|\*\*标题\*\*)").expect("next block regex"))
}

fn prompt_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:\*\*)?(?:Prompt|提示词)(?:\*\*)?[:：]\s*").expect("prompt label regex")
    })
}

fn negative_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\*\*Negative|Negative").expect("negative label regex"))
}

/// One heading block: the marker through the character before the next
/// line-leading marker (or end of input).
struct Block<'a> {
    body: &'a str,
    first_line: &'a str,
}

fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(marker) = block_marker().find_at(text, pos) {
        let rest = &text[marker.end()..];
        let content_start = marker.end() + (rest.len() - rest.trim_start().len());
        let Some(first) = text[content_start..].chars().next() else {
            break;
        };

        // The content owns at least its first character, so a marker right
        // after the whitespace never closes the block early.
        let end = next_block()
            .find_at(text, content_start + first.len_utf8())
            .map(|m| m.start())
            .unwrap_or(text.len());

        let content = &text[content_start..end];
        blocks.push(Block {
            body: &text[marker.start()..end],
            first_line: content.lines().next().unwrap_or_default(),
        });
        pos = end;
    }

    blocks
}

fn prompt_in(block: &str) -> Option<&str> {
    let label = prompt_label().find(block)?;
    let end = negative_label()
        .find_at(block, label.end())
        .map(|m| m.start())
        .unwrap_or(block.len());

    let prompt = block[label.end()..end].trim();
    let prompt = prompt.strip_prefix("**").unwrap_or(prompt).trim();
    (!prompt.is_empty()).then_some(prompt)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LabeledBlockStrategy;

impl PromptStrategy for LabeledBlockStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Labeled
    }

    fn extract(&self, text: &str, stamp: i64) -> Vec<ParsedTask> {
        let mut tasks = Vec::new();

        for block in split_blocks(text) {
            let Some(prompt) = prompt_in(block.body) else {
                continue;
            };
            let index = tasks.len();
            tasks.push(ParsedTask::new(
                strategy_task_id(self.kind(), stamp, index),
                title_or_fallback(block.first_line, index + 1),
                prompt.to_string(),
            ));
        }

        tasks
    }
}
