use regex::Regex;
use std::sync::OnceLock;

use crate::parser::id_gen::strategy_task_id;
use crate::parser::protocol::PromptStrategy;
use crate::parser::title::title_or_fallback;
use crate::parser::types::{ParsedTask, StrategyKind};

/// Blocks at or below this many characters (after trimming) are noise.
const MIN_BLOCK_CHARS: usize = 10;

fn title_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\*\*Title\*\*:").expect("title label regex"))
}

fn title_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\*\*Title\*\*:[ \t]*(.*)").expect("title line regex"))
}

fn prompt_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\*\*Prompt\*\*:\s*").expect("prompt label regex"))
}

fn negative_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\*\*Negative Prompt\*\*").expect("negative label regex"))
}

/// Splits right before every `**Title**:` label; the label opens the next block.
fn split_at_titles(text: &str) -> Vec<&str> {
    let mut cuts: Vec<usize> = title_label()
        .find_iter(text)
        .map(|m| m.start())
        .filter(|&start| start > 0)
        .collect();
    cuts.push(text.len());

    let mut blocks = Vec::with_capacity(cuts.len());
    let mut start = 0;
    for cut in cuts {
        blocks.push(&text[start..cut]);
        start = cut;
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
    (!prompt.is_empty()).then_some(prompt)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSplitStrategy;

impl PromptStrategy for SimpleSplitStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Simple
    }

    fn extract(&self, text: &str, stamp: i64) -> Vec<ParsedTask> {
        let blocks = split_at_titles(text)
            .into_iter()
            .filter(|b| b.trim().chars().count() > MIN_BLOCK_CHARS);

        // Indices count surviving blocks, so a block without a prompt still
        // occupies its slot.
        blocks
            .enumerate()
            .filter_map(|(idx, block)| {
                let prompt = prompt_in(block)?;
                let raw_title = title_line()
                    .captures(block)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                Some(ParsedTask::new(
                    strategy_task_id(self.kind(), stamp, idx),
                    title_or_fallback(raw_title, idx + 1),
                    prompt.to_string(),
                ))
            })
            .collect()
    }
}
