use super::id_gen::parse_stamp;
use super::protocol::PromptStrategy;
use super::strategies::{DelimitedBlockStrategy, LabeledBlockStrategy, SimpleSplitStrategy};
use super::types::{ParseOutcome, ParsedTask};

/// Best-effort parser for free-form model output.
///
/// Strategies are tried in this order:
/// 1) Delimited blocks: title marker + `**{Prompt: ...}**`
/// 2) Heading/label blocks carrying a `Prompt:` label
/// 3) Last resort split at bold `**Title**:` labels
///
/// The first strategy that yields at least one task wins outright; results of
/// different strategies are never merged. Input is expected to be normalised
/// already (see `text::normalize_escapes`).
pub struct MultiStrategyPromptParser {
    strategies: Vec<Box<dyn PromptStrategy>>,
}

impl Default for MultiStrategyPromptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiStrategyPromptParser {
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(DelimitedBlockStrategy),
            Box::new(LabeledBlockStrategy),
            Box::new(SimpleSplitStrategy),
        ])
    }

    /// Custom cascade, tried in the given order.
    pub fn with_strategies(strategies: Vec<Box<dyn PromptStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn parse_outcome(&self, text: &str) -> ParseOutcome {
        if text.trim().is_empty() {
            return ParseOutcome::empty();
        }

        let stamp = parse_stamp();
        for strategy in &self.strategies {
            let tasks = strategy.extract(text, stamp);
            if !tasks.is_empty() {
                tracing::debug!(
                    strategy = ?strategy.kind(),
                    tasks = tasks.len(),
                    "prompt strategy matched"
                );
                return ParseOutcome {
                    strategy: Some(strategy.kind()),
                    tasks,
                };
            }
        }

        tracing::debug!(chars = text.len(), "no prompt strategy matched");
        ParseOutcome::empty()
    }

    /// Ordered tasks; empty means "nothing importable", not a failure.
    pub fn parse(&self, text: &str) -> Vec<ParsedTask> {
        self.parse_outcome(text).tasks
    }
}

pub fn parse_prompts(text: &str) -> Vec<ParsedTask> {
    MultiStrategyPromptParser::new().parse(text)
}
