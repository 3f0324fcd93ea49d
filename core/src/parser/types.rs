use serde::{Deserialize, Serialize};

/// One generation task recovered from model output, before it is committed
/// to the queue.
///
/// `id` is only unique within the parse call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTask {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: String,
}

impl ParsedTask {
    pub fn new(id: String, title: String, prompt: String) -> Self {
        Self {
            id,
            title,
            prompt,
            negative_prompt: String::new(),
        }
    }
}

/// Extraction strategies, in the order the cascade tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Title marker followed by a `{Prompt: ...}` block.
    Delimited,
    /// Heading/label blocks carrying a `Prompt:` label.
    Labeled,
    /// Blocks split at bold `**Title**:` labels.
    Simple,
}

impl StrategyKind {
    /// Prefix used in ids produced by this strategy.
    pub fn id_tag(self) -> &'static str {
        match self {
            Self::Delimited => "task",
            Self::Labeled => "fallback",
            Self::Simple => "simple",
        }
    }
}

/// Result of a cascade run: the winning strategy (if any) and its tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub strategy: Option<StrategyKind>,
    pub tasks: Vec<ParsedTask>,
}

impl ParseOutcome {
    pub fn empty() -> Self {
        Self {
            strategy: None,
            tasks: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
