use serde::{Deserialize, Serialize};

use super::id_gen::manual_task_id;
use super::types::ParsedTask;
use crate::text::normalize_escapes;

/// Prompt text given to entries added by hand.
pub const PLACEHOLDER_PROMPT: &str = "Describe the scene here...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Title,
    Prompt,
    NegativePrompt,
}

/// Editable hand-off list between parsing and queue import.
///
/// Every field is escape-normalised on entry and on edit, so whatever leaves
/// the draft never carries literal `\n` sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewDraft {
    items: Vec<ParsedTask>,
}

impl ReviewDraft {
    pub fn from_parsed(tasks: Vec<ParsedTask>) -> Self {
        let items = tasks
            .into_iter()
            .map(|t| ParsedTask {
                id: t.id,
                title: normalize_escapes(&t.title),
                prompt: normalize_escapes(&t.prompt),
                negative_prompt: normalize_escapes(&t.negative_prompt),
            })
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[ParsedTask] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a placeholder entry and returns its index.
    pub fn add_manual(&mut self) -> usize {
        let n = self.items.len() + 1;
        self.items.push(ParsedTask::new(
            manual_task_id(),
            format!("New poster {n}"),
            PLACEHOLDER_PROMPT.to_string(),
        ));
        self.items.len() - 1
    }

    /// Returns false when `index` is out of range.
    pub fn edit(&mut self, index: usize, field: DraftField, value: &str) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        let value = normalize_escapes(value);
        match field {
            DraftField::Title => item.title = value,
            DraftField::Prompt => item.prompt = value,
            DraftField::NegativePrompt => item.negative_prompt = value,
        }
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<ParsedTask> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn into_tasks(self) -> Vec<ParsedTask> {
        self.items
    }
}
