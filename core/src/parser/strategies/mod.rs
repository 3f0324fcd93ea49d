//! Concrete `PromptStrategy` implementations.
//!
//! - `DelimitedBlockStrategy`: `### Title` + `**{Prompt: ...}**` units (preferred)
//! - `LabeledBlockStrategy`: heading blocks with a `Prompt:` label
//! - `SimpleSplitStrategy`: last resort split at `**Title**:` labels

mod delimited;
mod labeled;
mod simple;

pub use delimited::DelimitedBlockStrategy;
pub use labeled::LabeledBlockStrategy;
pub use simple::SimpleSplitStrategy;
