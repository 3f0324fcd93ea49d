//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `batchgen_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, load_from_path, AppConfig, AspectRatio, AuthMode, BatchConfig,
    GenerationConfig, ImageSize, Language, LoggingConfig, RequestMode, ServiceConfig,
    ThirdPartyProtocol, OFFICIAL_BASE_URL,
};
pub use crate::error::{BatchError, CliError, ErrorCode, ServiceError};
pub use crate::executor::{BatchExecutionEngine, ExecutionOpts, ReferenceImage, RunReport};
pub use crate::parser::{
    parse_prompts, DraftField, MultiStrategyPromptParser, ParseOutcome, ParsedTask,
    PromptStrategy, ReviewDraft, StrategyKind,
};
pub use crate::queue::{
    BatchTask, QueueEvent, QueueHandle, StatusCounts, TaskField, TaskQueueStore, TaskStatus,
};
pub use crate::service::{
    analyze_reference, AnalysisOptions, AnalysisOutcome, AnalysisService, ConnectionCheck,
    GenerationService, ImagePayload, SharedContext,
};
pub use crate::text::{extract_report, normalize_escapes};
