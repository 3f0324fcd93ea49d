//! Batch execution
//!
//! ```text
//! QueueHandle (idle/error tasks)
//!   ↓
//! ReferenceImage::resolve() → SharedContext (once per run)
//!   ↓
//! QueueHandle::begin_run() → pending, queue order
//!   ↓
//! dispatch_parallel() → one GenerationService::generate per task
//!   ↓
//! QueueHandle::settle() per outcome, keyed by task id
//!   ↓
//! RunReport
//! ```

mod context;
mod engine;
mod progress;
mod scheduler;
mod types;

pub use context::{guess_mime, ReferenceImage};
pub use engine::BatchExecutionEngine;
pub use progress::ProgressMonitor;
pub use scheduler::dispatch_parallel;
pub use types::{DispatchJob, ExecutionOpts, RunReport, TaskOutcome};
