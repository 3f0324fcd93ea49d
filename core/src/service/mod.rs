//! Collaborator interfaces for analysis and generation, plus the analysis
//! pipeline that feeds the parser.

mod analysis;
mod traits;
mod types;

pub use analysis::{analyze_reference, AnalysisOutcome};
pub use traits::{AnalysisService, ConnectionCheck, GenerationService};
pub use types::{AnalysisOptions, ImagePayload, SharedContext};
