//! Text canonicalisation applied to raw model output before parsing.

mod normalize;
mod report;

pub use normalize::normalize_escapes;
pub use report::extract_report;
