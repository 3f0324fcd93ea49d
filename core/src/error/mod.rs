#[allow(clippy::module_inception)]
pub mod error;
pub mod batch;
pub mod service;

pub use batch::{BatchError, ErrorCode};
pub use error::CliError;
pub use service::ServiceError;
