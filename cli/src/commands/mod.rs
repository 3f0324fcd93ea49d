pub mod analyze;
pub mod check;
pub mod cli;
pub mod parse;
pub mod run;

use batchgen_core::api::{CliError, ServiceError};

/// Keeps typed service failures (missing credentials and the like) visible to
/// the exit-code mapping. Anything else from a collaborator is a service error.
pub(crate) fn into_service_error(err: anyhow::Error) -> CliError {
    match err.downcast::<ServiceError>() {
        Ok(service) => CliError::Service(service),
        Err(other) => CliError::Service(ServiceError::Other(other)),
    }
}
