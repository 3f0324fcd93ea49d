use thiserror::Error;

/// Failure of an external collaborator call (analysis or generation).
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("service returned an empty result: {0}")]
    EmptyResult(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}
