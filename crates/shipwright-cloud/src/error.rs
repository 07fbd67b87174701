//! Job failure taxonomy

use thiserror::Error;

/// Failures raised by any phase of a job.
///
/// Every variant except `InvalidParams` is raised from inside a running job
/// and is paired with exactly one `error` report emitted right before it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloudError {
    #[error("Bad response: {0}")]
    BadResponse(String),

    #[error("{0}")]
    ResourceAlreadyExists(String),

    #[error("{0}")]
    ResourceDoesNotExist(String),

    #[error("{0}")]
    ResourceNotDeleted(String),

    #[error("{0}")]
    ResourceNotCreated(String),

    #[error("{0}")]
    TooManyRecords(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

impl CloudError {
    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            CloudError::BadResponse(_) => "bad-response",
            CloudError::ResourceAlreadyExists(_) => "resource-already-exists",
            CloudError::ResourceDoesNotExist(_) => "resource-does-not-exist",
            CloudError::ResourceNotDeleted(_) => "resource-not-deleted",
            CloudError::ResourceNotCreated(_) => "resource-not-created",
            CloudError::TooManyRecords(_) => "too-many-records",
            CloudError::InvalidParams(_) => "invalid-params",
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
