//! AWS provider error types

use shipwright_cloud::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("aws CLI not found. Please install: https://aws.amazon.com/cli/")]
    AwsCliNotFound,

    #[error("aws command failed: {0}")]
    CommandFailed(String),

    #[error("No '{0}' in response")]
    MissingKey(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AwsError>;

impl From<AwsError> for ProviderError {
    fn from(err: AwsError) -> Self {
        match err {
            AwsError::Unsupported(what) => ProviderError::Unsupported(what),
            AwsError::JsonError(e) => ProviderError::Json(e),
            AwsError::IoError(e) => ProviderError::Io(e),
            other => ProviderError::CommandFailed(other.to_string()),
        }
    }
}
