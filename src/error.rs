use thiserror::Error;

/// Failure taxonomy of the script layer.
///
/// `InvalidInput` and `NotFound` are terminal and caused by the caller.
/// `ExecutionFailed` carries the node's message and may be retried by the
/// caller since every query is read-only. `DecodeFailed` means the result did
/// not have the outer shape the query promised, usually a contract or network
/// mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("script execution failed: {0}")]
    ExecutionFailed(String),

    #[error("failed to decode script result: {0}")]
    DecodeFailed(String),
}

impl Error {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Error::DecodeFailed(msg.into())
    }

    pub fn execution(msg: impl Into<String>) -> Self {
        Error::ExecutionFailed(msg.into())
    }

    /// Only execution failures are worth retrying; the rest are deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::ExecutionFailed(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
