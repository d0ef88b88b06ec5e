//! Error taxonomy for directory operations.

use thiserror::Error;

use crate::upstream::TransportError;

/// Problems talking to the upstream directory. These never leave the
/// client boundary as errors; callers see an empty or absent result.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The upstream answered with a non-success status.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// The body could not be decoded as the expected envelope.
    #[error("malformed upstream envelope: {0}")]
    Decode(String),

    /// The envelope decoded but carried no data.
    #[error("upstream envelope carried no data")]
    EmptyEnvelope,
}

/// Business-level failures surfaced to callers of the service.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Employee not found with id: {0}")]
    NotFound(String),

    #[error("Invalid employee input: {0}")]
    InvalidInput(String),

    #[error("Employee creation failed")]
    CreationFailed,

    /// Also returned when the employee was already gone; the delete path
    /// cannot tell the two apart.
    #[error("Failed to delete employee with id: {0}")]
    DeletionFailed(String),
}

/// Result type for directory service operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
