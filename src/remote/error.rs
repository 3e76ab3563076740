//! Remote error types.

use thiserror::Error;

/// Errors from reading the remote collections.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Remote is not configured
    #[error("Remote not configured. Add remote.base_url to config.")]
    NotConfigured,
    /// Transport or decode failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success status other than 404
    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },
    /// Document or collection does not exist
    #[error("Not found: {0}")]
    NotFound(String),
    /// Collection exists but holds no documents where some are required
    #[error("Empty list: {0}")]
    EmptyList(String),
    /// Payload had an unexpected shape
    #[error("Unknown data error: {0}")]
    Unknown(String),
}
