//! Sync error types.

use thiserror::Error;

use crate::models::TableKey;
use crate::remote::RemoteError;

/// Errors that abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote timestamps document came back empty. Treated as a failed
    /// fetch, never as "nothing to sync".
    #[error("Remote sync timestamps are empty")]
    EmptyRemoteTimestamps,
    /// A critical table has no remote timestamp
    #[error("Remote sync timestamps are missing critical table '{0}'")]
    MissingRemoteTimestamp(TableKey),
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
    /// A per-table sync action failed
    #[error("Sync of '{table}' failed: {message}")]
    Table { table: TableKey, message: String },
}
