//! Sources of per-table sync timestamps.

use std::collections::HashMap;

use super::SyncError;
use crate::models::TableKey;

/// Epoch-millis per table.
pub type TimestampMap = HashMap<TableKey, i64>;

/// Where the remote last-modified times come from.
#[allow(async_fn_in_trait)]
pub trait RemoteTimestampSource {
    async fn remote_timestamps(&self) -> Result<TimestampMap, SyncError>;
}

/// Where the locally recorded sync times come from.
#[allow(async_fn_in_trait)]
pub trait LocalTimestampSource {
    async fn local_timestamps(&self) -> Result<TimestampMap, SyncError>;
}

/// Fixed timestamps, for callers that already hold a snapshot.
impl RemoteTimestampSource for TimestampMap {
    async fn remote_timestamps(&self) -> Result<TimestampMap, SyncError> {
        Ok(self.clone())
    }
}

impl LocalTimestampSource for TimestampMap {
    async fn local_timestamps(&self) -> Result<TimestampMap, SyncError> {
        Ok(self.clone())
    }
}

impl<T: RemoteTimestampSource + ?Sized> RemoteTimestampSource for &T {
    async fn remote_timestamps(&self) -> Result<TimestampMap, SyncError> {
        (**self).remote_timestamps().await
    }
}

impl<T: LocalTimestampSource + ?Sized> LocalTimestampSource for &T {
    async fn local_timestamps(&self) -> Result<TimestampMap, SyncError> {
        (**self).local_timestamps().await
    }
}
