//! Per-table refetch actions backed by the remote client and the local cache.

use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;

use super::{SyncActions, SyncError};
use crate::db::{DocumentRepository, MeasureRepository, OrderLineRepository, PreferenceStore};
use crate::models::TableKey;
use crate::remote::RemoteClient;

/// Builds the sync action for each table.
///
/// An action writes the refetched data first and records the remote
/// timestamp as the table's local sync time only once that write succeeded.
/// Without a `user_id` no order-lines action is registered.
pub struct CatalogSyncer {
    remote: Arc<RemoteClient>,
    pool: SqlitePool,
    user_id: Option<String>,
    week: u32,
}

impl CatalogSyncer {
    /// `user_id` and `week` select which order lines get cached.
    pub fn new(remote: Arc<RemoteClient>, pool: SqlitePool, user_id: Option<String>, week: u32) -> Self {
        Self {
            remote,
            pool,
            user_id,
            week,
        }
    }

    pub fn actions(&self, tables: &[TableKey]) -> SyncActions {
        tables
            .iter()
            .fold(SyncActions::new(), |actions, &table| self.register(actions, table))
    }

    /// Clears the order-lines sync time when it was recorded for another
    /// user or week, so the orchestrator sees the table as stale.
    ///
    /// Returns whether the sync time was cleared.
    pub async fn invalidate_rescoped_order_lines(&self) -> Result<bool, SyncError> {
        let Some(user_id) = &self.user_id else {
            return Ok(false);
        };

        let prefs = PreferenceStore::new(self.pool.clone());
        let current = Some((user_id.clone(), self.week));
        if prefs.order_lines_scope().await? == current {
            return Ok(false);
        }

        let cleared = prefs.clear_last_sync(TableKey::OrderLines).await?;
        if cleared {
            tracing::debug!("Order lines cached for another user or week, marking stale");
        }
        Ok(cleared)
    }

    fn register(&self, actions: SyncActions, table: TableKey) -> SyncActions {
        let remote = self.remote.clone();
        let pool = self.pool.clone();

        match table {
            TableKey::Measures => actions.on(table, move |remote_ts| {
                let remote = remote.clone();
                let pool = pool.clone();
                async move {
                    let measures = remote.fetch_measures().await?;
                    MeasureRepository::new(pool.clone()).replace_all(&measures).await?;
                    tracing::debug!("Cached {} measure(s)", measures.len());
                    record_sync(pool, table, remote_ts).await
                }
            }),
            TableKey::OrderLines => {
                let Some(user_id) = self.user_id.clone() else {
                    tracing::debug!("No user_id configured, not caching order lines");
                    return actions;
                };
                let week = self.week;
                actions.on(table, move |remote_ts| {
                    let remote = remote.clone();
                    let pool = pool.clone();
                    let user_id = user_id.clone();
                    async move {
                        let lines = remote.fetch_order_lines(&user_id, week).await?;
                        OrderLineRepository::new(pool.clone())
                            .replace_for_user_week(&user_id, week, &lines)
                            .await?;
                        tracing::debug!("Cached {} order line(s) for week {}", lines.len(), week);
                        PreferenceStore::new(pool.clone())
                            .set_order_lines_scope(&user_id, week)
                            .await?;
                        record_sync(pool, table, remote_ts).await
                    }
                })
            }
            _ => actions.on(table, move |remote_ts| {
                let remote = remote.clone();
                let pool = pool.clone();
                async move {
                    let documents: Vec<Value> = remote.fetch_collection(table).await?;
                    DocumentRepository::new(pool.clone())
                        .replace_collection(table, &documents)
                        .await?;
                    tracing::debug!("Cached {} {} document(s)", documents.len(), table);
                    record_sync(pool, table, remote_ts).await
                }
            }),
        }
    }
}

async fn record_sync(pool: SqlitePool, table: TableKey, remote_ts: i64) -> Result<(), SyncError> {
    PreferenceStore::new(pool)
        .set_last_sync(table, remote_ts)
        .await?;
    Ok(())
}
