use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::models::TableKey;
use crate::sync::{LocalTimestampSource, SyncError, TimestampMap};

const LAST_SYNC_PREFIX: &str = "lastSync.";
const FOREGROUND_CHECK_KEY: &str = "foregroundSync.lastCheck";
const ORDER_LINES_SCOPE_KEY: &str = "orderLinesSync.scope";

/// Key/value preferences backed by the `preferences` table.
#[derive(Clone)]
pub struct PreferenceStore {
    pool: SqlitePool,
}

impl PreferenceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_string(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    pub async fn set_string(&self, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO preferences (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Unparseable values read as absent.
    pub async fn get_i64(&self, key: &str) -> Result<Option<i64>, sqlx::Error> {
        Ok(self.get_string(key).await?.and_then(|v| v.parse().ok()))
    }

    pub async fn set_i64(&self, key: &str, value: i64) -> Result<(), sqlx::Error> {
        self.set_string(key, &value.to_string()).await
    }

    pub async fn get_bool(&self, key: &str) -> Result<Option<bool>, sqlx::Error> {
        Ok(self.get_string(key).await?.and_then(|v| v.parse().ok()))
    }

    pub async fn set_bool(&self, key: &str, value: bool) -> Result<(), sqlx::Error> {
        self.set_string(key, &value.to_string()).await
    }

    pub async fn remove(&self, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM preferences WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remote timestamp (epoch-millis) the table was last synced to.
    pub async fn last_sync(&self, table: TableKey) -> Result<Option<i64>, sqlx::Error> {
        self.get_i64(&last_sync_key(table)).await
    }

    pub async fn set_last_sync(&self, table: TableKey, millis: i64) -> Result<(), sqlx::Error> {
        self.set_i64(&last_sync_key(table), millis).await
    }

    /// Marks the table as never synced. Returns whether a time was stored.
    pub async fn clear_last_sync(&self, table: TableKey) -> Result<bool, sqlx::Error> {
        self.remove(&last_sync_key(table)).await
    }

    /// The user and week whose order lines were last cached.
    pub async fn order_lines_scope(&self) -> Result<Option<(String, u32)>, sqlx::Error> {
        Ok(self.get_string(ORDER_LINES_SCOPE_KEY).await?.and_then(|scope| {
            let (user_id, week) = scope.rsplit_once('/')?;
            Some((user_id.to_string(), week.parse().ok()?))
        }))
    }

    pub async fn set_order_lines_scope(&self, user_id: &str, week: u32) -> Result<(), sqlx::Error> {
        self.set_string(ORDER_LINES_SCOPE_KEY, &format!("{}/{}", user_id, week))
            .await
    }

    pub async fn last_syncs(&self) -> Result<TimestampMap, sqlx::Error> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT key, value FROM preferences WHERE key LIKE 'lastSync.%'")
                .fetch_all(&self.pool)
                .await?;

        let mut timestamps = TimestampMap::new();
        for (key, value) in rows {
            let table = key
                .strip_prefix(LAST_SYNC_PREFIX)
                .and_then(|name| TableKey::from_str(name).ok());
            if let (Some(table), Ok(millis)) = (table, value.parse::<i64>()) {
                timestamps.insert(table, millis);
            }
        }

        Ok(timestamps)
    }

    pub async fn last_foreground_check(&self) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
        Ok(self
            .get_i64(FOREGROUND_CHECK_KEY)
            .await?
            .and_then(DateTime::from_timestamp_millis))
    }

    pub async fn set_last_foreground_check(&self, at: DateTime<Utc>) -> Result<(), sqlx::Error> {
        self.set_i64(FOREGROUND_CHECK_KEY, at.timestamp_millis()).await
    }
}

fn last_sync_key(table: TableKey) -> String {
    format!("{}{}", LAST_SYNC_PREFIX, table.collection())
}

impl LocalTimestampSource for PreferenceStore {
    async fn local_timestamps(&self) -> Result<TimestampMap, SyncError> {
        Ok(self.last_syncs().await?)
    }
}
