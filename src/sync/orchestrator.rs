//! Decides which tables are stale and runs their sync actions.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::future::Future;

use super::{LocalTimestampSource, RemoteTimestampSource, SyncError, TimestampMap};
use crate::models::TableKey;

/// Refetch action for one table, given the remote timestamp it syncs to.
pub type SyncAction = Box<dyn Fn(i64) -> BoxFuture<'static, Result<(), SyncError>> + Send + Sync>;

/// Table key → sync action.
#[derive(Default)]
pub struct SyncActions {
    actions: HashMap<TableKey, SyncAction>,
}

impl SyncActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the action for `table`, replacing any previous one.
    pub fn on<F, Fut>(mut self, table: TableKey, action: F) -> Self
    where
        F: Fn(i64) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), SyncError>> + Send + 'static,
    {
        self.actions
            .insert(table, Box::new(move |remote| action(remote).boxed()));
        self
    }

    pub fn contains(&self, table: TableKey) -> bool {
        self.actions.contains_key(&table)
    }

    fn get(&self, table: TableKey) -> Option<&SyncAction> {
        self.actions.get(&table)
    }
}

/// Outcome of a completed sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Stale tables whose action ran, in dispatch order
    pub synced: Vec<TableKey>,
    /// Critical tables that were already current
    pub up_to_date: Vec<TableKey>,
    /// Stale tables with no registered action
    pub skipped: Vec<TableKey>,
}

impl SyncReport {
    pub fn any_synced(&self) -> bool {
        !self.synced.is_empty()
    }
}

/// Critical tables that need a refetch, paired with their remote timestamp,
/// in `critical` order.
///
/// Fails when `remote` is empty or lacks any critical table; both checks
/// cover every critical table before anything is returned.
pub fn stale_tables(
    remote: &TimestampMap,
    local: &TimestampMap,
    critical: &[TableKey],
) -> Result<Vec<(TableKey, i64)>, SyncError> {
    if remote.is_empty() {
        return Err(SyncError::EmptyRemoteTimestamps);
    }

    let mut stale = Vec::new();
    for &table in critical {
        let remote_ts = *remote
            .get(&table)
            .ok_or(SyncError::MissingRemoteTimestamp(table))?;

        match local.get(&table) {
            Some(&local_ts) if remote_ts <= local_ts => {}
            _ => stale.push((table, remote_ts)),
        }
    }

    Ok(stale)
}

pub struct SyncOrchestrator<R, L> {
    remote: R,
    local: L,
    critical: Vec<TableKey>,
}

impl<R, L> SyncOrchestrator<R, L>
where
    R: RemoteTimestampSource,
    L: LocalTimestampSource,
{
    pub fn new(remote: R, local: L, critical: Vec<TableKey>) -> Self {
        Self {
            remote,
            local,
            critical,
        }
    }

    pub fn critical_tables(&self) -> &[TableKey] {
        &self.critical
    }

    /// Fetches both timestamp sets and computes the stale tables.
    pub async fn plan(&self) -> Result<Vec<(TableKey, i64)>, SyncError> {
        let remote = self.remote.remote_timestamps().await?;
        if remote.is_empty() {
            return Err(SyncError::EmptyRemoteTimestamps);
        }
        let local = self.local.local_timestamps().await?;
        stale_tables(&remote, &local, &self.critical)
    }

    /// Runs the action of every stale table, one at a time.
    ///
    /// The first failing action aborts the run; tables after it are left
    /// stale for the next attempt.
    pub async fn run(&self, actions: &SyncActions) -> Result<SyncReport, SyncError> {
        let stale = self.plan().await?;

        let mut report = SyncReport {
            up_to_date: self
                .critical
                .iter()
                .copied()
                .filter(|table| !stale.iter().any(|(t, _)| t == table))
                .collect(),
            ..SyncReport::default()
        };

        for (table, remote_ts) in stale {
            let Some(action) = actions.get(table) else {
                tracing::warn!("No sync action registered for stale table '{}'", table);
                report.skipped.push(table);
                continue;
            };

            tracing::info!("Syncing '{}' to remote timestamp {}", table, remote_ts);
            action(remote_ts).await?;
            report.synced.push(table);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn map(entries: &[(TableKey, i64)]) -> TimestampMap {
        entries.iter().copied().collect()
    }

    type Calls = Arc<Mutex<Vec<(TableKey, i64)>>>;

    fn recording_actions(tables: &[TableKey]) -> (SyncActions, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let mut actions = SyncActions::new();
        for &table in tables {
            let calls = calls.clone();
            actions = actions.on(table, move |remote| {
                let calls = calls.clone();
                async move {
                    calls.lock().unwrap().push((table, remote));
                    Ok(())
                }
            });
        }
        (actions, calls)
    }

    #[test]
    fn test_stale_iff_remote_newer() {
        let remote = map(&[
            (TableKey::Users, 200),
            (TableKey::Products, 100),
            (TableKey::Measures, 50),
        ]);
        let local = map(&[
            (TableKey::Users, 100),
            (TableKey::Products, 100),
            (TableKey::Measures, 80),
        ]);
        let critical = [TableKey::Users, TableKey::Products, TableKey::Measures];

        let stale = stale_tables(&remote, &local, &critical).unwrap();
        assert_eq!(stale, vec![(TableKey::Users, 200)]);
    }

    #[test]
    fn test_missing_local_is_always_stale() {
        let remote = map(&[(TableKey::Users, 1), (TableKey::News, 1)]);
        let local = map(&[(TableKey::Users, 5)]);

        let stale = stale_tables(&remote, &local, &[TableKey::News, TableKey::Users]).unwrap();
        assert_eq!(stale, vec![(TableKey::News, 1)]);
    }

    #[test]
    fn test_stale_order_follows_critical_list() {
        let remote = map(&[(TableKey::Users, 9), (TableKey::Products, 9), (TableKey::News, 9)]);
        let critical = [TableKey::News, TableKey::Users, TableKey::Products];

        let stale = stale_tables(&remote, &TimestampMap::new(), &critical).unwrap();
        let order: Vec<TableKey> = stale.into_iter().map(|(t, _)| t).collect();
        assert_eq!(order, critical.to_vec());
    }

    #[test]
    fn test_empty_remote_fails() {
        let result = stale_tables(&TimestampMap::new(), &TimestampMap::new(), &[]);
        assert!(matches!(result, Err(SyncError::EmptyRemoteTimestamps)));
    }

    #[test]
    fn test_missing_critical_remote_fails() {
        let remote = map(&[(TableKey::Users, 10)]);
        let result = stale_tables(
            &remote,
            &TimestampMap::new(),
            &[TableKey::Users, TableKey::Products],
        );
        assert!(matches!(
            result,
            Err(SyncError::MissingRemoteTimestamp(TableKey::Products))
        ));
    }

    #[tokio::test]
    async fn test_run_invokes_actions_in_order_with_remote_timestamp() {
        let remote = map(&[
            (TableKey::Users, 300),
            (TableKey::Products, 200),
            (TableKey::Measures, 100),
        ]);
        let local = map(&[(TableKey::Products, 200)]);
        let critical = vec![TableKey::Measures, TableKey::Products, TableKey::Users];
        let (actions, calls) = recording_actions(&critical);

        let orchestrator = SyncOrchestrator::new(remote, local, critical);
        let report = orchestrator.run(&actions).await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec![(TableKey::Measures, 100), (TableKey::Users, 300)]
        );
        assert_eq!(report.synced, vec![TableKey::Measures, TableKey::Users]);
        assert_eq!(report.up_to_date, vec![TableKey::Products]);
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_run_with_empty_remote_invokes_nothing() {
        let critical = vec![TableKey::Users];
        let (actions, calls) = recording_actions(&critical);

        let orchestrator = SyncOrchestrator::new(TimestampMap::new(), TimestampMap::new(), critical);
        let result = orchestrator.run(&actions).await;

        assert!(matches!(result, Err(SyncError::EmptyRemoteTimestamps)));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_with_missing_critical_invokes_nothing() {
        // Users is stale and listed first, but Products has no remote entry
        let remote = map(&[(TableKey::Users, 10)]);
        let critical = vec![TableKey::Users, TableKey::Products];
        let (actions, calls) = recording_actions(&critical);

        let orchestrator = SyncOrchestrator::new(remote, TimestampMap::new(), critical);
        let result = orchestrator.run(&actions).await;

        assert!(matches!(
            result,
            Err(SyncError::MissingRemoteTimestamp(TableKey::Products))
        ));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_skips_tables_without_action() {
        let remote = map(&[(TableKey::Users, 10), (TableKey::News, 10)]);
        let (actions, calls) = recording_actions(&[TableKey::Users]);

        let orchestrator = SyncOrchestrator::new(
            remote,
            TimestampMap::new(),
            vec![TableKey::News, TableKey::Users],
        );
        let report = orchestrator.run(&actions).await.unwrap();

        assert_eq!(report.skipped, vec![TableKey::News]);
        assert_eq!(report.synced, vec![TableKey::Users]);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_action_stops_the_run() {
        let remote = map(&[(TableKey::Users, 10), (TableKey::Products, 10)]);
        let (recorded, calls) = recording_actions(&[TableKey::Products]);
        let actions = recorded.on(TableKey::Users, |_| async {
            Err(SyncError::Table {
                table: TableKey::Users,
                message: "boom".to_string(),
            })
        });

        let orchestrator = SyncOrchestrator::new(
            remote,
            TimestampMap::new(),
            vec![TableKey::Users, TableKey::Products],
        );
        let result = orchestrator.run(&actions).await;

        assert!(matches!(result, Err(SyncError::Table { .. })));
        assert!(calls.lock().unwrap().is_empty());
    }
}
