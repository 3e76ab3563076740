//! Gated sync runs shared by the `sync` command and auto-sync.
//!
//! The foreground gate's last-check time is persisted in the preference
//! store so the minimum interval holds across CLI invocations.

use chrono::Duration;
use sqlx::SqlitePool;
use std::sync::Arc;

use super::{CatalogSyncer, ForegroundSyncManager, GateOutcome, SyncError, SyncOrchestrator, SyncReport};
use crate::calendar::WeekTime;
use crate::config::Config;
use crate::db::PreferenceStore;
use crate::remote::RemoteClient;

/// Builds a gate seeded with the persisted last-check time.
pub async fn load_manager(config: &Config, prefs: &PreferenceStore) -> Result<ForegroundSyncManager, SyncError> {
    let last_check = prefs.last_foreground_check().await?;
    Ok(ForegroundSyncManager::new(
        Duration::minutes(config.sync.min_interval_minutes),
        last_check,
    ))
}

/// Runs one full orchestrated sync, without any gating.
pub async fn run_sync(config: &Config, pool: &SqlitePool) -> Result<SyncReport, SyncError> {
    let remote = Arc::new(RemoteClient::from_config(&config.remote, config.environment.value)?);
    let prefs = PreferenceStore::new(pool.clone());
    let week = WeekTime::with_override(config.test_date.value).current_week();

    let critical = config.sync.critical_tables.clone();
    let syncer = CatalogSyncer::new(remote.clone(), pool.clone(), config.user_id.value.clone(), week);
    syncer.invalidate_rescoped_order_lines().await?;
    let actions = syncer.actions(&critical);

    let orchestrator = SyncOrchestrator::new(remote.as_ref(), prefs, critical);
    orchestrator.run(&actions).await
}

/// Runs a sync through `manager`, then persists its last-check time.
pub async fn gated_sync(
    manager: &ForegroundSyncManager,
    config: &Config,
    pool: &SqlitePool,
    force: bool,
) -> Result<GateOutcome<SyncReport>, SyncError> {
    let outcome = if force {
        manager.force_sync(|| run_sync(config, pool)).await
    } else {
        manager.sync_if_needed(|| run_sync(config, pool)).await
    };

    // The check counts even when the run failed
    if let Some(at) = manager.last_check() {
        if let Err(e) = PreferenceStore::new(pool.clone())
            .set_last_foreground_check(at)
            .await
        {
            tracing::warn!("Failed to persist last sync check: {}", e);
        }
    }

    outcome
}

/// Performs a gated sync if auto-sync is enabled and a remote is configured.
///
/// Errors are logged and swallowed so read commands keep working offline.
pub async fn try_auto_sync(config: &Config, pool: &SqlitePool) {
    if !config.sync.auto_sync || !config.remote.is_configured() {
        return;
    }

    let prefs = PreferenceStore::new(pool.clone());
    let manager = match load_manager(config, &prefs).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::warn!("Auto-sync: {}", e);
            return;
        }
    };

    match gated_sync(&manager, config, pool, false).await {
        Ok(GateOutcome::Ran(report)) => {
            tracing::info!("Auto-sync: refreshed {} table(s)", report.synced.len());
        }
        Ok(GateOutcome::TooSoon { next_check }) => {
            tracing::debug!("Auto-sync: skipped until {}", next_check);
        }
        Ok(GateOutcome::InFlight) => {}
        Err(e) => {
            tracing::warn!("Auto-sync: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSource, ConfigValue, RemoteConfig, SyncConfig};
    use crate::db::init_db;
    use crate::models::TableKey;
    use crate::remote::Environment;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct TestContext {
        config: Config,
        pool: SqlitePool,
        prefs: PreferenceStore,
        _temp_dir: TempDir,
    }

    /// A config pointing at a remote nobody listens on.
    async fn setup() -> TestContext {
        setup_with_remote("http://127.0.0.1:9").await
    }

    async fn setup_with_remote(base_url: &str) -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = init_db(&db_path).await.unwrap();
        let config = Config {
            database_path: ConfigValue::new(db_path, ConfigSource::Default),
            environment: ConfigValue::new(Environment::Develop, ConfigSource::Default),
            user_id: ConfigValue::new(Some("u-1".to_string()), ConfigSource::Default),
            test_date: ConfigValue::new(None, ConfigSource::Default),
            config_file: None,
            remote: RemoteConfig {
                base_url: Some(base_url.to_string()),
                ..RemoteConfig::default()
            },
            sync: SyncConfig::default(),
        };
        TestContext {
            config,
            prefs: PreferenceStore::new(pool.clone()),
            pool,
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_failed_run_still_counts_as_check() {
        let ctx = setup().await;
        let manager = load_manager(&ctx.config, &ctx.prefs).await.unwrap();

        let result = gated_sync(&manager, &ctx.config, &ctx.pool, false).await;
        assert!(matches!(result, Err(SyncError::Remote(_))));

        let persisted = ctx.prefs.last_foreground_check().await.unwrap();
        assert!(persisted.is_some());
        assert_eq!(persisted, manager.last_check());
    }

    #[tokio::test]
    async fn test_persisted_check_gates_later_runs() {
        let ctx = setup().await;
        let first = load_manager(&ctx.config, &ctx.prefs).await.unwrap();
        let _ = gated_sync(&first, &ctx.config, &ctx.pool, false).await;

        // A fresh manager, as in a later CLI invocation
        let manager = load_manager(&ctx.config, &ctx.prefs).await.unwrap();
        let outcome = gated_sync(&manager, &ctx.config, &ctx.pool, false).await.unwrap();
        assert!(matches!(outcome, GateOutcome::TooSoon { .. }));

        // Forcing bypasses the interval and reaches the remote
        let forced = gated_sync(&manager, &ctx.config, &ctx.pool, true).await;
        assert!(matches!(forced, Err(SyncError::Remote(_))));
    }

    #[tokio::test]
    async fn test_run_sync_requires_remote() {
        let mut ctx = setup().await;
        ctx.config.remote.base_url = None;

        let result = run_sync(&ctx.config, &ctx.pool).await;
        assert!(matches!(
            result,
            Err(SyncError::Remote(crate::remote::RemoteError::NotConfigured))
        ));
    }

    #[tokio::test]
    async fn test_completed_sync_reported_when_check_not_persisted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/develop/syncTimestamps"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "measures": 100 })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/develop/measures"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "kg", "name": "Kilogram", "abbreviation": "kg" }
            ])))
            .mount(&server)
            .await;

        let mut ctx = setup_with_remote(&server.uri()).await;
        ctx.config.sync.critical_tables = vec![TableKey::Measures];
        sqlx::query(
            r#"
            CREATE TRIGGER reject_last_check BEFORE INSERT ON preferences
            WHEN NEW.key = 'foregroundSync.lastCheck'
            BEGIN SELECT RAISE(ABORT, 'read-only'); END
            "#,
        )
        .execute(&ctx.pool)
        .await
        .unwrap();

        let manager = load_manager(&ctx.config, &ctx.prefs).await.unwrap();
        let outcome = gated_sync(&manager, &ctx.config, &ctx.pool, false).await.unwrap();

        match outcome {
            GateOutcome::Ran(report) => assert_eq!(report.synced, vec![TableKey::Measures]),
            other => panic!("expected a completed sync, got {:?}", other),
        }
        assert_eq!(ctx.prefs.last_sync(TableKey::Measures).await.unwrap(), Some(100));
        assert!(ctx.prefs.last_foreground_check().await.unwrap().is_none());
        assert!(manager.last_check().is_some());
    }
}
