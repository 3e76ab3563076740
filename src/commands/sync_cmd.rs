//! Sync CLI commands for refreshing the local cache from the remote.

use clap::{Args, Subcommand};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use coop::db::PreferenceStore;
use coop::models::TableKey;
use coop::sync::{gated_sync, load_manager, GateOutcome, SyncError, SyncReport};
use coop::Config;

/// Sync with remote
#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Ignore the minimum interval since the last check
    #[arg(long)]
    force: bool,

    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Show sync configuration and per-table sync times
    Status,

    /// Request a sync on a timer until interrupted
    Watch {
        /// Seconds between sync requests
        #[arg(long, default_value = "60")]
        every: u64,
    },
}

impl SyncCommand {
    pub async fn run(&self, pool: &SqlitePool, config: &Config) -> Result<(), SyncCommandError> {
        if !config.remote.is_configured() && !matches!(self.command, Some(SyncSubcommand::Status)) {
            return Err(SyncCommandError::NotConfigured);
        }

        match &self.command {
            None => self.sync(pool, config).await,
            Some(SyncSubcommand::Status) => self.status(pool, config).await,
            Some(SyncSubcommand::Watch { every }) => self.watch(pool, config, *every).await,
        }
    }

    async fn sync(&self, pool: &SqlitePool, config: &Config) -> Result<(), SyncCommandError> {
        let prefs = PreferenceStore::new(pool.clone());
        let manager = load_manager(config, &prefs).await?;

        println!("Syncing with {}...", config.environment.value);
        println!();

        let outcome = gated_sync(&manager, config, pool, self.force).await?;
        print_outcome(&outcome);

        Ok(())
    }

    async fn watch(&self, pool: &SqlitePool, config: &Config, every: u64) -> Result<(), SyncCommandError> {
        let prefs = PreferenceStore::new(pool.clone());
        let manager = Arc::new(load_manager(config, &prefs).await?);
        let mut requests = manager.subscribe();

        let ticker_manager = manager.clone();
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(every.max(1)));
            loop {
                interval.tick().await;
                ticker_manager.request_sync();
            }
        });

        println!("Watching for sync requests every {}s (Ctrl-C to stop)", every);

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                request = requests.recv() => match request {
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        match gated_sync(&manager, config, pool, false).await {
                            Ok(outcome) => print_outcome(&outcome),
                            // Failed runs are retried on a later request
                            Err(e) => eprintln!("Sync failed: {}", e),
                        }
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        ticker.abort();
        Ok(())
    }

    async fn status(&self, pool: &SqlitePool, config: &Config) -> Result<(), SyncCommandError> {
        println!("Sync Configuration");
        println!("==================");
        println!();

        match &config.remote.base_url {
            Some(url) => println!("Remote:       {}/{}", url, config.environment.value),
            None => {
                println!("Status: Not configured");
                println!();
                println!("To enable sync, add to your config file:");
                println!();
                println!("  remote:");
                println!("    base_url: \"https://coop.example.com\"");
                println!("    api_key: \"your-api-key\"");
                println!();
                println!("Or set environment variables:");
                println!("  COOP_REMOTE_URL");
                println!("  COOP_REMOTE_API_KEY");
                return Ok(());
            }
        }
        println!(
            "Auto-sync:    {}",
            if config.sync.auto_sync {
                "enabled"
            } else {
                "disabled"
            }
        );
        println!("Min interval: {} min", config.sync.min_interval_minutes);

        let prefs = PreferenceStore::new(pool.clone());
        match prefs.last_foreground_check().await? {
            Some(at) => println!("Last check:   {}", at.to_rfc3339()),
            None => println!("Last check:   never"),
        }
        println!();

        let local = prefs.last_syncs().await?;
        println!("Tables:");
        for table in TableKey::ALL {
            let critical = if config.sync.critical_tables.contains(&table) {
                "*"
            } else {
                " "
            };
            let synced = local
                .get(&table)
                .and_then(|millis| chrono::DateTime::from_timestamp_millis(*millis))
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "never".to_string());
            println!("  {} {:<12} {}", critical, table.collection(), synced);
        }
        println!();
        println!("* critical");

        Ok(())
    }
}

fn print_outcome(outcome: &GateOutcome<SyncReport>) {
    match outcome {
        GateOutcome::Ran(report) => {
            for table in &report.synced {
                println!("  ✓ updated     {}", table);
            }
            for table in &report.up_to_date {
                println!("  ✓ up to date  {}", table);
            }
            for table in &report.skipped {
                println!("  - skipped     {}", table);
            }
            println!();
            if report.any_synced() {
                println!("Sync complete.");
            } else {
                println!("Already up to date.");
            }
        }
        GateOutcome::TooSoon { next_check } => {
            println!(
                "Checked recently; next sync allowed after {}. Use --force to sync now.",
                next_check.to_rfc3339()
            );
        }
        GateOutcome::InFlight => println!("A sync is already running."),
    }
}

/// Errors from sync commands
#[derive(Debug)]
pub enum SyncCommandError {
    NotConfigured,
    SyncError(SyncError),
}

impl std::fmt::Display for SyncCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncCommandError::NotConfigured => write!(
                f,
                "Remote not configured. Run `coop sync status` for setup help."
            ),
            SyncCommandError::SyncError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SyncCommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncCommandError::NotConfigured => None,
            SyncCommandError::SyncError(e) => Some(e),
        }
    }
}

impl From<SyncError> for SyncCommandError {
    fn from(e: SyncError) -> Self {
        SyncCommandError::SyncError(e)
    }
}

impl From<sqlx::Error> for SyncCommandError {
    fn from(e: sqlx::Error) -> Self {
        SyncCommandError::SyncError(SyncError::Storage(e))
    }
}
