//! Timestamp-driven synchronization of the local cache.
//!
//! The remote keeps one last-modified timestamp (epoch-millis) per
//! collection. Locally, the preference store records the remote timestamp
//! each table was last synced to. A critical table is stale when its remote
//! timestamp is newer than the local one, or when there is no local record.
//!
//! # Usage
//!
//! ```no_run
//! use coop::models::TableKey;
//! use coop::sync::{SyncActions, SyncOrchestrator, TimestampMap};
//!
//! # async fn demo() -> Result<(), coop::sync::SyncError> {
//! let remote: TimestampMap = [(TableKey::Users, 2_000)].into_iter().collect();
//! let local: TimestampMap = [(TableKey::Users, 1_000)].into_iter().collect();
//!
//! let actions = SyncActions::new().on(TableKey::Users, |remote_ts| async move {
//!     println!("refetch users up to {}", remote_ts);
//!     Ok(())
//! });
//!
//! let orchestrator = SyncOrchestrator::new(remote, local, vec![TableKey::Users]);
//! let report = orchestrator.run(&actions).await?;
//! assert_eq!(report.synced, vec![TableKey::Users]);
//! # Ok(())
//! # }
//! ```

pub mod auto_sync;
pub mod catalog;
pub mod error;
pub mod foreground;
pub mod orchestrator;
pub mod timestamps;

pub use auto_sync::{gated_sync, load_manager, run_sync, try_auto_sync};
pub use catalog::CatalogSyncer;
pub use error::SyncError;
pub use foreground::{
    ForegroundSyncManager, GateOutcome, SyncRequest, DEFAULT_MIN_INTERVAL_MINUTES,
};
pub use orchestrator::{stale_tables, SyncAction, SyncActions, SyncOrchestrator, SyncReport};
pub use timestamps::{LocalTimestampSource, RemoteTimestampSource, TimestampMap};
