//! Coop core library
//!
//! Local cache, remote sync and delivery-calendar rules for the grocery
//! cooperative client.

pub mod calendar;
pub mod config;
pub mod db;
pub mod models;
pub mod remote;
pub mod sync;

pub use calendar::{WeekParity, WeekTime};
pub use config::{Config, ConfigError};
pub use models::{
    allowed_container_types, reserved_day_for, ContainerType, Measure, OrderLine, ProducerType,
    TableKey, WeekDay,
};
pub use sync::{ForegroundSyncManager, GateOutcome, SyncError, SyncOrchestrator, SyncReport};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
