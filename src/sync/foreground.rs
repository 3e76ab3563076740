//! Rate-limited sync trigger for app-foreground style events.

use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use std::sync::Mutex;
use tokio::sync::broadcast;

pub const DEFAULT_MIN_INTERVAL_MINUTES: i64 = 30;

const REQUEST_CHANNEL_CAPACITY: usize = 16;

/// A "sync requested" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncRequest {
    pub requested_at: DateTime<Utc>,
}

/// What the gate did with a sync attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome<T> {
    /// The action ran and returned this value
    Ran(T),
    /// The last check was too recent
    TooSoon { next_check: DateTime<Utc> },
    /// Another sync is still running
    InFlight,
}

/// Guards a sync action behind a minimum interval and an in-flight lock.
///
/// Concurrent callers that find the lock taken are skipped, not queued.
pub struct ForegroundSyncManager {
    min_interval: Duration,
    last_check: Mutex<Option<DateTime<Utc>>>,
    in_flight: tokio::sync::Mutex<()>,
    requests: broadcast::Sender<SyncRequest>,
}

impl ForegroundSyncManager {
    /// `last_check` seeds the interval, e.g. from a persisted value.
    pub fn new(min_interval: Duration, last_check: Option<DateTime<Utc>>) -> Self {
        let (requests, _) = broadcast::channel(REQUEST_CHANNEL_CAPACITY);
        Self {
            min_interval,
            last_check: Mutex::new(last_check),
            in_flight: tokio::sync::Mutex::new(()),
            requests,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn last_check(&self) -> Option<DateTime<Utc>> {
        *self.last_check.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fire-and-forget sync request. Returns how many subscribers saw it;
    /// nobody listening is not an error.
    pub fn request_sync(&self) -> usize {
        self.requests
            .send(SyncRequest {
                requested_at: Utc::now(),
            })
            .unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncRequest> {
        self.requests.subscribe()
    }

    pub async fn sync_if_needed<F, Fut, T, E>(&self, action: F) -> Result<GateOutcome<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.sync_if_needed_at(Utc::now(), action).await
    }

    /// Runs `action` once if at least the minimum interval has passed since
    /// the last check (as of `now`) and no other sync is in flight.
    ///
    /// The in-flight lock is released when this returns, whether the action
    /// succeeded or not.
    pub async fn sync_if_needed_at<F, Fut, T, E>(
        &self,
        now: DateTime<Utc>,
        action: F,
    ) -> Result<GateOutcome<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("Sync already in flight, skipping");
            return Ok(GateOutcome::InFlight);
        };

        {
            let mut last_check = self.last_check.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(previous) = *last_check {
                if now - previous < self.min_interval {
                    let next_check = previous + self.min_interval;
                    tracing::debug!("Last sync check at {}, next at {}", previous, next_check);
                    return Ok(GateOutcome::TooSoon { next_check });
                }
            }
            *last_check = Some(now);
        }

        action().await.map(GateOutcome::Ran)
    }

    /// Runs `action` regardless of the interval, still honoring the
    /// in-flight lock. Counts as a check.
    pub async fn force_sync<F, Fut, T, E>(&self, action: F) -> Result<GateOutcome<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Ok(_guard) = self.in_flight.try_lock() else {
            return Ok(GateOutcome::InFlight);
        };

        *self.last_check.lock().unwrap_or_else(|e| e.into_inner()) = Some(Utc::now());

        action().await.map(GateOutcome::Ran)
    }
}

impl Default for ForegroundSyncManager {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_MIN_INTERVAL_MINUTES), None)
    }
}
