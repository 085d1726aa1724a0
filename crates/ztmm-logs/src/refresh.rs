//! Timer-driven refresh of a log view.
//!
//! [`AutoRefresh`] re-queries a store on a fixed period and publishes the
//! result on a `watch` channel. The background task lives exactly as long as
//! the handle: [`AutoRefresh::stop`] or dropping the handle cancels it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::store::{LogStore, SharedLogStore};
use crate::types::{LevelSummary, LogEntry, LogFilter};

/// Default refresh period of the log viewer.
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(2);

/// Shortest accepted refresh period; shorter periods are raised to this.
pub const MIN_REFRESH_PERIOD: Duration = Duration::from_millis(10);

/// One refreshed view of the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSnapshot {
    /// Entries matching the active filter
    pub entries: Vec<LogEntry>,
    /// Counts over the whole store
    pub summary: LevelSummary,
    /// Known contexts
    pub contexts: Vec<String>,
    /// When the snapshot was taken
    pub refreshed_at: DateTime<Utc>,
}

impl RefreshSnapshot {
    /// Takes a snapshot of `store` under `filter`.
    #[must_use]
    pub fn take(store: &LogStore, filter: &LogFilter) -> Self {
        Self {
            entries: store.query_filtered(filter),
            summary: store.summarize(),
            contexts: store.contexts(),
            refreshed_at: Utc::now(),
        }
    }
}

/// Handle to a running periodic refresh.
pub struct AutoRefresh {
    cancel: CancellationToken,
    filter: Arc<RwLock<LogFilter>>,
    receiver: watch::Receiver<RefreshSnapshot>,
    handle: Option<JoinHandle<()>>,
}

impl AutoRefresh {
    /// Spawns the refresh task on the current tokio runtime.
    ///
    /// The first refresh happens immediately, then once per `period`, which
    /// is clamped to at least [`MIN_REFRESH_PERIOD`].
    ///
    /// Must be called from within a tokio runtime, like [`tokio::spawn`].
    #[must_use]
    pub fn start(store: SharedLogStore, filter: LogFilter, period: Duration) -> Self {
        let period = period.max(MIN_REFRESH_PERIOD);
        let initial = RefreshSnapshot::take(&store, &filter);
        let (sender, receiver) = watch::channel(initial);
        let cancel = CancellationToken::new();
        let filter = Arc::new(RwLock::new(filter));

        let handle = tokio::spawn(run(
            store,
            Arc::clone(&filter),
            period,
            sender,
            cancel.clone(),
        ));
        debug!(
            period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX),
            "log auto refresh started"
        );

        Self {
            cancel,
            filter,
            receiver,
            handle: Some(handle),
        }
    }

    /// Starts a refresh with [`DEFAULT_REFRESH_PERIOD`].
    #[must_use]
    pub fn with_default_period(store: SharedLogStore, filter: LogFilter) -> Self {
        Self::start(store, filter, DEFAULT_REFRESH_PERIOD)
    }

    /// Returns a receiver that observes every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RefreshSnapshot> {
        self.receiver.clone()
    }

    /// Returns the most recent snapshot.
    #[must_use]
    pub fn latest(&self) -> RefreshSnapshot {
        self.receiver.borrow().clone()
    }

    /// Replaces the filter used from the next refresh on.
    pub fn set_filter(&self, filter: LogFilter) {
        *self.filter.write() = filter;
    }

    /// Returns true until the refresh has been stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Cancels the refresh task. Idempotent.
    pub fn stop(&mut self) {
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
            debug!("log auto refresh stopped");
        }
    }

    /// Cancels the refresh task and waits for it to finish.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    store: SharedLogStore,
    filter: Arc<RwLock<LogFilter>>,
    period: Duration,
    sender: watch::Sender<RefreshSnapshot>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let filter = filter.read().clone();
                let snapshot = RefreshSnapshot::take(&store, &filter);
                if sender.send(snapshot).is_err() {
                    // Every receiver, including the handle's, is gone
                    break;
                }
            }
        }
    }
}
