//! The polling loop: fetch `/api/stats`, render, repeat.
//!
//! Ticks are serialized: the fetch is awaited inside the tick loop and
//! missed ticks are delayed, so at most one request is ever in flight. A
//! slow response pushes the next tick out instead of racing it.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, warn};

use crate::error::WatchError;
use crate::render::{Dashboard, Surface};
use crate::snapshot::StatsSnapshot;

/// Configuration for a [`StatsPoller`].
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Base URL of the stats server (e.g. `http://127.0.0.1:8080`).
    pub base_url: String,
    /// How often to poll `/api/stats`.
    pub poll_interval: Duration,
    /// TCP connection timeout.
    pub connect_timeout: Duration,
    /// Per-request read timeout.
    pub request_timeout: Duration,
}

impl PollerConfig {
    /// Create a config with the stock cadence.
    ///
    /// - poll_interval: 1 s
    /// - connect_timeout: 3 s
    /// - request_timeout: 5 s
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            poll_interval: Duration::from_millis(1000),
            connect_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Owns the repeating poll once [`StatsPoller::start`] has been called.
///
/// Dropping the handle without calling [`stop`](Self::stop) aborts the loop
/// at its next suspension point (the watch channel closes).
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Release the repeating poll. Idempotent: calling this after the loop
    /// has already been stopped is a no-op. An in-flight request is not
    /// cancelled; the loop finishes its current tick and then exits.
    pub async fn stop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_none()
    }
}

/// Polls a stats endpoint and renders each snapshot into its surface.
pub struct StatsPoller<S: Surface> {
    config: PollerConfig,
    client: reqwest::Client,
    dashboard: Dashboard,
    surface: S,
}

impl<S: Surface + Sync + 'static> StatsPoller<S> {
    pub fn new(config: PollerConfig, surface: S) -> Self {
        // Client construction only fails in exotic TLS environments; fall
        // back to a default client rather than failing startup.
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();

        Self {
            config,
            client,
            dashboard: Dashboard::new(),
            surface,
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn stats_url(&self) -> String {
        format!("{}/api/stats", self.config.base_url.trim_end_matches('/'))
    }

    /// Fetch one snapshot from `/api/stats`.
    ///
    /// # Returns
    /// - `Ok(StatsSnapshot)` — on a 2xx response with a parseable body.
    /// - `Err(WatchError::Connect)` — when the connection fails or times out.
    /// - `Err(WatchError::Http)` — on a non-2xx status.
    /// - `Err(WatchError::Json)` — when the body is not a snapshot.
    pub async fn fetch_stats(&self) -> Result<StatsSnapshot, WatchError> {
        let url = self.stats_url();
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WatchError::Connect {
                url: url.clone(),
                detail: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(WatchError::Http {
                status: resp.status().as_u16(),
                url,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| WatchError::Json {
            url: url.clone(),
            detail: e.to_string(),
        })?;

        serde_json::from_slice(&bytes).map_err(|e| WatchError::Json {
            url,
            detail: e.to_string(),
        })
    }

    /// One tick: fetch and render. On failure the status badge shows the
    /// error marker and every other region keeps its previous contents; the
    /// error is also returned so callers can log or exit in `--once` mode.
    pub async fn poll_once(&mut self) -> Result<(), WatchError> {
        match self.fetch_stats().await {
            Ok(snapshot) => {
                self.dashboard.apply(&snapshot, &mut self.surface);
                Ok(())
            }
            Err(e) => {
                self.dashboard.apply_error(&mut self.surface);
                Err(e)
            }
        }
    }

    /// Start the repeating poll. The interval fires once immediately, then
    /// every `poll_interval`. Runs until [`PollerHandle::stop`] is called.
    pub fn start(self) -> PollerHandle {
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(self.run(rx));
        PollerHandle {
            shutdown,
            task: Some(task),
        }
    }

    async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut consecutive_failures: u32 = 0;

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    match self.poll_once().await {
                        Ok(()) => {
                            consecutive_failures = 0;
                        }
                        Err(e) => {
                            consecutive_failures = consecutive_failures.saturating_add(1);
                            if consecutive_failures >= 5 {
                                error!(
                                    error = %e,
                                    url = %self.config.base_url,
                                    consecutive_failures,
                                    "stats poll failed repeatedly, will retry next tick"
                                );
                            } else {
                                warn!(
                                    error = %e,
                                    url = %self.config.base_url,
                                    "stats poll failed, will retry next tick"
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}
