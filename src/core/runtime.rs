//! Sequential polling loop around the fusion engine

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::env;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::env_or;
use crate::core::scheduler::{cron_expression, CycleScheduler};
use crate::error::{EngineError, Result};
use crate::metrics::Metrics;
use crate::services::commentary::CommentaryProvider;
use crate::services::delivery::AlertSink;
use crate::services::market_data::MarketDataProvider;
use crate::signals::engine::{CycleInput, CycleOutcome, CycleReport, CycleSummary, FusionEngine};

/// Configuration for the polling runtime
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub poll_interval_seconds: u64,
    pub fetch_timeout_seconds: u64,
    pub http_port: u16,
    /// JSON snapshot file read by the file-backed provider.
    pub snapshot_file: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 30,
            fetch_timeout_seconds: 10,
            http_port: 8080,
            snapshot_file: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let poll_interval_seconds =
            env_or("POLL_INTERVAL_SECONDS", defaults.poll_interval_seconds)?;
        cron_expression(poll_interval_seconds)?;

        Ok(Self {
            poll_interval_seconds,
            fetch_timeout_seconds: env_or("FETCH_TIMEOUT_SECONDS", defaults.fetch_timeout_seconds)?,
            http_port: env_or("HTTP_PORT", defaults.http_port)?,
            snapshot_file: env::var("SNAPSHOT_FILE")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

/// What the last cycle did, as served by `/status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastCycle {
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CycleSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub type LastCycleHandle = Arc<RwLock<Option<LastCycle>>>;

/// Polls the provider, runs the engine and fans alerts out to every sink.
///
/// Cycles never overlap: each one completes (including delivery) before the
/// scheduler is consulted for the next tick.
pub struct SignalRuntime {
    config: RuntimeConfig,
    engine: Arc<FusionEngine>,
    provider: Arc<dyn MarketDataProvider>,
    sinks: Vec<Arc<dyn AlertSink>>,
    commentary: Option<Arc<dyn CommentaryProvider>>,
    metrics: Arc<Metrics>,
    last_cycle: LastCycleHandle,
}

impl SignalRuntime {
    pub fn new(
        config: RuntimeConfig,
        engine: Arc<FusionEngine>,
        provider: Arc<dyn MarketDataProvider>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            config,
            engine,
            provider,
            sinks: Vec::new(),
            commentary: None,
            metrics,
            last_cycle: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_commentary(mut self, provider: Arc<dyn CommentaryProvider>) -> Self {
        self.commentary = Some(provider);
        self
    }

    pub fn last_cycle(&self) -> LastCycleHandle {
        self.last_cycle.clone()
    }

    /// Run one cycle. `Ok(None)` means the cycle was abandoned for lack of data.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<Option<CycleReport>> {
        self.metrics.cycles_total.inc();
        let _timer = self.metrics.cycle_duration_seconds.start_timer();

        let input = match self.fetch().await {
            Ok(input) => input,
            Err(e) => {
                warn!(error = %e, "abandoning cycle");
                self.metrics.cycles_abandoned_total.inc();
                self.record(LastCycle {
                    at: now,
                    summary: None,
                    error: Some(e.to_string()),
                })
                .await;
                return Ok(None);
            }
        };

        let mut report = match self.engine.run_cycle(&input, now) {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "fatal engine error");
                self.record(LastCycle {
                    at: now,
                    summary: None,
                    error: Some(e.to_string()),
                })
                .await;
                return Err(e);
            }
        };

        self.metrics
            .missing_timeframes_total
            .inc_by(report.missing.len() as u64);
        self.metrics
            .rejected_snapshots_total
            .inc_by(report.rejected.len() as u64);
        if let Some(result) = report.result() {
            self.metrics.last_strength.set(result.strength);
        }

        match &mut report.outcome {
            CycleOutcome::NoData => {
                self.metrics.cycles_abandoned_total.inc();
            }
            CycleOutcome::Suppressed { .. } => {
                self.metrics.alerts_suppressed_total.inc();
            }
            CycleOutcome::NoValidSetup { .. } => {
                self.metrics.no_setup_total.inc();
            }
            CycleOutcome::Alert(alert) => {
                self.metrics.alerts_total.inc();
                if let Some(provider) = &self.commentary {
                    match provider.commentary(&alert.payload).await {
                        Ok(text) => {
                            alert.payload = alert.payload.clone().with_commentary(text);
                        }
                        Err(e) => warn!(error = %e, "sending alert without commentary"),
                    }
                }
                self.deliver(&alert.payload).await;
            }
        }

        self.record(LastCycle {
            at: now,
            summary: Some(report.summary()),
            error: None,
        })
        .await;

        Ok(Some(report))
    }

    /// Poll until ctrl-c. Returns an error only when the engine reports a fatal one.
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Poll until `shutdown` resolves.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let scheduler = CycleScheduler::new(self.config.poll_interval_seconds)?;
        tokio::pin!(shutdown);

        info!(
            symbol = %self.engine.config().symbol,
            interval = scheduler.interval_seconds(),
            sinks = self.sinks.len(),
            "SignalRuntime: started"
        );

        loop {
            let delay = scheduler.next_delay(Utc::now());
            tokio::select! {
                _ = &mut shutdown => {
                    info!("SignalRuntime: shutdown requested");
                    return Ok(());
                }
                _ = tokio::time::sleep(delay) => {}
            }

            if let Err(e) = self.run_once(Utc::now()).await {
                if e.is_fatal() {
                    return Err(e);
                }
                warn!(error = %e, "cycle failed");
            }
        }
    }

    async fn fetch(&self) -> Result<CycleInput> {
        let engine_config = self.engine.config();
        let timeout = Duration::from_secs(self.config.fetch_timeout_seconds);
        match tokio::time::timeout(
            timeout,
            self.provider
                .fetch(&engine_config.symbol, &engine_config.timeframes),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(EngineError::FetchTimeout(self.config.fetch_timeout_seconds)),
        }
    }

    async fn deliver(&self, payload: &crate::alerts::composer::AlertPayload) {
        for sink in &self.sinks {
            match sink.deliver(payload).await {
                Ok(()) => debug!(channel = sink.name(), "alert delivered"),
                Err(e) => {
                    self.metrics.delivery_failures_total.inc();
                    warn!(channel = sink.name(), error = %e, "alert delivery failed");
                }
            }
        }
    }

    async fn record(&self, cycle: LastCycle) {
        *self.last_cycle.write().await = Some(cycle);
    }
}
