//! Prometheus metrics for the polling runtime and HTTP surface.

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub cycles_total: IntCounter,
    pub cycles_abandoned_total: IntCounter,
    pub alerts_total: IntCounter,
    pub alerts_suppressed_total: IntCounter,
    pub no_setup_total: IntCounter,
    pub missing_timeframes_total: IntCounter,
    pub rejected_snapshots_total: IntCounter,
    pub delivery_failures_total: IntCounter,
    pub cycle_duration_seconds: Histogram,
    pub last_strength: Gauge,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_total = IntCounter::new("cycles_total", "Polling cycles evaluated")?;
        let cycles_abandoned_total = IntCounter::new(
            "cycles_abandoned_total",
            "Cycles abandoned because no data could be fetched",
        )?;
        let alerts_total = IntCounter::new("alerts_total", "Alerts raised")?;
        let alerts_suppressed_total =
            IntCounter::new("alerts_suppressed_total", "Cycles suppressed by the alert gate")?;
        let no_setup_total = IntCounter::new(
            "no_setup_total",
            "Cycles that passed the gate without a valid trade plan",
        )?;
        let missing_timeframes_total = IntCounter::new(
            "missing_timeframes_total",
            "Configured timeframes absent from a cycle",
        )?;
        let rejected_snapshots_total = IntCounter::new(
            "rejected_snapshots_total",
            "Snapshots discarded by validation",
        )?;
        let delivery_failures_total =
            IntCounter::new("delivery_failures_total", "Alert deliveries that failed")?;
        let cycle_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "cycle_duration_seconds",
            "Wall time of one fetch-evaluate-deliver cycle",
        ))?;
        let last_strength = Gauge::new("last_strength", "Strength of the most recent fused bias")?;
        let http_requests_total = IntCounter::new("http_requests_total", "HTTP requests served")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;

        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(cycles_abandoned_total.clone()))?;
        registry.register(Box::new(alerts_total.clone()))?;
        registry.register(Box::new(alerts_suppressed_total.clone()))?;
        registry.register(Box::new(no_setup_total.clone()))?;
        registry.register(Box::new(missing_timeframes_total.clone()))?;
        registry.register(Box::new(rejected_snapshots_total.clone()))?;
        registry.register(Box::new(delivery_failures_total.clone()))?;
        registry.register(Box::new(cycle_duration_seconds.clone()))?;
        registry.register(Box::new(last_strength.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            cycles_total,
            cycles_abandoned_total,
            alerts_total,
            alerts_suppressed_total,
            no_setup_total,
            missing_timeframes_total,
            rejected_snapshots_total,
            delivery_failures_total,
            cycle_duration_seconds,
            last_strength,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
        })
    }

    /// Prometheus text exposition of every registered metric.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
