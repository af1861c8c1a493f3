//! Cron-based cadence for the polling loop

use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{EngineError, Result};

/// Fallback wait when the schedule yields no further ticks.
const IDLE_RETRY: Duration = Duration::from_secs(60);

/// Turns a polling interval into a wall-clock aligned schedule.
#[derive(Debug, Clone)]
pub struct CycleScheduler {
    interval_seconds: u64,
    cron_expr: String,
    schedule: Schedule,
}

impl CycleScheduler {
    /// # Arguments
    /// * `interval_seconds` - Polling interval in seconds; must divide 60 s, 60 min or 24 h
    pub fn new(interval_seconds: u64) -> Result<Self> {
        if interval_seconds == 0 {
            return Err(EngineError::Config(
                "POLL_INTERVAL_SECONDS must be > 0".to_string(),
            ));
        }

        let cron_expr = cron_expression(interval_seconds)?;
        let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
            EngineError::Config(format!("invalid cron expression '{}': {}", cron_expr, e))
        })?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            "CycleScheduler: polling every {}s (cron: {})",
            interval_seconds,
            cron_expr
        );

        Ok(Self {
            interval_seconds,
            cron_expr,
            schedule,
        })
    }

    pub fn interval_seconds(&self) -> u64 {
        self.interval_seconds
    }

    pub fn cron_expr(&self) -> &str {
        &self.cron_expr
    }

    /// Next tick strictly after `now`.
    pub fn next_tick(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&now).next()
    }

    /// How long to sleep from `now` until the next tick.
    pub fn next_delay(&self, now: DateTime<Utc>) -> Duration {
        match self.next_tick(now) {
            Some(tick) => (tick - now).to_std().unwrap_or_default(),
            None => IDLE_RETRY,
        }
    }
}

/// Cron format: second minute hour day month weekday.
///
/// A `*/n` step restarts at every wrap of its field, so only intervals that
/// divide a minute, an hour or a day tick at a constant period. Anything else
/// is rejected instead of silently running at a different cadence.
pub fn cron_expression(interval_seconds: u64) -> Result<String> {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 3600;
    const DAY: u64 = 86_400;

    let expr = match interval_seconds {
        0 => None,
        s if s < MINUTE && MINUTE % s == 0 => Some(format!("*/{} * * * * *", s)),
        s if s >= MINUTE && s < HOUR && s % MINUTE == 0 && HOUR % s == 0 => {
            Some(format!("0 */{} * * * *", s / MINUTE))
        }
        s if s >= HOUR && s < DAY && s % HOUR == 0 && DAY % s == 0 => {
            Some(format!("0 0 */{} * * *", s / HOUR))
        }
        DAY => Some("0 0 0 * * *".to_string()),
        _ => None,
    };

    expr.ok_or_else(|| {
        EngineError::Config(format!(
            "POLL_INTERVAL_SECONDS={} cannot be scheduled at a fixed period; \
             use a divisor of 60 s, 60 min or 24 h",
            interval_seconds
        ))
    })
}
