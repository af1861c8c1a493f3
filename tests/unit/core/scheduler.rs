//! Unit tests for the cycle scheduler

use chrono::{TimeZone, Utc};
use confluence::core::scheduler::{cron_expression, CycleScheduler};
use confluence::error::EngineError;
use std::time::Duration;

#[test]
fn zero_interval_is_rejected() {
    assert!(CycleScheduler::new(0).is_err());
}

#[test]
fn sub_minute_intervals_use_second_field() {
    let scheduler = CycleScheduler::new(30).unwrap();
    assert_eq!(scheduler.cron_expr(), "*/30 * * * * *");
    assert_eq!(scheduler.interval_seconds(), 30);
}

#[test]
fn minute_intervals_use_minute_field() {
    assert_eq!(CycleScheduler::new(300).unwrap().cron_expr(), "0 */5 * * * *");
    assert_eq!(CycleScheduler::new(7200).unwrap().cron_expr(), "0 0 */2 * * *");
}

#[test]
fn next_delay_waits_for_the_aligned_tick() {
    let scheduler = CycleScheduler::new(30).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 10).unwrap();
    assert_eq!(
        scheduler.next_tick(now),
        Some(Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 30).unwrap())
    );
    assert_eq!(scheduler.next_delay(now), Duration::from_secs(20));
}

#[test]
fn next_tick_is_strictly_after_now() {
    let scheduler = CycleScheduler::new(30).unwrap();
    let on_tick = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 30).unwrap();
    assert_eq!(scheduler.next_delay(on_tick), Duration::from_secs(30));
}

#[test]
fn intervals_that_do_not_divide_their_unit_are_rejected() {
    for interval in [45, 90, 420, 5400, 18_000, 172_800] {
        let err = CycleScheduler::new(interval).unwrap_err();
        assert!(
            matches!(err, EngineError::Config(_)),
            "{}s should be rejected, got {:?}",
            interval,
            err
        );
    }
}

#[test]
fn ninety_seconds_does_not_degrade_to_every_minute() {
    assert!(cron_expression(90).is_err());
    assert!(cron_expression(45).is_err());
}

#[test]
fn hour_and_day_intervals_are_accepted() {
    assert_eq!(cron_expression(120).unwrap(), "0 */2 * * * *");
    assert_eq!(cron_expression(3600).unwrap(), "0 0 */1 * * *");
    assert_eq!(cron_expression(28_800).unwrap(), "0 0 */8 * * *");
    assert_eq!(cron_expression(86_400).unwrap(), "0 0 0 * * *");
}

#[test]
fn accepted_intervals_tick_at_a_constant_period() {
    let start = Utc.with_ymd_and_hms(2024, 1, 15, 23, 58, 0).unwrap();
    for interval in [15, 20, 300, 7200] {
        let scheduler = CycleScheduler::new(interval).unwrap();
        let mut tick = scheduler.next_tick(start).unwrap();
        for _ in 0..30 {
            let next = scheduler.next_tick(tick).unwrap();
            assert_eq!(
                (next - tick).num_seconds() as u64,
                interval,
                "uneven gap for {}s after {}",
                interval,
                tick
            );
            tick = next;
        }
    }
}
