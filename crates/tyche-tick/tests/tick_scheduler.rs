//! Integration tests for the idle tick scheduler.
//!
//! Runs with paused Tokio time so `sleep_until` resolves as soon as the
//! runtime auto-advances the clock.

use std::time::Duration;

use tyche_tick::{TickConfig, TickScheduler};

fn fast_config() -> TickConfig {
    TickConfig {
        period: Duration::from_millis(100),
        keepalive_every: 6,
        periodic_every: 2,
    }
}

#[test]
fn test_disabled_config() {
    let s = TickScheduler::new(TickConfig::disabled());
    assert!(s.is_disabled());
    assert_eq!(s.tick_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_ticks_count_up_from_one() {
    let mut s = TickScheduler::new(fast_config());
    let first = s.wait_for_tick().await;
    let second = s.wait_for_tick().await;
    assert_eq!(first.tick, 1);
    assert_eq!(second.tick, 2);
    assert_eq!(s.tick_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_tick_waits_one_period() {
    let mut s = TickScheduler::new(fast_config());
    let start = tokio::time::Instant::now();
    s.wait_for_tick().await;
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_chores_fire_on_schedule() {
    let mut s = TickScheduler::new(fast_config());
    let mut keepalives = Vec::new();
    let mut periodics = Vec::new();
    for _ in 0..12 {
        let info = s.wait_for_tick().await;
        if info.keepalive {
            keepalives.push(info.tick);
        }
        if info.periodic {
            periodics.push(info.tick);
        }
    }
    assert_eq!(keepalives, vec![6, 12]);
    assert_eq!(periodics, vec![2, 4, 6, 8, 10, 12]);
}

#[tokio::test(start_paused = true)]
async fn test_default_schedule_keepalive_every_minute() {
    let mut s = TickScheduler::new(TickConfig::default());
    let mut keepalive_at = None;
    for _ in 0..60 {
        let info = s.wait_for_tick().await;
        if info.keepalive {
            keepalive_at = Some(info.tick);
        }
    }
    assert_eq!(keepalive_at, Some(60));
}

#[tokio::test(start_paused = true)]
async fn test_stall_skips_instead_of_bursting() {
    let mut s = TickScheduler::new(fast_config());
    s.wait_for_tick().await;

    // Stall 350ms past the next deadline: three whole periods.
    tokio::time::advance(Duration::from_millis(450)).await;
    let late = s.wait_for_tick().await;
    assert_eq!(late.tick, 2);
    assert_eq!(late.ticks_skipped, 3);

    // The next tick is a full period after the late one, not immediate.
    let before = tokio::time::Instant::now();
    let next = s.wait_for_tick().await;
    assert_eq!(next.ticks_skipped, 0);
    assert!(before.elapsed() >= Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_disabled_scheduler_never_fires() {
    let mut s = TickScheduler::new(TickConfig::disabled());
    let result = tokio::time::timeout(Duration::from_secs(3600), s.wait_for_tick()).await;
    assert!(result.is_err(), "disabled scheduler should pend forever");
}
