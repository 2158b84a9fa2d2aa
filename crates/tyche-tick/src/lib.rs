//! Idle tick scheduler for Tyche.
//!
//! A chat bot spends most of its life waiting. Between inbound stanzas it
//! still has chores: telling the server it is alive, and giving the
//! application a chance to do deferred work. The [`TickScheduler`] fires a
//! steady tick (one second by default) and says which chores are due on
//! each one.
//!
//! # Integration
//!
//! The scheduler sits inside the bot's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         frame = conn.recv() => { /* handle inbound */ }
//!         info = scheduler.wait_for_tick() => {
//!             if info.keepalive { /* send empty presence */ }
//!             if info.periodic { /* run the application's periodic hook */ }
//!         }
//!     }
//! }
//! ```
//!
//! # Disabled mode
//!
//! With a zero `period` the scheduler is disabled and
//! [`TickScheduler::wait_for_tick`] pends forever, leaving the loop purely
//! event-driven.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the tick scheduler.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Time between ticks. Zero disables ticking.
    pub period: Duration,
    /// Send a keep-alive presence every this many ticks. 0 = never.
    pub keepalive_every: u64,
    /// Run the periodic application hook every this many ticks. 0 = never.
    pub periodic_every: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            keepalive_every: 60,
            periodic_every: 10,
        }
    }
}

impl TickConfig {
    /// A config that never ticks.
    pub fn disabled() -> Self {
        Self {
            period: Duration::ZERO,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tick info (returned to caller each tick)
// ---------------------------------------------------------------------------

/// One fired tick, returned by [`TickScheduler::wait_for_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// A keep-alive presence is due.
    pub keepalive: bool,
    /// The periodic application hook is due.
    pub periodic: bool,
    /// Ticks that were due while the loop was busy and got skipped.
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Steady idle tick.
///
/// A late tick is never caught up: the next one is always scheduled a
/// full period after the late one actually fired, so a slow handler can't
/// cause a burst of ticks afterwards.
pub struct TickScheduler {
    config: TickConfig,
    tick_count: u64,
    /// When the next tick should fire. `None` when disabled.
    next_tick: Option<Instant>,
}

impl TickScheduler {
    /// Creates a scheduler whose first tick fires one period from now.
    pub fn new(config: TickConfig) -> Self {
        let next_tick = if config.period.is_zero() {
            debug!("tick scheduler disabled");
            None
        } else {
            debug!(
                period_ms = config.period.as_millis() as u64,
                keepalive_every = config.keepalive_every,
                periodic_every = config.periodic_every,
                "tick scheduler created"
            );
            Some(Instant::now() + config.period)
        };

        Self {
            config,
            tick_count: 0,
            next_tick,
        }
    }

    /// Waits until the next tick is due.
    ///
    /// Pends forever when the scheduler is disabled; `tokio::select!`
    /// still services its other branches.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let Some(next) = self.next_tick else {
            std::future::pending::<()>().await;
            unreachable!()
        };
        let period = self.config.period;

        time::sleep_until(next).await;

        let now = Instant::now();
        let late_by = now.saturating_duration_since(next);
        let ticks_skipped = (late_by.as_nanos() / period.as_nanos()) as u64;
        if ticks_skipped > 0 {
            warn!(
                tick = self.tick_count + 1,
                skipped = ticks_skipped,
                late_ms = late_by.as_millis() as u64,
                "event loop stalled, skipping ticks"
            );
        }

        self.tick_count += 1;
        self.next_tick = Some(now + period);

        let info = TickInfo {
            tick: self.tick_count,
            keepalive: every(self.tick_count, self.config.keepalive_every),
            periodic: every(self.tick_count, self.config.periodic_every),
            ticks_skipped,
        };
        trace!(
            tick = info.tick,
            keepalive = info.keepalive,
            periodic = info.periodic,
            "tick fired"
        );
        info
    }

    /// Number of ticks fired so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Whether ticking is disabled.
    pub fn is_disabled(&self) -> bool {
        self.next_tick.is_none()
    }

    /// The configuration in use.
    pub fn config(&self) -> &TickConfig {
        &self.config
    }
}

fn every(tick: u64, n: u64) -> bool {
    n != 0 && tick % n == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every() {
        assert!(!every(5, 0));
        assert!(every(10, 10));
        assert!(!every(11, 10));
        assert!(every(120, 60));
    }

    #[test]
    fn test_default_config() {
        let cfg = TickConfig::default();
        assert_eq!(cfg.period, Duration::from_secs(1));
        assert_eq!(cfg.keepalive_every, 60);
        assert_eq!(cfg.periodic_every, 10);
    }
}
