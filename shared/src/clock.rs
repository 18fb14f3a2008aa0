//! Reference clock and minute cadence
//!
//! `ReferenceClock` holds the two pieces of reference state the board is
//! anchored to: the user-selected calendar date and the live UTC clock.
//! `MinuteTicker` drives the once-a-minute refresh; it is owned by the app
//! model and polled from the frame update, so it stops with the model.

use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, Timelike, Utc};

use crate::time_engine::WallTime;

/// Reference state the board is interpreted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceClock {
    date: NaiveDate,
    utc_now: DateTime<Utc>,
}

impl ReferenceClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            date: now.date_naive(),
            utc_now: now,
        }
    }

    /// The calendar date all zone times are displayed against.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn utc_now(&self) -> DateTime<Utc> {
        self.utc_now
    }

    /// The live UTC clock reduced to minute granularity.
    pub fn utc_wall_time(&self) -> WallTime {
        WallTime::from_minutes((self.utc_now.hour() * 60 + self.utc_now.minute()) as i64)
    }

    /// Advance the live clock. Always succeeds.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.utc_now = now;
    }

    /// Replace the reference date.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }
}

/// Default refresh cadence: once per real minute.
pub const TICK_PERIOD: Duration = Duration::from_secs(60);

/// A poll-based periodic task at minute cadence.
///
/// Created when the app model is built and dropped with it, so no tick can
/// fire after teardown. `poll` is called from the frame update and reports
/// whether a period has elapsed since the last firing.
#[derive(Debug, Clone)]
pub struct MinuteTicker {
    period: Duration,
    last_fire: Instant,
    running: bool,
}

impl MinuteTicker {
    pub fn start() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            last_fire: Instant::now(),
            running: true,
        }
    }

    /// True once per elapsed period. Never fires after `stop`.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        if now.duration_since(self.last_fire) >= self.period {
            self.last_fire = now;
            true
        } else {
            false
        }
    }

    /// Stop the cadence; subsequent polls report nothing.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
