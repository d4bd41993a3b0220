// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Monotonic enqueue stamps.
//!
//! A [`Stamp`] pairs wall clock time with a logical counter so that two
//! mutations made within the same millisecond (or after the wall clock
//! stepped backwards) still receive strictly increasing stamps. Queue order
//! and action ids are both derived from stamps.
//!
//! Format: `{wall_ms}-{counter}`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// An enqueue stamp: wall time plus a logical counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stamp {
    /// Wall clock time in milliseconds since Unix epoch.
    pub wall_ms: u64,
    /// Logical counter for ordering stamps issued at the same wall time.
    pub counter: u32,
}

impl Stamp {
    pub fn new(wall_ms: u64, counter: u32) -> Self {
        Stamp { wall_ms, counter }
    }

    /// The earliest possible stamp.
    pub fn min() -> Self {
        Stamp { wall_ms: 0, counter: 0 }
    }

    /// Wall time of this stamp as a UTC datetime.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        ms_to_datetime(self.wall_ms)
    }
}

impl Ord for Stamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.wall_ms.cmp(&other.wall_ms).then_with(|| self.counter.cmp(&other.counter))
    }
}

impl PartialOrd for Stamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wall_ms, self.counter)
    }
}

impl FromStr for Stamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (wall, counter) = s.split_once('-').ok_or_else(|| {
            Error::CorruptedData(format!("expected stamp format 'wall_ms-counter', got '{s}'"))
        })?;

        let wall_ms = wall
            .parse::<u64>()
            .map_err(|_| Error::CorruptedData(format!("invalid wall_ms '{wall}' in '{s}'")))?;
        let counter = counter
            .parse::<u32>()
            .map_err(|_| Error::CorruptedData(format!("invalid counter '{counter}' in '{s}'")))?;

        Ok(Stamp::new(wall_ms, counter))
    }
}

/// Converts milliseconds since the epoch to a UTC datetime, saturating to the epoch.
pub fn ms_to_datetime(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Trait for getting the current wall clock time.
///
/// This allows injecting a controllable clock for testing.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;

    /// Returns the current time as a UTC datetime.
    fn now_utc(&self) -> DateTime<Utc> {
        ms_to_datetime(self.now_ms())
    }
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    time_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(initial_ms: u64) -> Self {
        ManualClock { time_ms: AtomicU64::new(initial_ms) }
    }

    pub fn set(&self, ms: u64) {
        self.time_ms.store(ms, AtomicOrdering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.time_ms.fetch_add(ms, AtomicOrdering::SeqCst);
    }
}

impl ClockSource for ManualClock {
    fn now_ms(&self) -> u64 {
        self.time_ms.load(AtomicOrdering::SeqCst)
    }
}

impl<C: ClockSource> ClockSource for &C {
    fn now_ms(&self) -> u64 {
        (*self).now_ms()
    }
}

impl<C: ClockSource + ?Sized> ClockSource for std::sync::Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Issues strictly increasing [`Stamp`]s from a [`ClockSource`].
pub struct StampClock<C: ClockSource = SystemClock> {
    clock: C,
    last: Mutex<Stamp>,
}

impl StampClock<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for StampClock<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> StampClock<C> {
    pub fn with_clock(clock: C) -> Self {
        StampClock { clock, last: Mutex::new(Stamp::min()) }
    }

    /// Access to the underlying wall clock.
    pub fn source(&self) -> &C {
        &self.clock
    }

    /// Issues the next stamp.
    ///
    /// Guarantees monotonically increasing stamps even if the wall clock
    /// goes backwards.
    pub fn now(&self) -> Stamp {
        let physical = self.clock.now_ms();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        let next = if physical > last.wall_ms {
            Stamp::new(physical, 0)
        } else {
            Stamp::new(last.wall_ms, last.counter.saturating_add(1))
        };

        *last = next;
        next
    }

    /// Advances past a stamp issued elsewhere (e.g. a previous process
    /// writing to the same queue), so later stamps sort after it.
    pub fn observe(&self, seen: Stamp) {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if seen > *last {
            *last = seen;
        }
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
