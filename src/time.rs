//! Time abstraction for testability.
//!
//! This module provides a [`Clock`] trait that allows injecting mock clocks
//! in tests while using the real system clock in production. Signed verify
//! tokens embed Unix timestamps, so the clock is the only source of "now"
//! for token issuing and age checks.

use std::time::{Duration, SystemTime};

/// Abstraction over system time for testability.
///
/// Implementations provide the current time, allowing tests to inject
/// controlled time values instead of relying on actual system time.
///
/// # Example
///
/// ```
/// use graphlink::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now >= std::time::SystemTime::UNIX_EPOCH);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;

    /// Returns the current time as whole seconds since the Unix epoch.
    ///
    /// Times before the epoch are reported as negative seconds.
    fn unix_seconds(&self) -> i64 {
        to_unix_seconds(self.now())
    }
}

/// Production clock using actual system time.
///
/// This is the default clock implementation that delegates to
/// [`SystemTime::now()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock frozen at a fixed number of seconds since the Unix epoch.
///
/// Useful for reproducing signed tokens byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    secs: i64,
}

impl FixedClock {
    /// Creates a clock that always reports `secs` seconds since the epoch.
    #[must_use]
    pub const fn at(secs: i64) -> Self {
        Self { secs }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        let offset = Duration::from_secs(self.secs.unsigned_abs());
        if self.secs >= 0 {
            SystemTime::UNIX_EPOCH + offset
        } else {
            SystemTime::UNIX_EPOCH - offset
        }
    }

    fn unix_seconds(&self) -> i64 {
        self.secs
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> SystemTime {
        (**self).now()
    }

    fn unix_seconds(&self) -> i64 {
        (**self).unix_seconds()
    }
}

/// Converts a [`SystemTime`] to whole seconds relative to the Unix epoch.
#[must_use]
pub fn to_unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |s| -s),
    }
}
