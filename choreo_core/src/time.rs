// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time and per-tick frame time.
//!
//! [`HostTime`] represents a point in time as platform-native monotonic ticks
//! (e.g. `mach_absolute_time` on macOS, `QueryPerformanceCounter` on Windows).
//! [`Timebase`] carries the rational conversion factor from ticks to
//! nanoseconds, matching the pattern used by `mach_timebase_info`.
//!
//! [`FrameTime`] is what the animation core consumes: the elapsed
//! milliseconds since the previous UI tick and since the first one. Tick
//! sources build it from two host times with [`FrameTime::between`].

use core::fmt;

/// A point in time expressed as platform-native monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Converts this host time to nanoseconds using the given timebase.
    #[inline]
    #[must_use]
    pub const fn to_nanos(self, timebase: Timebase) -> u64 {
        timebase.ticks_to_nanos(self.0)
    }

    /// Returns the number of ticks between `self` and an earlier time, or
    /// zero if `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_ticks_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
///
/// `nanoseconds = ticks * numer / denom`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// A timebase where ticks are already nanoseconds (1:1).
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// Creates a new timebase with the given numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(denom != 0, "timebase denominator must not be zero");
        Self { numer, denom }
    }

    /// Converts a tick count to nanoseconds.
    ///
    /// Uses `u128` intermediate arithmetic to avoid overflow.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let wide = ticks as u128 * self.numer as u128 / self.denom as u128;
        wide as u64
    }

    /// Converts a tick count to fractional milliseconds.
    #[inline]
    #[must_use]
    pub fn ticks_to_millis(self, ticks: u64) -> f64 {
        self.ticks_to_nanos(ticks) as f64 / 1_000_000.0
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// Time information for one UI tick, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameTime {
    /// Milliseconds since the previous tick.
    pub elapsed: f64,
    /// Milliseconds since the first tick.
    pub total: f64,
}

impl FrameTime {
    /// A tick with no elapsed time.
    pub const ZERO: Self = Self {
        elapsed: 0.0,
        total: 0.0,
    };

    /// Creates a frame time from raw millisecond values.
    #[inline]
    #[must_use]
    pub const fn new(elapsed: f64, total: f64) -> Self {
        Self { elapsed, total }
    }

    /// Creates a frame time whose elapsed and total times are both
    /// `elapsed` milliseconds. Handy for single-step updates.
    #[inline]
    #[must_use]
    pub const fn from_millis(elapsed: f64) -> Self {
        Self {
            elapsed,
            total: elapsed,
        }
    }

    /// Builds the frame time for the tick at `now`, given the host time of
    /// the first tick (`origin`) and of the previous tick.
    ///
    /// Times that run backwards produce zero rather than negative values.
    #[must_use]
    pub fn between(origin: HostTime, previous: HostTime, now: HostTime, timebase: Timebase) -> Self {
        Self {
            elapsed: timebase.ticks_to_millis(now.saturating_ticks_since(previous)),
            total: timebase.ticks_to_millis(now.saturating_ticks_since(origin)),
        }
    }
}
