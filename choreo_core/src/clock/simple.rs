// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::{Clock, ClockObserver, ClockTiming, LoopBehavior};
use crate::time::FrameTime;

/// A standalone clock with its own fixed duration and loop behavior.
///
/// Used for animations that are not driven by a storyboard.
#[derive(Clone, Debug)]
pub struct SimpleClock {
    clock: Clock,
    timing: ClockTiming,
}

impl Default for SimpleClock {
    fn default() -> Self {
        Self::new(0.0, LoopBehavior::None)
    }
}

impl SimpleClock {
    /// Creates a stopped clock running over `duration` milliseconds.
    #[must_use]
    pub fn new(duration: f64, loop_behavior: LoopBehavior) -> Self {
        Self {
            clock: Clock::new(),
            timing: ClockTiming::new(duration, loop_behavior),
        }
    }

    /// Returns the fixed timing.
    #[inline]
    #[must_use]
    pub const fn timing(&self) -> ClockTiming {
        self.timing
    }

    /// Returns the duration in milliseconds.
    #[inline]
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.timing.duration
    }

    /// Returns the loop behavior.
    #[inline]
    #[must_use]
    pub const fn loop_behavior(&self) -> LoopBehavior {
        self.timing.loop_behavior
    }

    pub(crate) fn set_timing(&mut self, timing: ClockTiming) {
        self.timing = timing;
    }

    /// Returns the underlying clock.
    #[inline]
    #[must_use]
    pub const fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Returns the underlying clock mutably, for subscription management.
    #[inline]
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// See [`Clock::start`].
    pub fn start<O: ClockObserver + ?Sized>(&mut self, observer: &mut O) {
        self.clock.start(observer);
    }

    /// See [`Clock::stop`].
    pub fn stop<O: ClockObserver + ?Sized>(&mut self, observer: &mut O) {
        self.clock.stop(observer);
    }

    /// See [`Clock::pause`].
    pub fn pause<O: ClockObserver + ?Sized>(&mut self, observer: &mut O) {
        self.clock.pause(observer);
    }

    /// See [`Clock::resume`].
    pub fn resume<O: ClockObserver + ?Sized>(&mut self, observer: &mut O) {
        self.clock.resume(observer);
    }

    /// Advances the clock against its own timing.
    pub fn update(&mut self, time: FrameTime) {
        self.clock.update(time, Some(self.timing));
    }

    pub(crate) fn reset(&mut self) {
        self.clock.reset();
    }
}
