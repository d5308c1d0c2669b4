// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::{Clock, ClockTiming};
use crate::instance::InstanceId;
use crate::time::FrameTime;

/// A clock that plays a storyboard instance.
///
/// It has no timing of its own. Each update is given the timing of the
/// storyboard its instance is bound to, and a clock without an instance
/// does not advance.
#[derive(Clone, Debug, Default)]
pub struct StoryboardClock {
    clock: Clock,
    instance: Option<InstanceId>,
}

impl StoryboardClock {
    /// Creates an unassociated, stopped clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the instance this clock plays, if any.
    #[inline]
    #[must_use]
    pub const fn instance(&self) -> Option<InstanceId> {
        self.instance
    }

    /// Returns whether the clock is associated with an instance.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.instance.is_some()
    }

    /// Returns the underlying clock.
    #[inline]
    #[must_use]
    pub const fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Returns the underlying clock mutably.
    #[inline]
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// Advances the clock against the storyboard timing.
    ///
    /// No-op when the clock has no instance.
    pub fn update(&mut self, time: FrameTime, timing: Option<ClockTiming>) {
        let timing = if self.is_valid() { timing } else { None };
        self.clock.update(time, timing);
    }

    pub(crate) fn associate(&mut self, instance: InstanceId) {
        self.instance = Some(instance);
    }

    /// Clears the association and returns the clock to a stopped state
    /// without notifications.
    pub(crate) fn reset(&mut self) {
        self.instance = None;
        self.clock.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{LoopBehavior, NoopObserver};
    use crate::handle::Handle;

    #[test]
    fn unassociated_clock_does_not_advance() {
        let mut clock = StoryboardClock::new();
        clock.clock_mut().start(&mut NoopObserver);
        let timing = ClockTiming::new(1000.0, LoopBehavior::None);
        clock.update(FrameTime::from_millis(100.0), Some(timing));
        assert_eq!(clock.clock().elapsed(), 0.0);

        clock.associate(Handle::new(0, 0));
        clock.update(FrameTime::from_millis(100.0), Some(timing));
        assert_eq!(clock.clock().elapsed(), 100.0);

        clock.reset();
        assert!(!clock.is_valid());
    }
}
