// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation clocks.
//!
//! A [`Clock`] tracks playback state and the elapsed position within a
//! duration. It does not own its duration: every [`update`](Clock::update)
//! receives the resolved [`ClockTiming`], which is how the two concrete
//! clocks differ:
//!
//! - [`SimpleClock`] carries a fixed timing of its own.
//! - [`StoryboardClock`] borrows its timing from the storyboard of the
//!   instance it is associated with, so duration changes made while the
//!   storyboard plays take effect on the next tick.
//!
//! # State machine
//!
//! ```text
//!            start            pause
//!   Stopped ───────► Playing ───────► Paused
//!      ▲               │  ▲              │
//!      │      stop     │  └── resume ────┘
//!      └───────────────┴──────── stop ◄──┘
//! ```
//!
//! Redundant transitions are silent no-ops.
//!
//! # Subscribers
//!
//! Dependency-property values subscribe to a clock by [`PropertyId`]. On each
//! transition the clock calls the matching [`ClockObserver`] method once per
//! subscriber, in subscription order, and then reports the transition itself
//! through [`ClockObserver::clock_event`].

mod simple;
mod storyboard;

pub use simple::SimpleClock;
pub use storyboard::StoryboardClock;

use smallvec::SmallVec;

use crate::handle::PropertyId;
use crate::time::FrameTime;

/// Playback state of a [`Clock`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClockState {
    /// Not playing; elapsed and total time are zero.
    #[default]
    Stopped,
    /// Advancing on every update.
    Playing,
    /// Holding its position until resumed.
    Paused,
}

/// How elapsed time behaves once it crosses the end of the duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoopBehavior {
    /// Clamp at the end and hold.
    #[default]
    None,
    /// Wrap back to the start.
    Loop,
    /// Bounce back and forth across the duration.
    Reverse,
}

/// The duration and loop behavior a clock update runs against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockTiming {
    /// Duration in milliseconds.
    pub duration: f64,
    /// Behavior at the ends of the duration.
    pub loop_behavior: LoopBehavior,
}

impl ClockTiming {
    /// Creates a timing from a duration in milliseconds and a loop behavior.
    #[inline]
    #[must_use]
    pub const fn new(duration: f64, loop_behavior: LoopBehavior) -> Self {
        Self {
            duration,
            loop_behavior,
        }
    }
}

/// A clock state transition, reported after all subscribers were notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClockEvent {
    /// The clock started playing from the beginning.
    Started,
    /// The clock stopped and reset.
    Stopped,
    /// The clock paused.
    Paused,
    /// The clock resumed from a pause.
    Resumed,
}

/// What a subscriber wants after being told its clock stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Subscription {
    /// Stay subscribed.
    #[default]
    Retain,
    /// Unsubscribe from the clock.
    Release,
}

/// Receives clock lifecycle notifications.
///
/// All methods default to no-ops, so implementing only the notifications you
/// care about is fine.
pub trait ClockObserver {
    /// Called for each subscriber when its clock starts.
    fn clock_started(&mut self, subscriber: PropertyId) {
        _ = subscriber;
    }

    /// Called for each subscriber when its clock stops.
    ///
    /// Returning [`Subscription::Release`] unsubscribes `subscriber`; the
    /// remaining subscribers are still notified.
    fn clock_stopped(&mut self, subscriber: PropertyId) -> Subscription {
        _ = subscriber;
        Subscription::Retain
    }

    /// Called for each subscriber when its clock pauses.
    fn clock_paused(&mut self, subscriber: PropertyId) {
        _ = subscriber;
    }

    /// Called for each subscriber when its clock resumes.
    fn clock_resumed(&mut self, subscriber: PropertyId) {
        _ = subscriber;
    }

    /// Called once per transition, after the subscribers.
    fn clock_event(&mut self, event: ClockEvent) {
        _ = event;
    }
}

/// A [`ClockObserver`] that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ClockObserver for NoopObserver {}

/// Playback state and elapsed position shared by all clock kinds.
#[derive(Clone, Debug)]
pub struct Clock {
    state: ClockState,
    /// Position within the duration, in milliseconds.
    elapsed: f64,
    /// Milliseconds played since the last start, regardless of direction.
    total: f64,
    /// `1.0` when moving forward, `-1.0` when moving backward.
    delta: f64,
    subscribers: SmallVec<[PropertyId; 4]>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Creates a stopped clock with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ClockState::Stopped,
            elapsed: 0.0,
            total: 0.0,
            delta: 1.0,
            subscribers: SmallVec::new(),
        }
    }

    /// Returns the playback state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ClockState {
        self.state
    }

    /// Returns the position within the duration, in milliseconds.
    #[inline]
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Returns the milliseconds played since the last start.
    #[inline]
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Returns the playback direction: `1.0` forward, `-1.0` backward.
    #[inline]
    #[must_use]
    pub const fn delta(&self) -> f64 {
        self.delta
    }

    /// Returns the subscribers in subscription order.
    #[must_use]
    pub fn subscribers(&self) -> &[PropertyId] {
        &self.subscribers
    }

    /// Returns whether `subscriber` is subscribed.
    #[must_use]
    pub fn is_subscribed(&self, subscriber: PropertyId) -> bool {
        self.subscribers.contains(&subscriber)
    }

    /// Subscribes a property value to this clock's notifications.
    ///
    /// Returns `false` if it was already subscribed.
    pub fn subscribe(&mut self, subscriber: PropertyId) -> bool {
        if self.is_subscribed(subscriber) {
            return false;
        }
        self.subscribers.push(subscriber);
        true
    }

    /// Removes a subscriber, preserving the order of the others.
    ///
    /// Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, subscriber: PropertyId) -> bool {
        match self.subscribers.iter().position(|&s| s == subscriber) {
            Some(index) => {
                self.subscribers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Starts the clock from the beginning.
    ///
    /// A clock that is not stopped is stopped first, with the usual
    /// notifications.
    pub fn start<O: ClockObserver + ?Sized>(&mut self, observer: &mut O) {
        if self.state != ClockState::Stopped {
            self.stop(observer);
        }
        self.state = ClockState::Playing;
        self.elapsed = 0.0;
        self.total = 0.0;
        self.delta = 1.0;

        for index in 0..self.subscribers.len() {
            observer.clock_started(self.subscribers[index]);
        }
        observer.clock_event(ClockEvent::Started);
    }

    /// Stops the clock and resets its elapsed and total time.
    ///
    /// Subscribers may unsubscribe themselves from
    /// [`ClockObserver::clock_stopped`]; every remaining subscriber is still
    /// notified exactly once.
    pub fn stop<O: ClockObserver + ?Sized>(&mut self, observer: &mut O) {
        if self.state == ClockState::Stopped {
            return;
        }
        self.state = ClockState::Stopped;
        self.elapsed = 0.0;
        self.total = 0.0;

        // Cursor walk: a released subscriber shifts the next one into place.
        let mut cursor = 0;
        while cursor < self.subscribers.len() {
            let subscriber = self.subscribers[cursor];
            match observer.clock_stopped(subscriber) {
                Subscription::Retain => cursor += 1,
                Subscription::Release => {
                    self.subscribers.remove(cursor);
                }
            }
        }
        observer.clock_event(ClockEvent::Stopped);
    }

    /// Pauses a playing clock. No-op in any other state.
    pub fn pause<O: ClockObserver + ?Sized>(&mut self, observer: &mut O) {
        if self.state != ClockState::Playing {
            return;
        }
        self.state = ClockState::Paused;
        for index in 0..self.subscribers.len() {
            observer.clock_paused(self.subscribers[index]);
        }
        observer.clock_event(ClockEvent::Paused);
    }

    /// Resumes a paused clock. No-op in any other state.
    pub fn resume<O: ClockObserver + ?Sized>(&mut self, observer: &mut O) {
        if self.state != ClockState::Paused {
            return;
        }
        self.state = ClockState::Playing;
        for index in 0..self.subscribers.len() {
            observer.clock_resumed(self.subscribers[index]);
        }
        observer.clock_event(ClockEvent::Resumed);
    }

    /// Advances a playing clock by `time.elapsed` milliseconds.
    ///
    /// `timing` is `None` when the owning clock is not ready to run (for
    /// example a storyboard clock without an instance); the update is then a
    /// no-op, as it is for clocks that are not playing. Negative or
    /// non-finite elapsed times are ignored.
    pub fn update(&mut self, time: FrameTime, timing: Option<ClockTiming>) {
        let Some(timing) = timing else {
            return;
        };
        if self.state != ClockState::Playing {
            return;
        }
        let step = time.elapsed;
        if !step.is_finite() || step < 0.0 {
            return;
        }
        self.total += step;

        let duration = timing.duration;
        // Zero, negative, or NaN durations are instantaneous.
        if !(duration > 0.0) || !duration.is_finite() {
            self.elapsed = 0.0;
            self.delta = 1.0;
            return;
        }

        let candidate = self.elapsed + self.delta * step;
        match timing.loop_behavior {
            LoopBehavior::None => {
                if candidate < 0.0 {
                    self.elapsed = 0.0;
                    self.delta = 1.0;
                } else if candidate > duration {
                    self.elapsed = duration;
                    self.delta = 1.0;
                } else {
                    self.elapsed = candidate;
                }
            }
            LoopBehavior::Loop => {
                if candidate < 0.0 || candidate >= duration {
                    self.elapsed = wrap(candidate, duration);
                    self.delta = 1.0;
                } else {
                    self.elapsed = candidate;
                }
            }
            LoopBehavior::Reverse => {
                let (elapsed, delta) = bounce(candidate, duration, self.delta);
                self.elapsed = elapsed;
                self.delta = delta;
            }
        }
    }

    /// Returns the clock to its pristine state without notifying anyone.
    ///
    /// Used when a pooled clock is released.
    pub(crate) fn reset(&mut self) {
        self.state = ClockState::Stopped;
        self.elapsed = 0.0;
        self.total = 0.0;
        self.delta = 1.0;
        self.subscribers.clear();
    }
}

/// Wraps `position` into `[0, duration)`.
fn wrap(position: f64, duration: f64) -> f64 {
    let mut wrapped = position % duration;
    if wrapped < 0.0 {
        wrapped += duration;
    }
    if wrapped >= duration { 0.0 } else { wrapped }
}

/// Reflects `position` into `[0, duration]`, flipping `delta` once for every
/// boundary crossed.
fn bounce(mut position: f64, duration: f64, mut delta: f64) -> (f64, f64) {
    // Whole round trips flip the direction an even number of times.
    let round_trip = 2.0 * duration;
    if position > round_trip || position < -round_trip {
        position %= round_trip;
    }
    loop {
        if position > duration {
            position = duration - (position - duration);
            delta = -delta;
        } else if position < 0.0 {
            position = -position;
            delta = -delta;
        } else {
            return (position, delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    const EPSILON: f64 = 1e-9;

    #[derive(Default)]
    struct Recorder {
        log: Vec<(&'static str, Option<PropertyId>)>,
        release: Vec<PropertyId>,
    }

    impl ClockObserver for Recorder {
        fn clock_started(&mut self, subscriber: PropertyId) {
            self.log.push(("started", Some(subscriber)));
        }

        fn clock_stopped(&mut self, subscriber: PropertyId) -> Subscription {
            self.log.push(("stopped", Some(subscriber)));
            if self.release.contains(&subscriber) {
                Subscription::Release
            } else {
                Subscription::Retain
            }
        }

        fn clock_paused(&mut self, subscriber: PropertyId) {
            self.log.push(("paused", Some(subscriber)));
        }

        fn clock_resumed(&mut self, subscriber: PropertyId) {
            self.log.push(("resumed", Some(subscriber)));
        }

        fn clock_event(&mut self, event: ClockEvent) {
            let name = match event {
                ClockEvent::Started => "Started",
                ClockEvent::Stopped => "Stopped",
                ClockEvent::Paused => "Paused",
                ClockEvent::Resumed => "Resumed",
            };
            self.log.push((name, None));
        }
    }

    fn playing_clock() -> Clock {
        let mut clock = Clock::new();
        clock.start(&mut NoopObserver);
        clock
    }

    fn step(clock: &mut Clock, ms: f64, duration: f64, loop_behavior: LoopBehavior) {
        clock.update(
            FrameTime::from_millis(ms),
            Some(ClockTiming::new(duration, loop_behavior)),
        );
    }

    #[test]
    fn start_notifies_subscribers_then_event() {
        let mut clock = Clock::new();
        clock.subscribe(PropertyId(1));
        clock.subscribe(PropertyId(2));
        let mut rec = Recorder::default();
        clock.start(&mut rec);
        assert_eq!(clock.state(), ClockState::Playing);
        assert_eq!(
            rec.log,
            vec![
                ("started", Some(PropertyId(1))),
                ("started", Some(PropertyId(2))),
                ("Started", None),
            ]
        );
    }

    #[test]
    fn restart_stops_first() {
        let mut clock = playing_clock();
        clock.subscribe(PropertyId(1));
        step(&mut clock, 250.0, 1000.0, LoopBehavior::None);
        let mut rec = Recorder::default();
        clock.start(&mut rec);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.total(), 0.0);
        assert_eq!(
            rec.log,
            vec![
                ("stopped", Some(PropertyId(1))),
                ("Stopped", None),
                ("started", Some(PropertyId(1))),
                ("Started", None),
            ]
        );
    }

    #[test]
    fn stop_on_stopped_clock_is_silent() {
        let mut clock = Clock::new();
        clock.subscribe(PropertyId(1));
        let mut rec = Recorder::default();
        clock.stop(&mut rec);
        assert_eq!(clock.state(), ClockState::Stopped);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.total(), 0.0);
        assert!(rec.log.is_empty(), "no events expected: {:?}", rec.log);
    }

    #[test]
    fn pause_twice_is_idempotent() {
        let mut clock = playing_clock();
        step(&mut clock, 300.0, 1000.0, LoopBehavior::None);
        let mut rec = Recorder::default();
        clock.pause(&mut rec);
        let after_first = (clock.state(), clock.elapsed(), clock.total(), rec.log.len());
        clock.pause(&mut rec);
        assert_eq!(
            (clock.state(), clock.elapsed(), clock.total(), rec.log.len()),
            after_first
        );
        assert_eq!(clock.state(), ClockState::Paused);
    }

    #[test]
    fn resume_only_from_paused() {
        let mut clock = Clock::new();
        let mut rec = Recorder::default();
        clock.resume(&mut rec);
        assert_eq!(clock.state(), ClockState::Stopped);

        clock.start(&mut rec);
        clock.resume(&mut rec);
        assert_eq!(clock.state(), ClockState::Playing);
        clock.pause(&mut rec);
        clock.resume(&mut rec);
        assert_eq!(clock.state(), ClockState::Playing);
        assert_eq!(
            rec.log,
            vec![("Started", None), ("Paused", None), ("Resumed", None)]
        );
    }

    #[test]
    fn paused_clock_does_not_advance() {
        let mut clock = playing_clock();
        step(&mut clock, 100.0, 1000.0, LoopBehavior::None);
        clock.pause(&mut NoopObserver);
        step(&mut clock, 400.0, 1000.0, LoopBehavior::None);
        assert_eq!(clock.elapsed(), 100.0);
        assert_eq!(clock.total(), 100.0);
    }

    #[test]
    fn stop_tolerates_self_unsubscription() {
        let mut clock = playing_clock();
        for id in 1..=4 {
            clock.subscribe(PropertyId(id));
        }
        let mut rec = Recorder {
            release: vec![PropertyId(2), PropertyId(3)],
            ..Recorder::default()
        };
        clock.stop(&mut rec);
        let stopped: Vec<_> = rec
            .log
            .iter()
            .filter(|(name, _)| *name == "stopped")
            .filter_map(|(_, id)| *id)
            .collect();
        assert_eq!(
            stopped,
            vec![PropertyId(1), PropertyId(2), PropertyId(3), PropertyId(4)],
            "every subscriber notified once, in order"
        );
        assert_eq!(clock.subscribers(), &[PropertyId(1), PropertyId(4)]);
    }

    #[test]
    fn subscribe_is_a_set() {
        let mut clock = Clock::new();
        assert!(clock.subscribe(PropertyId(5)));
        assert!(!clock.subscribe(PropertyId(5)));
        assert!(clock.unsubscribe(PropertyId(5)));
        assert!(!clock.unsubscribe(PropertyId(5)));
    }

    #[test]
    fn update_without_timing_is_noop() {
        let mut clock = playing_clock();
        clock.update(FrameTime::from_millis(100.0), None);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.total(), 0.0);
    }

    #[test]
    fn none_clamps_at_end() {
        let mut clock = playing_clock();
        step(&mut clock, 1500.0, 1000.0, LoopBehavior::None);
        assert_eq!(clock.elapsed(), 1000.0);
        assert_eq!(clock.delta(), 1.0);
        assert_eq!(clock.total(), 1500.0);
    }

    #[test]
    fn loop_wraps_modulo_duration() {
        let duration = 1000.0;
        for &(start, dt) in &[
            (0.0, 250.0),
            (800.0, 500.0),
            (999.0, 1.0),
            (0.0, 3250.0),
            (500.0, 500.0),
            (10.0, 0.0),
        ] {
            let mut clock = playing_clock();
            step(&mut clock, start, duration, LoopBehavior::Loop);
            step(&mut clock, dt, duration, LoopBehavior::Loop);
            let expected = (start + dt) % duration;
            assert!(
                (clock.elapsed() - expected).abs() < EPSILON,
                "start {start} + {dt}: expected {expected}, got {}",
                clock.elapsed()
            );
            assert_eq!(clock.delta(), 1.0);
        }
    }

    #[test]
    fn reverse_bounces_once() {
        let mut clock = playing_clock();
        step(&mut clock, 800.0, 1000.0, LoopBehavior::Reverse);
        assert_eq!(clock.delta(), 1.0);
        step(&mut clock, 500.0, 1000.0, LoopBehavior::Reverse);
        assert!((clock.elapsed() - 700.0).abs() < EPSILON, "got {}", clock.elapsed());
        assert_eq!(clock.delta(), -1.0);
    }

    #[test]
    fn reverse_travels_backward_then_forward() {
        let mut clock = playing_clock();
        step(&mut clock, 1200.0, 1000.0, LoopBehavior::Reverse);
        assert!((clock.elapsed() - 800.0).abs() < EPSILON);
        step(&mut clock, 900.0, 1000.0, LoopBehavior::Reverse);
        assert!((clock.elapsed() - 100.0).abs() < EPSILON, "got {}", clock.elapsed());
        assert_eq!(clock.delta(), 1.0);
    }

    #[test]
    fn reverse_handles_multi_period_overshoot() {
        // Forward 1000, back 1000, forward 500.
        let mut clock = playing_clock();
        step(&mut clock, 2500.0, 1000.0, LoopBehavior::Reverse);
        assert!((clock.elapsed() - 500.0).abs() < EPSILON, "got {}", clock.elapsed());
        assert_eq!(clock.delta(), 1.0);

        // Forward 500 more, back 1000, forward 1000, back 300.
        step(&mut clock, 2800.0, 1000.0, LoopBehavior::Reverse);
        assert!((clock.elapsed() - 700.0).abs() < EPSILON, "got {}", clock.elapsed());
        assert_eq!(clock.delta(), -1.0);
    }

    #[test]
    fn reverse_stays_in_range() {
        let mut clock = playing_clock();
        let mut flips = 0;
        let mut last_delta = clock.delta();
        for _ in 0..200 {
            step(&mut clock, 37.0, 250.0, LoopBehavior::Reverse);
            assert!(
                (0.0..=250.0).contains(&clock.elapsed()),
                "elapsed {} out of range",
                clock.elapsed()
            );
            if clock.delta() != last_delta {
                flips += 1;
                last_delta = clock.delta();
            }
        }
        // 7400ms of travel across a 250ms duration crosses 29 boundaries.
        assert_eq!(flips, 29);
    }

    #[test]
    fn huge_step_terminates() {
        let mut clock = playing_clock();
        step(&mut clock, 1.0e15 + 250.0, 1000.0, LoopBehavior::Reverse);
        assert!((0.0..=1000.0).contains(&clock.elapsed()));
    }

    #[test]
    fn zero_duration_is_instantaneous() {
        for behavior in [LoopBehavior::None, LoopBehavior::Loop, LoopBehavior::Reverse] {
            let mut clock = playing_clock();
            step(&mut clock, 16.0, 0.0, behavior);
            assert_eq!(clock.elapsed(), 0.0);
            assert_eq!(clock.delta(), 1.0);
            assert_eq!(clock.total(), 16.0);
        }
    }

    #[test]
    fn invalid_steps_are_ignored() {
        let mut clock = playing_clock();
        step(&mut clock, f64::NAN, 1000.0, LoopBehavior::None);
        step(&mut clock, -5.0, 1000.0, LoopBehavior::None);
        step(&mut clock, f64::INFINITY, 1000.0, LoopBehavior::None);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.total(), 0.0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut clock = playing_clock();
        clock.subscribe(PropertyId(1));
        step(&mut clock, 100.0, 1000.0, LoopBehavior::None);
        clock.reset();
        assert_eq!(clock.state(), ClockState::Stopped);
        assert_eq!(clock.elapsed(), 0.0);
        assert!(clock.subscribers().is_empty());
    }
}
