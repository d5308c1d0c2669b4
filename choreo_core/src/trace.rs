// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the animation tick.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`AnimationContext`](crate::context::AnimationContext) calls as storyboards
//! begin and stop, pooled objects move in and out of use, and ticks complete.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`TickSummaryBuilder`] collects per-tick counts during the instance sweep
//! and produces a [`TickSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`PropertyValueEvent`] and the
//!   corresponding `TraceSink` method.

use crate::clock::ClockEvent;
use crate::handle::ElementId;
#[cfg(feature = "trace-rich")]
use crate::handle::PropertyId;
use crate::time::FrameTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which pool an object moved in or out of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoolKind {
    /// Storyboard clocks.
    StoryboardClocks,
    /// Storyboard instances.
    Instances,
    /// Standalone clocks.
    SimpleClocks,
}

/// Direction of a pool transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoolAction {
    /// An object was checked out.
    Retrieve,
    /// An object was returned.
    Release,
}

/// What happened to a storyboard on an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoryboardAction {
    /// An instance was created and started.
    Begin,
    /// The instance was stopped and released.
    Stop,
    /// The instance's clock paused.
    Pause,
    /// The instance's clock resumed.
    Resume,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a storyboard clock changes state.
#[derive(Clone, Copy, Debug)]
pub struct ClockTransitionEvent {
    /// Tick counter at the time of the transition.
    pub frame_index: u64,
    /// Pool slot of the clock.
    pub clock_slot: u32,
    /// The transition.
    pub event: ClockEvent,
    /// Number of subscribers notified.
    pub subscribers: usize,
}

/// Emitted when an object is retrieved from or released to a pool.
#[derive(Clone, Copy, Debug)]
pub struct PoolEvent {
    /// Which pool.
    pub pool: PoolKind,
    /// Retrieve or release.
    pub action: PoolAction,
    /// Slot of the object.
    pub slot: u32,
    /// Checked-out objects after the transfer.
    pub active: usize,
    /// Idle objects after the transfer.
    pub available: usize,
}

/// Emitted when a storyboard begins, stops, pauses, or resumes on an
/// element.
#[derive(Clone, Copy, Debug)]
pub struct StoryboardEvent {
    /// Tick counter at the time of the action.
    pub frame_index: u64,
    /// What happened.
    pub action: StoryboardAction,
    /// Element the storyboard runs on.
    pub element: ElementId,
    /// Store slot of the storyboard.
    pub storyboard_slot: u32,
    /// Pool slot of the instance.
    pub instance_slot: u32,
    /// Number of enlisted property values.
    pub enlistments: usize,
}

/// Summary of one [`AnimationContext::update`](crate::context::AnimationContext::update).
#[derive(Clone, Copy, Debug)]
pub struct TickSummary {
    /// Tick counter.
    pub frame_index: u64,
    /// Milliseconds since the previous tick.
    pub elapsed_ms: f64,
    /// Milliseconds since the first tick.
    pub total_ms: f64,
    /// Storyboard clocks checked out.
    pub active_clocks: usize,
    /// Standalone clocks checked out.
    pub active_simple_clocks: usize,
    /// Storyboard instances checked out.
    pub active_instances: usize,
    /// Properties that received a value.
    pub applied_values: usize,
    /// Properties told that nothing contributes a value.
    pub cleared_values: usize,
}

/// A property value delivered to the host during a tick.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct PropertyValueEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// The property.
    pub property: PropertyId,
    /// Whether a value was delivered, as opposed to "no contribution".
    pub contributed: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives animation trace events.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called when a storyboard clock changes state.
    fn on_clock_transition(&mut self, e: &ClockTransitionEvent) {
        _ = e;
    }

    /// Called when an object moves in or out of a pool.
    fn on_pool(&mut self, e: &PoolEvent) {
        _ = e;
    }

    /// Called when a storyboard begins, stops, pauses, or resumes.
    fn on_storyboard(&mut self, e: &StoryboardEvent) {
        _ = e;
    }

    /// Called at the end of every tick.
    fn on_tick_summary(&mut self, s: &TickSummary) {
        _ = s;
    }

    /// Called for every property value delivered during a tick.
    #[cfg(feature = "trace-rich")]
    fn on_property_value(&mut self, e: &PropertyValueEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A sink that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Zero-cost wrapper around an optional trace sink.
///
/// When the `trace` feature is disabled, all methods are no-ops that the
/// compiler eliminates entirely.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer with no sink (all calls are no-ops).
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a clock transition event.
    #[inline]
    pub fn clock_transition(&mut self, e: &ClockTransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_clock_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a pool event.
    #[inline]
    pub fn pool(&mut self, e: &PoolEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pool(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a storyboard event.
    #[inline]
    pub fn storyboard(&mut self, e: &StoryboardEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_storyboard(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a tick summary.
    #[inline]
    pub fn tick_summary(&mut self, s: &TickSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_tick_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a property value event.
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn property_value(&mut self, e: &PropertyValueEvent) {
        if let Some(s) = &mut self.sink {
            s.on_property_value(e);
        }
    }
}

// ---------------------------------------------------------------------------
// TickSummaryBuilder
// ---------------------------------------------------------------------------

/// Accumulates per-tick counts and produces a [`TickSummary`].
#[derive(Debug)]
pub struct TickSummaryBuilder {
    frame_index: u64,
    time: FrameTime,
    applied_values: usize,
    cleared_values: usize,
}

impl TickSummaryBuilder {
    /// Starts a summary for tick `frame_index`.
    #[must_use]
    pub fn new(frame_index: u64, time: FrameTime) -> Self {
        Self {
            frame_index,
            time,
            applied_values: 0,
            cleared_values: 0,
        }
    }

    /// The tick being summarized.
    #[inline]
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Counts one delivered property value, or one "no value" delivery.
    pub fn record_value(&mut self, contributed: bool) {
        if contributed {
            self.applied_values += 1;
        } else {
            self.cleared_values += 1;
        }
    }

    /// Finishes the summary with the pool counts at the end of the tick.
    #[must_use]
    pub fn finish(
        self,
        active_clocks: usize,
        active_simple_clocks: usize,
        active_instances: usize,
    ) -> TickSummary {
        TickSummary {
            frame_index: self.frame_index,
            elapsed_ms: self.time.elapsed,
            total_ms: self.time.total,
            active_clocks,
            active_simple_clocks,
            active_instances,
            applied_values: self.applied_values,
            cleared_values: self.cleared_values,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
