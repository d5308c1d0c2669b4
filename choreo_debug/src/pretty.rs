// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use choreo_core::clock::ClockEvent;
use choreo_core::trace::{
    ClockTransitionEvent, PoolAction, PoolEvent, PoolKind, PropertyValueEvent, StoryboardAction,
    StoryboardEvent, TickSummary, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn clock_event_name(event: ClockEvent) -> &'static str {
    match event {
        ClockEvent::Started => "started",
        ClockEvent::Stopped => "stopped",
        ClockEvent::Paused => "paused",
        ClockEvent::Resumed => "resumed",
    }
}

fn pool_name(pool: PoolKind) -> &'static str {
    match pool {
        PoolKind::StoryboardClocks => "clocks",
        PoolKind::Instances => "instances",
        PoolKind::SimpleClocks => "simple",
    }
}

fn action_name(action: StoryboardAction) -> &'static str {
    match action {
        StoryboardAction::Begin => "begin",
        StoryboardAction::Stop => "stop",
        StoryboardAction::Pause => "pause",
        StoryboardAction::Resume => "resume",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_clock_transition(&mut self, e: &ClockTransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[clock] frame={} slot={} {} subscribers={}",
            e.frame_index,
            e.clock_slot,
            clock_event_name(e.event),
            e.subscribers,
        );
    }

    fn on_pool(&mut self, e: &PoolEvent) {
        let verb = match e.action {
            PoolAction::Retrieve => "retrieve",
            PoolAction::Release => "release",
        };
        let _ = writeln!(
            self.writer,
            "[pool:{verb}] {} slot={} active={} available={}",
            pool_name(e.pool),
            e.slot,
            e.active,
            e.available,
        );
    }

    fn on_storyboard(&mut self, e: &StoryboardEvent) {
        let _ = writeln!(
            self.writer,
            "[storyboard:{}] frame={} element={} storyboard={} instance={} enlisted={}",
            action_name(e.action),
            e.frame_index,
            e.element.0,
            e.storyboard_slot,
            e.instance_slot,
            e.enlistments,
        );
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        let _ = writeln!(
            self.writer,
            "[tick] frame={} elapsed={:.2}ms total={:.2}ms clocks={} simple={} \
             instances={} applied={} cleared={}",
            s.frame_index,
            s.elapsed_ms,
            s.total_ms,
            s.active_clocks,
            s.active_simple_clocks,
            s.active_instances,
            s.applied_values,
            s.cleared_values,
        );
    }

    fn on_property_value(&mut self, e: &PropertyValueEvent) {
        let what = if e.contributed { "value" } else { "none" };
        let _ = writeln!(
            self.writer,
            "[property] frame={} property={} {what}",
            e.frame_index, e.property.0,
        );
    }
}
