// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use choreo_core::clock::ClockEvent;
use choreo_core::handle::{ElementId, PropertyId};
use choreo_core::trace::{
    ClockTransitionEvent, PoolAction, PoolEvent, PoolKind, PropertyValueEvent, StoryboardAction,
    StoryboardEvent, TickSummary, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_CLOCK_TRANSITION: u8 = 1;
const TAG_POOL: u8 = 2;
const TAG_STORYBOARD: u8 = 3;
const TAG_TICK_SUMMARY: u8 = 4;
const TAG_PROPERTY_VALUE: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&mut self, v: usize) {
        self.write_u64(u64::try_from(v).unwrap_or(u64::MAX));
    }

    fn write_clock_event(&mut self, e: ClockEvent) {
        self.write_u8(match e {
            ClockEvent::Started => 0,
            ClockEvent::Stopped => 1,
            ClockEvent::Paused => 2,
            ClockEvent::Resumed => 3,
        });
    }

    fn write_pool_kind(&mut self, k: PoolKind) {
        self.write_u8(match k {
            PoolKind::StoryboardClocks => 0,
            PoolKind::Instances => 1,
            PoolKind::SimpleClocks => 2,
        });
    }

    fn write_storyboard_action(&mut self, a: StoryboardAction) {
        self.write_u8(match a {
            StoryboardAction::Begin => 0,
            StoryboardAction::Stop => 1,
            StoryboardAction::Pause => 2,
            StoryboardAction::Resume => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_clock_transition(&mut self, e: &ClockTransitionEvent) {
        self.write_u8(TAG_CLOCK_TRANSITION);
        self.write_u64(e.frame_index);
        self.write_u32(e.clock_slot);
        self.write_clock_event(e.event);
        self.write_count(e.subscribers);
    }

    fn on_pool(&mut self, e: &PoolEvent) {
        self.write_u8(TAG_POOL);
        self.write_pool_kind(e.pool);
        self.write_u8(match e.action {
            PoolAction::Retrieve => 0,
            PoolAction::Release => 1,
        });
        self.write_u32(e.slot);
        self.write_count(e.active);
        self.write_count(e.available);
    }

    fn on_storyboard(&mut self, e: &StoryboardEvent) {
        self.write_u8(TAG_STORYBOARD);
        self.write_u64(e.frame_index);
        self.write_storyboard_action(e.action);
        self.write_u32(e.element.0);
        self.write_u32(e.storyboard_slot);
        self.write_u32(e.instance_slot);
        self.write_count(e.enlistments);
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        self.write_u8(TAG_TICK_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_f64(s.elapsed_ms);
        self.write_f64(s.total_ms);
        self.write_count(s.active_clocks);
        self.write_count(s.active_simple_clocks);
        self.write_count(s.active_instances);
        self.write_count(s.applied_values);
        self.write_count(s.cleared_values);
    }

    fn on_property_value(&mut self, e: &PropertyValueEvent) {
        self.write_u8(TAG_PROPERTY_VALUE);
        self.write_u64(e.frame_index);
        self.write_u64(e.property.0);
        self.write_u8(u8::from(e.contributed));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`ClockTransitionEvent`].
    ClockTransition(ClockTransitionEvent),
    /// A [`PoolEvent`].
    Pool(PoolEvent),
    /// A [`StoryboardEvent`].
    Storyboard(StoryboardEvent),
    /// A [`TickSummary`].
    TickSummary(TickSummary),
    /// A [`PropertyValueEvent`].
    PropertyValue(PropertyValueEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_count(&mut self) -> Option<usize> {
        Some(usize::try_from(self.read_u64()?).unwrap_or(usize::MAX))
    }

    fn read_clock_event(&mut self) -> Option<ClockEvent> {
        Some(match self.read_u8()? {
            0 => ClockEvent::Started,
            1 => ClockEvent::Stopped,
            2 => ClockEvent::Paused,
            _ => ClockEvent::Resumed,
        })
    }

    fn read_pool_kind(&mut self) -> Option<PoolKind> {
        Some(match self.read_u8()? {
            0 => PoolKind::StoryboardClocks,
            1 => PoolKind::Instances,
            _ => PoolKind::SimpleClocks,
        })
    }

    fn read_pool_action(&mut self) -> Option<PoolAction> {
        Some(match self.read_u8()? {
            0 => PoolAction::Retrieve,
            _ => PoolAction::Release,
        })
    }

    fn read_storyboard_action(&mut self) -> Option<StoryboardAction> {
        Some(match self.read_u8()? {
            0 => StoryboardAction::Begin,
            1 => StoryboardAction::Stop,
            2 => StoryboardAction::Pause,
            _ => StoryboardAction::Resume,
        })
    }

    fn decode_clock_transition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ClockTransition(ClockTransitionEvent {
            frame_index: self.read_u64()?,
            clock_slot: self.read_u32()?,
            event: self.read_clock_event()?,
            subscribers: self.read_count()?,
        }))
    }

    fn decode_pool(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Pool(PoolEvent {
            pool: self.read_pool_kind()?,
            action: self.read_pool_action()?,
            slot: self.read_u32()?,
            active: self.read_count()?,
            available: self.read_count()?,
        }))
    }

    fn decode_storyboard(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Storyboard(StoryboardEvent {
            frame_index: self.read_u64()?,
            action: self.read_storyboard_action()?,
            element: ElementId(self.read_u32()?),
            storyboard_slot: self.read_u32()?,
            instance_slot: self.read_u32()?,
            enlistments: self.read_count()?,
        }))
    }

    fn decode_tick_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TickSummary(TickSummary {
            frame_index: self.read_u64()?,
            elapsed_ms: self.read_f64()?,
            total_ms: self.read_f64()?,
            active_clocks: self.read_count()?,
            active_simple_clocks: self.read_count()?,
            active_instances: self.read_count()?,
            applied_values: self.read_count()?,
            cleared_values: self.read_count()?,
        }))
    }

    fn decode_property_value(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PropertyValue(PropertyValueEvent {
            frame_index: self.read_u64()?,
            property: PropertyId(self.read_u64()?),
            contributed: self.read_u8()? != 0,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_CLOCK_TRANSITION => self.decode_clock_transition(),
            TAG_POOL => self.decode_pool(),
            TAG_STORYBOARD => self.decode_storyboard(),
            TAG_TICK_SUMMARY => self.decode_tick_summary(),
            TAG_PROPERTY_VALUE => self.decode_property_value(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_storyboard_event() -> StoryboardEvent {
        StoryboardEvent {
            frame_index: 7,
            action: StoryboardAction::Begin,
            element: ElementId(12),
            storyboard_slot: 2,
            instance_slot: 0,
            enlistments: 3,
        }
    }

    fn sample_summary() -> TickSummary {
        TickSummary {
            frame_index: 7,
            elapsed_ms: 16.5,
            total_ms: 116.5,
            active_clocks: 2,
            active_simple_clocks: 1,
            active_instances: 2,
            applied_values: 3,
            cleared_values: 1,
        }
    }

    #[test]
    fn storyboard_event_survives_recording() {
        let mut rec = RecorderSink::new();
        rec.on_storyboard(&sample_storyboard_event());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::Storyboard(e) => {
                assert_eq!(e.frame_index, 7);
                assert_eq!(e.action, StoryboardAction::Begin);
                assert_eq!(e.element, ElementId(12));
                assert_eq!(e.storyboard_slot, 2);
                assert_eq!(e.enlistments, 3);
            }
            other => panic!("expected Storyboard, got {other:?}"),
        }
    }

    #[test]
    fn tick_summary_keeps_fractional_milliseconds() {
        let mut rec = RecorderSink::new();
        rec.on_tick_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[..] {
            [RecordedEvent::TickSummary(s)] => {
                assert_eq!(s.elapsed_ms, 16.5);
                assert_eq!(s.total_ms, 116.5);
                assert_eq!(s.applied_values, 3);
                assert_eq!(s.cleared_values, 1);
            }
            other => panic!("expected one TickSummary, got {other:?}"),
        }
    }

    #[test]
    fn events_decode_in_recording_order() {
        let mut rec = RecorderSink::new();
        rec.on_pool(&PoolEvent {
            pool: PoolKind::Instances,
            action: PoolAction::Retrieve,
            slot: 0,
            active: 1,
            available: 31,
        });
        rec.on_storyboard(&sample_storyboard_event());
        rec.on_clock_transition(&ClockTransitionEvent {
            frame_index: 7,
            clock_slot: 0,
            event: ClockEvent::Started,
            subscribers: 1,
        });
        rec.on_property_value(&PropertyValueEvent {
            frame_index: 7,
            property: PropertyId(107),
            contributed: false,
        });
        rec.on_tick_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(
            events[0],
            RecordedEvent::Pool(PoolEvent {
                pool: PoolKind::Instances,
                available: 31,
                ..
            })
        ));
        assert!(matches!(events[1], RecordedEvent::Storyboard(_)));
        assert!(matches!(
            events[2],
            RecordedEvent::ClockTransition(ClockTransitionEvent {
                event: ClockEvent::Started,
                ..
            })
        ));
        assert!(matches!(
            events[3],
            RecordedEvent::PropertyValue(PropertyValueEvent {
                property: PropertyId(107),
                contributed: false,
                ..
            })
        ));
        assert!(matches!(events[4], RecordedEvent::TickSummary(_)));
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_storyboard(&sample_storyboard_event());
        rec.on_tick_summary(&sample_summary());
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], RecordedEvent::Storyboard(_)));
    }
}
