// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Only tick summaries carry a timestamp. Every other event is stamped with
//! the total time of the most recent summary before it, so events raised
//! between two ticks line up with the earlier one.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use choreo_core::trace::{PoolAction, StoryboardAction};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Storyboard begin and stop become an async span per instance slot, tick
/// summaries become a counter track plus an instant, and everything else is
/// an instant event.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut now_us = 0.0_f64;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::ClockTransition(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("Clock{:?}", e.event),
                    "cat": "Clock",
                    "ts": now_us,
                    "pid": 0,
                    "tid": e.clock_slot,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "subscribers": e.subscribers,
                    }
                }));
            }
            RecordedEvent::Pool(e) => {
                let name = match e.action {
                    PoolAction::Retrieve => "Retrieve",
                    PoolAction::Release => "Release",
                };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": format!("{:?}", e.pool),
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "slot": e.slot,
                        "active": e.active,
                        "available": e.available,
                    }
                }));
            }
            RecordedEvent::Storyboard(e) => {
                let ph = match e.action {
                    StoryboardAction::Begin => "b",
                    StoryboardAction::Stop => "e",
                    StoryboardAction::Pause | StoryboardAction::Resume => "n",
                };
                events.push(json!({
                    "ph": ph,
                    "name": format!("Storyboard {}", e.storyboard_slot),
                    "cat": "Storyboard",
                    "id": e.instance_slot,
                    "ts": now_us,
                    "pid": 0,
                    "tid": e.element.0,
                    "args": {
                        "frame_index": e.frame_index,
                        "action": format!("{:?}", e.action),
                        "enlistments": e.enlistments,
                    }
                }));
            }
            RecordedEvent::TickSummary(s) => {
                now_us = s.total_ms * 1000.0;
                events.push(json!({
                    "ph": "C",
                    "name": "Pools",
                    "cat": "Summary",
                    "ts": now_us,
                    "pid": 0,
                    "args": {
                        "clocks": s.active_clocks,
                        "simple_clocks": s.active_simple_clocks,
                        "instances": s.active_instances,
                    }
                }));
                events.push(json!({
                    "ph": "i",
                    "name": "Tick",
                    "cat": "Summary",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": s.frame_index,
                        "elapsed_ms": s.elapsed_ms,
                        "applied_values": s.applied_values,
                        "cleared_values": s.cleared_values,
                    }
                }));
            }
            RecordedEvent::PropertyValue(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "PropertyValue",
                    "cat": "Rich",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "property": e.property.0,
                        "contributed": e.contributed,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}
