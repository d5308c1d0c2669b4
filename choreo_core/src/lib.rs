// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clocks, pools, and storyboards for retained-mode UI property animation.
//!
//! `choreo_core` drives keyframe animations of dependency-property values
//! across a tree of UI elements. It is `no_std` compatible (with `alloc`),
//! keeps storyboards in generational stores, and checks clocks and
//! storyboard instances out of bounded pools so a running UI does not
//! allocate per animation.
//!
//! # Architecture
//!
//! Everything is owned by an [`AnimationContext`](context::AnimationContext)
//! and driven by one `update` call per UI tick:
//!
//! ```text
//!   Time source ──► FrameTime
//!                       │
//!                       ▼
//!   AnimationContext::update()
//!       ├─► SimpleClockPool::update()        fixed-timing clocks
//!       ├─► StoryboardClockPool::update()    timing from each storyboard
//!       └─► StoryboardInstancePool::update() evaluate enlistments
//!                                                   │
//!                                                   ▼
//!                                   PropertyHost::apply_animated_value()
//! ```
//!
//! **[`clock`]**: The [`Clock`](clock::Clock) state machine with its loop
//! behaviors, plus the [`SimpleClock`](clock::SimpleClock) and
//! [`StoryboardClock`](clock::StoryboardClock) wrappers.
//!
//! **[`animation`]**: Typed keyframe animations, easing, interpolation, and
//! the [`AnyAnimation`](animation::AnyAnimation) enum the store keeps.
//!
//! **[`storyboard`]**: Storyboards, targets, and the
//! [`StoryboardStore`](storyboard::StoryboardStore) that keeps each
//! storyboard's duration current.
//!
//! **[`instance`]**: Storyboard instances, and the
//! [`PropertyHost`](instance::PropertyHost) and
//! [`ElementTree`](instance::ElementTree) traits the embedding UI implements.
//!
//! **[`pool`]** / **[`pools`]**: The generic bounded [`Pool`](pool::Pool) and
//! the three pool managers built on it.
//!
//! **[`context`]**: [`AnimationContext`](context::AnimationContext), which
//! begins and stops storyboards on elements and runs the tick.
//!
//! **[`time`]**: Host time conversion and [`FrameTime`](time::FrameTime).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! instrumentation, with zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-property
//!   value events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
mod arena;
pub mod clock;
pub mod context;
pub mod error;
pub mod handle;
pub mod instance;
pub mod pool;
pub mod pools;
pub mod storyboard;
pub mod time;
pub mod trace;
