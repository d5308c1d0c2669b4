// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Storyboards, their targets, and the animations applied to each target.
//!
//! ```text
//!   Storyboard ──► StoryboardTarget ──► (AnimationKey → Animation)
//!   loop behavior    selector             one animation per key
//!   duration
//! ```
//!
//! A storyboard's duration is the latest keyframe time across all of its
//! target animations. The [`StoryboardStore`] keeps it current on every
//! mutation so clocks can read it once per tick.

mod key;
mod store;

pub use key::{AnimationKey, Selector};
pub use store::{
    AnimationEntry, AnimationId, Storyboard, StoryboardId, StoryboardStore, StoryboardTarget,
    TargetId,
};
