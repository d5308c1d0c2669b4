// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by recoverable animation operations.
//!
//! Stale handles are contract violations and panic instead; see the
//! `# Panics` sections on the store and pool methods.

use core::fmt;

use crate::animation::ValueKind;

/// Errors from storyboard, pool, and animation operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationError {
    /// A storyboard instance was associated while already bound to a
    /// storyboard, clock, and element.
    AlreadyAssociated,
    /// A pool reached its maximum capacity and every object is checked out.
    PoolExhausted {
        /// The pool's configured maximum capacity.
        capacity: usize,
    },
    /// A keyframe's value type does not match the animation's value type.
    ValueTypeMismatch {
        /// Value type of the animation.
        expected: ValueKind,
        /// Value type of the rejected keyframe.
        found: ValueKind,
    },
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAssociated => {
                write!(f, "storyboard instance is already associated")
            }
            Self::PoolExhausted { capacity } => {
                write!(f, "pool exhausted (capacity {capacity})")
            }
            Self::ValueTypeMismatch { expected, found } => write!(
                f,
                "keyframe value type {found:?} does not match animation type {expected:?}"
            ),
        }
    }
}

impl core::error::Error for AnimationError {}
