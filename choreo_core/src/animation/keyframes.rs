// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::slice;

use super::Easing;

/// A value at a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe<T> {
    /// Only set through [`Keyframe::new`], which validates it.
    pub(crate) time: f64,
    /// The value at `time`.
    pub value: T,
    /// Easing of the segment that ends at this keyframe.
    pub easing: Easing,
}

impl<T> Keyframe<T> {
    /// Creates a linearly eased keyframe.
    ///
    /// # Panics
    ///
    /// Panics if `time` is negative or not finite.
    #[must_use]
    pub fn new(time: f64, value: T) -> Self {
        assert!(
            time.is_finite() && time >= 0.0,
            "keyframe time must be finite and non-negative, got {time}"
        );
        Self {
            time,
            value,
            easing: Easing::Linear,
        }
    }

    /// Time in milliseconds from the start of the storyboard.
    #[inline]
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Sets the easing of the segment that ends at this keyframe.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Keyframes kept in ascending time order.
///
/// Keyframes with equal times keep their insertion order, so the later one
/// wins at that instant. Adding a keyframe equal to one already present is
/// rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationKeyframeCollection<T> {
    keyframes: Vec<Keyframe<T>>,
}

impl<T> Default for AnimationKeyframeCollection<T> {
    fn default() -> Self {
        Self {
            keyframes: Vec::new(),
        }
    }
}

impl<T: PartialEq> AnimationKeyframeCollection<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a keyframe in time order.
    ///
    /// Returns `false` if an equal keyframe is already present.
    pub fn add(&mut self, keyframe: Keyframe<T>) -> bool {
        if self.keyframes.contains(&keyframe) {
            return false;
        }
        let at = self.keyframes.partition_point(|k| k.time <= keyframe.time);
        self.keyframes.insert(at, keyframe);
        true
    }

    /// Removes the first keyframe equal to `keyframe`.
    ///
    /// Returns `false` if none was present.
    pub fn remove(&mut self, keyframe: &Keyframe<T>) -> bool {
        match self.keyframes.iter().position(|k| k == keyframe) {
            Some(index) => {
                self.keyframes.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<T> AnimationKeyframeCollection<T> {
    /// Number of keyframes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Returns whether there are no keyframes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Iterates in time order.
    pub fn iter(&self) -> slice::Iter<'_, Keyframe<T>> {
        self.keyframes.iter()
    }

    /// The keyframes in time order.
    #[must_use]
    pub fn as_slice(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    /// The earliest keyframe.
    #[must_use]
    pub fn first(&self) -> Option<&Keyframe<T>> {
        self.keyframes.first()
    }

    /// The latest keyframe.
    #[must_use]
    pub fn last(&self) -> Option<&Keyframe<T>> {
        self.keyframes.last()
    }

    /// Time of the earliest keyframe, or `0` when empty.
    #[must_use]
    pub fn start_time(&self) -> f64 {
        self.first().map_or(0.0, |k| k.time)
    }

    /// Time of the latest keyframe, or `0` when empty.
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.last().map_or(0.0, |k| k.time)
    }
}

impl<'a, T> IntoIterator for &'a AnimationKeyframeCollection<T> {
    type Item = &'a Keyframe<T>;
    type IntoIter = slice::Iter<'a, Keyframe<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
