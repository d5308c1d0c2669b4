// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyframe animations.
//!
//! An [`Animation<T>`] is a time-ordered list of [`Keyframe`]s plus a
//! [`FillBehavior`]. Evaluating it at a clock position finds the two
//! keyframes that bracket the position, eases the progress between them with
//! the later keyframe's [`Easing`], and interpolates.
//!
//! Storyboards hold animations of different value types side by side, so
//! the store keeps them as [`AnyAnimation`], a closed enum over the
//! [`Animatable`] types.

mod easing;
mod keyframes;
mod value;

pub use easing::Easing;
pub use keyframes::{AnimationKeyframeCollection, Keyframe};
pub use value::{Animatable, AnimatedValue, Interpolate, ValueKind};

use kurbo::{Point, Rect, Size, Vec2};

/// What an animation produces outside its keyframe range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillBehavior {
    /// Hold the first value before the range and the last value after it.
    #[default]
    HoldEnd,
    /// Produce no value outside the range.
    Stop,
}

/// A typed keyframe animation.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation<T> {
    keyframes: AnimationKeyframeCollection<T>,
    fill_behavior: FillBehavior,
}

impl<T> Default for Animation<T> {
    fn default() -> Self {
        Self {
            keyframes: AnimationKeyframeCollection::default(),
            fill_behavior: FillBehavior::HoldEnd,
        }
    }
}

impl<T: PartialEq> Animation<T> {
    /// Creates an animation with no keyframes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an animation from keyframes in any order.
    #[must_use]
    pub fn from_keyframes(keyframes: impl IntoIterator<Item = Keyframe<T>>) -> Self {
        let mut animation = Self::new();
        for keyframe in keyframes {
            animation.keyframes.add(keyframe);
        }
        animation
    }

    /// Sets the fill behavior, builder style.
    #[must_use]
    pub fn with_fill_behavior(mut self, fill_behavior: FillBehavior) -> Self {
        self.fill_behavior = fill_behavior;
        self
    }

    /// Adds a keyframe. See [`AnimationKeyframeCollection::add`].
    ///
    /// Animations held by a storyboard store are edited through
    /// [`StoryboardStore::add_keyframe`](crate::storyboard::StoryboardStore::add_keyframe)
    /// so the storyboard duration stays current.
    pub fn add_keyframe(&mut self, keyframe: Keyframe<T>) -> bool {
        self.keyframes.add(keyframe)
    }

    /// Removes a keyframe. See [`AnimationKeyframeCollection::remove`].
    pub fn remove_keyframe(&mut self, keyframe: &Keyframe<T>) -> bool {
        self.keyframes.remove(keyframe)
    }
}

impl<T> Animation<T> {
    /// The keyframes in time order.
    #[inline]
    #[must_use]
    pub const fn keyframes(&self) -> &AnimationKeyframeCollection<T> {
        &self.keyframes
    }

    /// Time of the earliest keyframe, or `0` when empty.
    #[must_use]
    pub fn start_time(&self) -> f64 {
        self.keyframes.start_time()
    }

    /// Time of the latest keyframe, or `0` when empty.
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.keyframes.end_time()
    }

    /// `end_time - start_time`.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    /// Returns the fill behavior.
    #[inline]
    #[must_use]
    pub const fn fill_behavior(&self) -> FillBehavior {
        self.fill_behavior
    }

    /// Sets the fill behavior.
    pub fn set_fill_behavior(&mut self, fill_behavior: FillBehavior) {
        self.fill_behavior = fill_behavior;
    }
}

impl<T: Interpolate> Animation<T> {
    /// Evaluates the animation at `position` milliseconds.
    ///
    /// Returns `None` when there are no keyframes, or when `position` is
    /// outside the keyframe range and the fill behavior is
    /// [`FillBehavior::Stop`].
    #[must_use]
    pub fn value_at(&self, position: f64) -> Option<T> {
        let keyframes = self.keyframes.as_slice();
        let first = keyframes.first()?;
        let last = keyframes.last()?;

        if position < first.time {
            return self.fill(first.value);
        }
        if position > last.time {
            return self.fill(last.value);
        }

        // Index of the first keyframe strictly after `position`.
        let next = keyframes.partition_point(|k| k.time <= position);
        if next == keyframes.len() {
            // At the end time; the last keyframe at that time wins.
            return Some(last.value);
        }
        if next == 0 {
            return Some(first.value);
        }
        let from = &keyframes[next - 1];
        let to = &keyframes[next];
        let span = to.time - from.time;
        if !(span > 0.0) {
            return Some(to.value);
        }
        let progress = to.easing.apply((position - from.time) / span);
        Some(from.value.interpolate(to.value, progress))
    }

    fn fill(&self, boundary: T) -> Option<T> {
        match self.fill_behavior {
            FillBehavior::HoldEnd => Some(boundary),
            FillBehavior::Stop => None,
        }
    }
}

/// An animation of any [`Animatable`] value type.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyAnimation {
    /// Animates an `f32`.
    F32(Animation<f32>),
    /// Animates an `f64`.
    F64(Animation<f64>),
    /// Animates an `i32`.
    I32(Animation<i32>),
    /// Animates a point.
    Point(Animation<Point>),
    /// Animates a vector.
    Vec2(Animation<Vec2>),
    /// Animates a size.
    Size(Animation<Size>),
    /// Animates a rectangle.
    Rect(Animation<Rect>),
}

macro_rules! dispatch {
    ($any:expr, $animation:ident => $body:expr) => {
        match $any {
            AnyAnimation::F32($animation) => $body,
            AnyAnimation::F64($animation) => $body,
            AnyAnimation::I32($animation) => $body,
            AnyAnimation::Point($animation) => $body,
            AnyAnimation::Vec2($animation) => $body,
            AnyAnimation::Size($animation) => $body,
            AnyAnimation::Rect($animation) => $body,
        }
    };
}

impl AnyAnimation {
    /// Returns the value type.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::F32(_) => ValueKind::F32,
            Self::F64(_) => ValueKind::F64,
            Self::I32(_) => ValueKind::I32,
            Self::Point(_) => ValueKind::Point,
            Self::Vec2(_) => ValueKind::Vec2,
            Self::Size(_) => ValueKind::Size,
            Self::Rect(_) => ValueKind::Rect,
        }
    }

    /// See [`Animation::start_time`].
    #[must_use]
    pub fn start_time(&self) -> f64 {
        dispatch!(self, a => a.start_time())
    }

    /// See [`Animation::end_time`].
    #[must_use]
    pub fn end_time(&self) -> f64 {
        dispatch!(self, a => a.end_time())
    }

    /// See [`Animation::duration`].
    #[must_use]
    pub fn duration(&self) -> f64 {
        dispatch!(self, a => a.duration())
    }

    /// Number of keyframes.
    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        dispatch!(self, a => a.keyframes().len())
    }

    /// See [`Animation::fill_behavior`].
    #[must_use]
    pub fn fill_behavior(&self) -> FillBehavior {
        dispatch!(self, a => a.fill_behavior())
    }

    /// See [`Animation::set_fill_behavior`].
    pub fn set_fill_behavior(&mut self, fill_behavior: FillBehavior) {
        dispatch!(self, a => a.set_fill_behavior(fill_behavior));
    }

    /// Evaluates the animation and wraps the result.
    #[must_use]
    pub fn value_at(&self, position: f64) -> Option<AnimatedValue> {
        dispatch!(self, a => a.value_at(position).map(Animatable::into_value))
    }

    /// Returns the typed animation if this animates `T`.
    #[must_use]
    pub fn downcast_ref<T: Animatable>(&self) -> Option<&Animation<T>> {
        T::downcast_ref(self)
    }

    /// Returns the typed animation mutably if this animates `T`.
    pub fn downcast_mut<T: Animatable>(&mut self) -> Option<&mut Animation<T>> {
        T::downcast_mut(self)
    }
}
