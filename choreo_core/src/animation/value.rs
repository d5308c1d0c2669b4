// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Point, Rect, Size, Vec2};

use super::{Animation, AnyAnimation};

/// Linear interpolation between two values of the same type.
pub trait Interpolate: Copy {
    /// Returns the value `t` of the way from `self` to `to`.
    ///
    /// `t` is usually in `[0, 1]` but eased progress may overshoot.
    #[must_use]
    fn interpolate(self, to: Self, t: f64) -> Self;
}

#[inline]
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(self, to: Self, t: f64) -> Self {
        lerp(self, to, t)
    }
}

impl Interpolate for f32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "interpolated between two f32 values"
    )]
    fn interpolate(self, to: Self, t: f64) -> Self {
        lerp(f64::from(self), f64::from(to), t) as Self
    }
}

impl Interpolate for i32 {
    /// Rounds half away from zero; saturates at the `i32` range.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "rounded float casts saturate"
    )]
    fn interpolate(self, to: Self, t: f64) -> Self {
        let value = lerp(f64::from(self), f64::from(to), t);
        if value >= 0.0 {
            (value + 0.5) as Self
        } else {
            (value - 0.5) as Self
        }
    }
}

impl Interpolate for Point {
    fn interpolate(self, to: Self, t: f64) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for Vec2 {
    fn interpolate(self, to: Self, t: f64) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for Size {
    fn interpolate(self, to: Self, t: f64) -> Self {
        Self::new(lerp(self.width, to.width, t), lerp(self.height, to.height, t))
    }
}

impl Interpolate for Rect {
    fn interpolate(self, to: Self, t: f64) -> Self {
        Self::new(
            lerp(self.x0, to.x0, t),
            lerp(self.y0, to.y0, t),
            lerp(self.x1, to.x1, t),
            lerp(self.y1, to.y1, t),
        )
    }
}

/// The value type of an animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `i32`
    I32,
    /// [`kurbo::Point`]
    Point,
    /// [`kurbo::Vec2`]
    Vec2,
    /// [`kurbo::Size`]
    Size,
    /// [`kurbo::Rect`]
    Rect,
}

/// A value produced by evaluating an animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimatedValue {
    /// An `f32` value.
    F32(f32),
    /// An `f64` value.
    F64(f64),
    /// An `i32` value.
    I32(i32),
    /// A point.
    Point(Point),
    /// A vector.
    Vec2(Vec2),
    /// A size.
    Size(Size),
    /// A rectangle.
    Rect(Rect),
}

impl AnimatedValue {
    /// Returns the value's type.
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
}

/// A value type that storyboards can animate.
///
/// Implemented for `f32`, `f64`, `i32` and the kurbo [`Point`], [`Vec2`],
/// [`Size`] and [`Rect`] types. Connects a typed [`Animation`] to the
/// type-erased [`AnyAnimation`] the storyboard store keeps.
pub trait Animatable: Interpolate + PartialEq + fmt::Debug + 'static {
    /// The matching [`ValueKind`].
    const KIND: ValueKind;

    /// Erases the animation's value type.
    fn into_any(animation: Animation<Self>) -> AnyAnimation;

    /// Returns the typed animation if `any` animates this type.
    fn downcast_ref(any: &AnyAnimation) -> Option<&Animation<Self>>;

    /// Returns the typed animation mutably if `any` animates this type.
    fn downcast_mut(any: &mut AnyAnimation) -> Option<&mut Animation<Self>>;

    /// Wraps a value.
    fn into_value(self) -> AnimatedValue;
}

macro_rules! impl_animatable {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Animatable for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn into_any(animation: Animation<Self>) -> AnyAnimation {
                    AnyAnimation::$variant(animation)
                }

                fn downcast_ref(any: &AnyAnimation) -> Option<&Animation<Self>> {
                    match any {
                        AnyAnimation::$variant(animation) => Some(animation),
                        _ => None,
                    }
                }

                fn downcast_mut(any: &mut AnyAnimation) -> Option<&mut Animation<Self>> {
                    match any {
                        AnyAnimation::$variant(animation) => Some(animation),
                        _ => None,
                    }
                }

                fn into_value(self) -> AnimatedValue {
                    AnimatedValue::$variant(self)
                }
            }

            impl From<Animation<$ty>> for AnyAnimation {
                fn from(animation: Animation<$ty>) -> Self {
                    <$ty as Animatable>::into_any(animation)
                }
            }
        )*
    };
}

impl_animatable! {
    f32 => F32,
    f64 => F64,
    i32 => I32,
    Point => Point,
    Vec2 => Vec2,
    Size => Size,
    Rect => Rect,
}
