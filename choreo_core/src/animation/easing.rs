// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Shapes progress between two keyframes.
///
/// A keyframe's easing applies to the segment that ends at that keyframe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Holds the earlier value until the segment ends.
    Step,
    /// Accelerates from zero velocity, `t²`.
    EaseInQuadratic,
    /// Decelerates to zero velocity.
    EaseOutQuadratic,
    /// Accelerates for the first half, decelerates for the second.
    EaseInOutQuadratic,
    /// Accelerates from zero velocity, `t³`.
    EaseInCubic,
    /// Decelerates to zero velocity.
    EaseOutCubic,
    /// Cubic acceleration for the first half, deceleration for the second.
    EaseInOutCubic,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    ///
    /// Inputs outside `[0, 1]` are clamped.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Step => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Self::EaseInQuadratic => t * t,
            Self::EaseOutQuadratic => t * (2.0 - t),
            Self::EaseInOutQuadratic => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}
