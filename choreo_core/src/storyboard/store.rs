// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational storage for storyboards, targets, and animations.

use alloc::vec::Vec;

use crate::animation::{Animatable, AnimatedValue, Animation, AnyAnimation, FillBehavior, Keyframe};
use crate::arena::Arena;
use crate::clock::{ClockTiming, LoopBehavior};
use crate::error::AnimationError;
use crate::handle::Handle;

use super::key::{AnimationKey, Selector};

/// Handle to a [`Storyboard`] in a [`StoryboardStore`].
pub type StoryboardId = Handle<Storyboard>;

/// Handle to a [`StoryboardTarget`] in a [`StoryboardStore`].
pub type TargetId = Handle<StoryboardTarget>;

/// Handle to an animation in a [`StoryboardStore`].
pub type AnimationId = Handle<AnimationEntry>;

/// A set of targets played together under one clock.
#[derive(Clone, Debug)]
pub struct Storyboard {
    loop_behavior: LoopBehavior,
    /// `max(0, max end_time)` over every target animation, kept current.
    duration: f64,
    targets: Vec<TargetId>,
}

impl Storyboard {
    /// The loop behavior.
    #[inline]
    #[must_use]
    pub const fn loop_behavior(&self) -> LoopBehavior {
        self.loop_behavior
    }

    /// The cached duration in milliseconds.
    #[inline]
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// The targets, in the order they were added.
    #[must_use]
    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    /// The timing a clock playing this storyboard runs against.
    #[inline]
    #[must_use]
    pub const fn timing(&self) -> ClockTiming {
        ClockTiming::new(self.duration, self.loop_behavior)
    }
}

/// A selector plus the animations applied to what it selects.
#[derive(Clone, Debug)]
pub struct StoryboardTarget {
    selector: Selector,
    storyboard: Option<StoryboardId>,
    animations: Vec<(AnimationKey, AnimationId)>,
}

impl StoryboardTarget {
    /// The selector.
    #[inline]
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The owning storyboard, if attached.
    #[inline]
    #[must_use]
    pub const fn storyboard(&self) -> Option<StoryboardId> {
        self.storyboard
    }

    /// The animations keyed by property, in the order they were set.
    #[must_use]
    pub fn animations(&self) -> &[(AnimationKey, AnimationId)] {
        &self.animations
    }

    fn position(&self, key: &AnimationKey) -> Option<usize> {
        self.animations.iter().position(|(k, _)| k == key)
    }
}

/// An animation and the target it is attached to.
#[derive(Clone, Debug)]
pub struct AnimationEntry {
    animation: AnyAnimation,
    target: Option<TargetId>,
}

impl AnimationEntry {
    /// The animation.
    #[inline]
    #[must_use]
    pub const fn animation(&self) -> &AnyAnimation {
        &self.animation
    }

    /// The owning target, if attached.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> Option<TargetId> {
        self.target
    }
}

/// Owns every storyboard, target, and animation of an animation context.
///
/// Ownership links run both ways: a storyboard lists its targets and each
/// target records its storyboard; a target maps keys to animations and each
/// animation records its target. An object is owned by at most one parent,
/// and attaching it elsewhere detaches it first.
///
/// Every structural change recalculates the affected storyboard's duration,
/// so [`duration`](Self::duration) is a field read.
///
/// All methods taking a handle panic if the handle is stale, unless
/// documented otherwise.
#[derive(Debug)]
pub struct StoryboardStore {
    storyboards: Arena<Storyboard>,
    targets: Arena<StoryboardTarget>,
    animations: Arena<AnimationEntry>,
}

impl Default for StoryboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryboardStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            storyboards: Arena::new("StoryboardId"),
            targets: Arena::new("TargetId"),
            animations: Arena::new("AnimationId"),
        }
    }

    // -- Storyboards --

    /// Creates an empty storyboard.
    pub fn create_storyboard(&mut self, loop_behavior: LoopBehavior) -> StoryboardId {
        self.storyboards.insert(Storyboard {
            loop_behavior,
            duration: 0.0,
            targets: Vec::new(),
        })
    }

    /// Destroys a storyboard. Its targets are detached, not destroyed.
    pub fn destroy_storyboard(&mut self, storyboard: StoryboardId) {
        let removed = self.storyboards.remove(storyboard);
        for target in removed.targets {
            self.targets.get_mut(target).storyboard = None;
        }
    }

    /// Returns whether `storyboard` is alive.
    #[must_use]
    pub fn contains_storyboard(&self, storyboard: StoryboardId) -> bool {
        self.storyboards.contains(storyboard)
    }

    /// Returns the storyboard.
    #[must_use]
    pub fn storyboard(&self, storyboard: StoryboardId) -> &Storyboard {
        self.storyboards.get(storyboard)
    }

    /// Returns the storyboard, or `None` if the handle is stale.
    #[must_use]
    pub fn try_storyboard(&self, storyboard: StoryboardId) -> Option<&Storyboard> {
        self.storyboards.try_get(storyboard)
    }

    /// The storyboard's duration in milliseconds.
    #[must_use]
    pub fn duration(&self, storyboard: StoryboardId) -> f64 {
        self.storyboards.get(storyboard).duration
    }

    /// The storyboard's loop behavior.
    #[must_use]
    pub fn loop_behavior(&self, storyboard: StoryboardId) -> LoopBehavior {
        self.storyboards.get(storyboard).loop_behavior
    }

    /// Sets the loop behavior. Playing clocks pick it up on their next
    /// update.
    pub fn set_loop_behavior(&mut self, storyboard: StoryboardId, loop_behavior: LoopBehavior) {
        self.storyboards.get_mut(storyboard).loop_behavior = loop_behavior;
    }

    /// The storyboard's targets.
    #[must_use]
    pub fn targets(&self, storyboard: StoryboardId) -> &[TargetId] {
        &self.storyboards.get(storyboard).targets
    }

    // -- Targets --

    /// Creates a detached target.
    pub fn create_target(&mut self, selector: Selector) -> TargetId {
        self.targets.insert(StoryboardTarget {
            selector,
            storyboard: None,
            animations: Vec::new(),
        })
    }

    /// Destroys a target, detaching it from its storyboard. Its animations
    /// are detached, not destroyed.
    pub fn destroy_target(&mut self, target: TargetId) {
        if let Some(storyboard) = self.targets.get(target).storyboard {
            self.remove_target(storyboard, target);
        }
        let removed = self.targets.remove(target);
        for (_, animation) in removed.animations {
            self.animations.get_mut(animation).target = None;
        }
    }

    /// Returns whether `target` is alive.
    #[must_use]
    pub fn contains_target(&self, target: TargetId) -> bool {
        self.targets.contains(target)
    }

    /// Returns the target.
    #[must_use]
    pub fn target(&self, target: TargetId) -> &StoryboardTarget {
        self.targets.get(target)
    }

    /// The storyboard that owns `target`, if any.
    #[must_use]
    pub fn target_storyboard(&self, target: TargetId) -> Option<StoryboardId> {
        self.targets.get(target).storyboard
    }

    /// The target's selector.
    #[must_use]
    pub fn selector(&self, target: TargetId) -> &Selector {
        &self.targets.get(target).selector
    }

    /// Adds `target` to `storyboard`, detaching it from any storyboard that
    /// held it before. Adding a target to its own storyboard is a no-op.
    pub fn add_target(&mut self, storyboard: StoryboardId, target: TargetId) {
        match self.targets.get(target).storyboard {
            Some(current) if current == storyboard => return,
            Some(previous) => {
                self.remove_target(previous, target);
            }
            None => {}
        }
        self.storyboards.get_mut(storyboard).targets.push(target);
        self.targets.get_mut(target).storyboard = Some(storyboard);
        self.recalculate_duration(storyboard);
    }

    /// Removes `target` from `storyboard`.
    ///
    /// Returns `false` if the target did not belong to it.
    pub fn remove_target(&mut self, storyboard: StoryboardId, target: TargetId) -> bool {
        let targets = &mut self.storyboards.get_mut(storyboard).targets;
        let Some(index) = targets.iter().position(|&t| t == target) else {
            return false;
        };
        targets.remove(index);
        self.targets.get_mut(target).storyboard = None;
        self.recalculate_duration(storyboard);
        true
    }

    // -- Target animations --

    /// Sets the animation for `key` on `target`.
    ///
    /// `animation` is detached from any target that held it before. The
    /// animation previously set for `key`, if any, is detached and returned;
    /// it stays alive in the store.
    pub fn set_animation(
        &mut self,
        target: TargetId,
        key: AnimationKey,
        animation: AnimationId,
    ) -> Option<AnimationId> {
        let held = self.targets.get(target);
        if let Some(index) = held.position(&key) {
            if held.animations[index].1 == animation {
                return None;
            }
        }

        if let Some(previous) = self.animations.get(animation).target {
            self.detach_animation(previous, animation);
        }

        let replaced = {
            let target_data = self.targets.get_mut(target);
            match target_data.position(&key) {
                Some(index) => {
                    let (_, old) = target_data.animations.remove(index);
                    Some(old)
                }
                None => None,
            }
        };
        if let Some(old) = replaced {
            self.animations.get_mut(old).target = None;
        }

        self.targets.get_mut(target).animations.push((key, animation));
        self.animations.get_mut(animation).target = Some(target);
        self.recalculate_owner(target);
        replaced
    }

    /// Removes and returns the animation set for `key`, leaving it alive in
    /// the store.
    pub fn remove_animation(&mut self, target: TargetId, key: &AnimationKey) -> Option<AnimationId> {
        let target_data = self.targets.get_mut(target);
        let index = target_data.position(key)?;
        let (_, animation) = target_data.animations.remove(index);
        self.animations.get_mut(animation).target = None;
        self.recalculate_owner(target);
        Some(animation)
    }

    /// The animation set for `key` on `target`.
    #[must_use]
    pub fn animation(&self, target: TargetId, key: &AnimationKey) -> Option<AnimationId> {
        let target = self.targets.get(target);
        target.position(key).map(|index| target.animations[index].1)
    }

    /// Every animation set on `target`.
    #[must_use]
    pub fn animations(&self, target: TargetId) -> &[(AnimationKey, AnimationId)] {
        &self.targets.get(target).animations
    }

    // -- Animations --

    /// Adds an animation to the store, detached.
    pub fn create_animation(&mut self, animation: impl Into<AnyAnimation>) -> AnimationId {
        self.animations.insert(AnimationEntry {
            animation: animation.into(),
            target: None,
        })
    }

    /// Destroys an animation, detaching it from its target first.
    pub fn destroy_animation(&mut self, animation: AnimationId) -> AnyAnimation {
        if let Some(target) = self.animations.get(animation).target {
            self.detach_animation(target, animation);
        }
        self.animations.remove(animation).animation
    }

    /// Returns whether `animation` is alive.
    #[must_use]
    pub fn contains_animation(&self, animation: AnimationId) -> bool {
        self.animations.contains(animation)
    }

    /// The animation's data.
    #[must_use]
    pub fn animation_data(&self, animation: AnimationId) -> &AnyAnimation {
        &self.animations.get(animation).animation
    }

    /// The animation's data as `Animation<T>`, or `None` if it animates
    /// another type.
    #[must_use]
    pub fn typed_animation<T: Animatable>(&self, animation: AnimationId) -> Option<&Animation<T>> {
        self.animation_data(animation).downcast_ref()
    }

    /// The target the animation is attached to.
    #[must_use]
    pub fn animation_target(&self, animation: AnimationId) -> Option<TargetId> {
        self.animations.get(animation).target
    }

    /// Adds a keyframe and recalculates the owning storyboard's duration.
    ///
    /// Returns `Ok(false)` if an equal keyframe is already present.
    pub fn add_keyframe<T: Animatable>(
        &mut self,
        animation: AnimationId,
        keyframe: Keyframe<T>,
    ) -> Result<bool, AnimationError> {
        let added = self.typed_mut::<T>(animation)?.add_keyframe(keyframe);
        if added {
            self.recalculate_animation_owner(animation);
        }
        Ok(added)
    }

    /// Removes a keyframe and recalculates the owning storyboard's duration.
    ///
    /// Returns `Ok(false)` if the keyframe was not present.
    pub fn remove_keyframe<T: Animatable>(
        &mut self,
        animation: AnimationId,
        keyframe: &Keyframe<T>,
    ) -> Result<bool, AnimationError> {
        let removed = self.typed_mut::<T>(animation)?.remove_keyframe(keyframe);
        if removed {
            self.recalculate_animation_owner(animation);
        }
        Ok(removed)
    }

    /// Sets the animation's fill behavior.
    pub fn set_fill_behavior(&mut self, animation: AnimationId, fill_behavior: FillBehavior) {
        self.animations
            .get_mut(animation)
            .animation
            .set_fill_behavior(fill_behavior);
    }

    /// Evaluates the animation at `position` milliseconds.
    ///
    /// Returns `None` for a stale handle as well as for no value, so
    /// enlistments whose animation was destroyed simply stop contributing.
    #[must_use]
    pub fn evaluate(&self, animation: AnimationId, position: f64) -> Option<AnimatedValue> {
        self.animations
            .try_get(animation)
            .and_then(|entry| entry.animation.value_at(position))
    }

    // -- Counts --

    /// Number of live storyboards.
    #[must_use]
    pub fn storyboard_count(&self) -> usize {
        self.storyboards.len()
    }

    /// Number of live targets.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Number of live animations.
    #[must_use]
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    // -- Internals --

    fn typed_mut<T: Animatable>(
        &mut self,
        animation: AnimationId,
    ) -> Result<&mut Animation<T>, AnimationError> {
        let any = &mut self.animations.get_mut(animation).animation;
        let expected = any.kind();
        T::downcast_mut(any).ok_or(AnimationError::ValueTypeMismatch {
            expected,
            found: T::KIND,
        })
    }

    /// Removes `animation` from `target`'s collection and recalculates.
    fn detach_animation(&mut self, target: TargetId, animation: AnimationId) {
        let animations = &mut self.targets.get_mut(target).animations;
        animations.retain(|(_, a)| *a != animation);
        self.animations.get_mut(animation).target = None;
        self.recalculate_owner(target);
    }

    fn recalculate_animation_owner(&mut self, animation: AnimationId) {
        if let Some(target) = self.animations.get(animation).target {
            self.recalculate_owner(target);
        }
    }

    fn recalculate_owner(&mut self, target: TargetId) {
        if let Some(storyboard) = self.targets.get(target).storyboard {
            self.recalculate_duration(storyboard);
        }
    }

    /// Recomputes `max(0, max end_time)` over every animation of every
    /// target of `storyboard`.
    fn recalculate_duration(&mut self, storyboard: StoryboardId) {
        let mut duration = 0.0_f64;
        for &target in &self.storyboards.get(storyboard).targets {
            for (_, animation) in &self.targets.get(target).animations {
                duration = duration.max(self.animations.get(*animation).animation.end_time());
            }
        }
        self.storyboards.get_mut(storyboard).duration = duration;
    }
}
