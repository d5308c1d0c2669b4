// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Storyboard instances and the host traits they drive.
//!
//! A [`StoryboardInstance`] is one playback of a storyboard on an element.
//! It binds three things together (the storyboard, a pooled
//! [`StoryboardClock`](crate::clock::StoryboardClock), and the element) and
//! records an [`Enlistment`] for every dependency-property value the
//! storyboard animates there.
//!
//! The element tree and the dependency-property system live outside this
//! crate. They are reached through [`ElementTree`] and [`PropertyHost`].

use alloc::vec::Vec;

use crate::animation::AnimatedValue;
use crate::clock::{ClockObserver, ClockState};
use crate::error::AnimationError;
use crate::handle::{ElementId, Handle, PropertyId};
use crate::pools::{ClockId, StoryboardClockPool};
use crate::storyboard::{AnimationId, AnimationKey, Selector, StoryboardId};

/// Handle to a pooled [`StoryboardInstance`].
pub type InstanceId = Handle<StoryboardInstance>;

/// The dependency-property side of animation.
///
/// Receives the clock notifications for the property values it subscribed
/// (through the [`ClockObserver`] supertrait), storyboard begin and stop
/// notifications per enlistment, and the animated values computed each tick.
pub trait PropertyHost: ClockObserver {
    /// Called for each enlistment before the instance's clock starts.
    fn begin_storyboard(
        &mut self,
        property: PropertyId,
        animation: AnimationId,
        instance: InstanceId,
    ) {
        _ = (property, animation, instance);
    }

    /// Called for each enlistment before the instance's clock stops.
    fn stop_storyboard(&mut self, property: PropertyId, animation: AnimationId, instance: InstanceId) {
        _ = (property, animation, instance);
    }

    /// Delivers the animated value for `property` this tick.
    ///
    /// `None` means no running animation contributes a value, so the host
    /// should fall back to the property's base value.
    fn apply_animated_value(&mut self, property: PropertyId, value: Option<&AnimatedValue>);
}

/// Resolves storyboard targets to dependency-property values.
pub trait ElementTree {
    /// Appends to `out` the property values that `selector` and `key` address
    /// beneath `element`.
    fn resolve_targets(
        &self,
        element: ElementId,
        selector: &Selector,
        key: &AnimationKey,
        out: &mut Vec<PropertyId>,
    );
}

/// A property value that an instance animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Enlistment {
    /// The animated property value.
    pub property: PropertyId,
    /// The animation that drives it.
    pub animation: AnimationId,
}

/// One playback of a storyboard on an element.
///
/// The storyboard, clock, and element are associated together or not at
/// all.
#[derive(Clone, Debug, Default)]
pub struct StoryboardInstance {
    storyboard: Option<StoryboardId>,
    clock: Option<ClockId>,
    element: Option<ElementId>,
    enlistments: Vec<Enlistment>,
}

impl StoryboardInstance {
    /// Creates an unassociated instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The storyboard being played.
    #[inline]
    #[must_use]
    pub const fn storyboard(&self) -> Option<StoryboardId> {
        self.storyboard
    }

    /// The clock playing it.
    #[inline]
    #[must_use]
    pub const fn clock(&self) -> Option<ClockId> {
        self.clock
    }

    /// The element it plays on.
    #[inline]
    #[must_use]
    pub const fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// Returns whether the instance is bound to a storyboard, clock, and
    /// element.
    #[inline]
    #[must_use]
    pub const fn is_associated(&self) -> bool {
        self.storyboard.is_some()
    }

    /// The enlisted property values, in enlistment order.
    #[must_use]
    pub fn enlistments(&self) -> &[Enlistment] {
        &self.enlistments
    }

    /// Records that `animation` drives `property`.
    ///
    /// Duplicates are kept; each one is notified separately on start and
    /// stop.
    pub fn enlist(&mut self, property: PropertyId, animation: AnimationId) {
        self.enlistments.push(Enlistment {
            property,
            animation,
        });
    }

    /// Binds the instance to a storyboard, the clock that plays it, and the
    /// element it plays on.
    ///
    /// Returns [`AnimationError::AlreadyAssociated`] if already bound.
    pub fn associate_with(
        &mut self,
        storyboard: StoryboardId,
        clock: ClockId,
        element: ElementId,
    ) -> Result<(), AnimationError> {
        if self.is_associated() {
            return Err(AnimationError::AlreadyAssociated);
        }
        self.storyboard = Some(storyboard);
        self.clock = Some(clock);
        self.element = Some(element);
        Ok(())
    }

    /// Starts playback if the clock is stopped.
    ///
    /// Every enlistment gets [`PropertyHost::begin_storyboard`] and is
    /// subscribed to the clock before the clock starts. Returns whether the
    /// clock started.
    pub fn start<H: PropertyHost + ?Sized>(
        &self,
        id: InstanceId,
        clocks: &mut StoryboardClockPool,
        host: &mut H,
    ) -> bool {
        let Some(clock_id) = self.clock else {
            return false;
        };
        let clock = clocks.get_mut(clock_id).clock_mut();
        if clock.state() != ClockState::Stopped {
            return false;
        }
        for enlistment in &self.enlistments {
            host.begin_storyboard(enlistment.property, enlistment.animation, id);
            clock.subscribe(enlistment.property);
        }
        clock.start(host);
        true
    }

    /// Stops playback if the clock is not already stopped.
    ///
    /// Every enlistment gets [`PropertyHost::stop_storyboard`] before the
    /// clock stops. Returns whether the clock stopped.
    pub fn stop<H: PropertyHost + ?Sized>(
        &self,
        id: InstanceId,
        clocks: &mut StoryboardClockPool,
        host: &mut H,
    ) -> bool {
        let Some(clock_id) = self.clock else {
            return false;
        };
        let clock = clocks.get_mut(clock_id).clock_mut();
        if clock.state() == ClockState::Stopped {
            return false;
        }
        for enlistment in &self.enlistments {
            host.stop_storyboard(enlistment.property, enlistment.animation, id);
        }
        clock.stop(host);
        true
    }

    /// Pauses a playing clock. Returns whether the clock paused.
    pub fn pause<H: PropertyHost + ?Sized>(
        &self,
        clocks: &mut StoryboardClockPool,
        host: &mut H,
    ) -> bool {
        let Some(clock_id) = self.clock else {
            return false;
        };
        let clock = clocks.get_mut(clock_id).clock_mut();
        let was = clock.state();
        clock.pause(host);
        clock.state() != was
    }

    /// Resumes a paused clock. Returns whether the clock resumed.
    pub fn resume<H: PropertyHost + ?Sized>(
        &self,
        clocks: &mut StoryboardClockPool,
        host: &mut H,
    ) -> bool {
        let Some(clock_id) = self.clock else {
            return false;
        };
        let clock = clocks.get_mut(clock_id).clock_mut();
        let was = clock.state();
        clock.resume(host);
        clock.state() != was
    }

    /// Stops playback, returns the clock to its pool, and clears the
    /// association and enlistments. No-op when unassociated.
    pub fn disassociate<H: PropertyHost + ?Sized>(
        &mut self,
        id: InstanceId,
        clocks: &mut StoryboardClockPool,
        host: &mut H,
    ) {
        if !self.is_associated() {
            return;
        }
        self.stop(id, clocks, host);
        clocks.release_ref(&mut self.clock);
        self.storyboard = None;
        self.element = None;
        self.enlistments.clear();
    }
}
