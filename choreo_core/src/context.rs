// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-engine animation context.
//!
//! An [`AnimationContext`] owns the [`StoryboardStore`] and the three pool
//! managers, and is the only thing a UI loop needs to drive:
//!
//! ```text
//!   begin_storyboard(element, storyboard)
//!       │  retrieve instance + clock, enlist resolved properties, start
//!       ▼
//!   update(time) once per UI tick
//!       │  1. simple clocks advance
//!       │  2. storyboard clocks advance against their storyboard timing
//!       │  3. instances evaluate enlisted animations → PropertyHost
//!       ▼
//!   stop_storyboard(element, storyboard)
//!          stop, release clock + instance
//! ```

use alloc::vec::Vec;

use crate::clock::{ClockEvent, ClockState, LoopBehavior};
use crate::error::AnimationError;
use crate::handle::{ElementId, PropertyId};
use crate::instance::{ElementTree, InstanceId, PropertyHost};
use crate::pool::PoolConfig;
use crate::pools::{
    ClockId, SimpleClockId, SimpleClockPool, StoryboardClockPool, StoryboardInstancePool,
};
use crate::storyboard::{Storyboard, StoryboardId, StoryboardStore};
use crate::time::FrameTime;
use crate::trace::{
    ClockTransitionEvent, PoolAction, PoolEvent, PoolKind, StoryboardAction, StoryboardEvent,
    TickSummaryBuilder, Tracer,
};

/// Pool sizing for an [`AnimationContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextConfig {
    /// Storyboard clock pool.
    pub storyboard_clocks: PoolConfig,
    /// Storyboard instance pool.
    pub instances: PoolConfig,
    /// Simple clock pool.
    pub simple_clocks: PoolConfig,
}

impl ContextConfig {
    /// [`PoolConfig::DEFAULT`] for every pool.
    pub const DEFAULT: Self = Self::uniform(PoolConfig::DEFAULT);

    /// Uses the same sizing for every pool.
    #[inline]
    #[must_use]
    pub const fn uniform(pool: PoolConfig) -> Self {
        Self {
            storyboard_clocks: pool,
            instances: pool,
            simple_clocks: pool,
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A storyboard playing on an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunningStoryboard {
    /// The element.
    pub element: ElementId,
    /// The storyboard.
    pub storyboard: StoryboardId,
    /// The instance playing it.
    pub instance: InstanceId,
}

/// Owns the storyboards and pools of one engine context.
#[derive(Debug)]
pub struct AnimationContext {
    store: StoryboardStore,
    storyboard_clocks: StoryboardClockPool,
    instances: StoryboardInstancePool,
    simple_clocks: SimpleClockPool,
    running: Vec<RunningStoryboard>,
    frame_index: u64,
    /// Reused buffer for selector resolution.
    resolved: Vec<PropertyId>,
}

impl Default for AnimationContext {
    fn default() -> Self {
        Self::new(ContextConfig::DEFAULT)
    }
}

impl AnimationContext {
    /// Creates a context. Pools are created on first use.
    #[must_use]
    pub fn new(config: ContextConfig) -> Self {
        Self {
            store: StoryboardStore::new(),
            storyboard_clocks: StoryboardClockPool::new(config.storyboard_clocks),
            instances: StoryboardInstancePool::new(config.instances),
            simple_clocks: SimpleClockPool::new(config.simple_clocks),
            running: Vec::new(),
            frame_index: 0,
            resolved: Vec::new(),
        }
    }

    // -- Accessors --

    /// The storyboard store.
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &StoryboardStore {
        &self.store
    }

    /// The storyboard store, for authoring storyboards.
    #[inline]
    pub fn store_mut(&mut self) -> &mut StoryboardStore {
        &mut self.store
    }

    /// The storyboard clock pool.
    #[inline]
    #[must_use]
    pub const fn storyboard_clocks(&self) -> &StoryboardClockPool {
        &self.storyboard_clocks
    }

    /// The storyboard instance pool.
    #[inline]
    #[must_use]
    pub const fn instances(&self) -> &StoryboardInstancePool {
        &self.instances
    }

    /// The simple clock pool.
    #[inline]
    #[must_use]
    pub const fn simple_clocks(&self) -> &SimpleClockPool {
        &self.simple_clocks
    }

    /// The simple clock pool, for starting and stopping clocks.
    #[inline]
    pub fn simple_clocks_mut(&mut self) -> &mut SimpleClockPool {
        &mut self.simple_clocks
    }

    /// Number of completed [`update`](Self::update) calls.
    #[inline]
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Storyboards currently playing, in the order they began.
    #[must_use]
    pub fn running(&self) -> &[RunningStoryboard] {
        &self.running
    }

    /// The instance playing `storyboard` on `element`, if any.
    #[must_use]
    pub fn running_instance(
        &self,
        element: ElementId,
        storyboard: StoryboardId,
    ) -> Option<InstanceId> {
        self.running
            .iter()
            .find(|r| r.element == element && r.storyboard == storyboard)
            .map(|r| r.instance)
    }

    // -- Storyboard playback --

    /// Begins `storyboard` on `element`.
    ///
    /// Any instance of the same storyboard already playing on the element is
    /// stopped and released first. The new instance enlists every property
    /// value the element tree resolves for each target animation, then
    /// starts.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::PoolExhausted`] if no instance or clock can
    /// be retrieved; nothing is left checked out in that case.
    ///
    /// # Panics
    ///
    /// Panics if `storyboard` is stale.
    pub fn begin_storyboard<H: PropertyHost + ElementTree + ?Sized>(
        &mut self,
        element: ElementId,
        storyboard: StoryboardId,
        host: &mut H,
        tracer: &mut Tracer<'_>,
    ) -> Result<InstanceId, AnimationError> {
        // Validates the handle before anything is checked out.
        let _ = self.store.storyboard(storyboard);
        self.stop_storyboard(element, storyboard, host, tracer);

        let instance = self.instances.retrieve()?;
        self.trace_instance_pool(PoolAction::Retrieve, instance, tracer);
        let clock = match self.storyboard_clocks.retrieve(instance) {
            Ok(clock) => clock,
            Err(err) => {
                self.instances
                    .release(instance, &mut self.storyboard_clocks, host);
                self.trace_instance_pool(PoolAction::Release, instance, tracer);
                return Err(err);
            }
        };
        self.trace_clock_pool(PoolAction::Retrieve, clock, tracer);

        let data = self.instances.get_mut(instance);
        if let Err(err) = data.associate_with(storyboard, clock, element) {
            self.storyboard_clocks.release(clock);
            self.instances
                .release(instance, &mut self.storyboard_clocks, host);
            return Err(err);
        }
        for &target in self.store.targets(storyboard) {
            let target = self.store.target(target);
            for (key, animation) in target.animations() {
                self.resolved.clear();
                host.resolve_targets(element, target.selector(), key, &mut self.resolved);
                for &property in &self.resolved {
                    data.enlist(property, *animation);
                }
            }
        }

        let data = self.instances.get(instance);
        let enlistments = data.enlistments().len();
        if data.start(instance, &mut self.storyboard_clocks, host) {
            self.trace_clock_transition(clock, ClockEvent::Started, tracer);
        }
        self.running.push(RunningStoryboard {
            element,
            storyboard,
            instance,
        });
        tracer.storyboard(&StoryboardEvent {
            frame_index: self.frame_index,
            action: StoryboardAction::Begin,
            element,
            storyboard_slot: storyboard.index(),
            instance_slot: instance.index(),
            enlistments,
        });
        Ok(instance)
    }

    /// Stops `storyboard` on `element` and releases its instance and clock.
    ///
    /// Returns `false` if it was not playing there.
    pub fn stop_storyboard<H: PropertyHost + ?Sized>(
        &mut self,
        element: ElementId,
        storyboard: StoryboardId,
        host: &mut H,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let Some(position) = self
            .running
            .iter()
            .position(|r| r.element == element && r.storyboard == storyboard)
        else {
            return false;
        };
        let run = self.running.remove(position);
        self.release_run(run, StoryboardAction::Stop, host, tracer);
        true
    }

    /// Pauses `storyboard` on `element`.
    ///
    /// Returns `false` if it was not playing there or was already paused.
    pub fn pause_storyboard<H: PropertyHost + ?Sized>(
        &mut self,
        element: ElementId,
        storyboard: StoryboardId,
        host: &mut H,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let Some(instance) = self.running_instance(element, storyboard) else {
            return false;
        };
        let data = self.instances.get(instance);
        if !data.pause(&mut self.storyboard_clocks, host) {
            return false;
        }
        if let Some(clock) = data.clock() {
            self.trace_clock_transition(clock, ClockEvent::Paused, tracer);
        }
        self.trace_storyboard(element, storyboard, instance, StoryboardAction::Pause, tracer);
        true
    }

    /// Resumes a paused `storyboard` on `element`.
    ///
    /// Returns `false` if it was not playing there or was not paused.
    pub fn resume_storyboard<H: PropertyHost + ?Sized>(
        &mut self,
        element: ElementId,
        storyboard: StoryboardId,
        host: &mut H,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let Some(instance) = self.running_instance(element, storyboard) else {
            return false;
        };
        let data = self.instances.get(instance);
        if !data.resume(&mut self.storyboard_clocks, host) {
            return false;
        }
        if let Some(clock) = data.clock() {
            self.trace_clock_transition(clock, ClockEvent::Resumed, tracer);
        }
        self.trace_storyboard(element, storyboard, instance, StoryboardAction::Resume, tracer);
        true
    }

    // -- Simple clocks --

    /// Checks out a stopped simple clock.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::PoolExhausted`] when the pool is full.
    pub fn retrieve_simple_clock(
        &mut self,
        duration: f64,
        loop_behavior: LoopBehavior,
        tracer: &mut Tracer<'_>,
    ) -> Result<SimpleClockId, AnimationError> {
        let id = self.simple_clocks.retrieve(duration, loop_behavior)?;
        self.trace_simple_pool(PoolAction::Retrieve, id, tracer);
        Ok(id)
    }

    /// Returns a simple clock to the pool and clears the caller's handle.
    pub fn release_simple_clock(&mut self, id: &mut Option<SimpleClockId>, tracer: &mut Tracer<'_>) {
        if let Some(handle) = id.take() {
            self.simple_clocks.release(handle);
            self.trace_simple_pool(PoolAction::Release, handle, tracer);
        }
    }

    // -- Tick --

    /// Advances every clock and applies animated values for one UI tick.
    pub fn update<H: PropertyHost + ?Sized>(
        &mut self,
        time: FrameTime,
        host: &mut H,
        tracer: &mut Tracer<'_>,
    ) {
        self.simple_clocks.update(time);

        let instances = &self.instances;
        let store = &self.store;
        self.storyboard_clocks.update(time, |instance| {
            let storyboard = instances.try_get(instance)?.storyboard()?;
            store.try_storyboard(storyboard).map(Storyboard::timing)
        });

        let mut summary = TickSummaryBuilder::new(self.frame_index, time);
        self.instances.update(
            &self.storyboard_clocks,
            &self.store,
            host,
            &mut summary,
            tracer,
        );
        tracer.tick_summary(&summary.finish(
            self.storyboard_clocks.active(),
            self.simple_clocks.active(),
            self.instances.active(),
        ));
        self.frame_index += 1;
    }

    /// Stops every running storyboard and drops all pools.
    ///
    /// Simple clocks still checked out are dropped with their pool.
    pub fn dispose<H: PropertyHost + ?Sized>(&mut self, host: &mut H, tracer: &mut Tracer<'_>) {
        while let Some(run) = self.running.pop() {
            self.release_run(run, StoryboardAction::Stop, host, tracer);
        }
        self.instances.dispose();
        self.storyboard_clocks.dispose();
        self.simple_clocks.dispose();
    }

    // -- Internals --

    fn release_run<H: PropertyHost + ?Sized>(
        &mut self,
        run: RunningStoryboard,
        action: StoryboardAction,
        host: &mut H,
        tracer: &mut Tracer<'_>,
    ) {
        let data = self.instances.get(run.instance);
        let enlistments = data.enlistments().len();
        let clock = data.clock();
        if let Some(clock) = clock {
            if self.storyboard_clocks.get(clock).clock().state() != ClockState::Stopped {
                // Report before release; the event counts current subscribers.
                self.trace_clock_transition(clock, ClockEvent::Stopped, tracer);
            }
        }

        self.instances
            .release(run.instance, &mut self.storyboard_clocks, host);
        if let Some(clock) = clock {
            self.trace_clock_pool(PoolAction::Release, clock, tracer);
        }
        self.trace_instance_pool(PoolAction::Release, run.instance, tracer);
        tracer.storyboard(&StoryboardEvent {
            frame_index: self.frame_index,
            action,
            element: run.element,
            storyboard_slot: run.storyboard.index(),
            instance_slot: run.instance.index(),
            enlistments,
        });
    }

    fn trace_storyboard(
        &self,
        element: ElementId,
        storyboard: StoryboardId,
        instance: InstanceId,
        action: StoryboardAction,
        tracer: &mut Tracer<'_>,
    ) {
        tracer.storyboard(&StoryboardEvent {
            frame_index: self.frame_index,
            action,
            element,
            storyboard_slot: storyboard.index(),
            instance_slot: instance.index(),
            enlistments: self.instances.get(instance).enlistments().len(),
        });
    }

    fn trace_clock_transition(&self, clock: ClockId, event: ClockEvent, tracer: &mut Tracer<'_>) {
        tracer.clock_transition(&ClockTransitionEvent {
            frame_index: self.frame_index,
            clock_slot: clock.index(),
            event,
            subscribers: self.storyboard_clocks.get(clock).clock().subscribers().len(),
        });
    }

    fn trace_instance_pool(&self, action: PoolAction, id: InstanceId, tracer: &mut Tracer<'_>) {
        tracer.pool(&PoolEvent {
            pool: PoolKind::Instances,
            action,
            slot: id.index(),
            active: self.instances.active(),
            available: self.instances.available(),
        });
    }

    fn trace_clock_pool(&self, action: PoolAction, id: ClockId, tracer: &mut Tracer<'_>) {
        tracer.pool(&PoolEvent {
            pool: PoolKind::StoryboardClocks,
            action,
            slot: id.index(),
            active: self.storyboard_clocks.active(),
            available: self.storyboard_clocks.available(),
        });
    }

    fn trace_simple_pool(&self, action: PoolAction, id: SimpleClockId, tracer: &mut Tracer<'_>) {
        tracer.pool(&PoolEvent {
            pool: PoolKind::SimpleClocks,
            action,
            slot: id.index(),
            active: self.simple_clocks.active(),
            available: self.simple_clocks.available(),
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::animation::{AnimatedValue, Animation, Keyframe};
    use crate::animation::FillBehavior;
    use crate::clock::{ClockObserver, Subscription};
    use crate::storyboard::{AnimationId, AnimationKey, Selector};

    /// Every selector resolves to one property per key: `element * 100 +
    /// property name length`.
    #[derive(Default)]
    struct Host {
        applied: Vec<(PropertyId, Option<AnimatedValue>)>,
        notices: Vec<(&'static str, PropertyId)>,
    }

    impl ClockObserver for Host {
        fn clock_started(&mut self, subscriber: PropertyId) {
            self.notices.push(("started", subscriber));
        }

        fn clock_stopped(&mut self, subscriber: PropertyId) -> Subscription {
            self.notices.push(("stopped", subscriber));
            Subscription::Retain
        }
    }

    impl PropertyHost for Host {
        fn begin_storyboard(&mut self, property: PropertyId, _: AnimationId, _: InstanceId) {
            self.notices.push(("begin", property));
        }

        fn stop_storyboard(&mut self, property: PropertyId, _: AnimationId, _: InstanceId) {
            self.notices.push(("stop", property));
        }

        fn apply_animated_value(&mut self, property: PropertyId, value: Option<&AnimatedValue>) {
            self.applied.push((property, value.copied()));
        }
    }

    impl ElementTree for Host {
        fn resolve_targets(
            &self,
            element: ElementId,
            _: &Selector,
            key: &AnimationKey,
            out: &mut Vec<PropertyId>,
        ) {
            out.push(PropertyId(u64::from(element.0) * 100 + key.property().len() as u64));
        }
    }

    fn fade(store: &mut StoryboardStore, end: f64) -> (StoryboardId, AnimationId) {
        let storyboard = store.create_storyboard(LoopBehavior::None);
        let target = store.create_target(Selector::new("#item"));
        store.add_target(storyboard, target);
        let animation = store.create_animation(Animation::from_keyframes([
            Keyframe::new(0.0, 0.0_f64),
            Keyframe::new(end, 1.0),
        ]));
        store.set_animation(target, AnimationKey::new("Opacity"), animation);
        (storyboard, animation)
    }

    const OPACITY: PropertyId = PropertyId(100 + 7);

    #[test]
    fn begin_update_stop() {
        let mut cx = AnimationContext::default();
        let (storyboard, _) = fade(cx.store_mut(), 1000.0);
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        let instance = cx
            .begin_storyboard(ElementId(1), storyboard, &mut host, &mut tracer)
            .unwrap();
        assert_eq!(cx.running_instance(ElementId(1), storyboard), Some(instance));
        assert_eq!(cx.instances().get(instance).enlistments().len(), 1);

        cx.update(FrameTime::from_millis(250.0), &mut host, &mut tracer);
        assert_eq!(host.applied, [(OPACITY, Some(AnimatedValue::F64(0.25)))]);
        assert_eq!(cx.frame_index(), 1);

        assert!(cx.stop_storyboard(ElementId(1), storyboard, &mut host, &mut tracer));
        assert!(!cx.stop_storyboard(ElementId(1), storyboard, &mut host, &mut tracer));
        assert_eq!(cx.instances().active(), 0);
        assert_eq!(cx.storyboard_clocks().active(), 0);
    }

    #[test]
    fn host_hears_begin_before_start_and_stop_before_stopped() {
        let mut cx = AnimationContext::default();
        let (storyboard, _) = fade(cx.store_mut(), 1000.0);
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        cx.begin_storyboard(ElementId(1), storyboard, &mut host, &mut tracer)
            .unwrap();
        cx.stop_storyboard(ElementId(1), storyboard, &mut host, &mut tracer);
        assert_eq!(
            host.notices,
            [
                ("begin", OPACITY),
                ("started", OPACITY),
                ("stop", OPACITY),
                ("stopped", OPACITY),
            ]
        );
    }

    #[test]
    fn non_looping_storyboard_holds_its_end() {
        let mut cx = AnimationContext::default();
        let (storyboard, _) = fade(cx.store_mut(), 1000.0);
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        let instance = cx
            .begin_storyboard(ElementId(1), storyboard, &mut host, &mut tracer)
            .unwrap();
        cx.update(FrameTime::from_millis(1500.0), &mut host, &mut tracer);
        let clock = cx.instances().get(instance).clock().unwrap();
        assert_eq!(cx.storyboard_clocks().get(clock).clock().elapsed(), 1000.0);
        assert_eq!(host.applied, [(OPACITY, Some(AnimatedValue::F64(1.0)))]);
    }

    #[test]
    fn looping_and_reversing_storyboards() {
        let mut cx = AnimationContext::default();
        let (looping, _) = fade(cx.store_mut(), 1000.0);
        cx.store_mut().set_loop_behavior(looping, LoopBehavior::Loop);
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        cx.begin_storyboard(ElementId(1), looping, &mut host, &mut tracer)
            .unwrap();
        cx.update(FrameTime::from_millis(1250.0), &mut host, &mut tracer);
        assert_eq!(host.applied, [(OPACITY, Some(AnimatedValue::F64(0.25)))]);

        cx.store_mut().set_loop_behavior(looping, LoopBehavior::Reverse);
        cx.begin_storyboard(ElementId(1), looping, &mut host, &mut tracer)
            .unwrap();
        host.applied.clear();
        cx.update(FrameTime::from_millis(1250.0), &mut host, &mut tracer);
        assert_eq!(host.applied, [(OPACITY, Some(AnimatedValue::F64(0.75)))]);
    }

    #[test]
    fn later_instance_wins_shared_property() {
        let mut cx = AnimationContext::default();
        let (first, _) = fade(cx.store_mut(), 1000.0);
        let (second, animation) = fade(cx.store_mut(), 1000.0);
        cx.store_mut()
            .add_keyframe(animation, Keyframe::new(1000.0, 20.0_f64))
            .unwrap();
        cx.store_mut()
            .remove_keyframe(animation, &Keyframe::new(1000.0, 1.0_f64))
            .unwrap();
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        cx.begin_storyboard(ElementId(1), first, &mut host, &mut tracer)
            .unwrap();
        cx.begin_storyboard(ElementId(1), second, &mut host, &mut tracer)
            .unwrap();
        cx.update(FrameTime::from_millis(500.0), &mut host, &mut tracer);
        assert_eq!(
            host.applied,
            [(OPACITY, Some(AnimatedValue::F64(10.0)))],
            "one delivery per property, from the later instance"
        );
    }

    #[test]
    fn missing_value_falls_back_to_other_contributor() {
        let mut cx = AnimationContext::default();
        let (first, _) = fade(cx.store_mut(), 1000.0);
        let second = cx.store_mut().create_storyboard(LoopBehavior::None);
        let target = cx.store_mut().create_target(Selector::new("#item"));
        cx.store_mut().add_target(second, target);
        let late = cx.store_mut().create_animation(
            Animation::from_keyframes([Keyframe::new(300.0, 5.0_f64), Keyframe::new(400.0, 6.0)])
                .with_fill_behavior(FillBehavior::Stop),
        );
        cx.store_mut()
            .set_animation(target, AnimationKey::new("Opacity"), late);
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        cx.begin_storyboard(ElementId(1), first, &mut host, &mut tracer)
            .unwrap();
        cx.begin_storyboard(ElementId(1), second, &mut host, &mut tracer)
            .unwrap();
        cx.update(FrameTime::from_millis(100.0), &mut host, &mut tracer);
        assert_eq!(host.applied, [(OPACITY, Some(AnimatedValue::F64(0.1)))]);

        cx.stop_storyboard(ElementId(1), first, &mut host, &mut tracer);
        host.applied.clear();
        cx.update(FrameTime::from_millis(100.0), &mut host, &mut tracer);
        assert_eq!(host.applied, [(OPACITY, None)], "nothing contributes before 300ms");
    }

    #[test]
    fn begin_again_replaces_instance() {
        let mut cx = AnimationContext::default();
        let (storyboard, _) = fade(cx.store_mut(), 1000.0);
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        cx.begin_storyboard(ElementId(1), storyboard, &mut host, &mut tracer)
            .unwrap();
        cx.update(FrameTime::from_millis(500.0), &mut host, &mut tracer);
        cx.begin_storyboard(ElementId(1), storyboard, &mut host, &mut tracer)
            .unwrap();
        assert_eq!(cx.running().len(), 1);
        assert_eq!(cx.instances().active(), 1);

        host.applied.clear();
        cx.update(FrameTime::from_millis(100.0), &mut host, &mut tracer);
        assert_eq!(
            host.applied,
            [(OPACITY, Some(AnimatedValue::F64(0.1)))],
            "restarted from zero"
        );
    }

    #[test]
    fn clock_exhaustion_rolls_back_instance() {
        let config = ContextConfig {
            storyboard_clocks: PoolConfig::new(1, 1),
            ..ContextConfig::DEFAULT
        };
        let mut cx = AnimationContext::new(config);
        let (storyboard, _) = fade(cx.store_mut(), 1000.0);
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        cx.begin_storyboard(ElementId(1), storyboard, &mut host, &mut tracer)
            .unwrap();
        assert_eq!(
            cx.begin_storyboard(ElementId(2), storyboard, &mut host, &mut tracer),
            Err(AnimationError::PoolExhausted { capacity: 1 })
        );
        assert_eq!(cx.instances().active(), 1, "failed begin releases its instance");
        assert_eq!(cx.running().len(), 1);
    }

    #[test]
    fn paused_storyboard_holds_value() {
        let mut cx = AnimationContext::default();
        let (storyboard, _) = fade(cx.store_mut(), 1000.0);
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        cx.begin_storyboard(ElementId(1), storyboard, &mut host, &mut tracer)
            .unwrap();
        cx.update(FrameTime::from_millis(400.0), &mut host, &mut tracer);
        assert!(cx.pause_storyboard(ElementId(1), storyboard, &mut host, &mut tracer));
        assert!(!cx.pause_storyboard(ElementId(1), storyboard, &mut host, &mut tracer));
        host.applied.clear();
        cx.update(FrameTime::from_millis(400.0), &mut host, &mut tracer);
        assert_eq!(host.applied, [(OPACITY, Some(AnimatedValue::F64(0.4)))]);

        assert!(cx.resume_storyboard(ElementId(1), storyboard, &mut host, &mut tracer));
        host.applied.clear();
        cx.update(FrameTime::from_millis(100.0), &mut host, &mut tracer);
        assert_eq!(host.applied, [(OPACITY, Some(AnimatedValue::F64(0.5)))]);
    }

    #[test]
    fn duration_changes_apply_while_playing() {
        let mut cx = AnimationContext::default();
        let (storyboard, animation) = fade(cx.store_mut(), 1000.0);
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        cx.begin_storyboard(ElementId(1), storyboard, &mut host, &mut tracer)
            .unwrap();
        cx.update(FrameTime::from_millis(900.0), &mut host, &mut tracer);
        cx.store_mut()
            .add_keyframe(animation, Keyframe::new(2000.0, 0.0_f64))
            .unwrap();
        cx.update(FrameTime::from_millis(600.0), &mut host, &mut tracer);
        let instance = cx.running_instance(ElementId(1), storyboard).unwrap();
        let clock = cx.instances().get(instance).clock().unwrap();
        assert_eq!(cx.storyboard_clocks().get(clock).clock().elapsed(), 1500.0);
    }

    #[test]
    fn simple_clocks_are_swept() {
        let mut cx = AnimationContext::default();
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        let mut id = Some(
            cx.retrieve_simple_clock(100.0, LoopBehavior::Loop, &mut tracer)
                .unwrap(),
        );
        let handle = id.unwrap();
        cx.simple_clocks_mut()
            .get_mut(handle)
            .start(&mut crate::clock::NoopObserver);
        cx.update(FrameTime::from_millis(250.0), &mut host, &mut tracer);
        assert!((cx.simple_clocks().get(handle).clock().elapsed() - 50.0).abs() < 1e-9);

        cx.release_simple_clock(&mut id, &mut tracer);
        assert_eq!(id, None);
        assert_eq!(cx.simple_clocks().active(), 0);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_sees_pools_and_storyboards() {
        use crate::trace::{TickSummary, TraceSink};

        #[derive(Default)]
        struct Sink {
            pools: Vec<(PoolKind, PoolAction)>,
            storyboards: Vec<StoryboardAction>,
            clocks: Vec<ClockEvent>,
            ticks: Vec<(u64, usize)>,
        }
        impl TraceSink for Sink {
            fn on_pool(&mut self, e: &PoolEvent) {
                self.pools.push((e.pool, e.action));
            }
            fn on_storyboard(&mut self, e: &StoryboardEvent) {
                self.storyboards.push(e.action);
            }
            fn on_clock_transition(&mut self, e: &ClockTransitionEvent) {
                self.clocks.push(e.event);
            }
            fn on_tick_summary(&mut self, s: &TickSummary) {
                self.ticks.push((s.frame_index, s.applied_values));
            }
        }

        let mut cx = AnimationContext::default();
        let (storyboard, _) = fade(cx.store_mut(), 1000.0);
        let mut host = Host::default();
        let mut sink = Sink::default();
        let mut tracer = Tracer::new(&mut sink);

        cx.begin_storyboard(ElementId(1), storyboard, &mut host, &mut tracer)
            .unwrap();
        cx.update(FrameTime::from_millis(100.0), &mut host, &mut tracer);
        cx.stop_storyboard(ElementId(1), storyboard, &mut host, &mut tracer);
        drop(tracer);

        assert_eq!(
            sink.pools,
            [
                (PoolKind::Instances, PoolAction::Retrieve),
                (PoolKind::StoryboardClocks, PoolAction::Retrieve),
                (PoolKind::StoryboardClocks, PoolAction::Release),
                (PoolKind::Instances, PoolAction::Release),
            ]
        );
        assert_eq!(sink.storyboards, [StoryboardAction::Begin, StoryboardAction::Stop]);
        assert_eq!(sink.clocks, [ClockEvent::Started, ClockEvent::Stopped]);
        assert_eq!(sink.ticks, [(0, 1)]);
    }

    #[test]
    fn handles_from_before_dispose_stay_stale() {
        let mut cx = AnimationContext::default();
        let (storyboard, _) = fade(cx.store_mut(), 1000.0);
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        let old = cx
            .begin_storyboard(ElementId(1), storyboard, &mut host, &mut tracer)
            .unwrap();
        let old_simple = cx
            .retrieve_simple_clock(100.0, LoopBehavior::None, &mut tracer)
            .unwrap();
        cx.dispose(&mut host, &mut tracer);

        let new = cx
            .begin_storyboard(ElementId(2), storyboard, &mut host, &mut tracer)
            .unwrap();
        let new_simple = cx
            .retrieve_simple_clock(70.0, LoopBehavior::None, &mut tracer)
            .unwrap();
        assert_eq!(new.index(), old.index(), "slot is reused");
        assert!(!cx.instances().contains(old));
        assert!(cx.instances().try_get(old).is_none());
        assert_eq!(cx.instances().get(new).element(), Some(ElementId(2)));
        assert_eq!(new_simple.index(), old_simple.index());
        assert!(!cx.simple_clocks().contains(old_simple));
        assert_eq!(cx.simple_clocks().get(new_simple).duration(), 70.0);
    }

    #[test]
    fn dispose_stops_everything() {
        let mut cx = AnimationContext::default();
        let (storyboard, _) = fade(cx.store_mut(), 1000.0);
        let mut host = Host::default();
        let mut tracer = Tracer::none();

        cx.begin_storyboard(ElementId(1), storyboard, &mut host, &mut tracer)
            .unwrap();
        cx.begin_storyboard(ElementId(2), storyboard, &mut host, &mut tracer)
            .unwrap();
        cx.dispose(&mut host, &mut tracer);
        assert!(cx.running().is_empty());
        assert_eq!(
            (cx.instances().active(), cx.instances().available()),
            (0, 0),
            "pools dropped"
        );
    }
}
