// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pool managers for storyboard clocks, storyboard instances, and simple
//! clocks.
//!
//! Each manager wraps a [`Pool`] that is created on first use, attaches and
//! detaches association state around retrieve and release, and sweeps its
//! active objects once per tick. The managers are owned by an
//! [`AnimationContext`](crate::context::AnimationContext).

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::animation::AnimatedValue;
use crate::clock::{ClockState, ClockTiming, LoopBehavior, SimpleClock, StoryboardClock};
use crate::error::AnimationError;
use crate::handle::{Handle, PropertyId};
use crate::instance::{InstanceId, PropertyHost, StoryboardInstance};
use crate::pool::{Pool, PoolConfig};
use crate::storyboard::StoryboardStore;
use crate::time::FrameTime;
use crate::trace::{TickSummaryBuilder, Tracer};

/// Handle to a pooled [`StoryboardClock`].
pub type ClockId = Handle<StoryboardClock>;

/// Handle to a pooled [`SimpleClock`].
pub type SimpleClockId = Handle<SimpleClock>;

/// A [`Pool`] that is created the first time an object is retrieved.
#[derive(Debug)]
struct LazyPool<T> {
    kind: &'static str,
    config: PoolConfig,
    factory: fn() -> T,
    pool: Option<Pool<T>>,
    /// First generation for the next pool, past every handle already issued.
    next_generation: u32,
}

impl<T> LazyPool<T> {
    const fn new(kind: &'static str, config: PoolConfig, factory: fn() -> T) -> Self {
        Self {
            kind,
            config,
            factory,
            pool: None,
            next_generation: 0,
        }
    }

    fn retrieve(&mut self) -> Result<Handle<T>, AnimationError> {
        let (config, factory, generation) = (self.config, self.factory, self.next_generation);
        self.pool
            .get_or_insert_with(|| Pool::with_first_generation(config, factory, generation))
            .retrieve()
    }

    fn dispose(&mut self) {
        if let Some(pool) = self.pool.take() {
            self.next_generation = pool.next_generation();
        }
    }

    fn pool(&self) -> &Pool<T> {
        match &self.pool {
            Some(pool) => pool,
            None => panic!("stale pool handle: {} pool is not initialized", self.kind),
        }
    }

    fn pool_mut(&mut self) -> &mut Pool<T> {
        match &mut self.pool {
            Some(pool) => pool,
            None => panic!("stale pool handle: {} pool is not initialized", self.kind),
        }
    }

    fn contains(&self, handle: Handle<T>) -> bool {
        self.pool.as_ref().is_some_and(|pool| pool.contains(handle))
    }

    fn try_get(&self, handle: Handle<T>) -> Option<&T> {
        self.pool.as_ref().and_then(|pool| pool.try_get(handle))
    }

    fn active(&self) -> usize {
        self.pool.as_ref().map_or(0, Pool::active)
    }

    fn available(&self) -> usize {
        self.pool.as_ref().map_or(0, Pool::available)
    }

    fn iter_active(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        self.pool.iter().flat_map(|pool| pool.iter_active())
    }

    fn update(&mut self, f: impl FnMut(Handle<T>, &mut T)) {
        if let Some(pool) = &mut self.pool {
            pool.update(f);
        }
    }
}

// ---------------------------------------------------------------------------
// StoryboardClockPool
// ---------------------------------------------------------------------------

/// Pooled [`StoryboardClock`]s.
#[derive(Debug)]
pub struct StoryboardClockPool {
    inner: LazyPool<StoryboardClock>,
}

impl StoryboardClockPool {
    /// Creates a manager; the pool itself is created on first retrieve.
    #[must_use]
    pub const fn new(config: PoolConfig) -> Self {
        Self {
            inner: LazyPool::new("storyboard clock", config, StoryboardClock::new),
        }
    }

    /// Checks out a stopped clock associated with `instance`.
    pub fn retrieve(&mut self, instance: InstanceId) -> Result<ClockId, AnimationError> {
        let id = self.inner.retrieve()?;
        self.inner.pool_mut().get_mut(id).associate(instance);
        Ok(id)
    }

    /// Clears the clock's association and subscribers and returns it to the
    /// pool without notifying anyone.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn release(&mut self, id: ClockId) {
        let pool = self.inner.pool_mut();
        pool.get_mut(id).reset();
        pool.release(id);
    }

    /// Releases the clock in `id`, if any, and clears the caller's handle.
    pub fn release_ref(&mut self, id: &mut Option<ClockId>) {
        if let Some(handle) = id.take() {
            self.release(handle);
        }
    }

    /// Returns whether `id` refers to a checked-out clock.
    #[must_use]
    pub fn contains(&self, id: ClockId) -> bool {
        self.inner.contains(id)
    }

    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn get(&self, id: ClockId) -> &StoryboardClock {
        self.inner.pool().get(id)
    }

    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn get_mut(&mut self, id: ClockId) -> &mut StoryboardClock {
        self.inner.pool_mut().get_mut(id)
    }

    /// Returns the clock, or `None` if the handle is stale.
    #[must_use]
    pub fn try_get(&self, id: ClockId) -> Option<&StoryboardClock> {
        self.inner.try_get(id)
    }

    /// Advances every checked-out clock in slot order.
    ///
    /// `timing` resolves each clock's instance to the timing of the
    /// storyboard it plays; `None` leaves the clock where it is.
    pub fn update(&mut self, time: FrameTime, mut timing: impl FnMut(InstanceId) -> Option<ClockTiming>) {
        self.inner.update(|_, clock| {
            let resolved = clock.instance().and_then(&mut timing);
            clock.update(time, resolved);
        });
    }

    /// Number of checked-out clocks.
    #[must_use]
    pub fn active(&self) -> usize {
        self.inner.active()
    }

    /// Number of idle clocks.
    #[must_use]
    pub fn available(&self) -> usize {
        self.inner.available()
    }

    /// Drops the pool. Outstanding handles become stale, and stay stale
    /// once the pool is recreated.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }
}

// ---------------------------------------------------------------------------
// StoryboardInstancePool
// ---------------------------------------------------------------------------

/// Pooled [`StoryboardInstance`]s, plus the per-tick application of their
/// animated values.
#[derive(Debug)]
pub struct StoryboardInstancePool {
    inner: LazyPool<StoryboardInstance>,
    /// Per-tick contributions in first-contribution order.
    contributions: Vec<(PropertyId, Option<AnimatedValue>)>,
    /// Position of each property in `contributions`.
    index: HashMap<PropertyId, usize>,
}

impl StoryboardInstancePool {
    /// Creates a manager; the pool itself is created on first retrieve.
    #[must_use]
    pub fn new(config: PoolConfig) -> Self {
        Self {
            inner: LazyPool::new("storyboard instance", config, StoryboardInstance::new),
            contributions: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Checks out an unassociated instance.
    pub fn retrieve(&mut self) -> Result<InstanceId, AnimationError> {
        self.inner.retrieve()
    }

    /// Disassociates the instance (stopping it and releasing its clock) and
    /// returns it to the pool.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn release<H: PropertyHost + ?Sized>(
        &mut self,
        id: InstanceId,
        clocks: &mut StoryboardClockPool,
        host: &mut H,
    ) {
        let pool = self.inner.pool_mut();
        pool.get_mut(id).disassociate(id, clocks, host);
        pool.release(id);
    }

    /// Releases the instance in `id`, if any, and clears the caller's handle.
    pub fn release_ref<H: PropertyHost + ?Sized>(
        &mut self,
        id: &mut Option<InstanceId>,
        clocks: &mut StoryboardClockPool,
        host: &mut H,
    ) {
        if let Some(handle) = id.take() {
            self.release(handle, clocks, host);
        }
    }

    /// Returns whether `id` refers to a checked-out instance.
    #[must_use]
    pub fn contains(&self, id: InstanceId) -> bool {
        self.inner.contains(id)
    }

    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn get(&self, id: InstanceId) -> &StoryboardInstance {
        self.inner.pool().get(id)
    }

    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn get_mut(&mut self, id: InstanceId) -> &mut StoryboardInstance {
        self.inner.pool_mut().get_mut(id)
    }

    /// Returns the instance, or `None` if the handle is stale.
    #[must_use]
    pub fn try_get(&self, id: InstanceId) -> Option<&StoryboardInstance> {
        self.inner.try_get(id)
    }

    /// Evaluates every running instance and delivers the resulting values.
    ///
    /// Instances are visited in slot order and enlistments in enlistment
    /// order. When several enlistments animate the same property, the last
    /// value wins; "no value" is delivered only if none of them produced
    /// one. Instances whose clock is stopped contribute nothing.
    pub fn update<H: PropertyHost + ?Sized>(
        &mut self,
        clocks: &StoryboardClockPool,
        store: &StoryboardStore,
        host: &mut H,
        summary: &mut TickSummaryBuilder,
        tracer: &mut Tracer<'_>,
    ) {
        self.contributions.clear();
        self.index.clear();

        for id in self.inner.iter_active() {
            let instance = self.inner.pool().get(id);
            let Some(clock) = instance.clock().and_then(|c| clocks.try_get(c)) else {
                continue;
            };
            if clock.clock().state() == ClockState::Stopped {
                continue;
            }
            let position = clock.clock().elapsed();
            for enlistment in instance.enlistments() {
                let value = store.evaluate(enlistment.animation, position);
                match self.index.get(&enlistment.property) {
                    Some(&slot) => {
                        if value.is_some() {
                            self.contributions[slot].1 = value;
                        }
                    }
                    None => {
                        self.index
                            .insert(enlistment.property, self.contributions.len());
                        self.contributions.push((enlistment.property, value));
                    }
                }
            }
        }

        for (property, value) in &self.contributions {
            host.apply_animated_value(*property, value.as_ref());
            summary.record_value(value.is_some());
            #[cfg(feature = "trace-rich")]
            tracer.property_value(&crate::trace::PropertyValueEvent {
                frame_index: summary.frame_index(),
                property: *property,
                contributed: value.is_some(),
            });
        }
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = tracer;
        }
    }

    /// Handles of checked-out instances in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.inner.iter_active()
    }

    /// Number of checked-out instances.
    #[must_use]
    pub fn active(&self) -> usize {
        self.inner.active()
    }

    /// Number of idle instances.
    #[must_use]
    pub fn available(&self) -> usize {
        self.inner.available()
    }

    /// Drops the pool. Outstanding handles become stale, and stay stale
    /// once the pool is recreated.
    pub fn dispose(&mut self) {
        self.inner.dispose();
        self.contributions = Vec::new();
        self.index = HashMap::new();
    }
}

// ---------------------------------------------------------------------------
// SimpleClockPool
// ---------------------------------------------------------------------------

/// Pooled [`SimpleClock`]s.
#[derive(Debug)]
pub struct SimpleClockPool {
    inner: LazyPool<SimpleClock>,
}

impl SimpleClockPool {
    /// Creates a manager; the pool itself is created on first retrieve.
    #[must_use]
    pub const fn new(config: PoolConfig) -> Self {
        Self {
            inner: LazyPool::new("simple clock", config, SimpleClock::default),
        }
    }

    /// Checks out a stopped clock with the given timing.
    pub fn retrieve(
        &mut self,
        duration: f64,
        loop_behavior: LoopBehavior,
    ) -> Result<SimpleClockId, AnimationError> {
        let id = self.inner.retrieve()?;
        self.inner
            .pool_mut()
            .get_mut(id)
            .set_timing(ClockTiming::new(duration, loop_behavior));
        Ok(id)
    }

    /// Resets the clock silently and returns it to the pool.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn release(&mut self, id: SimpleClockId) {
        let pool = self.inner.pool_mut();
        pool.get_mut(id).reset();
        pool.release(id);
    }

    /// Releases the clock in `id`, if any, and clears the caller's handle.
    pub fn release_ref(&mut self, id: &mut Option<SimpleClockId>) {
        if let Some(handle) = id.take() {
            self.release(handle);
        }
    }

    /// Returns whether `id` refers to a checked-out clock.
    #[must_use]
    pub fn contains(&self, id: SimpleClockId) -> bool {
        self.inner.contains(id)
    }

    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn get(&self, id: SimpleClockId) -> &SimpleClock {
        self.inner.pool().get(id)
    }

    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn get_mut(&mut self, id: SimpleClockId) -> &mut SimpleClock {
        self.inner.pool_mut().get_mut(id)
    }

    /// Advances every checked-out clock in slot order.
    pub fn update(&mut self, time: FrameTime) {
        self.inner.update(|_, clock| clock.update(time));
    }

    /// Number of checked-out clocks.
    #[must_use]
    pub fn active(&self) -> usize {
        self.inner.active()
    }

    /// Number of idle clocks.
    #[must_use]
    pub fn available(&self) -> usize {
        self.inner.available()
    }

    /// Drops the pool. Outstanding handles become stale, and stay stale
    /// once the pool is recreated.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::NoopObserver;

    #[test]
    fn pools_start_uninitialized() {
        let clocks = StoryboardClockPool::new(PoolConfig::DEFAULT);
        assert_eq!((clocks.active(), clocks.available()), (0, 0));
    }

    #[test]
    fn retrieve_initializes_with_default_capacity() {
        let mut clocks = StoryboardClockPool::new(PoolConfig::DEFAULT);
        let id = clocks.retrieve(Handle::new(4, 0)).unwrap();
        assert_eq!((clocks.active(), clocks.available()), (1, 31));
        assert_eq!(clocks.get(id).instance(), Some(Handle::new(4, 0)));
    }

    #[test]
    fn release_ref_clears_handle_and_association() {
        let mut clocks = StoryboardClockPool::new(PoolConfig::new(2, 2));
        let mut id = Some(clocks.retrieve(Handle::new(0, 0)).unwrap());
        let raw = id.unwrap();
        clocks.get_mut(raw).clock_mut().start(&mut NoopObserver);
        clocks.release_ref(&mut id);
        assert_eq!(id, None);
        assert_eq!((clocks.active(), clocks.available()), (0, 2));
        assert!(!clocks.contains(raw));

        // The recycled clock comes back pristine.
        let again = clocks.retrieve(Handle::new(1, 0)).unwrap();
        assert_eq!(clocks.get(again).clock().state(), ClockState::Stopped);
        assert_eq!(clocks.get(again).instance(), Some(Handle::new(1, 0)));

        clocks.release_ref(&mut None);
    }

    #[test]
    fn exhausted_pool_errors() {
        let mut clocks = SimpleClockPool::new(PoolConfig::new(1, 1));
        clocks.retrieve(100.0, LoopBehavior::None).unwrap();
        assert_eq!(
            clocks.retrieve(100.0, LoopBehavior::None),
            Err(AnimationError::PoolExhausted { capacity: 1 })
        );
    }

    #[test]
    fn simple_clock_timing_is_resupplied() {
        let mut clocks = SimpleClockPool::new(PoolConfig::new(1, 1));
        let first = clocks.retrieve(100.0, LoopBehavior::None).unwrap();
        clocks.release(first);
        let second = clocks.retrieve(500.0, LoopBehavior::Loop).unwrap();
        assert_eq!(
            clocks.get(second).timing(),
            ClockTiming::new(500.0, LoopBehavior::Loop)
        );

        clocks.get_mut(second).start(&mut NoopObserver);
        clocks.update(FrameTime::from_millis(600.0));
        assert!((clocks.get(second).clock().elapsed() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn storyboard_clock_update_uses_resolved_timing() {
        let mut clocks = StoryboardClockPool::new(PoolConfig::new(2, 2));
        let a = clocks.retrieve(Handle::new(0, 0)).unwrap();
        let b = clocks.retrieve(Handle::new(1, 0)).unwrap();
        clocks.get_mut(a).clock_mut().start(&mut NoopObserver);
        clocks.get_mut(b).clock_mut().start(&mut NoopObserver);
        clocks.update(FrameTime::from_millis(300.0), |instance: InstanceId| {
            (instance.index() == 0).then_some(ClockTiming::new(200.0, LoopBehavior::None))
        });
        assert_eq!(clocks.get(a).clock().elapsed(), 200.0);
        assert_eq!(clocks.get(b).clock().elapsed(), 0.0, "no timing, no movement");
    }

    #[test]
    #[should_panic(expected = "stale pool handle")]
    fn uninitialized_lookup_panics() {
        let clocks = SimpleClockPool::new(PoolConfig::DEFAULT);
        let _ = clocks.get(Handle::new(0, 0));
    }
}
