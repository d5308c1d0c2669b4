// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded object pools with generational handles.
//!
//! A [`Pool`] preallocates objects and hands out [`Handle`]s to them.
//! Releasing a handle returns the object for reuse and bumps the slot's
//! generation, so a kept copy of the released handle is detected as stale.
//!
//! Pools grow on demand up to [`PoolConfig::max_capacity`]; past that,
//! [`Pool::retrieve`] fails with [`AnimationError::PoolExhausted`].

use alloc::vec::Vec;

use crate::error::AnimationError;
use crate::handle::Handle;

/// Sizing of a [`Pool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolConfig {
    /// Objects created up front.
    pub initial_capacity: usize,
    /// Hard ceiling on the number of objects the pool ever creates.
    pub max_capacity: usize,
}

impl PoolConfig {
    /// 32 objects up front, at most 256.
    pub const DEFAULT: Self = Self {
        initial_capacity: 32,
        max_capacity: 256,
    };

    /// Creates a config. `initial_capacity` is clamped to `max_capacity`.
    #[inline]
    #[must_use]
    pub const fn new(initial_capacity: usize, max_capacity: usize) -> Self {
        let initial_capacity = if initial_capacity > max_capacity {
            max_capacity
        } else {
            initial_capacity
        };
        Self {
            initial_capacity,
            max_capacity,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A bounded pool of reusable objects.
#[derive(Debug)]
pub struct Pool<T> {
    config: PoolConfig,
    slots: Vec<T>,
    generation: Vec<u32>,
    active: Vec<bool>,
    /// Available slots; the next one handed out is at the end.
    free_list: Vec<u32>,
    active_count: usize,
    /// Generation given to newly created slots.
    first_generation: u32,
    factory: fn() -> T,
}

impl<T> Pool<T> {
    /// Creates a pool, constructing `config.initial_capacity` objects with
    /// `factory`.
    #[must_use]
    pub fn new(config: PoolConfig, factory: fn() -> T) -> Self {
        Self::with_first_generation(config, factory, 0)
    }

    /// Creates a pool whose slots start at `first_generation`, so handles
    /// from a pool it replaces never match.
    #[must_use]
    pub(crate) fn with_first_generation(
        config: PoolConfig,
        factory: fn() -> T,
        first_generation: u32,
    ) -> Self {
        let initial = config.initial_capacity.min(config.max_capacity);
        let mut pool = Self {
            config,
            slots: Vec::with_capacity(initial),
            generation: Vec::with_capacity(initial),
            active: Vec::with_capacity(initial),
            free_list: Vec::with_capacity(initial),
            active_count: 0,
            first_generation,
            factory,
        };
        for _ in 0..initial {
            pool.grow();
        }
        // Hand out low slots first.
        pool.free_list.reverse();
        pool
    }

    /// Returns the pool's sizing.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> PoolConfig {
        self.config
    }

    /// Checks out an object.
    ///
    /// Returns [`AnimationError::PoolExhausted`] when every object is checked
    /// out and the pool is at its maximum capacity.
    pub fn retrieve(&mut self) -> Result<Handle<T>, AnimationError> {
        if self.free_list.is_empty() {
            if self.slots.len() >= self.config.max_capacity {
                return Err(AnimationError::PoolExhausted {
                    capacity: self.config.max_capacity,
                });
            }
            self.grow();
        }
        let Some(idx) = self.free_list.pop() else {
            unreachable!("free list was refilled above");
        };
        self.active[idx as usize] = true;
        self.active_count += 1;
        Ok(Handle::new(idx, self.generation[idx as usize]))
    }

    /// Returns an object to the pool.
    ///
    /// The caller is responsible for resetting the object's state first.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn release(&mut self, handle: Handle<T>) {
        self.validate(handle);
        let idx = handle.idx as usize;
        self.active[idx] = false;
        self.generation[idx] = self.generation[idx].wrapping_add(1);
        self.active_count -= 1;
        self.free_list.push(handle.idx);
    }

    /// Returns whether `handle` refers to a checked-out object.
    #[must_use]
    pub fn contains(&self, handle: Handle<T>) -> bool {
        let idx = handle.idx as usize;
        idx < self.slots.len() && self.active[idx] && self.generation[idx] == handle.generation
    }

    /// Returns the object behind `handle`, or `None` if the handle is stale.
    #[must_use]
    pub fn try_get(&self, handle: Handle<T>) -> Option<&T> {
        self.contains(handle).then(|| &self.slots[handle.idx as usize])
    }

    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn get(&self, handle: Handle<T>) -> &T {
        self.validate(handle);
        &self.slots[handle.idx as usize]
    }

    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn get_mut(&mut self, handle: Handle<T>) -> &mut T {
        self.validate(handle);
        &mut self.slots[handle.idx as usize]
    }

    /// Number of checked-out objects.
    #[inline]
    #[must_use]
    pub const fn active(&self) -> usize {
        self.active_count
    }

    /// Number of objects created but not checked out.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.free_list.len()
    }

    /// Number of objects created so far.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// A generation no handle of this pool has carried yet.
    pub(crate) fn next_generation(&self) -> u32 {
        self.generation
            .iter()
            .copied()
            .max()
            .map_or(self.first_generation, |generation| generation.wrapping_add(1))
    }

    /// Visits every checked-out object in slot order.
    pub fn update(&mut self, mut f: impl FnMut(Handle<T>, &mut T)) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if self.active[idx] {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "slot count is bounded by u32 handles"
                )]
                let handle = Handle::new(idx as u32, self.generation[idx]);
                f(handle, slot);
            }
        }
    }

    /// Iterates over the handles of checked-out objects in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        self.active
            .iter()
            .zip(&self.generation)
            .enumerate()
            .filter(|(_, (active, _))| **active)
            .map(|(idx, (_, generation))| {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "slot count is bounded by u32 handles"
                )]
                let idx = idx as u32;
                Handle::new(idx, *generation)
            })
    }

    fn grow(&mut self) {
        let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        assert!(idx != u32::MAX, "pool index space exhausted");
        self.slots.push((self.factory)());
        self.generation.push(self.first_generation);
        self.active.push(false);
        self.free_list.push(idx);
    }

    fn validate(&self, handle: Handle<T>) {
        assert!(
            self.contains(handle),
            "stale pool handle: {handle:?} (current gen: {})",
            self.generation
                .get(handle.idx as usize)
                .copied()
                .unwrap_or(u32::MAX)
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn zero() -> u32 {
        0
    }

    #[test]
    fn config_clamps_initial() {
        let config = PoolConfig::new(64, 8);
        assert_eq!(config.initial_capacity, 8);
        assert_eq!(PoolConfig::default(), PoolConfig::new(32, 256));
    }

    #[test]
    fn accounting_through_retrieve_and_release() {
        let mut pool = Pool::new(PoolConfig::new(4, 8), zero);
        assert_eq!((pool.active(), pool.available(), pool.capacity()), (0, 4, 4));

        let handles: Vec<_> = (0..3).map(|_| pool.retrieve().unwrap()).collect();
        assert_eq!((pool.active(), pool.available()), (3, 1));
        assert_eq!(handles[0].index(), 0, "low slots first");

        pool.release(handles[1]);
        assert_eq!((pool.active(), pool.available()), (2, 2));
        assert!(!pool.contains(handles[1]));
        assert!(pool.try_get(handles[1]).is_none());
    }

    #[test]
    fn filling_initial_capacity_leaves_nothing_available() {
        let mut pool = Pool::new(PoolConfig::new(5, 16), zero);
        let handles: Vec<_> = (0..5).map(|_| pool.retrieve().unwrap()).collect();
        assert_eq!((pool.active(), pool.available()), (5, 0));
        assert_eq!(pool.capacity(), 5, "no growth before the free list runs dry");

        pool.release(handles[2]);
        assert_eq!((pool.active(), pool.available()), (4, 1));
    }

    #[test]
    fn replacement_pool_starts_past_old_generations() {
        let mut old = Pool::new(PoolConfig::new(2, 2), zero);
        let a = old.retrieve().unwrap();
        old.release(a);
        let kept = old.retrieve().unwrap();
        assert_eq!(old.next_generation(), 2);

        let mut fresh =
            Pool::with_first_generation(PoolConfig::new(2, 4), zero, old.next_generation());
        let b = fresh.retrieve().unwrap();
        assert_eq!(b.index(), kept.index());
        assert!(!fresh.contains(kept), "handle from the replaced pool is stale");
        assert!(!fresh.contains(a));
        for _ in 0..3 {
            fresh.retrieve().unwrap();
        }
        assert_eq!(fresh.capacity(), 4);
        assert_eq!(fresh.iter_active().map(|h| h.generation()).max(), Some(2));
    }

    #[test]
    fn grows_until_max_then_errors() {
        let mut pool = Pool::new(PoolConfig::new(1, 3), zero);
        for _ in 0..3 {
            pool.retrieve().unwrap();
        }
        assert_eq!(pool.capacity(), 3);
        assert_eq!(
            pool.retrieve(),
            Err(AnimationError::PoolExhausted { capacity: 3 })
        );
    }

    #[test]
    fn reused_slot_has_new_generation() {
        let mut pool = Pool::new(PoolConfig::new(1, 1), zero);
        let a = pool.retrieve().unwrap();
        *pool.get_mut(a) = 7;
        pool.release(a);
        let b = pool.retrieve().unwrap();
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert_eq!(*pool.get(b), 7, "objects are reused as-is");
    }

    #[test]
    #[should_panic(expected = "stale pool handle")]
    fn double_release_panics() {
        let mut pool = Pool::new(PoolConfig::new(1, 1), zero);
        let a = pool.retrieve().unwrap();
        pool.release(a);
        pool.release(a);
    }

    #[test]
    fn update_visits_only_active() {
        let mut pool = Pool::new(PoolConfig::new(4, 4), zero);
        let a = pool.retrieve().unwrap();
        let b = pool.retrieve().unwrap();
        let c = pool.retrieve().unwrap();
        pool.release(b);
        let mut seen = Vec::new();
        pool.update(|handle, value| {
            *value += 1;
            seen.push(handle);
        });
        assert_eq!(seen, [a, c]);
        assert_eq!(pool.iter_active().collect::<Vec<_>>(), [a, c]);
    }
}
