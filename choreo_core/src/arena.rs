// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot storage with generational handles, used by the storyboard store.

use alloc::vec::Vec;

use crate::handle::Handle;

/// Slot storage for values addressed by [`Handle`].
///
/// Removed values free their slot; the generation counter is bumped so that
/// old handles fail validation once the slot is reused.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    /// Handle name used in stale-handle panic messages.
    kind: &'static str,
    slots: Vec<Option<T>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
}

impl<T> Arena<T> {
    pub(crate) const fn new(kind: &'static str) -> Self {
        Self {
            kind,
            slots: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, value: T) -> Handle<T> {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx as usize] = Some(value);
            idx
        } else {
            let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            assert!(idx != u32::MAX, "{} arena is full", self.kind);
            self.slots.push(Some(value));
            self.generation.push(0);
            idx
        };
        Handle::new(idx, self.generation[idx as usize])
    }

    /// Removes the value behind `handle`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub(crate) fn remove(&mut self, handle: Handle<T>) -> T {
        self.validate(handle);
        let idx = handle.idx as usize;
        self.generation[idx] = self.generation[idx].wrapping_add(1);
        self.free_list.push(handle.idx);
        match self.slots[idx].take() {
            Some(value) => value,
            None => unreachable!("validated slot is occupied"),
        }
    }

    pub(crate) fn contains(&self, handle: Handle<T>) -> bool {
        let idx = handle.idx as usize;
        idx < self.slots.len()
            && self.generation[idx] == handle.generation
            && self.slots[idx].is_some()
    }

    pub(crate) fn try_get(&self, handle: Handle<T>) -> Option<&T> {
        if self.contains(handle) {
            self.slots[handle.idx as usize].as_ref()
        } else {
            None
        }
    }

    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub(crate) fn get(&self, handle: Handle<T>) -> &T {
        self.validate(handle);
        match &self.slots[handle.idx as usize] {
            Some(value) => value,
            None => unreachable!("validated slot is occupied"),
        }
    }

    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub(crate) fn get_mut(&mut self, handle: Handle<T>) -> &mut T {
        self.validate(handle);
        match &mut self.slots[handle.idx as usize] {
            Some(value) => value,
            None => unreachable!("validated slot is occupied"),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Panics if the handle is stale.
    fn validate(&self, handle: Handle<T>) {
        assert!(
            self.contains(handle),
            "stale {}: {handle:?} (current gen: {})",
            self.kind,
            self.generation
                .get(handle.idx as usize)
                .copied()
                .unwrap_or(u32::MAX)
        );
    }
}
