// Copyright 2026 the Choreo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use core::fmt;

/// Identifies which elements a storyboard target applies to.
///
/// The core compares selectors by value and hands them to the
/// [`ElementTree`](crate::instance::ElementTree); it never parses them.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Selector(Arc<str>);

impl Selector {
    /// Creates a selector from its source text.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self(Arc::from(source))
    }

    /// Returns the source text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Selector {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({:?})", self.as_str())
    }
}

/// Names the property a target animation drives.
///
/// An optional navigation expression selects a sub-object of the target
/// element first. Two keys are equal when both parts are equal.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AnimationKey {
    property: Arc<str>,
    navigation: Option<Arc<str>>,
}

impl AnimationKey {
    /// Creates a key for `property` on the target element itself.
    #[must_use]
    pub fn new(property: &str) -> Self {
        Self {
            property: Arc::from(property),
            navigation: None,
        }
    }

    /// Adds a navigation expression.
    #[must_use]
    pub fn with_navigation(mut self, navigation: &str) -> Self {
        self.navigation = Some(Arc::from(navigation));
        self
    }

    /// The animated property's name.
    #[inline]
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The navigation expression, if any.
    #[inline]
    #[must_use]
    pub fn navigation(&self) -> Option<&str> {
        self.navigation.as_deref()
    }
}

impl fmt::Debug for AnimationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.navigation() {
            Some(navigation) => write!(f, "AnimationKey({navigation}.{})", self.property()),
            None => write!(f, "AnimationKey({})", self.property()),
        }
    }
}
