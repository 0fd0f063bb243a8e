// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped default values and their propagation.
//!
//! This module provides [`ScopeValues`], the immutable set of defaults that
//! is visible over a subtree, and [`publish`], which layers a subtree's local
//! values over its parent's.

use alloc::rc::Rc;
use core::fmt;

use hashbrown::HashMap;

use crate::id::Prop;
use crate::value::{DefaultProducer, ErasedValue, constant, producer};

/// Lazy defaults keyed by property name.
pub type DefaultMap = HashMap<&'static str, DefaultProducer>;

/// Fixed defaults keyed by property name.
pub type FixedMap = HashMap<&'static str, ErasedValue>;

/// How a subtree's local values combine with those inherited from its parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum MergeMode {
    /// Keep the parent's entries and layer local entries over them.
    ///
    /// Local entries win on name collisions.
    #[default]
    Extend,
    /// Discard the parent's entries for this subtree.
    Replace,
}

/// The defaults visible over a subtree.
///
/// A `ScopeValues` holds two maps:
///
/// - **defaults**: lazy producers, invoked on every read.
/// - **fixed**: already-computed values that descendants must not override.
///
/// A name lives in at most one of the two maps.
///
/// Scope values are immutable. Propagation builds a new instance with
/// [`publish`] instead of mutating the parent's. Internally the maps live
/// behind an `Rc`, so cloning is cheap and every clone shares the same
/// producers.
///
/// The same type describes the *local* values a subtree contributes before
/// they are merged with the inherited ones.
///
/// # Example
///
/// ```rust
/// use understory_defaults::{MergeMode, Prop, ScopeValues};
///
/// const THEME: Prop<&'static str> = Prop::new("theme");
/// const DENSITY: Prop<u8> = Prop::new("density");
///
/// let root = ScopeValues::builder()
///     .default_value(THEME, "light")
///     .fixed(DENSITY, 2)
///     .build();
///
/// assert!(root.contains_default("theme"));
/// assert!(root.contains_fixed("density"));
/// assert!(root.provides("theme") && root.provides("density"));
/// ```
#[derive(Clone, Default)]
pub struct ScopeValues {
    inner: Rc<ScopeData>,
}

#[derive(Default)]
struct ScopeData {
    defaults: DefaultMap,
    fixed: FixedMap,
}

impl ScopeValues {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a builder for a new scope.
    #[must_use]
    pub fn builder() -> ScopeValuesBuilder {
        ScopeValuesBuilder::new()
    }

    /// Creates a scope that only has lazy defaults.
    #[must_use]
    pub fn from_defaults(defaults: DefaultMap) -> Self {
        Self::from_maps(defaults, FixedMap::new())
    }

    /// Creates a scope from raw maps.
    ///
    /// Names present in `fixed` are dropped from `defaults`.
    #[must_use]
    pub fn from_maps(mut defaults: DefaultMap, fixed: FixedMap) -> Self {
        defaults.retain(|name, _| !fixed.contains_key(name));
        Self {
            inner: Rc::new(ScopeData { defaults, fixed }),
        }
    }

    /// Returns `true` if this scope has no entries at all.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.defaults.is_empty() && self.inner.fixed.is_empty()
    }

    /// Returns the total number of entries in both maps.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.defaults.len() + self.inner.fixed.len()
    }

    /// Returns the lazy defaults.
    #[must_use]
    #[inline]
    pub fn defaults(&self) -> &DefaultMap {
        &self.inner.defaults
    }

    /// Returns the fixed defaults.
    #[must_use]
    #[inline]
    pub fn fixed(&self) -> &FixedMap {
        &self.inner.fixed
    }

    /// Returns `true` if `name` has a lazy default.
    #[must_use]
    #[inline]
    pub fn contains_default(&self, name: &str) -> bool {
        self.inner.defaults.contains_key(name)
    }

    /// Returns `true` if `name` has a fixed default.
    #[must_use]
    #[inline]
    pub fn contains_fixed(&self, name: &str) -> bool {
        self.inner.fixed.contains_key(name)
    }

    /// Returns `true` if `name` has either kind of default.
    #[must_use]
    #[inline]
    pub fn provides(&self, name: &str) -> bool {
        self.contains_default(name) || self.contains_fixed(name)
    }

    /// Returns the producer registered for `name`, if any.
    #[must_use]
    pub fn producer(&self, name: &str) -> Option<&DefaultProducer> {
        self.inner.defaults.get(name)
    }

    /// Returns the fixed value registered for `name`, if any.
    #[must_use]
    pub fn fixed_value(&self, name: &str) -> Option<&ErasedValue> {
        self.inner.fixed.get(name)
    }

    /// Returns `true` if both scopes are the same instance.
    ///
    /// Propagation passes the parent through unchanged when a subtree adds
    /// nothing, which this makes observable in tests.
    #[must_use]
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Layers `local` over `self`. See [`publish`].
    #[must_use]
    pub fn publish(&self, local: &Self, mode: MergeMode) -> Self {
        publish(self, local, mode)
    }
}

impl fmt::Debug for ScopeValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut defaults: alloc::vec::Vec<_> = self.inner.defaults.keys().collect();
        let mut fixed: alloc::vec::Vec<_> = self.inner.fixed.keys().collect();
        defaults.sort_unstable();
        fixed.sort_unstable();
        f.debug_struct("ScopeValues")
            .field("defaults", &defaults)
            .field("fixed", &fixed)
            .finish()
    }
}

/// Computes the scope seen by a subtree.
///
/// - [`MergeMode::Extend`]: the parent's entries plus `local`'s, with `local`
///   winning on collisions. A name that `local` contributes to one map is
///   removed from the parent's other map, so a local lazy default shadows an
///   inherited fixed one and vice versa.
/// - [`MergeMode::Replace`]: `local` alone.
///
/// When `local` is empty under `Extend`, `parent` is returned as-is without
/// allocating.
///
/// # Example
///
/// ```rust
/// use understory_defaults::{MergeMode, Prop, ScopeValues, publish};
///
/// const THEME: Prop<&'static str> = Prop::new("theme");
/// const GAP: Prop<u32> = Prop::new("gap");
///
/// let parent = ScopeValues::builder()
///     .default_value(THEME, "light")
///     .default_value(GAP, 4)
///     .build();
/// let local = ScopeValues::builder().default_value(THEME, "dark").build();
///
/// let extended = publish(&parent, &local, MergeMode::Extend);
/// assert!(extended.contains_default("gap"));
///
/// let replaced = publish(&parent, &local, MergeMode::Replace);
/// assert!(!replaced.contains_default("gap"));
/// assert!(replaced.contains_default("theme"));
/// ```
#[must_use]
pub fn publish(parent: &ScopeValues, local: &ScopeValues, mode: MergeMode) -> ScopeValues {
    match mode {
        MergeMode::Replace => local.clone(),
        MergeMode::Extend => {
            if local.is_empty() {
                return parent.clone();
            }
            if parent.is_empty() {
                return local.clone();
            }

            let mut defaults = parent.inner.defaults.clone();
            let mut fixed = parent.inner.fixed.clone();
            for (name, make) in &local.inner.defaults {
                fixed.remove(name);
                defaults.insert(*name, Rc::clone(make));
            }
            for (name, value) in &local.inner.fixed {
                defaults.remove(name);
                fixed.insert(*name, value.clone());
            }

            ScopeValues {
                inner: Rc::new(ScopeData { defaults, fixed }),
            }
        }
    }
}

/// Builder for [`ScopeValues`].
///
/// Setting a name replaces any earlier entry for it, in either map.
#[derive(Default)]
pub struct ScopeValuesBuilder {
    defaults: DefaultMap,
    fixed: FixedMap,
}

impl fmt::Debug for ScopeValuesBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeValuesBuilder")
            .field("defaults", &self.defaults.len())
            .field("fixed", &self.fixed.len())
            .finish()
    }
}

impl ScopeValuesBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a lazy default computed by `f` on every read.
    #[must_use]
    pub fn default_with<T, F>(self, prop: Prop<T>, f: F) -> Self
    where
        T: 'static,
        F: Fn() -> T + 'static,
    {
        self.default_erased(prop.name(), producer(f))
    }

    /// Adds a lazy default that always yields `value`.
    #[must_use]
    pub fn default_value<T: 'static>(self, prop: Prop<T>, value: T) -> Self {
        self.default_erased(prop.name(), constant(ErasedValue::new(value)))
    }

    /// Adds a lazy default from an already-erased producer.
    #[must_use]
    pub fn default_erased(mut self, name: &'static str, make: DefaultProducer) -> Self {
        self.fixed.remove(name);
        self.defaults.insert(name, make);
        self
    }

    /// Adds a fixed default.
    #[must_use]
    pub fn fixed<T: 'static>(self, prop: Prop<T>, value: T) -> Self {
        self.fixed_erased(prop.name(), ErasedValue::new(value))
    }

    /// Adds a fixed default from an already-erased value.
    #[must_use]
    pub fn fixed_erased(mut self, name: &'static str, value: ErasedValue) -> Self {
        self.defaults.remove(name);
        self.fixed.insert(name, value);
        self
    }

    /// Builds the scope.
    #[must_use]
    pub fn build(self) -> ScopeValues {
        ScopeValues {
            inner: Rc::new(ScopeData {
                defaults: self.defaults,
                fixed: self.fixed,
            }),
        }
    }
}
