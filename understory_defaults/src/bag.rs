// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit property values.

use core::fmt;

use hashbrown::HashMap;

use crate::id::Prop;
use crate::value::ErasedValue;

/// The properties a node received explicitly from its parent.
///
/// Names are unique; setting a name twice keeps the last value.
///
/// # Example
///
/// ```rust
/// use understory_defaults::{Prop, PropertyBag};
///
/// const LABEL: Prop<&'static str> = Prop::new("label");
/// const THEME: Prop<&'static str> = Prop::new("theme");
///
/// let props = PropertyBag::new().with(LABEL, "Save").with(THEME, "dark");
///
/// assert_eq!(props.get(LABEL), Some(&"Save"));
/// assert!(props.contains("theme"));
/// assert_eq!(props.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct PropertyBag {
    values: HashMap<&'static str, ErasedValue>,
}

impl PropertyBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bag with `prop` set to `value`.
    #[must_use]
    pub fn with<T: 'static>(mut self, prop: Prop<T>, value: T) -> Self {
        self.set(prop, value);
        self
    }

    /// Sets `prop` to `value`, returning the previous value if there was one.
    pub fn set<T: 'static>(&mut self, prop: Prop<T>, value: T) -> Option<ErasedValue> {
        self.set_erased(prop.name(), ErasedValue::new(value))
    }

    /// Sets an already-erased value.
    pub fn set_erased(&mut self, name: &'static str, value: ErasedValue) -> Option<ErasedValue> {
        self.values.insert(name, value)
    }

    /// Removes `name`, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<ErasedValue> {
        self.values.remove(name)
    }

    /// Returns the typed value for `prop`.
    ///
    /// Returns `None` when the name is absent or holds a different type.
    #[must_use]
    pub fn get<T: 'static>(&self, prop: Prop<T>) -> Option<&T> {
        self.values
            .get(prop.name())
            .and_then(ErasedValue::downcast_ref::<T>)
    }

    /// Returns the erased value for `name`.
    #[must_use]
    pub fn get_erased(&self, name: &str) -> Option<&ErasedValue> {
        self.values.get(name)
    }

    /// Returns `true` if `name` was set explicitly.
    #[must_use]
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of explicit values.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no values were set.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the explicit names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    /// Iterates over `(name, value)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ErasedValue)> + '_ {
        self.values.iter().map(|(name, value)| (*name, value))
    }
}

impl fmt::Debug for PropertyBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: alloc::vec::Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("PropertyBag")
            .field("names", &names)
            .finish()
    }
}
