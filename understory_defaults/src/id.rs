// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed property names.
//!
//! This module provides [`Prop<T>`], a property name paired with the type of
//! value stored under it.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// A property name with a phantom value type.
///
/// Explicit values and scoped defaults are both stored by name. Reading them
/// back through the same `Prop<T>` gives a `T` no matter which layer supplied
/// the value, so a component sees one merged, typed property set.
///
/// Props are usually declared as constants next to the component that reads
/// them:
///
/// ```rust
/// use understory_defaults::Prop;
///
/// const THEME: Prop<&'static str> = Prop::new("theme");
/// const GAP: Prop<f64> = Prop::new("gap");
///
/// assert_eq!(THEME.name(), "theme");
/// assert_ne!(THEME.name(), GAP.name());
/// ```
pub struct Prop<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Prop<T> {
    /// Creates a typed handle for the property called `name`.
    #[must_use]
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Returns the property name.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

// Manual impls so that `T` does not need to implement these traits.

impl<T> Copy for Prop<T> {}

impl<T> Clone for Prop<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Prop<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for Prop<T> {}

impl<T> Hash for Prop<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<T> fmt::Debug for Prop<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prop")
            .field("name", &self.name)
            .field("type", &core::any::type_name::<T>())
            .finish()
    }
}

impl<T> fmt::Display for Prop<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    // Not Clone, not Eq, not Debug.
    struct Opaque;

    const WIDTH: Prop<f64> = Prop::new("width");

    #[test]
    fn prop_name() {
        assert_eq!(WIDTH.name(), "width");
        assert_eq!(format!("{WIDTH}"), "width");
    }

    #[test]
    fn prop_traits_do_not_require_value_traits() {
        let a: Prop<Opaque> = Prop::new("opaque");
        let b = a;
        assert_eq!(a, b);
        assert!(format!("{a:?}").contains("Opaque"));
    }

    #[test]
    fn props_compare_by_name() {
        let a: Prop<u32> = Prop::new("count");
        let b: Prop<u32> = Prop::new("count");
        let c: Prop<u32> = Prop::new("limit");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
