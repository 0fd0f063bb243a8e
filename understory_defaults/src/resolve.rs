// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Merged reads over explicit values and scoped defaults.
//!
//! This module provides [`ResolvedProps`], the read-only view a component
//! renders from, and [`resolve`], which builds it.

use core::fmt;

use crate::bag::PropertyBag;
use crate::id::Prop;
use crate::scope::{DefaultMap, ScopeValues};
use crate::value::ErasedValue;

/// What a read does when no layer supplies a value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ResolveMode {
    /// Missing names read as `None`.
    #[default]
    Lenient,
    /// Missing names fail with [`ResolveError::MissingDefaultProperty`].
    Strict,
}

/// The layer a resolved value came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueOrigin {
    /// The node's explicit properties.
    Explicit,
    /// A fixed default of the enclosing scope.
    Fixed,
    /// A lazy default of the enclosing scope.
    Default,
}

/// Errors produced by reads through [`ResolvedProps`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// A strict read found neither an explicit value nor a default.
    MissingDefaultProperty {
        /// The property that was read.
        name: &'static str,
    },
    /// A typed read found a value of a different type.
    TypeMismatch {
        /// The property that was read.
        name: &'static str,
        /// The type the caller asked for.
        expected: &'static str,
        /// The type that was stored.
        found: &'static str,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDefaultProperty { name } => {
                write!(f, "property `{name}` has no explicit value and no default")
            }
            Self::TypeMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "property `{name}` holds a `{found}` but was read as `{expected}`"
            ),
        }
    }
}

impl core::error::Error for ResolveError {}

/// A read-only merged view over a node's explicit properties and the scope
/// it renders in.
///
/// Reads resolve in this order:
///
/// 1. the explicit value,
/// 2. the scope's fixed default,
/// 3. the scope's lazy default, whose producer is invoked on **every** read,
/// 4. nothing: `Ok(None)` in [`ResolveMode::Lenient`], an error in
///    [`ResolveMode::Strict`].
///
/// Results are not memoized. A producer that returns something different on
/// each call will be observed doing so.
///
/// The unmerged inputs stay reachable through [`original_props`](Self::original_props)
/// and [`original_defaults`](Self::original_defaults), so later stages can
/// tell where a value came from without guessing from merged reads.
///
/// # Example
///
/// ```rust
/// use understory_defaults::{Prop, PropertyBag, ResolveMode, ScopeValues, resolve};
///
/// const THEME: Prop<&'static str> = Prop::new("theme");
/// const LABEL: Prop<&'static str> = Prop::new("label");
/// const ICON: Prop<&'static str> = Prop::new("icon");
///
/// let scope = ScopeValues::builder().default_value(THEME, "light").build();
/// let explicit = PropertyBag::new().with(LABEL, "Save");
///
/// let props = resolve(&explicit, &scope, ResolveMode::Lenient);
/// assert_eq!(props.get(LABEL), Ok(Some("Save")));
/// assert_eq!(props.get(THEME), Ok(Some("light")));
/// assert_eq!(props.get(ICON), Ok(None));
///
/// let strict = resolve(&explicit, &scope, ResolveMode::Strict);
/// assert!(strict.get(ICON).is_err());
/// ```
#[derive(Clone, Copy)]
pub struct ResolvedProps<'a> {
    explicit: &'a PropertyBag,
    scope: &'a ScopeValues,
    mode: ResolveMode,
}

/// Builds the merged view of `explicit` over `scope`.
///
/// Nothing is evaluated here; producers run when values are read.
#[must_use]
pub fn resolve<'a>(
    explicit: &'a PropertyBag,
    scope: &'a ScopeValues,
    mode: ResolveMode,
) -> ResolvedProps<'a> {
    ResolvedProps {
        explicit,
        scope,
        mode,
    }
}

impl<'a> ResolvedProps<'a> {
    /// Returns the missing-value behavior of this view.
    #[must_use]
    #[inline]
    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    /// Reads `name` without type information.
    pub fn get_erased(&self, name: &'static str) -> Result<Option<ErasedValue>, ResolveError> {
        if let Some(value) = self.explicit.get_erased(name) {
            return Ok(Some(value.clone()));
        }
        if let Some(value) = self.scope.fixed_value(name) {
            return Ok(Some(value.clone()));
        }
        if let Some(make) = self.scope.producer(name) {
            return Ok(Some(make()));
        }
        match self.mode {
            ResolveMode::Lenient => Ok(None),
            ResolveMode::Strict => Err(ResolveError::MissingDefaultProperty { name }),
        }
    }

    /// Reads `prop` as a `T`.
    pub fn get<T: Clone + 'static>(&self, prop: Prop<T>) -> Result<Option<T>, ResolveError> {
        let Some(value) = self.get_erased(prop.name())? else {
            return Ok(None);
        };
        match value.downcast_ref::<T>() {
            Some(typed) => Ok(Some(typed.clone())),
            None => Err(ResolveError::TypeMismatch {
                name: prop.name(),
                expected: core::any::type_name::<T>(),
                found: value.type_name(),
            }),
        }
    }

    /// Reads `prop`, treating absence as an error regardless of mode.
    pub fn require<T: Clone + 'static>(&self, prop: Prop<T>) -> Result<T, ResolveError> {
        self.get(prop)?
            .ok_or(ResolveError::MissingDefaultProperty { name: prop.name() })
    }

    /// Returns `true` if some layer supplies `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.explicit.contains(name) || self.scope.provides(name)
    }

    /// Returns which layer would answer a read of `name`.
    ///
    /// This does not invoke any producer.
    #[must_use]
    pub fn origin(&self, name: &str) -> Option<ValueOrigin> {
        if self.explicit.contains(name) {
            Some(ValueOrigin::Explicit)
        } else if self.scope.contains_fixed(name) {
            Some(ValueOrigin::Fixed)
        } else if self.scope.contains_default(name) {
            Some(ValueOrigin::Default)
        } else {
            None
        }
    }

    /// Returns the explicit properties this view was built from.
    #[must_use]
    #[inline]
    pub fn original_props(&self) -> &'a PropertyBag {
        self.explicit
    }

    /// Returns the scope's lazy defaults, unmerged.
    #[must_use]
    #[inline]
    pub fn original_defaults(&self) -> &'a DefaultMap {
        self.scope.defaults()
    }

    /// Returns the scope this view reads defaults from.
    #[must_use]
    #[inline]
    pub fn scope(&self) -> &'a ScopeValues {
        self.scope
    }
}

impl fmt::Debug for ResolvedProps<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedProps")
            .field("explicit", self.explicit)
            .field("scope", self.scope)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::ToString;
    use core::cell::Cell;

    const THEME: Prop<&'static str> = Prop::new("theme");
    const TICK: Prop<u32> = Prop::new("tick");
    const LOCKED: Prop<bool> = Prop::new("locked");
    const MISSING: Prop<u8> = Prop::new("missing");

    fn counting_scope(calls: &Rc<Cell<u32>>) -> ScopeValues {
        let calls = Rc::clone(calls);
        ScopeValues::builder()
            .default_with(TICK, move || {
                calls.set(calls.get() + 1);
                calls.get()
            })
            .build()
    }

    #[test]
    fn explicit_wins_over_every_default() {
        let scope = ScopeValues::builder()
            .default_value(THEME, "light")
            .fixed(LOCKED, true)
            .build();
        let explicit = PropertyBag::new().with(THEME, "dark").with(LOCKED, false);

        let props = resolve(&explicit, &scope, ResolveMode::Lenient);
        assert_eq!(props.get(THEME), Ok(Some("dark")));
        assert_eq!(props.get(LOCKED), Ok(Some(false)));
        assert_eq!(props.origin("theme"), Some(ValueOrigin::Explicit));
    }

    #[test]
    fn fixed_is_read_directly() {
        let scope = ScopeValues::builder().fixed(LOCKED, true).build();
        let explicit = PropertyBag::new();
        let props = resolve(&explicit, &scope, ResolveMode::Lenient);
        assert_eq!(props.get(LOCKED), Ok(Some(true)));
        assert_eq!(props.origin("locked"), Some(ValueOrigin::Fixed));
    }

    #[test]
    fn producer_runs_once_per_read() {
        let calls = Rc::new(Cell::new(0));
        let scope = counting_scope(&calls);
        let explicit = PropertyBag::new();

        let props = resolve(&explicit, &scope, ResolveMode::Lenient);
        assert_eq!(calls.get(), 0, "resolving must not evaluate defaults");

        assert_eq!(props.get(TICK), Ok(Some(1)));
        assert_eq!(props.get(TICK), Ok(Some(2)));
        assert_eq!(props.get(TICK), Ok(Some(3)));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn origin_does_not_invoke_producers() {
        let calls = Rc::new(Cell::new(0));
        let scope = counting_scope(&calls);
        let explicit = PropertyBag::new();
        let props = resolve(&explicit, &scope, ResolveMode::Lenient);

        assert_eq!(props.origin("tick"), Some(ValueOrigin::Default));
        assert!(props.contains("tick"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn explicit_value_skips_producer() {
        let calls = Rc::new(Cell::new(0));
        let scope = counting_scope(&calls);
        let explicit = PropertyBag::new().with(TICK, 99);
        let props = resolve(&explicit, &scope, ResolveMode::Lenient);

        assert_eq!(props.get(TICK), Ok(Some(99)));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn lenient_missing_is_none() {
        let explicit = PropertyBag::new();
        let scope = ScopeValues::new();
        let props = resolve(&explicit, &scope, ResolveMode::Lenient);
        assert_eq!(props.get(MISSING), Ok(None));
        assert_eq!(props.origin("missing"), None);
    }

    #[test]
    fn strict_missing_is_error() {
        let explicit = PropertyBag::new();
        let scope = ScopeValues::new();
        let props = resolve(&explicit, &scope, ResolveMode::Strict);
        assert_eq!(
            props.get(MISSING),
            Err(ResolveError::MissingDefaultProperty { name: "missing" })
        );
    }

    #[test]
    fn require_fails_even_when_lenient() {
        let explicit = PropertyBag::new();
        let scope = ScopeValues::new();
        let props = resolve(&explicit, &scope, ResolveMode::Lenient);
        assert_eq!(
            props.require(MISSING),
            Err(ResolveError::MissingDefaultProperty { name: "missing" })
        );
    }

    #[test]
    fn wrong_type_is_reported() {
        let explicit = PropertyBag::new().with(THEME, "dark");
        let scope = ScopeValues::new();
        let props = resolve(&explicit, &scope, ResolveMode::Lenient);

        let as_number: Prop<u32> = Prop::new("theme");
        let err = props.get(as_number).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::TypeMismatch { name: "theme", .. }
        ));
        assert!(err.to_string().contains("theme"));
    }

    #[test]
    fn originals_are_exposed_unmerged() {
        let scope = ScopeValues::builder().default_value(THEME, "light").build();
        let explicit = PropertyBag::new().with(TICK, 1);
        let props = resolve(&explicit, &scope, ResolveMode::Lenient);

        assert!(core::ptr::eq(props.original_props(), &explicit));
        assert!(props.original_defaults().contains_key("theme"));
        assert!(!props.original_defaults().contains_key("tick"));
        assert!(props.scope().ptr_eq(&scope));
    }

    #[test]
    fn missing_error_display() {
        let err = ResolveError::MissingDefaultProperty { name: "gap" };
        assert_eq!(
            err.to_string(),
            "property `gap` has no explicit value and no default"
        );
    }
}
