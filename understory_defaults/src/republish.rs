// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning explicit overrides back into defaults for descendants.

use crate::bag::PropertyBag;
use crate::scope::{DefaultMap, ScopeValues};
use crate::value::constant;

/// Builds the local scope that carries a node's overrides down to its
/// descendants.
///
/// Every explicit value whose name also has a lazy default in `scope`
/// becomes a new default producer returning that explicit value. The value is
/// captured when this function runs, so later changes to `explicit` do not
/// leak into the published scope.
///
/// Returns `None` when no explicit value overrides a default; callers can
/// then skip publishing a new scope altogether.
///
/// The result is meant to be published with [`MergeMode::Extend`] for the
/// node's *children*. The node itself already reads its explicit values
/// first.
///
/// [`MergeMode::Extend`]: crate::MergeMode::Extend
///
/// # Example
///
/// ```rust
/// use understory_defaults::{
///     MergeMode, Prop, PropertyBag, ResolveMode, ScopeValues, publish, republish, resolve,
/// };
///
/// const X: Prop<i32> = Prop::new("x");
///
/// let scope = ScopeValues::builder().default_value(X, 1).build();
/// let explicit = PropertyBag::new().with(X, 5);
///
/// let local = republish(&explicit, &scope).expect("x overrides a default");
/// let child_scope = publish(&scope, &local, MergeMode::Extend);
///
/// let child = PropertyBag::new();
/// let props = resolve(&child, &child_scope, ResolveMode::Lenient);
/// assert_eq!(props.get(X), Ok(Some(5)));
/// ```
#[must_use]
pub fn republish(explicit: &PropertyBag, scope: &ScopeValues) -> Option<ScopeValues> {
    let mut overrides = DefaultMap::new();
    for (name, value) in explicit.iter() {
        if scope.contains_default(name) {
            overrides.insert(name, constant(value.clone()));
        }
    }

    if overrides.is_empty() {
        None
    } else {
        Some(ScopeValues::from_defaults(overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Prop;
    use crate::resolve::{ResolveMode, resolve};
    use crate::scope::{MergeMode, publish};

    const X: Prop<i32> = Prop::new("x");
    const LABEL: Prop<&'static str> = Prop::new("label");
    const LOCKED: Prop<bool> = Prop::new("locked");

    #[test]
    fn nothing_to_republish() {
        let scope = ScopeValues::builder().default_value(X, 1).build();
        let explicit = PropertyBag::new().with(LABEL, "only explicit");
        assert!(republish(&explicit, &scope).is_none());
        assert!(republish(&PropertyBag::new(), &scope).is_none());
    }

    #[test]
    fn overrides_become_constant_producers() {
        let scope = ScopeValues::builder().default_with(X, || 1).build();
        let explicit = PropertyBag::new().with(X, 5).with(LABEL, "ignored");

        let local = republish(&explicit, &scope).unwrap();
        assert_eq!(local.len(), 1);
        let make = local.producer("x").unwrap();
        assert_eq!(make().downcast_ref::<i32>(), Some(&5));
        assert_eq!(make().downcast_ref::<i32>(), Some(&5));
    }

    #[test]
    fn fixed_defaults_are_not_republished() {
        let scope = ScopeValues::builder().fixed(LOCKED, true).build();
        let explicit = PropertyBag::new().with(LOCKED, false);
        assert!(republish(&explicit, &scope).is_none());
    }

    #[test]
    fn republished_value_is_captured() {
        let scope = ScopeValues::builder().default_value(X, 1).build();
        let mut explicit = PropertyBag::new().with(X, 5);
        let local = republish(&explicit, &scope).unwrap();

        explicit.set(X, 6);
        let child_scope = publish(&scope, &local, MergeMode::Extend);
        let child = PropertyBag::new();
        let props = resolve(&child, &child_scope, ResolveMode::Lenient);
        assert_eq!(props.get(X), Ok(Some(5)));
    }

    #[test]
    fn grandchild_still_sees_override() {
        let root = ScopeValues::builder().default_value(X, 1).build();
        let explicit = PropertyBag::new().with(X, 5);
        let child_scope = publish(
            &root,
            &republish(&explicit, &root).unwrap(),
            MergeMode::Extend,
        );
        // An intermediate node that adds nothing.
        let grandchild_scope = publish(&child_scope, &ScopeValues::new(), MergeMode::Extend);

        let none = PropertyBag::new();
        let props = resolve(&none, &grandchild_scope, ResolveMode::Lenient);
        assert_eq!(props.get(X), Ok(Some(5)));
    }
}
