// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scope plumbing between the tree renderer and this crate.
//!
//! The renderer owns traversal. All this crate needs from it is a way to read
//! the scope published by the nearest ancestor, and to publish a new scope
//! for the duration of a subtree. [`ScopeHost`] captures exactly that.
//!
//! [`ScopeStack`] is a ready-made host for renderers that walk the tree
//! depth-first, which is also convenient in tests.

use alloc::vec::Vec;

use crate::scope::{MergeMode, ScopeValues, publish};

/// The capability a tree renderer provides for scope propagation.
///
/// Calls to [`push`](Self::push) and [`pop`](Self::pop) are balanced around
/// each subtree.
pub trait ScopeHost {
    /// Returns the scope published by the nearest ancestor.
    fn current(&self) -> &ScopeValues;

    /// Makes `scope` visible to everything rendered until the matching
    /// [`pop`](Self::pop).
    fn push(&mut self, scope: ScopeValues);

    /// Ends the innermost subtree scope, returning it.
    fn pop(&mut self) -> Option<ScopeValues>;
}

/// Publishes `local` over the host's current scope for the duration of `f`.
///
/// # Example
///
/// ```rust
/// use understory_defaults::{MergeMode, Prop, ScopeHost, ScopeStack, ScopeValues, provide};
///
/// const THEME: Prop<&'static str> = Prop::new("theme");
///
/// let mut stack = ScopeStack::new();
/// let local = ScopeValues::builder().default_value(THEME, "dark").build();
///
/// let seen = provide(&mut stack, &local, MergeMode::Extend, |host| {
///     host.current().contains_default("theme")
/// });
/// assert!(seen);
/// assert!(!stack.current().contains_default("theme"));
/// ```
pub fn provide<H, R>(
    host: &mut H,
    local: &ScopeValues,
    mode: MergeMode,
    f: impl FnOnce(&mut H) -> R,
) -> R
where
    H: ScopeHost + ?Sized,
{
    let scope = publish(host.current(), local, mode);
    host.push(scope);
    let out = f(host);
    host.pop();
    out
}

/// A depth-first scope stack.
///
/// The root scope is never popped.
#[derive(Clone, Debug, Default)]
pub struct ScopeStack {
    root: ScopeValues,
    frames: Vec<ScopeValues>,
}

impl ScopeStack {
    /// Creates a stack with an empty root scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stack with the given root scope.
    #[must_use]
    pub fn with_root(root: ScopeValues) -> Self {
        Self {
            root,
            frames: Vec::new(),
        }
    }

    /// Returns the number of scopes pushed above the root.
    #[must_use]
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns the root scope.
    #[must_use]
    #[inline]
    pub fn root(&self) -> &ScopeValues {
        &self.root
    }

    /// Runs `f` with `local` published over the current scope.
    ///
    /// Shorthand for [`provide`].
    pub fn with_scope<R>(
        &mut self,
        local: &ScopeValues,
        mode: MergeMode,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        provide(self, local, mode, f)
    }
}

impl ScopeHost for ScopeStack {
    fn current(&self) -> &ScopeValues {
        self.frames.last().unwrap_or(&self.root)
    }

    fn push(&mut self, scope: ScopeValues) {
        self.frames.push(scope);
    }

    fn pop(&mut self) -> Option<ScopeValues> {
        self.frames.pop()
    }
}
