// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Override contract checks.
//!
//! A component declares, in a [`DefaultsDecl`], which properties it expects
//! to read from the enclosing scope. [`validate`] compares that declaration
//! with the scope and the explicit values the component actually received.

use core::fmt;

use smallvec::SmallVec;

use crate::bag::PropertyBag;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::id::Prop;
use crate::scope::{DefaultMap, FixedMap, ScopeValues};
use crate::value::ErasedValue;

/// When override contract validation runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Validation {
    /// Validate in builds with `debug_assertions`, skip otherwise.
    ///
    /// Release builds pay nothing for validation.
    #[default]
    DebugOnly,
    /// Always validate.
    Always,
    /// Never validate.
    Never,
}

impl Validation {
    /// Returns `true` if validation should run in the current build.
    #[must_use]
    #[inline]
    pub const fn is_enabled(self) -> bool {
        match self {
            Self::DebugOnly => cfg!(debug_assertions),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// A component's declared relationship with scoped defaults.
///
/// - **Requested** names are read from the enclosing scope. A requested name
///   may also be passed explicitly, which overrides the default for this
///   component and its descendants.
/// - **Fixed** values are supplied by the component itself to its
///   descendants, which must not override them.
///
/// # Example
///
/// ```rust
/// use understory_defaults::{DefaultsDecl, Prop};
///
/// const THEME: Prop<&'static str> = Prop::new("theme");
/// const SIZE: Prop<u8> = Prop::new("size");
///
/// let decl = DefaultsDecl::new().request(THEME).fix(SIZE, 3);
/// assert!(decl.requests("theme"));
/// assert!(!decl.requests("size"));
/// assert!(decl.fixed_scope().contains_fixed("size"));
/// ```
#[derive(Default)]
pub struct DefaultsDecl {
    requested: SmallVec<[&'static str; 8]>,
    fixed: FixedMap,
}

impl DefaultsDecl {
    /// Creates an empty declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests `prop` from the enclosing scope.
    #[must_use]
    pub fn request<T>(self, prop: Prop<T>) -> Self {
        self.request_name(prop.name())
    }

    /// Requests a property by name.
    #[must_use]
    pub fn request_name(mut self, name: &'static str) -> Self {
        if !self.requested.contains(&name) {
            self.requested.push(name);
        }
        self
    }

    /// Supplies `value` as a fixed default for this component's descendants.
    #[must_use]
    pub fn fix<T: 'static>(mut self, prop: Prop<T>, value: T) -> Self {
        self.fixed.insert(prop.name(), ErasedValue::new(value));
        self
    }

    /// Returns `true` if `name` is requested.
    #[must_use]
    pub fn requests(&self, name: &str) -> bool {
        self.requested.iter().any(|requested| *requested == name)
    }

    /// Returns the requested names, in declaration order.
    #[must_use]
    pub fn requested(&self) -> &[&'static str] {
        &self.requested
    }

    /// Returns the fixed values this component publishes, as a scope.
    #[must_use]
    pub fn fixed_scope(&self) -> ScopeValues {
        if self.fixed.is_empty() {
            return ScopeValues::new();
        }
        ScopeValues::from_maps(DefaultMap::new(), self.fixed.clone())
    }
}

impl fmt::Debug for DefaultsDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultsDecl")
            .field("requested", &self.requested)
            .field("fixed", &self.fixed.keys().collect::<SmallVec<[_; 8]>>())
            .finish()
    }
}

/// Checks `explicit` and `decl` against the inherited `scope`.
///
/// Emits, through `sink`:
///
/// - [`DiagnosticKind::RequestedDefaultMissing`] for every requested name the
///   scope does not provide;
/// - [`DiagnosticKind::UnrequestedDefaultShadowed`] for every explicit name
///   the scope provides but the component did not request;
/// - [`DiagnosticKind::FixedPropertyOverrideAttempt`] for every explicit,
///   requested name that the scope has as a fixed default.
///
/// Diagnostics are emitted in a stable order: requested names in declaration
/// order, then explicit names sorted.
///
/// Returns the number of diagnostics emitted. Validation is advisory; it
/// never affects resolution.
pub fn validate<S: DiagnosticSink + ?Sized>(
    decl: &DefaultsDecl,
    explicit: &PropertyBag,
    scope: &ScopeValues,
    component: &'static str,
    sink: &mut S,
) -> usize {
    let mut emitted = 0;
    let mut emit = |kind, key| {
        sink.emit(Diagnostic {
            kind,
            key,
            component,
        });
        emitted += 1;
    };

    for &name in decl.requested() {
        if !scope.provides(name) {
            emit(DiagnosticKind::RequestedDefaultMissing, name);
        }
    }

    let mut names: SmallVec<[&'static str; 16]> = explicit.names().collect();
    names.sort_unstable();
    for name in names {
        let requested = decl.requests(name);
        if !requested && scope.provides(name) {
            emit(DiagnosticKind::UnrequestedDefaultShadowed, name);
        }
        if requested && scope.contains_fixed(name) {
            emit(DiagnosticKind::FixedPropertyOverrideAttempt, name);
        }
    }

    emitted
}
