// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Components that read scoped defaults.

use core::fmt;

use crate::bag::PropertyBag;
use crate::diagnostic::{DiagnosticSink, TracingSink};
use crate::host::{ScopeHost, provide};
use crate::republish::republish;
use crate::resolve::{ResolveMode, ResolvedProps, resolve};
use crate::scope::{MergeMode, ScopeValues, publish};
use crate::validate::{DefaultsDecl, Validation, validate};

/// A render function wrapped with its defaults declaration.
///
/// Each [`render`](Self::render):
///
/// 1. reads the scope published by the nearest ancestor,
/// 2. validates the explicit values against the declaration (see
///    [`Validation`]),
/// 3. builds the [`ResolvedProps`] view,
/// 4. republishes explicit overrides of scoped defaults, together with the
///    declaration's fixed values, for the subtree,
/// 5. calls the render function inside that subtree scope.
///
/// # Example
///
/// ```rust
/// use understory_defaults::{
///     DefaultsDecl, Prop, PropertyBag, ResolvedProps, ScopeStack, ScopeValues, WithDefaults,
/// };
///
/// const THEME: Prop<&'static str> = Prop::new("theme");
///
/// let label = WithDefaults::new(
///     "Label",
///     DefaultsDecl::new().request(THEME),
///     |props: &ResolvedProps<'_>, _host: &mut ScopeStack| props.get(THEME).ok().flatten(),
/// );
///
/// let root = ScopeValues::builder().default_value(THEME, "light").build();
/// let mut stack = ScopeStack::with_root(root);
///
/// assert_eq!(label.render(&mut stack, &PropertyBag::new()), Some("light"));
/// assert_eq!(
///     label.render(&mut stack, &PropertyBag::new().with(THEME, "dark")),
///     Some("dark"),
/// );
/// ```
pub struct WithDefaults<F> {
    name: &'static str,
    decl: DefaultsDecl,
    fixed: ScopeValues,
    mode: ResolveMode,
    validation: Validation,
    render: F,
}

impl<F> WithDefaults<F> {
    /// Wraps `render` as the component called `name`.
    ///
    /// The name only appears in diagnostics.
    pub fn new(name: &'static str, decl: DefaultsDecl, render: F) -> Self {
        let fixed = decl.fixed_scope();
        Self {
            name,
            decl,
            fixed,
            mode: ResolveMode::default(),
            validation: Validation::default(),
            render,
        }
    }

    /// Sets how reads of unresolved names behave.
    #[must_use]
    pub fn with_mode(mut self, mode: ResolveMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets when validation runs.
    #[must_use]
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Returns the component name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the defaults declaration.
    #[must_use]
    #[inline]
    pub fn decl(&self) -> &DefaultsDecl {
        &self.decl
    }

    /// Renders with `explicit` properties, logging diagnostics via `tracing`.
    pub fn render<H, R>(&self, host: &mut H, explicit: &PropertyBag) -> R
    where
        H: ScopeHost + ?Sized,
        F: Fn(&ResolvedProps<'_>, &mut H) -> R,
    {
        self.render_with_sink(host, explicit, &mut TracingSink)
    }

    /// Renders with `explicit` properties, sending diagnostics to `sink`.
    pub fn render_with_sink<H, R, S>(&self, host: &mut H, explicit: &PropertyBag, sink: &mut S) -> R
    where
        H: ScopeHost + ?Sized,
        S: DiagnosticSink + ?Sized,
        F: Fn(&ResolvedProps<'_>, &mut H) -> R,
    {
        let ambient = host.current().clone();

        if self.validation.is_enabled() {
            validate(&self.decl, explicit, &ambient, self.name, sink);
        }

        let props = resolve(explicit, &ambient, self.mode);

        let local = match republish(explicit, &ambient) {
            Some(overrides) => {
                tracing::trace!(
                    component = self.name,
                    count = overrides.len(),
                    "republishing overridden defaults"
                );
                publish(&overrides, &self.fixed, MergeMode::Extend)
            }
            None => self.fixed.clone(),
        };

        if local.is_empty() {
            (self.render)(&props, host)
        } else {
            provide(host, &local, MergeMode::Extend, |host| {
                (self.render)(&props, host)
            })
        }
    }
}

impl<F> fmt::Debug for WithDefaults<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithDefaults")
            .field("name", &self.name)
            .field("decl", &self.decl)
            .field("mode", &self.mode)
            .field("validation", &self.validation)
            .field("render", &core::any::type_name::<F>())
            .finish()
    }
}
