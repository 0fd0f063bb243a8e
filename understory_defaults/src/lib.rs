// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Defaults: scoped, lazily-resolved default properties.
//!
//! An ancestor in a UI tree can supply fallback values for properties that
//! its descendants may or may not set themselves. This crate holds those
//! fallbacks, merges them as scopes nest, and resolves reads through a single
//! view that looks the same whether a value was passed explicitly or came
//! from a default.
//!
//! ## Core Concepts
//!
//! ### Scopes
//!
//! [`ScopeValues`] is the immutable set of defaults visible over a subtree:
//!
//! - **defaults** - lazy producers, invoked on every read
//! - **fixed** - values that descendants must not override
//!
//! [`publish`] layers a subtree's local values over its parent's, either
//! extending ([`MergeMode::Extend`]) or replacing ([`MergeMode::Replace`])
//! them. The tree renderer carries the current scope down through a
//! [`ScopeHost`]; [`ScopeStack`] is a ready-made depth-first host.
//!
//! ### Resolution
//!
//! [`resolve`] combines a node's explicit [`PropertyBag`] with the current
//! scope into [`ResolvedProps`]. Reads go **explicit → fixed → default
//! producer → missing**, where missing is `None` or an error depending on
//! [`ResolveMode`]. Nothing is memoized: each read of a default calls its
//! producer again.
//!
//! ### Republication
//!
//! When a node receives an explicit value for a name that its scope has a
//! default for, [`republish`] turns that value into a new default for the
//! node's descendants, so an override flows down the tree.
//!
//! ### Validation
//!
//! A component declares the defaults it relies on in a [`DefaultsDecl`].
//! [`validate`] reports, through a [`DiagnosticSink`], requested defaults
//! that are missing, explicit values that silently shadow defaults, and
//! attempts to override fixed defaults. Diagnostics never change resolution.
//! By default ([`Validation::DebugOnly`]) validation only runs in builds with
//! `debug_assertions`.
//!
//! [`WithDefaults`] ties all of this together around a render function.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_defaults::{
//!     DefaultsDecl, Prop, PropertyBag, ResolvedProps, ScopeStack, ScopeValues, WithDefaults,
//! };
//!
//! const THEME: Prop<&'static str> = Prop::new("theme");
//!
//! // The root publishes a lazy default.
//! let root = ScopeValues::builder().default_with(THEME, || "light").build();
//! let mut tree = ScopeStack::with_root(root);
//!
//! // A leaf reads `theme`, whether explicit or inherited.
//! let leaf = WithDefaults::new(
//!     "Leaf",
//!     DefaultsDecl::new().request(THEME),
//!     |props: &ResolvedProps<'_>, _: &mut ScopeStack| props.require(THEME),
//! );
//!
//! // A panel that may override `theme` for everything below it.
//! let panel = WithDefaults::new(
//!     "Panel",
//!     DefaultsDecl::new().request(THEME),
//!     |_: &ResolvedProps<'_>, tree: &mut ScopeStack| leaf.render(tree, &PropertyBag::new()),
//! );
//!
//! assert_eq!(leaf.render(&mut tree, &PropertyBag::new()), Ok("light"));
//!
//! let dark = PropertyBag::new().with(THEME, "dark");
//! assert_eq!(panel.render(&mut tree, &dark), Ok("dark"));
//!
//! // Siblings outside the panel are unaffected.
//! assert_eq!(leaf.render(&mut tree, &PropertyBag::new()), Ok("light"));
//! ```
//!
//! ## Logging
//!
//! [`WithDefaults::render`] sends diagnostics to [`TracingSink`], which logs
//! them with `tracing::warn!`. Use [`WithDefaults::render_with_sink`] to
//! collect them instead.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod bag;
mod diagnostic;
mod host;
mod id;
mod provider;
mod republish;
mod resolve;
mod scope;
mod validate;
mod value;

pub use bag::PropertyBag;
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, IgnoreDiagnostics, TracingSink};
pub use host::{ScopeHost, ScopeStack, provide};
pub use id::Prop;
pub use provider::WithDefaults;
pub use republish::republish;
pub use resolve::{ResolveError, ResolveMode, ResolvedProps, ValueOrigin, resolve};
pub use scope::{DefaultMap, FixedMap, MergeMode, ScopeValues, ScopeValuesBuilder, publish};
pub use validate::{DefaultsDecl, Validation, validate};
pub use value::{DefaultProducer, ErasedValue, constant, producer};
