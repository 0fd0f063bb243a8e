// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Controller: stateful controllers mounted into default scopes.
//!
//! A controller is a caller-defined stateful object that lives alongside a
//! subtree and publishes defaults for it. This crate manages when it is
//! built, updated and torn down, and lets mount sites share one controller
//! through a string key.
//!
//! ## Core Concepts
//!
//! - [`Controller`]: a shared handle to the controller value, with a
//!   [`CleanupRegistry`] of teardown callbacks that run once, in order.
//! - [`ControllerFactory`]: the callbacks for one mount site. Implement the
//!   trait or assemble a [`ControllerCallbacks`] from closures.
//! - [`ControllerRegistry`]: the keyed controllers of one session. It is an
//!   ordinary value passed to each mount site, never a global.
//! - [`ControllerMount`]: a single mount site.
//!
//! ## Lifecycle
//!
//! An unkeyed controller belongs to its mount site: it is created on
//! [`mount`](ControllerMount::mount) and destroyed on
//! [`unmount`](ControllerMount::unmount). Mounting also runs the first
//! [`update`](ControllerMount::update) cycle. A keyed controller is created by
//! the first site that asks for its key and then shared. What happens when
//! the last site using it unmounts is the registry's [`RetentionPolicy`]:
//! by default it stays live for the whole session, and
//! [`ControllerRegistry::release`] removes it explicitly.
//!
//! Destroying a controller calls the factory's
//! [`destroy`](ControllerFactory::destroy) and then drains its cleanup
//! registry. Callback errors are returned as [`ControllerFactoryFailure`]
//! and never swallowed. A failed `create` leaves no registry entry behind.
//!
//! ## Example
//!
//! ```rust
//! use core::convert::Infallible;
//! use understory_controller::{ControllerCallbacks, ControllerMount, ControllerRegistry};
//!
//! let factory = || ControllerCallbacks::<Vec<&'static str>, Infallible>::new(|| Ok(Vec::new()));
//! let mut registry = ControllerRegistry::new();
//!
//! let list = ControllerMount::mount(&mut registry, factory(), Some("list")).unwrap();
//! let detail = ControllerMount::mount(&mut registry, factory(), Some("list")).unwrap();
//!
//! list.controller().borrow_mut().push("item");
//! assert_eq!(detail.controller().borrow().len(), 1);
//!
//! list.unmount(&mut registry).unwrap();
//! detail.unmount(&mut registry).unwrap();
//! assert!(registry.contains("list"));
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod controller;
mod error;
mod factory;
mod mount;
mod registry;

pub use controller::{Cleanup, CleanupRegistry, Controller, LifecycleState};
pub use error::{ControllerFactoryFailure, LifecycleStage};
pub use factory::{ControllerCallbacks, ControllerFactory};
pub use mount::ControllerMount;
pub use registry::{ControllerRegistry, RetentionPolicy};
