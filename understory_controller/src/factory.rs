// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caller-supplied controller lifecycle callbacks.

use alloc::boxed::Box;
use core::fmt;

use understory_defaults::ScopeValues;

use crate::controller::{Cleanup, Controller};

/// Builds, updates and tears down controllers for one mount site.
///
/// Only [`create`](Self::create) is required. Every callback may fail with
/// [`Error`](Self::Error); failures reach the caller wrapped in a
/// [`ControllerFactoryFailure`](crate::ControllerFactoryFailure).
pub trait ControllerFactory {
    /// The controller value.
    type Controller;
    /// The error the callbacks may return.
    type Error;

    /// Builds a new controller value.
    fn create(&self) -> Result<Self::Controller, Self::Error>;

    /// Called once when a site mounts and again on every later update.
    ///
    /// A returned cleanup runs before the next update or at unmount,
    /// whichever comes first.
    fn update(&self, ctr: &Controller<Self::Controller>) -> Result<Option<Cleanup>, Self::Error> {
        let _ = ctr;
        Ok(None)
    }

    /// Releases the controller.
    ///
    /// Runs before the controller's registered cleanups.
    fn destroy(&self, ctr: &Controller<Self::Controller>) -> Result<(), Self::Error> {
        let _ = ctr;
        Ok(())
    }

    /// The defaults this controller publishes for its subtree.
    fn default_props(&self, ctr: &Controller<Self::Controller>) -> ScopeValues {
        let _ = ctr;
        ScopeValues::new()
    }
}

type UpdateFn<C, E> = Box<dyn Fn(&Controller<C>) -> Result<Option<Cleanup>, E>>;
type DestroyFn<C, E> = Box<dyn Fn(&Controller<C>) -> Result<(), E>>;
type DefaultPropsFn<C> = Box<dyn Fn(&Controller<C>) -> ScopeValues>;

/// A [`ControllerFactory`] assembled from closures.
///
/// # Example
///
/// ```rust
/// use core::convert::Infallible;
/// use understory_controller::{ControllerCallbacks, ControllerFactory, Controller};
/// use understory_defaults::{Prop, ScopeValues};
///
/// const ZOOM: Prop<f32> = Prop::new("zoom");
///
/// let factory = ControllerCallbacks::<f32, Infallible>::new(|| Ok(1.0))
///     .with_default_props(|ctr| {
///         let zoom = *ctr.borrow();
///         ScopeValues::builder().default_with(ZOOM, move || zoom).build()
///     });
///
/// let ctr = Controller::new(factory.create().unwrap());
/// assert!(factory.default_props(&ctr).contains_default("zoom"));
/// ```
pub struct ControllerCallbacks<C, E> {
    create: Box<dyn Fn() -> Result<C, E>>,
    update: Option<UpdateFn<C, E>>,
    destroy: Option<DestroyFn<C, E>>,
    default_props: Option<DefaultPropsFn<C>>,
}

impl<C, E> ControllerCallbacks<C, E> {
    /// Creates a factory that builds controllers with `create`.
    pub fn new(create: impl Fn() -> Result<C, E> + 'static) -> Self {
        Self {
            create: Box::new(create),
            update: None,
            destroy: None,
            default_props: None,
        }
    }

    /// Sets the update callback.
    #[must_use]
    pub fn on_update(
        mut self,
        update: impl Fn(&Controller<C>) -> Result<Option<Cleanup>, E> + 'static,
    ) -> Self {
        self.update = Some(Box::new(update));
        self
    }

    /// Sets the destroy callback.
    #[must_use]
    pub fn on_destroy(mut self, destroy: impl Fn(&Controller<C>) -> Result<(), E> + 'static) -> Self {
        self.destroy = Some(Box::new(destroy));
        self
    }

    /// Sets the function deriving the subtree's defaults.
    #[must_use]
    pub fn with_default_props(
        mut self,
        default_props: impl Fn(&Controller<C>) -> ScopeValues + 'static,
    ) -> Self {
        self.default_props = Some(Box::new(default_props));
        self
    }
}

impl<C, E> ControllerFactory for ControllerCallbacks<C, E> {
    type Controller = C;
    type Error = E;

    fn create(&self) -> Result<C, E> {
        (self.create)()
    }

    fn update(&self, ctr: &Controller<C>) -> Result<Option<Cleanup>, E> {
        match &self.update {
            Some(update) => update(ctr),
            None => Ok(None),
        }
    }

    fn destroy(&self, ctr: &Controller<C>) -> Result<(), E> {
        match &self.destroy {
            Some(destroy) => destroy(ctr),
            None => Ok(()),
        }
    }

    fn default_props(&self, ctr: &Controller<C>) -> ScopeValues {
        match &self.default_props {
            Some(default_props) => default_props(ctr),
            None => ScopeValues::new(),
        }
    }
}

impl<C, E> fmt::Debug for ControllerCallbacks<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerCallbacks")
            .field("controller", &core::any::type_name::<C>())
            .field("update", &self.update.is_some())
            .field("destroy", &self.destroy.is_some())
            .field("default_props", &self.default_props.is_some())
            .finish_non_exhaustive()
    }
}
