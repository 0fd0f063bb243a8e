// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One place in the tree where a controller is mounted.

use alloc::string::String;
use core::fmt;

use understory_defaults::{MergeMode, ScopeHost, ScopeValues, provide};

use crate::controller::{Cleanup, Controller};
use crate::error::{ControllerFactoryFailure, LifecycleStage};
use crate::factory::ControllerFactory;
use crate::registry::{ControllerRegistry, tear_down};

/// A controller mounted at one site, with its factory.
///
/// The site drives the controller through its lifecycle:
///
/// - [`mount`](Self::mount) acquires the controller, shared if keyed, and
///   runs the first update cycle;
/// - [`update`](Self::update) starts another cycle whenever the site
///   re-renders;
/// - [`provide`](Self::provide) publishes the controller's
///   [`default_props`](ControllerFactory::default_props) for the subtree;
/// - [`unmount`](Self::unmount) ends the site. An unkeyed controller is
///   destroyed here; a keyed one is left to its registry.
///
/// Every mounted site must end with [`unmount`](Self::unmount). Dropping a
/// site instead skips its cycle cleanup and keeps its use of a keyed
/// controller counted, so the registry never prunes that key.
///
/// # Example
///
/// ```rust
/// use core::convert::Infallible;
/// use understory_controller::{ControllerCallbacks, ControllerMount, ControllerRegistry};
/// use understory_defaults::{Prop, PropertyBag, ScopeHost, ScopeStack, ScopeValues, resolve};
///
/// const COUNT: Prop<u32> = Prop::new("count");
///
/// let factory = ControllerCallbacks::<u32, Infallible>::new(|| Ok(3)).with_default_props(|ctr| {
///     let count = *ctr.borrow();
///     ScopeValues::builder().default_value(COUNT, count).build()
/// });
///
/// let mut registry = ControllerRegistry::new();
/// let mut tree = ScopeStack::new();
///
/// let site = ControllerMount::mount(&mut registry, factory, None).unwrap();
///
/// let seen = site.provide(&mut tree, |tree| {
///     let explicit = PropertyBag::new();
///     resolve(&explicit, tree.current(), Default::default()).require(COUNT)
/// });
/// assert_eq!(seen, Ok(3));
///
/// site.unmount(&mut registry).unwrap();
/// ```
#[must_use = "a mounted site must be ended with `unmount`"]
pub struct ControllerMount<F: ControllerFactory> {
    factory: F,
    key: Option<String>,
    ctr: Controller<F::Controller>,
    cycle_cleanup: Option<Cleanup>,
}

impl<F: ControllerFactory> ControllerMount<F> {
    /// Mounts a site, acquiring its controller from `registry` and running
    /// the first [`update`](Self::update) cycle.
    ///
    /// If that update fails, the site is unmounted again before the error
    /// is returned, so the acquisition is not left counted.
    pub fn mount(
        registry: &mut ControllerRegistry<F::Controller>,
        factory: F,
        key: Option<&str>,
    ) -> Result<Self, ControllerFactoryFailure<F::Error>> {
        let ctr = registry.acquire(key, &factory)?;
        let mut site = Self {
            factory,
            key: key.map(String::from),
            ctr,
            cycle_cleanup: None,
        };
        if let Err(failure) = site.update() {
            if let Err(unwind) = site.unmount(registry) {
                tracing::warn!(
                    key,
                    stage = %unwind.stage,
                    "unmounting after a failed first update also failed"
                );
            }
            return Err(failure);
        }
        Ok(site)
    }

    /// Returns the controller.
    #[must_use]
    #[inline]
    pub fn controller(&self) -> &Controller<F::Controller> {
        &self.ctr
    }

    /// Returns the factory.
    #[must_use]
    #[inline]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Returns the registry key, if the controller is shared.
    #[must_use]
    #[inline]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Starts a new update cycle.
    ///
    /// The previous cycle's cleanup runs first; then the factory's
    /// [`update`](ControllerFactory::update) is called and any cleanup it
    /// returns is kept for the next cycle or for unmount.
    pub fn update(&mut self) -> Result<(), ControllerFactoryFailure<F::Error>> {
        self.end_cycle();
        let cleanup = self.factory.update(&self.ctr).map_err(|source| {
            ControllerFactoryFailure::new(LifecycleStage::Update, self.key.as_deref(), source)
        })?;
        self.cycle_cleanup = cleanup;
        Ok(())
    }

    /// Returns the defaults the controller publishes for its subtree.
    #[must_use]
    pub fn default_props(&self) -> ScopeValues {
        self.factory.default_props(&self.ctr)
    }

    /// Runs `f` with [`default_props`](Self::default_props) layered over the
    /// host's current scope.
    pub fn provide<H, R>(&self, host: &mut H, f: impl FnOnce(&mut H) -> R) -> R
    where
        H: ScopeHost + ?Sized,
    {
        let local = self.default_props();
        provide(host, &local, MergeMode::Extend, f)
    }

    /// Ends this site.
    ///
    /// The pending cycle cleanup runs. An unkeyed controller is then
    /// destroyed and its cleanup registry drained. A keyed controller is
    /// released back to `registry`, which destroys it only under
    /// [`RetentionPolicy::ReleaseWhenUnused`](crate::RetentionPolicy::ReleaseWhenUnused)
    /// once no other site uses it.
    pub fn unmount(
        mut self,
        registry: &mut ControllerRegistry<F::Controller>,
    ) -> Result<(), ControllerFactoryFailure<F::Error>> {
        self.end_cycle();
        match self.key.as_deref() {
            None => tear_down(&self.factory, &self.ctr, None),
            Some(key) => match registry.release_use(key, &self.ctr) {
                Some(ctr) => tear_down(&self.factory, &ctr, Some(key)),
                None => Ok(()),
            },
        }
    }

    fn end_cycle(&mut self) {
        if let Some(cleanup) = self.cycle_cleanup.take() {
            cleanup();
        }
    }
}

impl<F> fmt::Debug for ControllerMount<F>
where
    F: ControllerFactory + fmt::Debug,
    F::Controller: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerMount")
            .field("factory", &self.factory)
            .field("key", &self.key)
            .field("ctr", &self.ctr)
            .field("cycle_cleanup", &self.cycle_cleanup.is_some())
            .finish()
    }
}
