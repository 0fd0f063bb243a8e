// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared controller handles and their cleanup registries.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, Ref, RefCell, RefMut};
use core::fmt;

use smallvec::SmallVec;

/// A teardown callback.
pub type Cleanup = Box<dyn FnOnce()>;

/// An ordered list of teardown callbacks.
///
/// Callbacks run in registration order, each exactly once. After
/// [`run`](Self::run) the registry is empty and can be filled again.
#[derive(Default)]
pub struct CleanupRegistry {
    pending: SmallVec<[Cleanup; 4]>,
}

impl CleanupRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a callback.
    pub fn add(&mut self, cleanup: impl FnOnce() + 'static) {
        self.pending.push(Box::new(cleanup));
    }

    /// Appends an already boxed callback.
    pub fn add_boxed(&mut self, cleanup: Cleanup) {
        self.pending.push(cleanup);
    }

    /// Returns the number of pending callbacks.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Runs every pending callback in order and returns how many ran.
    ///
    /// The registry is drained before the first callback runs. If a callback
    /// panics, the ones after it are dropped without running.
    pub fn run(&mut self) -> usize {
        let pending = core::mem::take(&mut self.pending);
        let count = pending.len();
        for cleanup in pending {
            cleanup();
        }
        count
    }
}

impl fmt::Debug for CleanupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupRegistry")
            .field("pending", &self.pending.len())
            .finish()
    }
}

/// Where a controller is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// Created and usable.
    #[default]
    Live,
    /// Torn down by its factory.
    ///
    /// The value is still readable, but no mount site hands it out again.
    Destroyed,
}

struct Inner<C> {
    value: RefCell<C>,
    cleanups: RefCell<CleanupRegistry>,
    state: Cell<LifecycleState>,
}

/// A shared handle to a controller value.
///
/// Cloning the handle is cheap and yields the same controller; use
/// [`ptr_eq`](Self::ptr_eq) to compare identity.
///
/// # Example
///
/// ```rust
/// use understory_controller::Controller;
///
/// let counter = Controller::new(0_u32);
/// let alias = counter.clone();
/// *alias.borrow_mut() += 1;
///
/// assert_eq!(*counter.borrow(), 1);
/// assert!(counter.ptr_eq(&alias));
/// ```
pub struct Controller<C> {
    inner: Rc<Inner<C>>,
}

impl<C> Controller<C> {
    /// Wraps `value` in a new live controller with no cleanups.
    pub fn new(value: C) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                cleanups: RefCell::new(CleanupRegistry::new()),
                state: Cell::new(LifecycleState::Live),
            }),
        }
    }

    /// Borrows the controller value.
    ///
    /// # Panics
    ///
    /// Panics if the value is currently mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, C> {
        self.inner.value.borrow()
    }

    /// Mutably borrows the controller value.
    ///
    /// # Panics
    ///
    /// Panics if the value is currently borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, C> {
        self.inner.value.borrow_mut()
    }

    /// Registers a callback to run when the controller is cleaned up.
    pub fn add_cleanup(&self, cleanup: impl FnOnce() + 'static) {
        self.inner.cleanups.borrow_mut().add(cleanup);
    }

    /// Returns the number of registered cleanups that have not run yet.
    #[must_use]
    pub fn pending_cleanups(&self) -> usize {
        self.inner.cleanups.borrow().len()
    }

    /// Runs the registered cleanups in order and clears them.
    ///
    /// Cleanups may register further cleanups on this controller; those run
    /// on the next call.
    pub fn clean_up(&self) -> usize {
        let mut registry = core::mem::take(&mut *self.inner.cleanups.borrow_mut());
        registry.run()
    }

    /// Returns the lifecycle state.
    #[must_use]
    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.inner.state.get()
    }

    /// Returns `true` until the controller has been destroyed.
    #[must_use]
    #[inline]
    pub fn is_live(&self) -> bool {
        self.state() == LifecycleState::Live
    }

    pub(crate) fn mark_destroyed(&self) {
        self.inner.state.set(LifecycleState::Destroyed);
    }

    /// Returns `true` if both handles refer to the same controller.
    #[must_use]
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<C> Clone for Controller<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for Controller<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Controller");
        match self.inner.value.try_borrow() {
            Ok(value) => s.field("value", &*value),
            Err(_) => s.field("value", &"<borrowed>"),
        };
        s.field("state", &self.state())
            .field("pending_cleanups", &self.pending_cleanups())
            .finish()
    }
}
