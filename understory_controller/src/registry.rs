// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed controller sharing.

use alloc::string::String;
use core::fmt;

use hashbrown::HashMap;

use crate::controller::Controller;
use crate::error::{ControllerFactoryFailure, LifecycleStage};
use crate::factory::ControllerFactory;

/// What happens to a keyed controller once no mount site uses it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum RetentionPolicy {
    /// Keep every entry until it is released explicitly.
    ///
    /// Keyed controllers behave as session-wide singletons: unmounting the
    /// last site that uses a key leaves the controller live, and the next
    /// mount with that key gets it back.
    #[default]
    Session,
    /// Destroy and remove an entry when its last mount site unmounts.
    ReleaseWhenUnused,
}

struct Entry<C> {
    ctr: Controller<C>,
    users: usize,
}

/// Shared controllers by key.
///
/// One registry is created per application session and passed by reference
/// to every mount site. Unkeyed controllers never enter it.
///
/// # Example
///
/// ```rust
/// use core::convert::Infallible;
/// use understory_controller::{ControllerCallbacks, ControllerRegistry};
///
/// let factory = ControllerCallbacks::<Vec<u32>, Infallible>::new(|| Ok(Vec::new()));
/// let mut registry = ControllerRegistry::new();
///
/// let a = registry.acquire(Some("selection"), &factory).unwrap();
/// let b = registry.acquire(Some("selection"), &factory).unwrap();
/// assert!(a.ptr_eq(&b));
///
/// let c = registry.acquire(None, &factory).unwrap();
/// assert!(!a.ptr_eq(&c));
/// assert_eq!(registry.len(), 1);
/// ```
pub struct ControllerRegistry<C> {
    entries: HashMap<String, Entry<C>>,
    policy: RetentionPolicy,
}

impl<C> ControllerRegistry<C> {
    /// Creates an empty registry with [`RetentionPolicy::Session`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(RetentionPolicy::default())
    }

    /// Creates an empty registry with the given policy.
    #[must_use]
    pub fn with_policy(policy: RetentionPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
        }
    }

    /// Returns the retention policy.
    #[must_use]
    #[inline]
    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Returns the number of keyed controllers.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no keyed controller exists.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a controller is registered under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the controller registered under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Controller<C>> {
        self.entries.get(key).map(|entry| &entry.ctr)
    }

    /// Returns how many acquisitions of `key` have not been released.
    #[must_use]
    pub fn users(&self, key: &str) -> usize {
        self.entries.get(key).map_or(0, |entry| entry.users)
    }

    /// Returns the registered keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Returns a controller for a mount site.
    ///
    /// With a `key`, an existing controller is shared; otherwise `factory`
    /// creates one and it is registered under the key. Without a key a new
    /// controller is always created and the registry is untouched.
    ///
    /// A failed `create` registers nothing.
    pub fn acquire<F>(
        &mut self,
        key: Option<&str>,
        factory: &F,
    ) -> Result<Controller<C>, ControllerFactoryFailure<F::Error>>
    where
        F: ControllerFactory<Controller = C> + ?Sized,
    {
        let Some(key) = key else {
            return create(factory, None);
        };

        if let Some(entry) = self.entries.get_mut(key) {
            entry.users += 1;
            tracing::debug!(key, users = entry.users, "sharing keyed controller");
            return Ok(entry.ctr.clone());
        }

        let ctr = create(factory, Some(key))?;
        self.entries.insert(
            String::from(key),
            Entry {
                ctr: ctr.clone(),
                users: 1,
            },
        );
        Ok(ctr)
    }

    /// Destroys and removes the controller registered under `key`.
    ///
    /// Returns `Ok(false)` if there was none. The entry is removed even if
    /// `destroy` fails.
    pub fn release<F>(
        &mut self,
        key: &str,
        factory: &F,
    ) -> Result<bool, ControllerFactoryFailure<F::Error>>
    where
        F: ControllerFactory<Controller = C> + ?Sized,
    {
        let Some(entry) = self.entries.remove(key) else {
            return Ok(false);
        };
        tracing::debug!(key, users = entry.users, "releasing keyed controller");
        tear_down(factory, &entry.ctr, Some(key))?;
        Ok(true)
    }

    /// Ends one use of `ctr` under `key`.
    ///
    /// Returns the controller if the policy says it should be torn down now,
    /// after removing it from the registry. Nothing changes if `key` now
    /// holds a different controller, as after [`release`](Self::release)
    /// and a fresh acquisition.
    pub(crate) fn release_use(&mut self, key: &str, ctr: &Controller<C>) -> Option<Controller<C>> {
        let entry = self.entries.get_mut(key)?;
        if !entry.ctr.ptr_eq(ctr) {
            tracing::debug!(key, "ignoring unmount of a released controller");
            return None;
        }
        entry.users = entry.users.saturating_sub(1);
        if entry.users > 0 || self.policy == RetentionPolicy::Session {
            return None;
        }
        tracing::debug!(key, "last user gone, pruning keyed controller");
        self.entries.remove(key).map(|entry| entry.ctr)
    }
}

impl<C> Default for ControllerRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ControllerRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("entries", &self.entries.len())
            .field("policy", &self.policy)
            .finish()
    }
}

fn create<F>(
    factory: &F,
    key: Option<&str>,
) -> Result<Controller<F::Controller>, ControllerFactoryFailure<F::Error>>
where
    F: ControllerFactory + ?Sized,
{
    let value = factory
        .create()
        .map_err(|source| ControllerFactoryFailure::new(LifecycleStage::Create, key, source))?;
    tracing::debug!(key, "created controller");
    Ok(Controller::new(value))
}

/// Destroys `ctr`, then runs its cleanups and marks it destroyed.
///
/// If `destroy` fails the error is returned at once; the cleanups stay
/// registered and the controller stays live.
pub(crate) fn tear_down<F>(
    factory: &F,
    ctr: &Controller<F::Controller>,
    key: Option<&str>,
) -> Result<(), ControllerFactoryFailure<F::Error>>
where
    F: ControllerFactory + ?Sized,
{
    factory
        .destroy(ctr)
        .map_err(|source| ControllerFactoryFailure::new(LifecycleStage::Destroy, key, source))?;
    let ran = ctr.clean_up();
    ctr.mark_destroyed();
    tracing::debug!(key, cleanups = ran, "destroyed controller");
    Ok(())
}
