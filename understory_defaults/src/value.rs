// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased property values and lazy producers.
//!
//! This module provides [`ErasedValue`] for storing values of any type in a
//! heterogeneous map, and [`DefaultProducer`] for deferring their creation
//! until read time.

use alloc::rc::Rc;
use core::any::Any;
use core::fmt;

/// A zero-argument function that produces a default value on demand.
///
/// Producers are invoked each time the default is read, never at merge time,
/// so they may observe state that changes between reads. They should be pure
/// or idempotent.
pub type DefaultProducer = Rc<dyn Fn() -> ErasedValue>;

/// Wraps a typed closure as a [`DefaultProducer`].
///
/// ```rust
/// use understory_defaults::producer;
///
/// let make = producer(|| 21 * 2);
/// assert_eq!(make().downcast_ref::<i32>(), Some(&42));
/// ```
pub fn producer<T, F>(f: F) -> DefaultProducer
where
    T: 'static,
    F: Fn() -> T + 'static,
{
    Rc::new(move || ErasedValue::new(f()))
}

/// A producer that always returns a clone of `value`.
///
/// The value is captured by value when the producer is created.
pub fn constant(value: ErasedValue) -> DefaultProducer {
    Rc::new(move || value.clone())
}

/// A type-erased property value.
///
/// The value is reference counted, so cloning an `ErasedValue` never clones
/// the underlying data. Values are recovered with [`downcast_ref`](Self::downcast_ref).
///
/// # Example
///
/// ```rust
/// use understory_defaults::ErasedValue;
///
/// let value = ErasedValue::new(42_i32);
/// assert!(value.is::<i32>());
/// assert_eq!(value.downcast_ref::<i32>(), Some(&42));
/// assert_eq!(value.downcast_ref::<u8>(), None);
///
/// let shared = value.clone();
/// assert!(shared.ptr_eq(&value));
/// ```
#[derive(Clone)]
pub struct ErasedValue {
    inner: Rc<dyn Any>,
    type_name: &'static str,
}

impl ErasedValue {
    /// Erases `value`.
    #[must_use]
    pub fn new<T: 'static>(value: T) -> Self {
        Self {
            inner: Rc::new(value),
            type_name: core::any::type_name::<T>(),
        }
    }

    /// Returns `true` if the contained value is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        (*self.inner).is::<T>()
    }

    /// Attempts to downcast to a reference of type `T`.
    ///
    /// Returns `None` if the contained value is not of type `T`.
    #[must_use]
    #[inline]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        (*self.inner).downcast_ref()
    }

    /// Returns the type name of the contained value, for diagnostics.
    #[must_use]
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if both values share the same allocation.
    #[must_use]
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedValue")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}
