// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

/// The factory callback that failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleStage {
    /// [`ControllerFactory::create`](crate::ControllerFactory::create).
    Create,
    /// [`ControllerFactory::update`](crate::ControllerFactory::update).
    Update,
    /// [`ControllerFactory::destroy`](crate::ControllerFactory::destroy).
    Destroy,
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Destroy => "destroy",
        })
    }
}

/// A factory callback returned an error.
///
/// Failures are passed through unchanged in `source`; nothing is retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerFactoryFailure<E> {
    /// Which callback failed.
    pub stage: LifecycleStage,
    /// The registry key of the controller, if it is shared.
    pub key: Option<String>,
    /// The factory's error.
    pub source: E,
}

impl<E> ControllerFactoryFailure<E> {
    pub(crate) fn new(stage: LifecycleStage, key: Option<&str>, source: E) -> Self {
        Self {
            stage,
            key: key.map(String::from),
            source,
        }
    }
}

impl<E: fmt::Display> fmt::Display for ControllerFactoryFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(
                f,
                "controller {} failed for key `{key}`: {}",
                self.stage, self.source
            ),
            None => write!(f, "controller {} failed: {}", self.stage, self.source),
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for ControllerFactoryFailure<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.source)
    }
}
