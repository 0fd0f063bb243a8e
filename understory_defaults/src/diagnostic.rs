// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Authoring diagnostics.
//!
//! Validation never changes how properties resolve. It reports suspicious
//! declarations as [`Diagnostic`] records through a [`DiagnosticSink`].
//!
//! Sinks provided here:
//!
//! - [`TracingSink`]: logs each record with `tracing::warn!`.
//! - `Vec<Diagnostic>`: collects records, mostly useful in tests.
//! - [`IgnoreDiagnostics`]: drops everything.

use alloc::vec::Vec;
use core::fmt;

/// The kind of authoring mistake a diagnostic reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A component requested a default that no enclosing scope provides.
    RequestedDefaultMissing,
    /// A component received an explicit value for a name the scope provides
    /// as a default, without requesting that default.
    ///
    /// The explicit value silently hides the default.
    UnrequestedDefaultShadowed,
    /// A component received an explicit value for a fixed default.
    FixedPropertyOverrideAttempt,
}

impl DiagnosticKind {
    /// A short human-readable description.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::RequestedDefaultMissing => "requested default not provided",
            Self::UnrequestedDefaultShadowed => "explicit value shadows an unrequested default",
            Self::FixedPropertyOverrideAttempt => "attempting to override a fixed default",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// One authoring diagnostic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// The property involved.
    pub key: &'static str,
    /// The component being rendered.
    pub component: &'static str,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} `{}`", self.component, self.kind, self.key)
    }
}

/// Receives diagnostics.
///
/// Implementations must not panic or block.
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn emit(&mut self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}

/// A sink that discards every diagnostic.
#[derive(Copy, Clone, Debug, Default)]
pub struct IgnoreDiagnostics;

impl DiagnosticSink for IgnoreDiagnostics {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

/// A sink that logs through `tracing` at `WARN` level.
///
/// Each event carries `kind`, `key` and `component` fields.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = ?diagnostic.kind,
            key = diagnostic.key,
            component = diagnostic.component,
            "{}",
            diagnostic.kind.message()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn sample(kind: DiagnosticKind) -> Diagnostic {
        Diagnostic {
            kind,
            key: "theme",
            component: "Button",
        }
    }

    #[test]
    fn vec_collects_in_order() {
        let mut sink = Vec::new();
        sink.emit(sample(DiagnosticKind::RequestedDefaultMissing));
        sink.emit(sample(DiagnosticKind::FixedPropertyOverrideAttempt));
        assert_eq!(
            sink.iter().map(|d| d.kind).collect::<Vec<_>>(),
            [
                DiagnosticKind::RequestedDefaultMissing,
                DiagnosticKind::FixedPropertyOverrideAttempt
            ]
        );
    }

    #[test]
    fn mut_ref_forwards() {
        fn emit_into<S: DiagnosticSink>(mut sink: S) {
            sink.emit(sample(DiagnosticKind::UnrequestedDefaultShadowed));
        }

        let mut collected = Vec::new();
        emit_into(&mut collected);
        emit_into(&mut collected);
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn ignore_drops() {
        let mut sink = IgnoreDiagnostics;
        sink.emit(sample(DiagnosticKind::RequestedDefaultMissing));
    }

    #[test]
    fn display_names_component_and_key() {
        let text = sample(DiagnosticKind::FixedPropertyOverrideAttempt).to_string();
        assert_eq!(
            text,
            "Button: attempting to override a fixed default `theme`"
        );
    }
}
