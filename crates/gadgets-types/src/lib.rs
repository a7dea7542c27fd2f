//! Shared types used across gadgets crates.
//!
//! This crate owns the diagnostic vocabulary (spans, severities, diagnostics) and the
//! class hierarchy model that inspections query. Hosts plug their own symbol tables in
//! through [`TypeHierarchy`]; [`MemoryHierarchy`] is the in-memory implementation used by
//! tests and small embedders.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod hierarchy;
mod memory;
mod mutual;
mod names;

pub use crate::hierarchy::{
    ClassDef, ClassId, ClassKind, ExtensibilityPolicy, TypeHierarchy,
};
pub use crate::memory::{ClassDecl, HierarchyBuilder, HierarchyError, MemoryHierarchy};
pub use crate::mutual::{
    all_subtypes, exists_mutual_subclass, is_inheritor, supertype_closure,
};
pub use crate::names::jvm_class_name;

/// A byte-span into a source string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        code: &'static str,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            span,
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(Severity::Error, code, message, span)
    }

    pub fn warning(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(Severity::Warning, code, message, span)
    }
}
