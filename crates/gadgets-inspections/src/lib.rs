//! Inspections over reference type checks.
//!
//! The callers are expected to reduce their syntax trees to [`InstanceofSite`]s: the operand
//! type, the checked type and the source range of the checked type reference. Everything
//! here is a pure query against a [`gadgets_types::TypeHierarchy`].

mod checker;
mod diagnostics;
mod instanceof;

pub use crate::checker::{check, check_with_policy, Verdict};
pub use crate::diagnostics::{
    DiagnosticSink, INSTANCEOF_INCOMPATIBLE_INTERFACE, INSTANCEOF_INCOMPATIBLE_INTERFACE_MESSAGE,
};
pub use crate::instanceof::{InstanceofIncompatibleInterface, InstanceofSite, SiteType};
