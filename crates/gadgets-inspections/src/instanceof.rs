use gadgets_config::{ClassFilterList, InstanceofIncompatibleInterfaceConfig};
use gadgets_types::{
    jvm_class_name, ClassId, Diagnostic, ExtensibilityPolicy, Severity, Span, TypeHierarchy,
};

use crate::checker::{check_with_policy, Verdict};
use crate::diagnostics::{incompatible_interface, DiagnosticSink};

/// Type of one side of an `instanceof` expression, as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteType {
    /// A class or interface type that resolved.
    Class(ClassId),
    /// A class type whose declaration could not be found.
    Unresolved(String),
    /// Primitive, array, null or erroneous types.
    NonClass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceofSite {
    pub operand: SiteType,
    pub cast_type: SiteType,
    /// Range of the checked type reference; reported problems are anchored here.
    pub cast_type_span: Span,
}

impl InstanceofSite {
    pub fn new(operand: SiteType, cast_type: SiteType, cast_type_span: Span) -> Self {
        Self {
            operand,
            cast_type,
            cast_type_span,
        }
    }

    pub fn classes(operand: ClassId, cast_type: ClassId, cast_type_span: Span) -> Self {
        Self::new(
            SiteType::Class(operand),
            SiteType::Class(cast_type),
            cast_type_span,
        )
    }
}

/// Reports `x instanceof I` where `x` has a class type and no subclass of that class can
/// implement the interface `I`.
#[derive(Debug, Clone)]
pub struct InstanceofIncompatibleInterface {
    enabled: bool,
    severity: Severity,
    policy: ExtensibilityPolicy,
    excluded: ClassFilterList,
}

impl Default for InstanceofIncompatibleInterface {
    fn default() -> Self {
        Self::from_config(&InstanceofIncompatibleInterfaceConfig::default())
    }
}

impl InstanceofIncompatibleInterface {
    pub const ID: &'static str = "InstanceofIncompatibleInterface";
    pub const DISPLAY_NAME: &'static str = "'instanceof' with incompatible interface";

    pub fn from_config(config: &InstanceofIncompatibleInterfaceConfig) -> Self {
        Self {
            enabled: config.enabled,
            severity: config.severity,
            policy: config.extensibility,
            excluded: ClassFilterList::from(config.excluded_classes.clone()),
        }
    }

    /// Replace the exclusion list, keeping its nested-class delimiter.
    #[must_use]
    pub fn with_excluded_classes(mut self, excluded: ClassFilterList) -> Self {
        self.excluded = excluded;
        self
    }

    pub fn policy(&self) -> ExtensibilityPolicy {
        self.policy
    }

    /// Check one site and emit at most one diagnostic into `sink`.
    pub fn inspect_site<H, S>(&self, env: &H, site: &InstanceofSite, sink: &mut S)
    where
        H: TypeHierarchy + ?Sized,
        S: DiagnosticSink + ?Sized,
    {
        if !self.enabled {
            return;
        }
        let (SiteType::Class(operand), SiteType::Class(cast_target)) =
            (&site.operand, &site.cast_type)
        else {
            return;
        };
        if self.is_excluded(env, *operand) || self.is_excluded(env, *cast_target) {
            tracing::trace!(
                operand = operand.to_raw(),
                cast_target = cast_target.to_raw(),
                "site excluded by class filter"
            );
            return;
        }

        if check_with_policy(env, *cast_target, *operand, self.policy) == Verdict::Incompatible {
            sink.emit(incompatible_interface(self.severity, site.cast_type_span));
        }
    }

    #[must_use]
    pub fn inspect<H: TypeHierarchy + ?Sized>(
        &self,
        env: &H,
        sites: &[InstanceofSite],
    ) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for site in sites {
            self.inspect_site(env, site, &mut diagnostics);
        }
        diagnostics
    }

    fn is_excluded<H: TypeHierarchy + ?Sized>(&self, env: &H, class: ClassId) -> bool {
        if self.excluded.is_empty() {
            return false;
        }
        jvm_class_name(env, class, self.excluded.class_delimiter())
            .is_some_and(|name| self.excluded.matches_any(&name))
    }
}
