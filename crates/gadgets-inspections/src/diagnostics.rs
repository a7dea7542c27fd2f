use gadgets_types::{Diagnostic, Severity, Span};

/// Diagnostic code for an `instanceof` whose interface no operand value can implement.
pub const INSTANCEOF_INCOMPATIBLE_INTERFACE: &str = "instanceof-incompatible-interface";

pub const INSTANCEOF_INCOMPATIBLE_INTERFACE_MESSAGE: &str =
    "'instanceof' with incompatible interface";

/// Receives diagnostics as inspections produce them.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

pub(crate) fn incompatible_interface(severity: Severity, cast_type_span: Span) -> Diagnostic {
    Diagnostic::new(
        severity,
        INSTANCEOF_INCOMPATIBLE_INTERFACE,
        INSTANCEOF_INCOMPATIBLE_INTERFACE_MESSAGE,
        Some(cast_type_span),
    )
}
