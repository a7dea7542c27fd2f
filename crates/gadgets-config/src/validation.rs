use crate::diagnostics::{ConfigWarning, ValidationDiagnostics};
use crate::{GadgetsConfig, LoggingConfig};

impl GadgetsConfig {
    /// Validate semantic invariants for a configuration.
    ///
    /// Validation is best-effort: it attempts to report as many problems as possible in one pass.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_logging(self, &mut out);
        validate_class_filters(self, &mut out);

        out
    }
}

fn validate_logging(config: &GadgetsConfig, out: &mut ValidationDiagnostics) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }
}

fn validate_class_filters(config: &GadgetsConfig, out: &mut ValidationDiagnostics) {
    let filters = &config
        .inspections
        .instanceof_incompatible_interface
        .excluded_classes;
    for (idx, filter) in filters.iter().enumerate() {
        let toml_path =
            format!("inspections.instanceof_incompatible_interface.excluded_classes[{idx}]");
        if filter.pattern.trim().is_empty() {
            out.warnings
                .push(ConfigWarning::ClassFilterEmptyPattern { toml_path });
        } else if !filter.compiles() {
            out.warnings.push(ConfigWarning::ClassFilterInvalidPattern {
                toml_path,
                pattern: filter.pattern.clone(),
            });
        }
    }
}
