//! Configuration for gadgets inspections (`gadgets.toml`) and process-wide logging setup.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;

use gadgets_types::{ExtensibilityPolicy, Severity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::prelude::*;

mod class_filter;
mod diagnostics;
mod schema;
mod validation;

pub use class_filter::{ClassFilter, ClassFilterList};
pub use diagnostics::{ConfigDiagnostics, ConfigWarning, ValidationDiagnostics};
pub use schema::json_schema;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct GadgetsConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub inspections: InspectionsConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct InspectionsConfig {
    #[serde(default)]
    pub instanceof_incompatible_interface: InstanceofIncompatibleInterfaceConfig,
}

/// Settings for the `instanceof` with incompatible interface inspection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct InstanceofIncompatibleInterfaceConfig {
    #[serde(default = "InstanceofIncompatibleInterfaceConfig::default_enabled")]
    pub enabled: bool,

    /// Severity of reported problems.
    #[serde(default)]
    pub severity: Severity,

    /// Which subtypes the inspection may assume exist beyond the declared hierarchy.
    ///
    /// `open_world` treats every non-final class as extensible, `sealed` additionally closes
    /// sealed hierarchies over their permitted subclasses, and `closed_world` only trusts
    /// declared types.
    #[serde(default)]
    pub extensibility: ExtensibilityPolicy,

    /// Operand or cast types whose JVM name matches one of these filters are never reported.
    #[serde(default)]
    pub excluded_classes: Vec<ClassFilter>,
}

impl InstanceofIncompatibleInterfaceConfig {
    fn default_enabled() -> bool {
        true
    }
}

impl Default for InstanceofIncompatibleInterfaceConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            severity: Severity::default(),
            extensibility: ExtensibilityPolicy::default(),
            excluded_classes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all gadgets crates.
    ///
    /// Either a simple level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Append logs to the given file path. If the file cannot be opened, file logging is
    /// disabled while other sinks remain active.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    /// Map a configured level to `EnvFilter` directives. Bare level names are matched
    /// case-insensitively (`WARNING` -> `warn`); anything else is passed through trimmed.
    pub(crate) fn normalize_level_directives(input: &str) -> String {
        const LEVEL_ALIASES: &[(&str, &str)] = &[
            ("trace", "trace"),
            ("debug", "debug"),
            ("info", "info"),
            ("warn", "warn"),
            ("warning", "warn"),
            ("error", "error"),
        ];

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }
        LEVEL_ALIASES
            .iter()
            .find(|(alias, _)| trimmed.eq_ignore_ascii_case(alias))
            .map_or_else(|| trimmed.to_owned(), |(_, level)| (*level).to_owned())
    }

    /// Effective `EnvFilter` for this config.
    ///
    /// A non-empty `RUST_LOG` is appended to the configured directives. The first of
    /// "configured + env", "env only" and "configured only" that parses wins; `info` is the
    /// last resort.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let configured = Self::normalize_level_directives(&self.level);
        let from_env = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let mut candidates = Vec::with_capacity(3);
        if let Some(env) = from_env {
            candidates.push(format!("{configured},{env}"));
            candidates.push(env);
        }
        candidates.push(configured);

        candidates
            .into_iter()
            .find_map(|directives| tracing_subscriber::EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| tracing_subscriber::EnvFilter::new("info"))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The `Display` impl includes a source snippet; keep only the message.
        ConfigError::Toml(err.message().to_string())
    }
}

impl GadgetsConfig {
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str(&text)
    }

    /// Load a config from a TOML string and return diagnostics (unknown keys and semantic
    /// validation warnings).
    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<GadgetsConfig>(text)?;

        let mut diagnostics = ConfigDiagnostics {
            unknown_keys,
            ..ConfigDiagnostics::default()
        };
        diagnostics.extend_validation(config.validate());

        for key in &diagnostics.unknown_keys {
            tracing::warn!(target: "gadgets.config", key = %key, "unknown config key");
        }

        Ok((config, diagnostics))
    }

    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str_with_diagnostics(&text)
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

static TRACING_INIT: Once = Once::new();

/// Initializes structured `tracing` logging.
///
/// This function is safe to call multiple times; only the first call installs a global
/// subscriber.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let file = config.file.as_ref().and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });
        let file_open_failed = config.file.is_some() && file.is_none();

        let mut make_writer = BoxMakeWriter::new(io::sink);
        if config.stderr {
            // `cargo test` output capture only works for the stdlib's print macros.
            if cfg!(debug_assertions) {
                make_writer = BoxMakeWriter::new(
                    tracing_subscriber::fmt::writer::TestWriter::with_stderr(),
                );
            } else {
                make_writer = BoxMakeWriter::new(std::io::stderr);
            }
        }
        if let Some(file) = file {
            make_writer = BoxMakeWriter::new(make_writer.and(file));
        }

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() && file_open_failed {
            if let Some(path) = config.file.as_ref() {
                tracing::warn!(
                    target: "gadgets.config",
                    path = %path.display(),
                    "failed to open log file; file logging disabled"
                );
            }
        }
    });
}
