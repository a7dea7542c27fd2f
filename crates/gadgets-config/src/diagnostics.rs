use serde::de::DeserializeOwned;

/// Combined diagnostics produced while loading and validating a gadgets config.
///
/// Loading is best effort: callers always get a `GadgetsConfig` when deserialization succeeds,
/// plus the issues that may change runtime behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    /// Keys present in the input TOML that the schema does not know, with full paths
    /// (`inspections.instanceof_incompatible_interface.enabeld`).
    pub unknown_keys: Vec<String>,
    pub warnings: Vec<ConfigWarning>,
}

impl ConfigDiagnostics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unknown_keys.is_empty() && self.warnings.is_empty()
    }

    pub(crate) fn extend_validation(&mut self, validation: ValidationDiagnostics) {
        self.warnings.extend(validation.warnings);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationDiagnostics {
    pub warnings: Vec<ConfigWarning>,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    LoggingLevelInvalid {
        value: String,
        normalized: String,
    },
    /// Empty patterns are ignored.
    ClassFilterEmptyPattern {
        toml_path: String,
    },
    ClassFilterInvalidPattern {
        toml_path: String,
        pattern: String,
    },
}

pub(crate) fn deserialize_toml_with_unknown_keys<T: DeserializeOwned>(
    text: &str,
) -> Result<(T, Vec<String>), toml::de::Error> {
    let mut unknown = Vec::new();
    let value = serde_ignored::deserialize(toml::de::Deserializer::new(text), |path| {
        unknown.push(toml_key_path(&path));
    })?;
    unknown.sort();
    unknown.dedup();
    Ok((value, unknown))
}

/// Render an ignored-key path the way it is written in TOML: `a.b[0].c`.
fn toml_key_path(path: &serde_ignored::Path<'_>) -> String {
    let mut out = String::new();
    push_key_path(&mut out, path);
    out
}

fn push_key_path(out: &mut String, path: &serde_ignored::Path<'_>) {
    use serde_ignored::Path;

    match path {
        Path::Root => {}
        Path::Seq { parent, index } => {
            push_key_path(out, parent);
            out.push_str(&format!("[{index}]"));
        }
        Path::Map { parent, key } => {
            push_key_path(out, parent);
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(key);
        }
        // `Option` and newtype wrappers do not appear in TOML.
        Path::Some { parent }
        | Path::NewtypeStruct { parent }
        | Path::NewtypeVariant { parent } => push_key_path(out, parent),
    }
}
