//! Class name filters used to exclude types from inspections.
//!
//! A filter is a pattern over JVM class names where `*` matches any run of characters
//! (`java.lang.*`, `*Test`, `com.acme.*.internal.*`). Everything else is literal and the whole
//! name must match.

use std::fmt;
use std::sync::OnceLock;

use gadgets_types::{jvm_class_name, ClassId, TypeHierarchy};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct ClassFilter {
    /// Class name pattern. `*` is the only wildcard.
    pub pattern: String,
    /// Disabled filters are kept in the list but never match.
    #[serde(default = "ClassFilter::default_enabled")]
    pub enabled: bool,
    #[serde(skip)]
    #[schemars(skip)]
    matcher: OnceLock<Option<Regex>>,
}

impl ClassFilter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            enabled: Self::default_enabled(),
            matcher: OnceLock::new(),
        }
    }

    fn default_enabled() -> bool {
        true
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
        self.matcher = OnceLock::new();
    }

    /// Whether `name` matches the pattern, ignoring [`ClassFilter::enabled`].
    pub fn matches(&self, name: &str) -> bool {
        self.matcher
            .get_or_init(|| compile_pattern(&self.pattern))
            .as_ref()
            .is_some_and(|re| re.is_match(name))
    }

    pub(crate) fn compiles(&self) -> bool {
        compile_pattern(&self.pattern).is_some()
    }
}

fn compile_pattern(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{body}$")).ok()
}

impl Clone for ClassFilter {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            enabled: self.enabled,
            matcher: OnceLock::new(),
        }
    }
}

impl PartialEq for ClassFilter {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.enabled == other.enabled
    }
}

impl Eq for ClassFilter {}

impl fmt::Debug for ClassFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassFilter")
            .field("pattern", &self.pattern)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Ordered, editable list of [`ClassFilter`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassFilterList {
    filters: Vec<ClassFilter>,
    class_delimiter: String,
}

impl Default for ClassFilterList {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            class_delimiter: "$".to_string(),
        }
    }
}

impl From<Vec<ClassFilter>> for ClassFilterList {
    fn from(filters: Vec<ClassFilter>) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }
}

impl ClassFilterList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delimiter placed between an outer class and a nested class by
    /// [`ClassFilterList::add_class`].
    pub fn set_class_delimiter(&mut self, delimiter: impl Into<String>) {
        self.class_delimiter = delimiter.into();
    }

    pub fn class_delimiter(&self) -> &str {
        &self.class_delimiter
    }

    pub fn set_filters(&mut self, filters: impl IntoIterator<Item = ClassFilter>) {
        self.filters.clear();
        self.filters.extend(filters);
    }

    /// Current filters. Entries with an empty pattern are dropped first.
    pub fn filters(&mut self) -> &[ClassFilter] {
        self.filters.retain(|filter| !filter.pattern.is_empty());
        &self.filters
    }

    pub fn get(&self, index: usize) -> Option<&ClassFilter> {
        self.filters.get(index)
    }

    pub fn index_of(&self, filter: &ClassFilter) -> Option<usize> {
        self.filters.iter().position(|f| f == filter)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn add_pattern(&mut self, pattern: impl Into<String>) -> usize {
        self.filters.push(ClassFilter::new(pattern));
        self.filters.len() - 1
    }

    /// Add a filter matching exactly `class`. Returns the new row, or `None` when the
    /// class (or one of its enclosing classes) does not resolve.
    pub fn add_class<H: TypeHierarchy + ?Sized>(
        &mut self,
        env: &H,
        class: ClassId,
    ) -> Option<usize> {
        let name = jvm_class_name(env, class, &self.class_delimiter)?;
        Some(self.add_pattern(name))
    }

    pub fn remove(&mut self, index: usize) -> Option<ClassFilter> {
        (index < self.filters.len()).then(|| self.filters.remove(index))
    }

    /// Returns `false` if `index` is out of range.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.filters.get_mut(index) {
            Some(filter) => {
                filter.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Returns `false` if `index` is out of range.
    pub fn set_pattern(&mut self, index: usize, pattern: impl Into<String>) -> bool {
        match self.filters.get_mut(index) {
            Some(filter) => {
                filter.set_pattern(pattern);
                true
            }
            None => false,
        }
    }

    /// Whether any enabled, non-empty filter matches `name`.
    pub fn matches_any(&self, name: &str) -> bool {
        self.filters
            .iter()
            .filter(|filter| filter.enabled && !filter.pattern.is_empty())
            .any(|filter| filter.matches(name))
    }
}
