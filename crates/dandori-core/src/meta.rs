//! Descriptive parameter metadata.
//!
//! Wizards and other front-ends read this to know what an action expects.
//! Execution never consults it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata about a single parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl ParamMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Sets the default value. Values that do not serialize are ignored.
    pub fn default_value(mut self, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.default_value = Some(json_value);
        }
        self
    }

    /// `true` only when explicitly marked required.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// Parameter name to [`ParamMeta`], ordered by name.
///
/// # Examples
///
/// ```
/// use dandori_core::{ParamMeta, ParamsMeta};
///
/// let meta = ParamsMeta::new()
///     .with("name", ParamMeta::new().description("Package name").required(true))
///     .with("license", ParamMeta::new().default_value("MIT"));
///
/// assert_eq!(meta.len(), 2);
/// assert_eq!(meta.required_names().collect::<Vec<_>>(), vec!["name"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamsMeta(BTreeMap<String, ParamMeta>);

impl ParamsMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the metadata for `name`.
    pub fn with(mut self, name: impl Into<String>, meta: ParamMeta) -> Self {
        self.0.insert(name.into(), meta);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamMeta> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamMeta)> {
        self.0.iter().map(|(name, meta)| (name.as_str(), meta))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the parameters marked required.
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, meta)| meta.is_required())
            .map(|(name, _)| name)
    }
}

impl FromIterator<(String, ParamMeta)> for ParamsMeta {
    fn from_iter<I: IntoIterator<Item = (String, ParamMeta)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
