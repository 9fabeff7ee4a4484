//! Selector configuration
//!
//! [`SelectorConfig`] mirrors the declarative attributes of the scope
//! selector. It accepts camelCase keys and the lowercase attribute
//! spellings (`allowedscopes`, `preventcustomscopes`, `autovalidate`), and
//! treats `legacy` as another name for `compatibility`.

use crate::allow_list::AllowListEntry;
use crate::error::{Result, ScopeError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial state and behaviour of a [`crate::ScopeSelector`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SelectorConfig {
    /// Initially selected scopes
    pub value: Vec<String>,
    /// Optional allow-list
    #[serde(alias = "allowedscopes", alias = "allowed_scopes")]
    pub allowed_scopes: Option<Vec<AllowListEntry>>,
    /// Reject scopes outside the allow-list
    #[serde(alias = "preventcustomscopes", alias = "prevent_custom_scopes")]
    pub prevent_custom_scopes: bool,
    /// An empty list fails validation
    pub required: bool,
    /// Validate after every list mutation
    #[serde(alias = "autovalidate", alias = "auto_validate")]
    pub auto_validate: bool,
    /// Compatibility styling flag (also accepted as `legacy`)
    #[serde(alias = "legacy")]
    pub compatibility: bool,
    /// Ignore user submissions and removals
    #[serde(alias = "readonly", alias = "read_only")]
    pub read_only: bool,
    /// Ignore user submissions and removals
    pub disabled: bool,
    /// Form field name
    pub name: Option<String>,
}

impl SelectorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With initial value
    #[must_use]
    pub fn with_value<I, S>(mut self, value: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value = value.into_iter().map(Into::into).collect();
        self
    }

    /// With allow-list
    #[must_use]
    pub fn with_allowed_scopes<I, E>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<AllowListEntry>,
    {
        self.allowed_scopes = Some(entries.into_iter().map(Into::into).collect());
        self
    }

    /// With custom scopes prevented
    #[inline]
    #[must_use]
    pub fn with_prevent_custom_scopes(mut self, prevent: bool) -> Self {
        self.prevent_custom_scopes = prevent;
        self
    }

    /// With required flag
    #[inline]
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// With auto-validation
    #[inline]
    #[must_use]
    pub fn with_auto_validate(mut self, auto_validate: bool) -> Self {
        self.auto_validate = auto_validate;
        self
    }

    /// With compatibility (legacy) flag
    #[inline]
    #[must_use]
    pub fn with_compatibility(mut self, compatibility: bool) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// With read-only flag
    #[inline]
    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// With disabled flag
    #[inline]
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// With form field name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse from JSON
    ///
    /// # Errors
    /// Returns [`ScopeError::Json`] on malformed input or unknown keys.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parse from YAML
    ///
    /// # Errors
    /// Returns [`ScopeError::Yaml`] on malformed input or unknown keys.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// Returns [`ScopeError::Toml`] on malformed input or unknown keys.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Load from a file, choosing the format by extension
    ///
    /// # Errors
    /// Returns [`ScopeError::Config`] when the path has no extension,
    /// [`ScopeError::UnsupportedFormat`] for extensions other than `json`,
    /// `yaml`, `yml` and `toml`, or the underlying I/O / parse error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let Some(ext) = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
        else {
            return Err(ScopeError::Config(format!(
                "cannot tell the format of {} without a file extension",
                path.display()
            )));
        };
        let raw = std::fs::read_to_string(path)?;
        let config = match ext.as_str() {
            "json" => Self::from_json_str(&raw)?,
            "yaml" | "yml" => Self::from_yaml_str(&raw)?,
            "toml" => Self::from_toml_str(&raw)?,
            other => return Err(ScopeError::UnsupportedFormat(other.to_string())),
        };
        tracing::debug!("Loaded selector configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn attribute_spellings_are_accepted() {
        let config = SelectorConfig::from_json_str(
            r#"{"allowedscopes": ["test"], "preventcustomscopes": true, "autovalidate": true}"#,
        )
        .unwrap();
        assert_eq!(config.allowed_scopes, Some(vec![AllowListEntry::from("test")]));
        assert!(config.prevent_custom_scopes);
        assert!(config.auto_validate);
    }

    #[test]
    fn legacy_is_compatibility() {
        let config = SelectorConfig::from_json_str(r#"{"legacy": true}"#).unwrap();
        assert!(config.compatibility);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SelectorConfig::from_json_str(r#"{"colour": "red"}"#).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn yaml_and_toml_parse() {
        let yaml = SelectorConfig::from_yaml_str(
            "value: [openid]\nallowedScopes:\n  - label: openid\n    description: Sign in\n",
        )
        .unwrap();
        assert_eq!(yaml.value, vec!["openid"]);
        assert_eq!(
            yaml.allowed_scopes.unwrap()[0].description(),
            Some("Sign in")
        );

        let toml = SelectorConfig::from_toml_str("required = true\nname = \"scopes\"\n").unwrap();
        assert!(toml.required);
        assert_eq!(toml.name.as_deref(), Some("scopes"));
    }

    #[test]
    fn from_path_dispatches_on_extension() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"value": ["a", "b"], "required": true}}"#).unwrap();
        let config = SelectorConfig::from_path(file.path()).unwrap();
        assert_eq!(config.value, vec!["a", "b"]);
        assert!(config.required);
    }

    #[test]
    fn from_path_rejects_unknown_extension() {
        let file = Builder::new().suffix(".ini").tempfile().unwrap();
        let err = SelectorConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ScopeError::UnsupportedFormat(ext) if ext == "ini"));
    }

    #[test]
    fn from_path_without_extension_is_config_error() {
        let file = Builder::new().prefix("selector").tempfile().unwrap();
        let err = SelectorConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ScopeError::Config(_)));
        assert!(err.is_config_error());
        assert!(err.to_string().contains("without a file extension"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SelectorConfig::from_path("/nonexistent/selector.json").unwrap_err();
        assert!(matches!(err, ScopeError::Io(_)));
    }

    #[test]
    fn builder_sets_fields() {
        let config = SelectorConfig::new()
            .with_value(["a"])
            .with_allowed_scopes(["a", "b"])
            .with_prevent_custom_scopes(true)
            .with_required(true)
            .with_name("scope");
        assert_eq!(config.value, vec!["a"]);
        assert!(config.prevent_custom_scopes);
        assert!(config.required);
        assert_eq!(config.name.as_deref(), Some("scope"));
    }
}
