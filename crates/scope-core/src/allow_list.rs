//! Allow-list matching
//!
//! An allow-list restricts which scopes may be added. Entries are either
//! bare labels or `{label, description}` records; only the label takes part
//! in matching. Matching is exact and case-sensitive.

use crate::scope::Scope;
use serde::{Deserialize, Serialize};

/// One allow-list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowListEntry {
    /// Bare string; it is its own label
    Label(String),
    /// Labelled record with optional human-readable description
    Described {
        /// Comparable scope text
        label: String,
        /// Text shown next to the scope
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl AllowListEntry {
    /// Create a described entry
    #[inline]
    #[must_use]
    pub fn described(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Described {
            label: label.into(),
            description: Some(description.into()),
        }
    }

    /// Comparable label of the entry
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Label(label) | Self::Described { label, .. } => label,
        }
    }

    /// Description, for record entries that carry one
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Label(_) => None,
            Self::Described { description, .. } => description.as_deref(),
        }
    }
}

impl From<&str> for AllowListEntry {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<String> for AllowListEntry {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

/// Decides whether a candidate scope may be stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowListMatcher {
    allowed: Option<Vec<AllowListEntry>>,
    prevent_custom: bool,
}

impl AllowListMatcher {
    /// Unrestricted matcher
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With allow-list
    #[inline]
    #[must_use]
    pub fn with_allowed<I, E>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<AllowListEntry>,
    {
        self.allowed = Some(entries.into_iter().map(Into::into).collect());
        self
    }

    /// With custom scopes prevented
    #[inline]
    #[must_use]
    pub fn with_prevent_custom(mut self, prevent: bool) -> Self {
        self.prevent_custom = prevent;
        self
    }

    /// Configured allow-list, if any
    #[inline]
    #[must_use]
    pub fn allowed(&self) -> Option<&[AllowListEntry]> {
        self.allowed.as_deref()
    }

    /// Replace the allow-list wholesale
    pub fn set_allowed(&mut self, allowed: Option<Vec<AllowListEntry>>) {
        self.allowed = allowed;
    }

    /// Whether scopes outside the allow-list are rejected
    #[inline]
    #[must_use]
    pub fn prevent_custom(&self) -> bool {
        self.prevent_custom
    }

    /// Set whether scopes outside the allow-list are rejected
    pub fn set_prevent_custom(&mut self, prevent: bool) {
        self.prevent_custom = prevent;
    }

    /// Whether matching actually restricts anything
    ///
    /// An absent or empty allow-list cannot restrict, even when custom
    /// scopes are prevented.
    #[inline]
    #[must_use]
    pub fn is_restricting(&self) -> bool {
        self.prevent_custom && self.allowed.as_ref().is_some_and(|a| !a.is_empty())
    }

    /// Check a candidate against the allow-list
    #[must_use]
    pub fn is_allowed(&self, candidate: &str) -> bool {
        if !self.is_restricting() {
            return true;
        }
        self.find(candidate).is_some()
    }

    /// Canonical stored form of an approved candidate
    ///
    /// The typed text is stored as-is; a matching label is never
    /// substituted for it.
    #[inline]
    #[must_use]
    pub fn canonicalize(&self, candidate: Scope) -> Scope {
        candidate
    }

    /// Entry whose label equals `label`
    #[must_use]
    pub fn find(&self, label: &str) -> Option<&AllowListEntry> {
        self.allowed
            .as_ref()?
            .iter()
            .find(|entry| entry.label() == label)
    }

    /// Description of the entry matching `scope`
    #[must_use]
    pub fn description_for(&self, scope: &str) -> Option<&str> {
        self.find(scope).and_then(AllowListEntry::description)
    }

    /// Entries whose label contains `query`, ignoring case
    ///
    /// Entries rejected by `exclude` are skipped. Allow-list order is kept.
    pub fn suggestions<'a, F>(&'a self, query: &str, exclude: F) -> Vec<&'a AllowListEntry>
    where
        F: Fn(&str) -> bool,
    {
        let needle = query.trim().to_lowercase();
        self.allowed
            .iter()
            .flatten()
            .filter(|entry| !exclude(entry.label()))
            .filter(|entry| needle.is_empty() || entry.label().to_lowercase().contains(&needle))
            .collect()
    }
}
