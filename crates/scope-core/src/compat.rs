//! Legacy / compatibility flag
//!
//! Both names read and write the same cell, so they cannot disagree.

use serde::{Deserialize, Serialize};

/// Single boolean exposed as both `legacy` and `compatibility`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibilityAlias(bool);

impl CompatibilityAlias {
    /// Create with the given value
    #[inline]
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self(enabled)
    }

    /// Read as `legacy`
    #[inline]
    #[must_use]
    pub const fn legacy(self) -> bool {
        self.0
    }

    /// Read as `compatibility`
    #[inline]
    #[must_use]
    pub const fn compatibility(self) -> bool {
        self.0
    }

    /// Write through `legacy`
    #[inline]
    pub fn set_legacy(&mut self, enabled: bool) {
        self.0 = enabled;
    }

    /// Write through `compatibility`
    #[inline]
    pub fn set_compatibility(&mut self, enabled: bool) {
        self.0 = enabled;
    }
}

impl From<bool> for CompatibilityAlias {
    fn from(enabled: bool) -> Self {
        Self(enabled)
    }
}
