//! Pending input text
//!
//! Holds what the user is typing until it is committed.

use crate::scope::Scope;

/// Uncommitted input text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingInputBuffer {
    text: String,
}

impl PendingInputBuffer {
    /// Create an empty buffer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Literal current text, untrimmed
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Trimmed candidate, `None` when the text is blank
    ///
    /// Leaves the buffer untouched; the caller clears it once the
    /// candidate has been accepted.
    #[must_use]
    pub fn candidate(&self) -> Option<Scope> {
        Scope::parse(&self.text)
    }

    /// Reset to the empty string
    pub fn clear(&mut self) {
        self.text.clear();
    }
}
