//! Scope selector engine
//!
//! [`ScopeSelector`] owns the whole state of one scope input: the selected
//! list, the allow-list, the pending text, the validation verdict and the
//! compatibility flag. Presentation layers drive it through explicit
//! methods and observe it through [`NotificationSink`]s.
//!
//! # Flow
//! 1. [`ScopeSelector::commit`] takes the trimmed pending text
//! 2. The allow-list approves or rejects it
//! 3. Approved scopes are appended (deduplicated) and the text is cleared
//! 4. Rejections notify and keep the text for correction
//!
//! In auto-validate mode list mutations only schedule an evaluation. It
//! runs at the next render tick: [`ScopeSelector::flush`] or
//! [`ScopeSelector::next_frame`].

use crate::allow_list::{AllowListEntry, AllowListMatcher};
use crate::compat::CompatibilityAlias;
use crate::config::SelectorConfig;
use crate::error::{Result, ScopeError};
use crate::input::PendingInputBuffer;
use crate::notify::{ChannelSink, Notification, NotificationSink};
use crate::scope::Scope;
use crate::store::ScopeListStore;
use crate::validation::{ValidationController, ValidationState};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Result of submitting a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppendOutcome {
    /// Scope was appended
    Added,
    /// Scope was already selected; nothing changed
    AlreadyPresent,
    /// Scope is outside the allow-list
    Disallowed,
    /// Submission was blank
    Missing,
    /// Selector is read-only or disabled
    Ignored,
}

impl AppendOutcome {
    /// Check if the submission was accepted (added or already present)
    #[inline]
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Added | Self::AlreadyPresent)
    }
}

/// State and validation engine for one scope input
pub struct ScopeSelector {
    store: ScopeListStore,
    matcher: AllowListMatcher,
    validation: ValidationController,
    compat: CompatibilityAlias,
    input: PendingInputBuffer,
    read_only: bool,
    disabled: bool,
    name: Option<String>,
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl ScopeSelector {
    /// Create an empty, unrestricted selector
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(SelectorConfig::default())
    }

    /// Create a selector from configuration
    ///
    /// The initial value goes through the same blank, dedup and allow-list
    /// filtering as [`ScopeSelector::set_value`], but emits nothing and
    /// does not validate: a fresh selector is always valid.
    #[must_use]
    pub fn from_config(config: SelectorConfig) -> Self {
        let SelectorConfig {
            value,
            allowed_scopes,
            prevent_custom_scopes,
            required,
            auto_validate,
            compatibility,
            read_only,
            disabled,
            name,
        } = config;

        let mut matcher = AllowListMatcher::new().with_prevent_custom(prevent_custom_scopes);
        matcher.set_allowed(allowed_scopes);

        let mut selector = Self {
            store: ScopeListStore::new(),
            matcher,
            validation: ValidationController::new(required, auto_validate),
            compat: CompatibilityAlias::new(compatibility),
            input: PendingInputBuffer::new(),
            read_only,
            disabled,
            name,
            sinks: Vec::new(),
        };
        selector.assign(value);
        selector
    }

    /// Register a notification sink
    pub fn subscribe(&mut self, sink: Arc<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    /// Register a channel sink and return its receiver
    pub fn subscribe_channel(&mut self) -> mpsc::UnboundedReceiver<Notification> {
        let (sink, receiver) = ChannelSink::channel();
        self.subscribe(Arc::new(sink));
        receiver
    }

    // ------------------------------------------------------------------
    // Selected list
    // ------------------------------------------------------------------

    /// Snapshot of the selected scopes
    #[must_use]
    pub fn value(&self) -> Vec<String> {
        self.store.snapshot()
    }

    /// Borrow the underlying store
    #[inline]
    #[must_use]
    pub fn scopes(&self) -> &ScopeListStore {
        &self.store
    }

    /// Replace the selected list
    ///
    /// Blank entries, later duplicates and (when restricting) scopes
    /// outside the allow-list are dropped.
    pub fn set_value<I, S>(&mut self, value: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.assign(value);
        self.after_mutation();
    }

    /// Replace the selected list from a dynamically typed value
    ///
    /// `null` clears the list.
    ///
    /// # Errors
    /// Returns [`ScopeError::InvalidArgument`] unless `value` is `null` or
    /// an array of strings. The list is left untouched on error.
    pub fn set_value_json(&mut self, value: &serde_json::Value) -> Result<()> {
        let items = match value {
            serde_json::Value::Null => Vec::new(),
            serde_json::Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_str().ok_or_else(|| {
                        ScopeError::invalid_argument(format!(
                            "value[{i}] must be a string, got {item}"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            other => {
                return Err(ScopeError::invalid_argument(format!(
                    "value must be an array of strings, got {other}"
                )))
            }
        };
        self.set_value(items);
        Ok(())
    }

    /// Submit a scope programmatically
    ///
    /// Follows the same rules as a user submission (trim, allow-list,
    /// dedup) but ignores the read-only/disabled flags and never touches
    /// the pending text.
    pub fn append(&mut self, value: &str) -> AppendOutcome {
        match Scope::parse(value) {
            Some(candidate) => self.append_scope(candidate),
            None => self.reject_missing(),
        }
    }

    /// Commit the pending text
    ///
    /// Clears the text when the scope is accepted; leaves it as typed when
    /// the scope is rejected.
    pub fn commit(&mut self) -> AppendOutcome {
        if self.is_locked() {
            tracing::debug!("Ignoring submission: selector is locked");
            return AppendOutcome::Ignored;
        }
        let Some(candidate) = self.input.candidate() else {
            return self.reject_missing();
        };
        let outcome = self.append_scope(candidate);
        if outcome.is_accepted() {
            self.input.clear();
        }
        outcome
    }

    /// Remove the scope at `index`
    ///
    /// Out-of-range indices and locked selectors are ignored.
    pub fn remove(&mut self, index: usize) -> Option<Scope> {
        if self.is_locked() {
            tracing::debug!("Ignoring removal: selector is locked");
            return None;
        }
        let removed = self.store.remove(index)?;
        tracing::debug!("Removed scope: {}", removed);
        self.after_mutation();
        Some(removed)
    }

    /// Render the selection as an OAuth2 `scope` parameter
    #[must_use]
    pub fn scope_param(&self) -> String {
        self.store.scope_param()
    }

    // ------------------------------------------------------------------
    // Pending input
    // ------------------------------------------------------------------

    /// Pending (uncommitted) text
    #[inline]
    #[must_use]
    pub fn current_value(&self) -> &str {
        self.input.text()
    }

    /// Replace the pending text
    pub fn set_current_value(&mut self, text: impl Into<String>) {
        self.input.set(text);
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Current verdict
    #[inline]
    #[must_use]
    pub fn invalid(&self) -> bool {
        self.validation.invalid()
    }

    /// Current verdict as a state
    #[inline]
    #[must_use]
    pub fn validation_state(&self) -> ValidationState {
        self.validation.state()
    }

    /// Evaluate now; `true` when the selection is valid
    pub fn validate(&mut self) -> bool {
        let before = self.validation.state();
        let valid = self.validation.validate(self.store.is_empty());
        self.report_verdict(before, self.validation.state());
        valid
    }

    /// Whether an auto-validation is waiting for the next tick
    #[inline]
    #[must_use]
    pub fn has_pending_validation(&self) -> bool {
        self.validation.is_scheduled()
    }

    /// Run the render tick: perform a scheduled evaluation, if any
    pub fn flush(&mut self) -> Option<ValidationState> {
        let before = self.validation.state();
        let after = self.validation.flush(self.store.is_empty())?;
        tracing::debug!("Auto-validation ran: {:?}", after);
        self.report_verdict(before, after);
        Some(after)
    }

    /// Yield once to the scheduler, then run the render tick
    pub async fn next_frame(&mut self) -> Option<ValidationState> {
        tokio::task::yield_now().await;
        self.flush()
    }

    /// Whether an empty selection fails validation
    #[inline]
    #[must_use]
    pub fn required(&self) -> bool {
        self.validation.required()
    }

    /// Set whether an empty selection fails validation
    pub fn set_required(&mut self, required: bool) {
        self.validation.set_required(required);
    }

    /// Whether list mutations trigger validation
    #[inline]
    #[must_use]
    pub fn auto_validate(&self) -> bool {
        self.validation.auto_validate()
    }

    /// Set whether list mutations trigger validation
    pub fn set_auto_validate(&mut self, auto_validate: bool) {
        self.validation.set_auto_validate(auto_validate);
    }

    // ------------------------------------------------------------------
    // Allow-list
    // ------------------------------------------------------------------

    /// Configured allow-list, if any
    #[inline]
    #[must_use]
    pub fn allowed_scopes(&self) -> Option<&[AllowListEntry]> {
        self.matcher.allowed()
    }

    /// Replace the allow-list wholesale
    ///
    /// When custom scopes are prevented, selected scopes that fall outside
    /// the new list are dropped.
    pub fn set_allowed_scopes(&mut self, allowed: Option<Vec<AllowListEntry>>) {
        tracing::info!(
            "Allow-list replaced: {} entries",
            allowed.as_ref().map_or(0, Vec::len)
        );
        self.matcher.set_allowed(allowed);
        self.prune_disallowed();
    }

    /// Whether scopes outside the allow-list are rejected
    #[inline]
    #[must_use]
    pub fn prevent_custom_scopes(&self) -> bool {
        self.matcher.prevent_custom()
    }

    /// Set whether scopes outside the allow-list are rejected
    pub fn set_prevent_custom_scopes(&mut self, prevent: bool) {
        self.matcher.set_prevent_custom(prevent);
        self.prune_disallowed();
    }

    /// Check a candidate against the allow-list
    #[must_use]
    pub fn is_allowed(&self, candidate: &str) -> bool {
        self.matcher.is_allowed(candidate)
    }

    /// Allow-list entries matching `query` that are not selected yet
    #[must_use]
    pub fn suggestions(&self, query: &str) -> Vec<&AllowListEntry> {
        self.matcher
            .suggestions(query, |label| self.store.contains(label))
    }

    /// Allow-list description of a scope
    #[must_use]
    pub fn description_for(&self, scope: &str) -> Option<&str> {
        self.matcher.description_for(scope)
    }

    // ------------------------------------------------------------------
    // Flags
    // ------------------------------------------------------------------

    /// Legacy flag (same cell as `compatibility`)
    #[inline]
    #[must_use]
    pub fn legacy(&self) -> bool {
        self.compat.legacy()
    }

    /// Set the legacy flag; `compatibility` follows
    pub fn set_legacy(&mut self, legacy: bool) {
        self.compat.set_legacy(legacy);
    }

    /// Compatibility flag (same cell as `legacy`)
    #[inline]
    #[must_use]
    pub fn compatibility(&self) -> bool {
        self.compat.compatibility()
    }

    /// Set the compatibility flag; `legacy` follows
    pub fn set_compatibility(&mut self, compatibility: bool) {
        self.compat.set_compatibility(compatibility);
    }

    /// Read-only flag
    #[inline]
    #[must_use]
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Set the read-only flag
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Disabled flag
    #[inline]
    #[must_use]
    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Set the disabled flag
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Form field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the form field name
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn is_locked(&self) -> bool {
        self.read_only || self.disabled
    }

    fn append_scope(&mut self, candidate: Scope) -> AppendOutcome {
        if !self.matcher.is_allowed(candidate.as_str()) {
            tracing::debug!("Rejected scope outside allow-list: {}", candidate);
            self.emit(&Notification::DisallowedScope);
            return AppendOutcome::Disallowed;
        }
        let scope = self.matcher.canonicalize(candidate);
        tracing::debug!("Appending scope: {}", scope);
        if self.store.append(scope) {
            self.after_mutation();
            AppendOutcome::Added
        } else {
            AppendOutcome::AlreadyPresent
        }
    }

    fn reject_missing(&mut self) -> AppendOutcome {
        tracing::debug!("Rejected blank scope submission");
        self.emit(&Notification::MissingScope);
        AppendOutcome::Missing
    }

    /// Replace the list without notifying or scheduling validation
    fn assign<I, S>(&mut self, value: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scopes = Vec::new();
        for raw in value {
            let raw = raw.as_ref();
            match Scope::parse(raw) {
                Some(scope) if self.matcher.is_allowed(scope.as_str()) => scopes.push(scope),
                Some(scope) => tracing::warn!("Dropping scope outside allow-list: {}", scope),
                None => tracing::warn!("Dropping blank scope entry: {:?}", raw),
            }
        }
        let dropped = self.store.set_all(scopes);
        if dropped > 0 {
            tracing::debug!("Dropped {} duplicate scope(s)", dropped);
        }
    }

    fn prune_disallowed(&mut self) {
        if !self.matcher.is_restricting() {
            return;
        }
        let matcher = &self.matcher;
        let removed = self.store.retain(|scope| matcher.is_allowed(scope.as_str()));
        if removed.is_empty() {
            return;
        }
        for scope in &removed {
            tracing::warn!("Dropping scope outside allow-list: {}", scope);
        }
        self.after_mutation();
    }

    fn after_mutation(&mut self) {
        self.emit(&Notification::ValueChanged(self.store.snapshot()));
        if self.validation.on_mutation() {
            tracing::trace!("Auto-validation scheduled");
        }
    }

    fn report_verdict(&self, before: ValidationState, after: ValidationState) {
        if before != after {
            self.emit(&Notification::InvalidChanged(after.is_invalid()));
        }
    }

    fn emit(&self, notification: &Notification) {
        for sink in &self.sinks {
            sink.notify(notification);
        }
    }
}

impl Default for ScopeSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScopeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeSelector")
            .field("value", &self.store)
            .field("current_value", &self.input.text())
            .field("allowed_scopes", &self.matcher.allowed())
            .field("prevent_custom_scopes", &self.matcher.prevent_custom())
            .field("validation", &self.validation)
            .field("compatibility", &self.compat.compatibility())
            .field("read_only", &self.read_only)
            .field("disabled", &self.disabled)
            .field("name", &self.name)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingSink;

    fn recorded(selector: &mut ScopeSelector) -> RecordingSink {
        let sink = RecordingSink::new();
        selector.subscribe(Arc::new(sink.clone()));
        sink
    }

    #[test]
    fn value_is_empty_by_default() {
        let selector = ScopeSelector::new();
        assert!(selector.value().is_empty());
        assert_eq!(selector.current_value(), "");
    }

    #[test]
    fn commit_trims_and_clears() {
        let mut selector = ScopeSelector::new();
        selector.set_current_value("  test  ");
        assert_eq!(selector.commit(), AppendOutcome::Added);
        assert_eq!(selector.value(), vec!["test"]);
        assert_eq!(selector.current_value(), "");
    }

    #[test]
    fn commit_duplicate_clears_without_change() {
        let mut selector = ScopeSelector::from_config(SelectorConfig::new().with_value(["test"]));
        let sink = recorded(&mut selector);
        selector.set_current_value("test");
        assert_eq!(selector.commit(), AppendOutcome::AlreadyPresent);
        assert_eq!(selector.current_value(), "");
        assert_eq!(sink.count("value-changed"), 0);
    }

    #[test]
    fn blank_append_notifies_missing() {
        let mut selector = ScopeSelector::new();
        let sink = recorded(&mut selector);
        assert_eq!(selector.append("   "), AppendOutcome::Missing);
        assert_eq!(sink.notifications(), vec![Notification::MissingScope]);
    }

    #[test]
    fn locked_selector_ignores_user_paths() {
        let mut selector = ScopeSelector::from_config(
            SelectorConfig::new().with_value(["a"]).with_read_only(true),
        );
        let sink = recorded(&mut selector);
        selector.set_current_value("b");
        assert_eq!(selector.commit(), AppendOutcome::Ignored);
        assert_eq!(selector.remove(0), None);
        assert_eq!(selector.current_value(), "b");
        assert!(sink.notifications().is_empty());

        assert_eq!(selector.append("b"), AppendOutcome::Added);
        assert_eq!(selector.value(), vec!["a", "b"]);
    }

    #[test]
    fn disabled_selector_ignores_commit() {
        let mut selector = ScopeSelector::from_config(SelectorConfig::new().with_disabled(true));
        selector.set_current_value("b");
        assert_eq!(selector.commit(), AppendOutcome::Ignored);
        selector.set_disabled(false);
        assert_eq!(selector.commit(), AppendOutcome::Added);
    }

    #[test]
    fn initial_value_is_filtered_silently() {
        let config = SelectorConfig::new()
            .with_value(["a", " ", "b", "a", "x"])
            .with_allowed_scopes(["a", "b"])
            .with_prevent_custom_scopes(true);
        let mut selector = ScopeSelector::from_config(config);
        let sink = recorded(&mut selector);
        assert_eq!(selector.value(), vec!["a", "b"]);
        assert!(sink.notifications().is_empty());
        assert!(!selector.has_pending_validation());
    }

    #[test]
    fn set_value_json_rejects_non_strings() {
        let mut selector = ScopeSelector::from_config(SelectorConfig::new().with_value(["keep"]));
        let err = selector
            .set_value_json(&serde_json::json!(["ok", 3]))
            .unwrap_err();
        assert!(matches!(err, ScopeError::InvalidArgument(_)));
        assert!(selector.set_value_json(&serde_json::json!("a b")).is_err());
        assert_eq!(selector.value(), vec!["keep"]);
    }

    #[test]
    fn set_value_json_accepts_arrays_and_null() {
        let mut selector = ScopeSelector::new();
        selector
            .set_value_json(&serde_json::json!(["test", "test-2", "test"]))
            .unwrap();
        assert_eq!(selector.value(), vec!["test", "test-2"]);
        selector.set_value_json(&serde_json::Value::Null).unwrap();
        assert!(selector.value().is_empty());
    }

    #[test]
    fn tightening_allow_list_prunes_selection() {
        let mut selector = ScopeSelector::from_config(
            SelectorConfig::new()
                .with_value(["a", "b", "c"])
                .with_required(true)
                .with_auto_validate(true),
        );
        let sink = recorded(&mut selector);
        selector.set_allowed_scopes(Some(vec!["b".into()]));
        assert_eq!(selector.value(), vec!["a", "b", "c"]);

        selector.set_prevent_custom_scopes(true);
        assert_eq!(selector.value(), vec!["b"]);
        assert!(sink.contains(&Notification::ValueChanged(vec!["b".into()])));
        assert!(selector.has_pending_validation());
    }

    #[test]
    fn verdict_flip_is_notified() {
        let mut selector = ScopeSelector::from_config(SelectorConfig::new().with_required(true));
        let sink = recorded(&mut selector);
        selector.validate();
        selector.validate();
        assert_eq!(sink.count("invalid-changed"), 1);
        assert!(sink.contains(&Notification::InvalidChanged(true)));
    }

    #[test]
    fn suggestions_exclude_selected() {
        let mut selector = ScopeSelector::from_config(
            SelectorConfig::new().with_allowed_scopes([
                AllowListEntry::from("read:user"),
                AllowListEntry::described("read:org", "Organisations"),
            ]),
        );
        selector.append("read:user");
        let labels: Vec<_> = selector
            .suggestions("read")
            .into_iter()
            .map(AllowListEntry::label)
            .collect();
        assert_eq!(labels, vec!["read:org"]);
        assert_eq!(selector.description_for("read:org"), Some("Organisations"));
    }

    #[test]
    fn scope_param_and_name() {
        let mut selector = ScopeSelector::from_config(
            SelectorConfig::new()
                .with_value(["openid", "email"])
                .with_name("scope"),
        );
        assert_eq!(selector.scope_param(), "openid email");
        assert_eq!(selector.name(), Some("scope"));
        selector.set_name(None);
        assert_eq!(selector.name(), None);
    }

    #[tokio::test]
    async fn channel_subscription_observes_changes() {
        let mut selector = ScopeSelector::new();
        let mut rx = selector.subscribe_channel();
        selector.append("profile");
        assert_eq!(
            rx.recv().await,
            Some(Notification::ValueChanged(vec!["profile".into()]))
        );
    }
}
