//! Ordered, deduplicated scope storage
//!
//! [`ScopeListStore`] keeps selected scopes in insertion order and never
//! holds the same scope twice. Removal shifts later entries left.

use crate::scope::Scope;
use indexmap::IndexSet;

/// Ordered set of selected scopes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeListStore {
    scopes: IndexSet<Scope>,
}

impl ScopeListStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored scopes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Check if nothing is selected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Check if a scope is already selected
    #[inline]
    #[must_use]
    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    /// Scope at `index` in insertion order
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Scope> {
        self.scopes.get_index(index)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    /// Append a scope at the end
    ///
    /// Returns `false` (and leaves the store untouched) when the scope is
    /// already present.
    pub fn append(&mut self, scope: Scope) -> bool {
        self.scopes.insert(scope)
    }

    /// Remove the scope at `index`, preserving the order of the rest
    ///
    /// Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<Scope> {
        self.scopes.shift_remove_index(index)
    }

    /// Replace the whole list
    ///
    /// Later duplicates are dropped, first occurrences keep their position.
    /// Returns the number of duplicates dropped.
    pub fn set_all<I>(&mut self, scopes: I) -> usize
    where
        I: IntoIterator<Item = Scope>,
    {
        let mut fresh = IndexSet::new();
        let mut dropped = 0;
        for scope in scopes {
            if !fresh.insert(scope) {
                dropped += 1;
            }
        }
        self.scopes = fresh;
        dropped
    }

    /// Keep only scopes matching `keep`, returning the removed ones in order
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<Scope>
    where
        F: FnMut(&Scope) -> bool,
    {
        let mut removed = Vec::new();
        self.scopes.retain(|scope| {
            if keep(scope) {
                true
            } else {
                removed.push(scope.clone());
                false
            }
        });
        removed
    }

    /// Owned copy of the list; later changes to it do not reach the store
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.scopes.iter().map(|s| s.as_str().to_string()).collect()
    }

    /// Render as an RFC 6749 `scope` parameter (space-delimited)
    #[must_use]
    pub fn scope_param(&self) -> String {
        self.scopes
            .iter()
            .map(Scope::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'a> IntoIterator for &'a ScopeListStore {
    type Item = &'a Scope;
    type IntoIter = indexmap::set::Iter<'a, Scope>;

    fn into_iter(self) -> Self::IntoIter {
        self.scopes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(s: &str) -> Scope {
        Scope::parse(s).unwrap()
    }

    fn store_of(items: &[&str]) -> ScopeListStore {
        let mut store = ScopeListStore::new();
        store.set_all(items.iter().map(|s| scope(s)));
        store
    }

    #[test]
    fn append_adds_to_end() {
        let mut store = ScopeListStore::new();
        assert!(store.append(scope("a")));
        assert!(store.append(scope("b")));
        assert_eq!(store.snapshot(), vec!["a", "b"]);
    }

    #[test]
    fn append_is_idempotent() {
        let mut store = ScopeListStore::new();
        assert!(store.append(scope("a")));
        assert!(!store.append(scope("a")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_shifts_left() {
        let mut store = store_of(&["a", "b", "c"]);
        assert_eq!(store.remove(1), Some(scope("b")));
        assert_eq!(store.snapshot(), vec!["a", "c"]);
        assert_eq!(store.get(1), Some(&scope("c")));
    }

    #[test]
    fn remove_out_of_range_is_ignored() {
        let mut store = store_of(&["a"]);
        assert_eq!(store.remove(5), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_all_keeps_first_occurrence() {
        let mut store = store_of(&["x"]);
        let dropped = store.set_all(["b", "a", "b", "c", "a"].iter().map(|s| scope(s)));
        assert_eq!(dropped, 2);
        assert_eq!(store.snapshot(), vec!["b", "a", "c"]);
    }

    #[test]
    fn snapshot_is_detached() {
        let store = store_of(&["a"]);
        let mut snap = store.snapshot();
        snap.push("b".to_string());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn retain_reports_removed_in_order() {
        let mut store = store_of(&["a", "bb", "c", "dd"]);
        let removed = store.retain(|s| s.as_str().len() == 1);
        assert_eq!(removed, vec![scope("bb"), scope("dd")]);
        assert_eq!(store.snapshot(), vec!["a", "c"]);
    }

    #[test]
    fn scope_param_is_space_delimited() {
        assert_eq!(store_of(&["openid", "email"]).scope_param(), "openid email");
        assert_eq!(ScopeListStore::new().scope_param(), "");
    }
}
