//! Testing utilities for the scope selector workspace
//!
//! Shared fixtures matching the declarative setups the selector is usually
//! built from, plus a helper that attaches a recording sink.

#![allow(missing_docs)]

use scope_core::{RecordingSink, ScopeSelector, SelectorConfig};
use std::sync::Arc;

/// Build a selector from a JSON attribute map
///
/// Panics on malformed JSON; fixtures are test-only.
pub fn fixture(attributes: &str) -> ScopeSelector {
    let config = SelectorConfig::from_json_str(attributes).unwrap();
    ScopeSelector::from_config(config)
}

pub fn basic_fixture() -> ScopeSelector {
    fixture("{}")
}

pub fn allowed_fixture() -> ScopeSelector {
    fixture(r#"{"allowedscopes": ["test"], "preventcustomscopes": true}"#)
}

pub fn values_fixture() -> ScopeSelector {
    fixture(r#"{"value": ["test", "test-2"]}"#)
}

pub fn required_fixture() -> ScopeSelector {
    fixture(r#"{"required": true}"#)
}

pub fn auto_validate_fixture() -> ScopeSelector {
    fixture(r#"{"required": true, "autovalidate": true}"#)
}

pub fn auto_validate_value_fixture() -> ScopeSelector {
    fixture(r#"{"required": true, "autovalidate": true, "value": ["test"]}"#)
}

pub fn multi_fixture() -> ScopeSelector {
    fixture(
        r#"{
            "allowedscopes": [{"label": "test-label", "description": "test-description"}],
            "preventcustomscopes": true
        }"#,
    )
}

/// Attach a fresh recording sink and return it
pub fn record(selector: &mut ScopeSelector) -> RecordingSink {
    let sink = RecordingSink::new();
    selector.subscribe(Arc::new(sink.clone()));
    sink
}
