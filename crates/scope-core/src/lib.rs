//! Scope Core
//!
//! State and validation engine for an OAuth2 scope input.
//!
//! # Overview
//!
//! The engine provides:
//! - **ScopeListStore**: ordered, deduplicated selected scopes
//! - **AllowListMatcher**: optional restriction to labelled allow-list entries
//! - **ValidationController**: required-field verdict with auto-validation
//! - **CompatibilityAlias**: `legacy` / `compatibility` as one flag
//! - **PendingInputBuffer**: uncommitted text and its commit rules
//! - **ScopeSelector**: the state object tying them together
//!
//! # Example
//!
//! ```rust
//! use scope_core::{AppendOutcome, ScopeSelector, SelectorConfig};
//!
//! let config = SelectorConfig::new()
//!     .with_allowed_scopes(["openid", "email"])
//!     .with_prevent_custom_scopes(true)
//!     .with_required(true);
//! let mut selector = ScopeSelector::from_config(config);
//!
//! selector.set_current_value("openid");
//! assert_eq!(selector.commit(), AppendOutcome::Added);
//! assert_eq!(selector.current_value(), "");
//!
//! selector.set_current_value("admin");
//! assert_eq!(selector.commit(), AppendOutcome::Disallowed);
//! assert_eq!(selector.current_value(), "admin");
//!
//! assert!(selector.validate());
//! assert_eq!(selector.scope_param(), "openid");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod allow_list;
pub mod compat;
pub mod config;
pub mod error;
pub mod input;
pub mod notify;
pub mod scope;
pub mod selector;
pub mod store;
pub mod validation;

// Re-exports
pub use allow_list::{AllowListEntry, AllowListMatcher};
pub use compat::CompatibilityAlias;
pub use config::SelectorConfig;
pub use error::{Result, ScopeError};
pub use input::PendingInputBuffer;
pub use notify::{ChannelSink, Notification, NotificationSink, RecordingSink};
pub use scope::{EmptyScope, Scope};
pub use selector::{AppendOutcome, ScopeSelector};
pub use store::ScopeListStore;
pub use validation::{ValidationController, ValidationState};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a scope selector
    pub use crate::{
        AllowListEntry, AppendOutcome, Notification, NotificationSink, RecordingSink, Scope,
        ScopeSelector, SelectorConfig, ValidationState,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
