//! Error types for the scope engine
//!
//! User-level rejections (blank submission, disallowed scope, out-of-range
//! removal) are not errors; they surface as outcomes and notifications.
//! [`ScopeError`] covers boundary misuse and configuration loading.

/// Main scope engine error type
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    /// A value of the wrong shape crossed a dynamically typed boundary
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration source cannot be interpreted
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file has an extension we cannot parse
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Reading a configuration file failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failed
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing failed
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ScopeError {
    /// Create an invalid argument error
    #[inline]
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Check if error came from configuration loading
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::UnsupportedFormat(_)
                | Self::Io(_)
                | Self::Json(_)
                | Self::Yaml(_)
                | Self::Toml(_)
        )
    }
}

/// Result alias for scope engine operations
pub type Result<T> = std::result::Result<T, ScopeError>;
