use thiserror::Error;

/// Unified error type for release-drafter operations
#[derive(Error, Debug)]
pub enum DrafterError {
    /// A paginated or typed response did not have the expected shape
    #[error("Unexpected response shape: {0}")]
    ProtocolShape(String),

    /// A template variable could not be rendered
    #[error("Template error: {0}")]
    Template(String),

    /// A user-supplied search pattern failed to compile
    #[error("Bad pattern '{search}': {reason}")]
    BadPattern { search: String, reason: String },

    /// More than one category without labels
    #[error("Ambiguous configuration: {0}")]
    AmbiguousConfiguration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A version could not be incremented
    #[error("Version error: {0}")]
    Version(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-drafter
pub type Result<T> = std::result::Result<T, DrafterError>;

impl DrafterError {
    /// Create a protocol shape error with context
    pub fn protocol_shape(msg: impl Into<String>) -> Self {
        DrafterError::ProtocolShape(msg.into())
    }

    /// Create a template error with context
    pub fn template(msg: impl Into<String>) -> Self {
        DrafterError::Template(msg.into())
    }

    /// Create a bad pattern error for the given search string
    pub fn bad_pattern(search: impl Into<String>, reason: impl Into<String>) -> Self {
        DrafterError::BadPattern {
            search: search.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        DrafterError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        DrafterError::Version(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        DrafterError::Remote(msg.into())
    }
}
