//! Error types shared by every crate in the workspace.

/// Top-level error for configuration loading.
///
/// Service and scan failures keep their own structured types
/// (`HubClientError`, `InterpretError`) all the way up to the CLI.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Configuration or request validation failure
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration and request validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file not found
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// Config file could not be parsed
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// A config value is out of range or malformed
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// A required `source` field is missing or malformed
    #[error("invalid source field '{field}': {reason}")]
    InvalidSource { field: &'static str, reason: String },

    /// A required `params` field is missing
    #[error("invalid params field '{field}': {reason}")]
    InvalidParams { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn source_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSource {
            field,
            reason: reason.into(),
        }
    }
}
