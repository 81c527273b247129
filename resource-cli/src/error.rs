//! CLI-specific error types and exit code mapping

use blackduck_resource_client::HubClientError;
use blackduck_resource_core::error::{ConfigError, ResourceError};
use blackduck_resource_interpreter::InterpretError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Runtime configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request on stdin is not valid JSON or has the wrong shape.
    #[error("failed to read request: {0}")]
    RequestDecode(#[source] serde_json::Error),

    /// The request carries a missing or malformed field.
    #[error("{context}: {source}")]
    InvalidRequest {
        context: &'static str,
        #[source]
        source: ConfigError,
    },

    /// Scanner service interaction failed.
    #[error(transparent)]
    Hub(#[from] HubClientError),

    /// No detect jar in the agent directory.
    #[error("could not find the scanner, please open an issue on Github")]
    ScannerNotFound,

    /// The detect process could not be started.
    #[error("failed to launch detect: {0}")]
    Launch(#[source] std::io::Error),

    /// Detect reported a non-success overall status.
    #[error("scan failed: {0}")]
    ScanFailed(String),

    /// Detect exited with a non-zero code.
    #[error("detect exited with {}", exit_status(.code))]
    DetectExit { code: Option<i32> },

    /// Detect output could not be interpreted.
    #[error("failed to interpret detect output: {0}")]
    Interpret(InterpretError),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (result file write, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from blackduck-resource-core.
    #[error("{0}")]
    Core(#[from] ResourceError),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (terminated by signal)".to_owned(),
    }
}

impl CliError {
    /// Attaches a user-facing context to a request validation failure.
    pub fn invalid(context: &'static str, source: ConfigError) -> Self {
        Self::InvalidRequest { context, source }
    }

    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | General error                        |
    /// | 2    | Configuration or request error       |
    /// | 3    | Scanner service unreachable/rejected |
    /// | 4    | Scan failed                          |
    /// | 10   | IO error                             |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::RequestDecode(_) | Self::InvalidRequest { .. } => 2,
            Self::Hub(_) => 3,
            Self::ScanFailed(_) | Self::DetectExit { .. } => 4,
            Self::Io(_) => 10,
            Self::Core(core) => match core {
                ResourceError::Config(_) => 2,
                ResourceError::Io(_) => 10,
            },
            Self::ScannerNotFound
            | Self::Launch(_)
            | Self::Interpret(_)
            | Self::JsonSerialize(_) => 1,
        }
    }
}

impl From<InterpretError> for CliError {
    fn from(err: InterpretError) -> Self {
        match err {
            InterpretError::ScanFailed { status, .. } => Self::ScanFailed(status),
            other => Self::Interpret(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_invalid_request() {
        let err = CliError::invalid(
            "source is invalid",
            ConfigError::InvalidSource {
                field: "name",
                reason: "must not be empty".to_owned(),
            },
        );
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("source is invalid: "));
    }

    #[test]
    fn test_exit_code_hub_error() {
        let err = CliError::Hub(HubClientError::TokenNotFound);
        assert_eq!(err.exit_code(), 3, "hub error should return exit code 3");
        assert_eq!(err.to_string(), "token not found");
    }

    #[test]
    fn test_exit_code_scan_failed() {
        let err = CliError::ScanFailed("FAILURE_DETECTOR".to_owned());
        assert_eq!(err.exit_code(), 4, "failed scan should return exit code 4");
    }

    #[test]
    fn test_exit_code_detect_exit() {
        let err = CliError::DetectExit { code: Some(3) };
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.to_string(), "detect exited with code 3");
        let err = CliError::DetectExit { code: None };
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_scanner_not_found() {
        let err = CliError::ScannerNotFound;
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "could not find the scanner, please open an issue on Github"
        );
    }

    #[test]
    fn test_exit_code_core_errors_follow_variant() {
        let config = ResourceError::Config(ConfigError::ParseFailed {
            reason: "bad".to_owned(),
        });
        assert_eq!(CliError::Core(config).exit_code(), 2);
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(CliError::Core(ResourceError::Io(io)).exit_code(), 10);
    }

    #[test]
    fn test_interpret_scan_failed_becomes_scan_failed() {
        let err: CliError = InterpretError::ScanFailed {
            status: "FAILURE_DETECTOR".to_owned(),
            scan: Box::default(),
        }
        .into();
        assert!(matches!(err, CliError::ScanFailed(ref s) if s == "FAILURE_DETECTOR"));
    }

    #[test]
    fn test_interpret_malformed_line_is_general_error() {
        let err: CliError = InterpretError::MalformedLine {
            line: 1,
            marker: "Overall Status",
        }
        .into();
        assert_eq!(err.exit_code(), 1);
    }
}
