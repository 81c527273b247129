//! Client error types
//!
//! [`HubClientError`] covers every failure of the session login, the project
//! lookup and the version listing. Each call site wraps the error it receives
//! in a [`Stage`] layer, so the rendered message reads outermost stage first:
//!
//! ```text
//! GetProjectByName: Authentication: authentication failed
//! GetProjectVersions: Decode: expected value at line 1 column 1
//! ```
//!
//! The wrapped cause stays reachable through [`std::error::Error::source`] and
//! [`HubClientError::root`].

use std::fmt;

use blackduck_resource_core::error::ConfigError;

/// Request stage a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Project resolution as a whole
    GetProjectByName,
    /// Version listing as a whole
    GetProjectVersions,
    /// Session login
    Authentication,
    /// Transport of the project listing request
    GetProjectUrl,
    /// Transport of the version listing request
    Versions,
    /// Payload decoding
    Decode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GetProjectByName => "GetProjectByName",
            Self::GetProjectVersions => "GetProjectVersions",
            Self::Authentication => "Authentication",
            Self::GetProjectUrl => "GetProjectUrl",
            Self::Versions => "Versions",
            Self::Decode => "Decode",
        };
        f.write_str(name)
    }
}

/// Coarse failure category, independent of the stage chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Auth,
    Network,
    Decode,
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum HubClientError {
    /// A cause wrapped with the stage it crossed
    #[error("{stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<HubClientError>,
    },

    /// Login answered with a status of 300 or above
    #[error("authentication failed")]
    AuthenticationFailed { status: u16 },

    /// Login succeeded but no `AUTHORIZATION_BEARER` cookie was set
    #[error("token not found")]
    TokenNotFound,

    /// The listing had no project with exactly the requested name
    #[error("no project matching the name")]
    ProjectNotFound { name: String },

    /// A listing answered with a non-success status
    #[error("unexpected response status {status}")]
    HttpStatus { status: u16 },

    /// Transport failure (connect, TLS, timeout, invalid URL)
    #[error("{0}")]
    Network(#[source] reqwest::Error),

    /// Response body is not the expected JSON
    #[error("{0}")]
    Decode(#[source] serde_json::Error),

    /// The source cannot be turned into a request
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built (TLS backend, proxy URL)
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl HubClientError {
    /// Wraps `self` in a stage layer.
    pub fn within(self, stage: Stage) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// The innermost cause, with every stage layer peeled off.
    pub fn root(&self) -> &Self {
        let mut current = self;
        while let Self::Stage { source, .. } = current {
            current = source;
        }
        current
    }

    /// Stages from outermost to innermost.
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = Vec::new();
        let mut current = self;
        while let Self::Stage { stage, source } = current {
            stages.push(*stage);
            current = source;
        }
        stages
    }

    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::Config(_) => ErrorKind::Config,
            Self::AuthenticationFailed { .. } | Self::TokenNotFound => ErrorKind::Auth,
            Self::ProjectNotFound { .. } => ErrorKind::NotFound,
            Self::Decode(_) => ErrorKind::Decode,
            Self::HttpStatus { .. } | Self::Network(_) | Self::HttpClient(_) => {
                ErrorKind::Network
            }
            // root() never stops on a stage layer
            Self::Stage { .. } => ErrorKind::Network,
        }
    }
}
