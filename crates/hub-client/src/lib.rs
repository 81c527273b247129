//! # blackduck-resource-client
//!
//! Talks to the Black Duck REST API on behalf of `check` and `in`.
//!
//! - [`auth`]: form login and session token extraction
//! - [`client`]: project resolution and version listing ([`BlackduckApi`])
//! - [`cache`]: project cache stores ([`ProjectCache`])
//! - [`versions`]: chronological ordering
//!
//! ```no_run
//! # async fn example() -> Result<(), blackduck_resource_client::HubClientError> {
//! use blackduck_resource_client::{BlackduckApi, BlackduckClient, FileProjectCache};
//! use blackduck_resource_core::Source;
//!
//! let source = Source {
//!     url: "https://hub.example.com".to_owned(),
//!     username: "user".to_owned(),
//!     password: "password".to_owned(),
//!     name: "project1".to_owned(),
//!     ..Source::default()
//! };
//! let client = BlackduckClient::new(FileProjectCache::default());
//! let project = client.resolve_project(&source).await?;
//! let versions = client.list_versions(&source, &project).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
pub mod versions;

pub use auth::{SessionToken, authenticate};
pub use cache::{FileProjectCache, MemoryProjectCache, NoProjectCache, ProjectCache};
pub use client::{BlackduckApi, BlackduckClient, HttpSettings};
pub use error::{ErrorKind, HubClientError, Stage};
pub use versions::sort_chronologically;
