//! Shared building blocks of the Black Duck pipeline resource.
//!
//! # Module Structure
//!
//! - [`error`]: `ResourceError` and `ConfigError`
//! - [`config`]: runtime configuration (`ResourceConfig`)
//! - [`types`]: request envelope and service payload types
//! - [`metrics`]: metric names

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, ResourceError};

// 설정
pub use config::ResourceConfig;

// 도메인 타입
pub use types::{
    Link, Meta, MetadataEntry, Params, Project, ProjectList, ProxySettings, Ref, Request, Source,
    Version, VersionList,
};
