//! Domain types exchanged between the orchestrator, the service client and the
//! scan interpreter.
//!
//! All JSON field names follow the orchestrator request envelope and the
//! scanner service's REST payloads, so these types deserialize the wire format
//! directly.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Relation name of the hypermedia link pointing at a project's versions.
pub const VERSIONS_REL: &str = "versions";

/// Path of the session login form, relative to the service base URL.
const LOGIN_PATH: &[&str] = &["j_spring_security_check"];

/// Path of the project listing, relative to the service base URL.
const PROJECTS_PATH: &[&str] = &["api", "projects"];

/// Request envelope read from stdin by `check`, `in` and `out`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub params: Params,
    /// Previously emitted version (`null` on the first `check`)
    #[serde(default)]
    pub version: Option<Ref>,
}

/// Connection configuration for the scanner service.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    /// API token, usable by the scan tool instead of username/password
    #[serde(default)]
    pub token: String,
    /// Skip TLS certificate validation
    #[serde(default)]
    pub insecure: bool,
    #[serde(default, rename = "proxy-host")]
    pub proxy_host: String,
    #[serde(default, rename = "proxy-port")]
    pub proxy_port: String,
    #[serde(default, rename = "proxy-username")]
    pub proxy_username: String,
    #[serde(default, rename = "proxy-password")]
    pub proxy_password: String,
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("url", &self.url)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &redacted(&self.password))
            .field("token", &redacted(&self.token))
            .field("insecure", &self.insecure)
            .field("proxy_host", &self.proxy_host)
            .field("proxy_port", &self.proxy_port)
            .finish_non_exhaustive()
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "***" }
}

/// Proxy settings derived from a [`Source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    /// `http://host:port`
    pub url: String,
    /// Basic auth credentials, when both are configured
    pub credentials: Option<(String, String)>,
}

impl Source {
    /// Checks the fields every program needs.
    ///
    /// The URL must be an absolute http(s) URI, the project name must be set,
    /// and either username+password or an API token must be present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        if self.name.is_empty() {
            return Err(ConfigError::source_field("name", "must not be empty"));
        }
        if self.token.is_empty() && (self.username.is_empty() || self.password.is_empty()) {
            return Err(ConfigError::source_field(
                "username",
                "username and password are required when no token is configured",
            ));
        }
        Ok(())
    }

    /// Returns the username/password pair used for the session login.
    ///
    /// The login form has no token variant, so a token-only source fails here.
    pub fn session_credentials(&self) -> Result<(&str, &str), ConfigError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ConfigError::source_field(
                "username",
                "username and password are required for a session login",
            ));
        }
        Ok((&self.username, &self.password))
    }

    /// Parses the base URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.url)
            .map_err(|e| ConfigError::source_field("url", format!("'{}': {e}", self.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::source_field(
                "url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if url.cannot_be_a_base() {
            return Err(ConfigError::source_field("url", "not a base URL"));
        }
        Ok(url)
    }

    /// `{url}/j_spring_security_check`
    pub fn login_url(&self) -> Result<Url, ConfigError> {
        self.url_with_path(LOGIN_PATH)
    }

    /// `{url}/api/projects?q=name:{name}`
    pub fn project_listing_url(&self) -> Result<Url, ConfigError> {
        let mut url = self.url_with_path(PROJECTS_PATH)?;
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair("q", &format!("name:{}", self.name));
        Ok(url)
    }

    fn url_with_path(&self, segments: &[&str]) -> Result<Url, ConfigError> {
        let mut url = self.base_url()?;
        url.path_segments_mut()
            .map_err(|()| ConfigError::source_field("url", "not a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Proxy settings, if a proxy host is configured.
    pub fn proxy(&self) -> Option<ProxySettings> {
        if self.proxy_host.is_empty() {
            return None;
        }
        let url = if self.proxy_port.is_empty() {
            format!("http://{}", self.proxy_host)
        } else {
            format!("http://{}:{}", self.proxy_host, self.proxy_port)
        };
        let credentials = (!self.proxy_username.is_empty() && !self.proxy_password.is_empty())
            .then(|| (self.proxy_username.clone(), self.proxy_password.clone()));
        Some(ProxySettings { url, credentials })
    }
}

/// `out` parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Params {
    /// Directory to scan, relative to the sources path handed to `out`
    #[serde(default)]
    pub directory: String,
}

impl Params {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.directory.is_empty() {
            return Err(ConfigError::InvalidParams {
                field: "directory",
                reason: "must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}

/// Opaque version identifier exchanged with the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ref {
    #[serde(rename = "ref")]
    pub id: String,
}

impl Ref {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Name/value pair shown by the orchestrator next to a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub name: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Project listing payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectList {
    #[serde(rename = "items", default)]
    pub projects: Vec<Project>,
}

/// A project on the scanner service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(rename = "_meta", default)]
    pub meta: Meta,
}

impl Project {
    /// Href of the `versions` relation, empty when the project has none.
    pub fn versions_link(&self) -> &str {
        self.meta.link_for(VERSIONS_REL)
    }
}

/// Hypermedia section of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Meta {
    /// First href registered under `rel`, or `""`.
    pub fn link_for(&self, rel: &str) -> &str {
        self.links
            .iter()
            .find(|link| link.rel == rel)
            .map(|link| link.href.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

/// Version listing payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionList {
    #[serde(rename = "items", default)]
    pub versions: Vec<Version>,
}

/// One scan snapshot of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    #[serde(rename = "versionName")]
    pub name: String,
    pub phase: String,
    #[serde(rename = "settingUpdatedAt")]
    pub updated: DateTime<Utc>,
}

impl Version {
    /// The update timestamp as RFC 3339, keeping every non-zero sub-second
    /// digit the service sent.
    pub fn updated_string(&self) -> String {
        self.updated.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// The orchestrator ref of this version.
    pub fn to_ref(&self) -> Ref {
        Ref::new(self.updated_string())
    }

    /// Metadata emitted by `in`.
    pub fn metadata(&self) -> Vec<MetadataEntry> {
        vec![
            MetadataEntry::new("versionName", &self.name),
            MetadataEntry::new("phase", &self.phase),
            MetadataEntry::new("settingUpdatedAt", self.updated_string()),
        ]
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.name, self.phase, self.updated_string())
    }
}
