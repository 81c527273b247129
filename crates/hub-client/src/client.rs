//! Service client
//!
//! [`BlackduckApi`] is the capability the `check` and `in` commands depend on.
//! [`BlackduckClient`] implements it over HTTP; tests substitute a mock.
//!
//! ```text
//! resolve_project:  cache ─hit──────────────────────────────▶ Project
//!                     │miss
//!                     ▼
//!                   login ─▶ GET /api/projects?q=name:<name> ─▶ exact match ─▶ cache.store
//!
//! list_versions:    login ─▶ GET <versions href> ─▶ sort by settingUpdatedAt
//! ```
//!
//! Every call builds its HTTP client from the [`Source`], so the `insecure`
//! flag and the proxy apply to the login as well. Requests run one after the
//! other and are never retried.

use std::future::Future;
use std::time::{Duration, Instant};

use blackduck_resource_core::metrics as m;
use blackduck_resource_core::types::{
    Project, ProjectList, ProxySettings, Source, Version, VersionList,
};
use reqwest::header::COOKIE;
use reqwest::redirect::Policy;
use tracing::{debug, info, warn};

use crate::auth::{self, SessionToken};
use crate::cache::{FileProjectCache, ProjectCache};
use crate::error::{HubClientError, Stage};
use crate::versions::sort_chronologically;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Project and version lookups against the scanner service.
pub trait BlackduckApi: Send + Sync {
    /// Resolves the project named by `source.name`.
    ///
    /// A cached project with the same name is returned without any network
    /// call. Otherwise logs in, lists projects filtered by name and returns
    /// the first one whose name matches exactly.
    ///
    /// # Errors
    ///
    /// Every error is wrapped in [`Stage::GetProjectByName`].
    fn resolve_project(
        &self,
        source: &Source,
    ) -> impl Future<Output = Result<Project, HubClientError>> + Send;

    /// Lists the versions of `project`, oldest first.
    ///
    /// # Errors
    ///
    /// Every error is wrapped in [`Stage::GetProjectVersions`].
    fn list_versions(
        &self,
        source: &Source,
        project: &Project,
    ) -> impl Future<Output = Result<Vec<Version>, HubClientError>> + Send;
}

/// Options the HTTP client of one [`Source`] is built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    /// Skip certificate validation (`source.insecure`)
    pub accept_invalid_certs: bool,
    pub proxy: Option<ProxySettings>,
}

impl HttpSettings {
    fn build(&self) -> Result<reqwest::Client, HubClientError> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(self.accept_invalid_certs);

        if let Some(proxy) = &self.proxy {
            let mut settings = reqwest::Proxy::all(&proxy.url).map_err(HubClientError::HttpClient)?;
            if let Some((username, password)) = &proxy.credentials {
                settings = settings.basic_auth(username, password);
            }
            debug!(proxy = %proxy.url, "using proxy");
            builder = builder.proxy(settings);
        }

        builder.build().map_err(HubClientError::HttpClient)
    }
}

/// HTTP implementation of [`BlackduckApi`].
pub struct BlackduckClient<C = FileProjectCache> {
    cache: C,
    timeout: Duration,
}

impl<C: ProjectCache> BlackduckClient<C> {
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Client options for every request made on behalf of `source`, the
    /// login included.
    pub fn http_settings(&self, source: &Source) -> HttpSettings {
        HttpSettings {
            timeout: self.timeout,
            accept_invalid_certs: source.insecure,
            proxy: source.proxy(),
        }
    }

    fn http_client(&self, source: &Source) -> Result<reqwest::Client, HubClientError> {
        self.http_settings(source).build()
    }

    async fn fetch_project(&self, source: &Source) -> Result<Project, HubClientError> {
        if let Some(project) = self.cache.load() {
            if project.name == source.name {
                metrics::counter!(m::PROJECT_CACHE_HITS_TOTAL).increment(1);
                debug!(project = %project.name, "project served from cache");
                return Ok(project);
            }
            warn!(
                cached = %project.name,
                requested = %source.name,
                "cached project has a different name, ignoring"
            );
        }
        metrics::counter!(m::PROJECT_CACHE_MISSES_TOTAL).increment(1);

        let http = self.http_client(source)?;
        let token = auth::authenticate(&http, source)
            .await
            .map_err(|e| e.within(Stage::Authentication))?;

        let url = source.project_listing_url()?;
        let body = get_authenticated(&http, url.as_str(), &token, "projects")
            .await
            .map_err(|e| e.within(Stage::GetProjectUrl))?;

        let list: ProjectList = serde_json::from_str(&body)
            .map_err(|e| HubClientError::Decode(e).within(Stage::Decode))?;
        debug!(candidates = list.projects.len(), "project listing received");

        let project = list
            .projects
            .into_iter()
            .find(|project| project.name == source.name)
            .ok_or_else(|| HubClientError::ProjectNotFound {
                name: source.name.clone(),
            })?;

        self.cache.store(&project);
        info!(project = %project.name, "project resolved");
        Ok(project)
    }

    async fn fetch_versions(
        &self,
        source: &Source,
        project: &Project,
    ) -> Result<Vec<Version>, HubClientError> {
        let link = project.versions_link();

        let http = self.http_client(source)?;
        let token = auth::authenticate(&http, source)
            .await
            .map_err(|e| e.within(Stage::Authentication))?;

        let body = get_authenticated(&http, link, &token, "versions")
            .await
            .map_err(|e| e.within(Stage::Versions))?;

        let list: VersionList = serde_json::from_str(&body)
            .map_err(|e| HubClientError::Decode(e).within(Stage::Decode))?;

        let mut versions = list.versions;
        sort_chronologically(&mut versions);
        info!(project = %project.name, versions = versions.len(), "versions listed");
        Ok(versions)
    }
}

impl Default for BlackduckClient<FileProjectCache> {
    fn default() -> Self {
        Self::new(FileProjectCache::default())
    }
}

impl<C: ProjectCache> BlackduckApi for BlackduckClient<C> {
    async fn resolve_project(&self, source: &Source) -> Result<Project, HubClientError> {
        self.fetch_project(source)
            .await
            .map_err(|e| e.within(Stage::GetProjectByName))
    }

    async fn list_versions(
        &self,
        source: &Source,
        project: &Project,
    ) -> Result<Vec<Version>, HubClientError> {
        self.fetch_versions(source, project)
            .await
            .map_err(|e| e.within(Stage::GetProjectVersions))
    }
}

/// GET `url` with the session cookie and return the body text.
async fn get_authenticated(
    http: &reqwest::Client,
    url: &str,
    token: &SessionToken,
    stage: &'static str,
) -> Result<String, HubClientError> {
    let started = Instant::now();
    let result = send(http, url, token).await;
    metrics::histogram!(m::HUB_REQUEST_DURATION_SECONDS, m::LABEL_STAGE => stage)
        .record(started.elapsed().as_secs_f64());

    let outcome = if result.is_ok() { "success" } else { "failure" };
    metrics::counter!(
        m::HUB_REQUESTS_TOTAL,
        m::LABEL_STAGE => stage,
        m::LABEL_RESULT => outcome
    )
    .increment(1);
    result
}

async fn send(
    http: &reqwest::Client,
    url: &str,
    token: &SessionToken,
) -> Result<String, HubClientError> {
    let response = http
        .get(url)
        .header(COOKIE, token.cookie())
        .send()
        .await
        .map_err(HubClientError::Network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(HubClientError::HttpStatus {
            status: status.as_u16(),
        });
    }
    response.text().await.map_err(HubClientError::Network)
}
