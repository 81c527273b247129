//! Project cache stores
//!
//! A resolved [`Project`] is stored after the first successful lookup and read
//! back before any network call on the next resolution. Storing is best
//! effort: failures are logged and never reach the caller.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use blackduck_resource_core::types::Project;
use tracing::{debug, warn};

/// Default cache file, relative to the working directory.
pub const DEFAULT_CACHE_PATH: &str = "./project.cache";

/// Storage for the single resolved project.
pub trait ProjectCache: Send + Sync {
    /// Returns the cached project, or `None` when nothing usable is stored.
    fn load(&self) -> Option<Project>;

    /// Stores `project`, replacing any previous entry.
    fn store(&self, project: &Project);
}

impl<T: ProjectCache + ?Sized> ProjectCache for Box<T> {
    fn load(&self) -> Option<Project> {
        (**self).load()
    }

    fn store(&self, project: &Project) {
        (**self).store(project)
    }
}

/// JSON file holding one project.
#[derive(Debug, Clone)]
pub struct FileProjectCache {
    path: PathBuf,
}

impl FileProjectCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileProjectCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_PATH)
    }
}

impl ProjectCache for FileProjectCache {
    fn load(&self) -> Option<Project> {
        let content = std::fs::read(&self.path).ok()?;
        match serde_json::from_slice(&content) {
            Ok(project) => Some(project),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable project cache, ignoring");
                None
            }
        }
    }

    fn store(&self, project: &Project) {
        let bytes = match serde_json::to_vec(project) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "failed to serialize project for the cache");
                return;
            }
        };
        match std::fs::write(&self.path, bytes) {
            Ok(()) => debug!(path = %self.path.display(), project = %project.name, "project cached"),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to write project cache")
            }
        }
    }
}

/// In-process store, used when the file cache is disabled and in tests.
#[derive(Debug, Default)]
pub struct MemoryProjectCache {
    project: Mutex<Option<Project>>,
}

impl MemoryProjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(project: Project) -> Self {
        Self {
            project: Mutex::new(Some(project)),
        }
    }
}

impl ProjectCache for MemoryProjectCache {
    fn load(&self) -> Option<Project> {
        match self.project.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store(&self, project: &Project) {
        let mut guard = match self.project.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(project.clone());
    }
}

/// Never hits, never stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProjectCache;

impl ProjectCache for NoProjectCache {
    fn load(&self) -> Option<Project> {
        None
    }

    fn store(&self, _project: &Project) {}
}
