//! Synopsys Detect invocation
//!
//! [`locate_agent`] picks the newest `synopsys-detect-<semver>.jar` from the
//! agent directory, [`DetectInvocation`] assembles the java command line from
//! the request, and a [`ScanLauncher`] runs it. [`ProcessLauncher`] is the
//! real one; command tests use a mock.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use blackduck_resource_core::types::Source;
use regex::Regex;
use semver::Version;
use tracing::debug;

use crate::error::CliError;

/// File name pattern of the detect jar; the capture is its version.
pub const AGENT_PATTERN: &str = r"^synopsys-detect-(.+)\.jar$";

/// Finds the detect jar with the highest version in `dir`.
///
/// Jars whose version is not valid semver are skipped.
///
/// # Errors
///
/// [`CliError::ScannerNotFound`] when the directory is missing or holds no
/// matching jar.
pub fn locate_agent(dir: &Path) -> Result<PathBuf, CliError> {
    let pattern = Regex::new(AGENT_PATTERN)
        .map_err(|e| CliError::Config(format!("invalid agent pattern: {e}")))?;

    let entries = std::fs::read_dir(dir).map_err(|e| {
        debug!(dir = %dir.display(), error = %e, "agent directory unreadable");
        CliError::ScannerNotFound
    })?;

    entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let version = pattern
                .captures(&name)
                .and_then(|caps| caps.get(1))
                .and_then(|v| Version::parse(v.as_str()).ok())?;
            Some((version, entry.path()))
        })
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, path)| path)
        .ok_or(CliError::ScannerNotFound)
}

/// A fully assembled detect command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl DetectInvocation {
    /// `<java> -jar <jar> --blackduck.url=… --detect.project.name=…` plus
    /// credentials, trust and proxy flags taken from `source`.
    pub fn new(java: &str, jar: &Path, source: &Source, working_dir: PathBuf) -> Self {
        let mut args = vec![
            "-jar".to_owned(),
            jar.display().to_string(),
            format!("--blackduck.url={}", source.url),
            format!("--detect.project.name={}", source.name),
        ];

        if source.token.is_empty() {
            args.push(format!("--blackduck.username={}", source.username));
            args.push(format!("--blackduck.password={}", source.password));
        } else {
            args.push(format!("--blackduck.api.token={}", source.token));
        }

        if source.insecure {
            args.push("--blackduck.trust.cert=true".to_owned());
        }

        let proxy = [
            ("host", &source.proxy_host),
            ("port", &source.proxy_port),
            ("username", &source.proxy_username),
            ("password", &source.proxy_password),
        ];
        for (key, value) in proxy {
            if !value.is_empty() {
                args.push(format!("--blackduck.proxy.{key}={value}"));
            }
        }

        Self {
            program: java.to_owned(),
            args,
            working_dir,
        }
    }

    /// Arguments with secret values masked, for logging.
    pub fn redacted_args(&self) -> Vec<String> {
        const SECRET_FLAGS: [&str; 3] = [
            "--blackduck.password=",
            "--blackduck.api.token=",
            "--blackduck.proxy.password=",
        ];
        self.args
            .iter()
            .map(|arg| match SECRET_FLAGS.iter().find(|flag| arg.starts_with(*flag)) {
                Some(flag) => format!("{flag}***"),
                None => arg.clone(),
            })
            .collect()
    }
}

/// Captured outcome of a detect run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectRun {
    pub stdout: String,
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl DetectRun {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a detect invocation to completion.
pub trait ScanLauncher: Send + Sync {
    fn launch(
        &self,
        invocation: &DetectInvocation,
    ) -> impl Future<Output = Result<DetectRun, CliError>> + Send;
}

/// Spawns the command as a child process.
///
/// stdout is captured for interpretation; stderr goes straight to ours.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl ScanLauncher for ProcessLauncher {
    async fn launch(&self, invocation: &DetectInvocation) -> Result<DetectRun, CliError> {
        let output = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(CliError::Launch)?;

        Ok(DetectRun {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
