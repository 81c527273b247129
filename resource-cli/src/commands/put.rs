//! `out` command handler

use std::io::{Read, Write};
use std::path::Path;

use blackduck_resource_core::config::DetectConfig;
use blackduck_resource_interpreter::{InterpretError, InterpretedScan, interpret};
use tracing::{info, warn};

use crate::commands::read_request;
use crate::detect::{DetectInvocation, ScanLauncher, locate_agent};
use crate::error::CliError;
use crate::output::{OutputWriter, VersionOutput};

/// Execute the `out` command.
///
/// Runs detect against `<sources>/<params.directory>`, interprets its output
/// and prints the scan's ref and metadata. A failed scan or a non-zero detect
/// exit is reported as an error after the result has been printed.
pub async fn execute<L, R, W>(
    input: R,
    sources: &Path,
    settings: &DetectConfig,
    launcher: &L,
    writer: &mut OutputWriter<W>,
) -> Result<(), CliError>
where
    L: ScanLauncher,
    R: Read,
    W: Write,
{
    let request = read_request(input)?;
    request
        .source
        .validate()
        .map_err(|e| CliError::invalid("missing mandatory source field", e))?;
    request
        .params
        .validate()
        .map_err(|e| CliError::invalid("missing mandatory params field", e))?;

    let jar = locate_agent(Path::new(&settings.agent_dir))?;
    let working_dir = sources.join(request.params.directory.trim_start_matches('/'));
    let invocation = DetectInvocation::new(&settings.java_bin, &jar, &request.source, working_dir);
    info!(
        jar = %jar.display(),
        dir = %invocation.working_dir.display(),
        args = ?invocation.redacted_args(),
        "launching detect"
    );

    let run = launcher.launch(&invocation).await?;

    let (scan, failed_status) = match interpret(&run.stdout) {
        Ok(scan) => (scan, None),
        Err(InterpretError::ScanFailed { status, scan }) => (*scan, Some(status)),
        Err(other) => return Err(other.into()),
    };

    writer.emit(&output_for(&scan))?;

    if let Some(status) = failed_status {
        warn!(status = %status, project = %scan.name, "scan failed");
        return Err(CliError::ScanFailed(status));
    }
    if !run.success() {
        warn!(code = ?run.exit_code, "detect exited unsuccessfully");
        return Err(CliError::DetectExit {
            code: run.exit_code,
        });
    }

    info!(id = %scan.id, project = %scan.name, version = %scan.version, "scan complete");
    Ok(())
}

fn output_for(scan: &InterpretedScan) -> VersionOutput {
    VersionOutput {
        version: scan.to_ref(),
        metadata: scan.metadata(),
    }
}
