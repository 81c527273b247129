//! `in` command handler

use std::io::{Read, Write};
use std::path::Path;

use blackduck_resource_client::BlackduckApi;
use blackduck_resource_core::config::FetchConfig;
use blackduck_resource_core::types::Version;
use tracing::{info, warn};

use crate::commands::read_request;
use crate::error::CliError;
use crate::output::{OutputWriter, VersionOutput};

/// Execute the `in` command.
///
/// Looks up the requested version, writes its metadata to
/// `<destination>/<output_file>` and prints the same document. Prints `{}`
/// when the version is not listed, and `[]` before failing when the lookup
/// itself fails.
///
/// Refs are `settingUpdatedAt` timestamps. The ref `out` emits is a project
/// version id, which never matches one, so the get that follows a put prints
/// `{}`, writes no file and succeeds.
pub async fn execute<A, R, W>(
    input: R,
    destination: &Path,
    settings: &FetchConfig,
    api: &A,
    writer: &mut OutputWriter<W>,
) -> Result<(), CliError>
where
    A: BlackduckApi,
    R: Read,
    W: Write,
{
    let found = match find_version(input, api).await {
        Ok(found) => found,
        Err(e) => {
            writer.empty_list()?;
            return Err(e);
        }
    };

    let Some(version) = found else {
        warn!("requested version is not listed");
        return writer.emit_bytes(b"{}");
    };

    let output = VersionOutput {
        version: version.to_ref(),
        metadata: version.metadata(),
    };
    let bytes = serde_json::to_vec(&output)?;

    let path = destination.join(&settings.output_file);
    tokio::fs::write(&path, &bytes).await?;
    info!(version = %version, path = %path.display(), "version fetched");

    writer.emit_bytes(&bytes)
}

async fn find_version<A: BlackduckApi, R: Read>(
    input: R,
    api: &A,
) -> Result<Option<Version>, CliError> {
    let request = read_request(input)?;
    request
        .source
        .validate()
        .map_err(|e| CliError::invalid("source is invalid", e))?;

    let project = api.resolve_project(&request.source).await?;
    let versions = api.list_versions(&request.source, &project).await?;

    let Some(wanted) = request.version else {
        return Ok(None);
    };
    Ok(versions.into_iter().find(|v| v.to_ref() == wanted))
}
