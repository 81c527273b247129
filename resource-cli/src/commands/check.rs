//! `check` command handler

use std::io::{Read, Write};

use blackduck_resource_client::BlackduckApi;
use blackduck_resource_core::types::{Ref, Version};
use tracing::info;

use crate::commands::read_request;
use crate::error::CliError;
use crate::output::OutputWriter;

/// Execute the `check` command.
///
/// Prints the project's version refs, oldest first. On any failure `[]` is
/// printed before the error is returned.
pub async fn execute<A, R, W>(
    input: R,
    api: &A,
    writer: &mut OutputWriter<W>,
) -> Result<(), CliError>
where
    A: BlackduckApi,
    R: Read,
    W: Write,
{
    match list_refs(input, api).await {
        Ok(refs) => writer.emit(&refs),
        Err(e) => {
            writer.empty_list()?;
            Err(e)
        }
    }
}

async fn list_refs<A: BlackduckApi, R: Read>(input: R, api: &A) -> Result<Vec<Ref>, CliError> {
    let request = read_request(input)?;
    request
        .source
        .validate()
        .map_err(|e| CliError::invalid("source is invalid", e))?;

    let project = api.resolve_project(&request.source).await?;
    let versions = api.list_versions(&request.source, &project).await?;

    let refs: Vec<Ref> = versions.iter().map(Version::to_ref).collect();
    let refs = since(refs, request.version.as_ref());
    info!(project = %project.name, emitted = refs.len(), "check complete");
    Ok(refs)
}

/// Refs from `previous` onward (inclusive), or all of them when `previous`
/// is absent or no longer listed.
pub fn since(refs: Vec<Ref>, previous: Option<&Ref>) -> Vec<Ref> {
    let start = previous
        .and_then(|prev| refs.iter().position(|r| r == prev))
        .unwrap_or(0);
    refs.into_iter().skip(start).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{MockApi, REQUEST, request_with_version, version};

    const T1: &str = "2019-04-18T09:12:48.511Z";
    const T2: &str = "2019-04-19T09:12:48.511Z";
    const T3: &str = "2019-04-20T09:12:48.511Z";

    fn api() -> MockApi {
        MockApi::with_versions(vec![
            version("1.0.0", T1),
            version("1.0.1", T2),
            version("1.1.0", T3),
        ])
    }

    async fn run(input: &str, api: &MockApi) -> (Result<(), CliError>, String) {
        let mut writer = OutputWriter::new(Vec::new());
        let result = execute(input.as_bytes(), api, &mut writer).await;
        (result, String::from_utf8(writer.into_inner()).unwrap())
    }

    #[tokio::test]
    async fn first_check_emits_every_version_oldest_first() {
        let (result, out) = run(REQUEST, &api()).await;
        result.unwrap();
        let refs: Vec<Ref> = serde_json::from_str(&out).unwrap();
        assert_eq!(refs, vec![Ref::new(T1), Ref::new(T2), Ref::new(T3)]);
    }

    #[tokio::test]
    async fn known_previous_version_limits_output() {
        let (result, out) = run(&request_with_version(T2), &api()).await;
        result.unwrap();
        let refs: Vec<Ref> = serde_json::from_str(&out).unwrap();
        assert_eq!(refs, vec![Ref::new(T2), Ref::new(T3)]);
    }

    #[tokio::test]
    async fn unknown_previous_version_emits_everything() {
        let (result, out) = run(&request_with_version("gone"), &api()).await;
        result.unwrap();
        let refs: Vec<Ref> = serde_json::from_str(&out).unwrap();
        assert_eq!(refs.len(), 3);
    }

    #[tokio::test]
    async fn no_versions_emits_empty_list() {
        let (result, out) = run(REQUEST, &MockApi::with_versions(Vec::new())).await;
        result.unwrap();
        assert_eq!(out, "[]\n");
    }

    #[tokio::test]
    async fn invalid_source_prints_placeholder_and_fails() {
        let (result, out) = run(r#"{"source": {"url": "https://hub"}}"#, &api()).await;
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("source is invalid"));
        assert_eq!(out, "[]\n");
    }

    #[tokio::test]
    async fn garbage_request_prints_placeholder_and_fails() {
        let (result, out) = run("{", &api()).await;
        assert!(matches!(result.unwrap_err(), CliError::RequestDecode(_)));
        assert_eq!(out, "[]\n");
    }

    #[tokio::test]
    async fn missing_project_prints_placeholder_and_fails() {
        let api = MockApi {
            project: None,
            ..api()
        };
        let (result, out) = run(REQUEST, &api).await;
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "GetProjectByName: no project matching the name");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(out, "[]\n");
    }

    #[tokio::test]
    async fn version_failure_prints_placeholder_and_fails() {
        let api = MockApi {
            fail_versions: true,
            ..api()
        };
        let (result, out) = run(REQUEST, &api).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "GetProjectVersions: Authentication: authentication failed"
        );
        assert_eq!(out, "[]\n");
    }

    #[test]
    fn since_is_inclusive() {
        let refs = vec![Ref::new("a"), Ref::new("b"), Ref::new("c")];
        assert_eq!(since(refs.clone(), Some(&Ref::new("c"))), vec![Ref::new("c")]);
        assert_eq!(since(refs.clone(), None), refs);
    }
}
