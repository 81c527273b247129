//! Detect console output interpreter
//!
//! Detect prints a results block at the end of a run:
//!
//! ```text
//! ... --- Project name: presentations
//! ... --- Project version: 1.0.0
//! ... --- To see your results, follow the URL: https://my.host/api/projects/<p>/versions/<v>/components
//! ... --- Overall Status: SUCCESS
//! ```
//!
//! Each line is checked against the markers in [`Marker::ALL`] order and the
//! first one contained in the line claims it. The value is everything after
//! the first `": "` on that line.

use blackduck_resource_core::metrics as m;
use blackduck_resource_core::types::{MetadataEntry, Ref};
use serde::Serialize;
use tracing::debug;

use crate::error::InterpretError;

/// Overall status detect reports for a clean run.
pub const SUCCESS_STATUS: &str = "SUCCESS";

const VALUE_SEPARATOR: &str = ": ";

/// Result of one detect run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterpretedScan {
    /// Project version id, the path segment following `versions` in the URL
    pub id: String,
    pub name: String,
    pub version: String,
    pub url: String,
    /// Raw overall status, `None` when detect printed none
    pub status: Option<String>,
}

impl InterpretedScan {
    pub fn to_ref(&self) -> Ref {
        Ref::new(self.id.clone())
    }

    /// Metadata emitted by `out`.
    pub fn metadata(&self) -> Vec<MetadataEntry> {
        vec![
            MetadataEntry::new("name", &self.name),
            MetadataEntry::new("version", &self.version),
            MetadataEntry::new("url", &self.url),
        ]
    }

    /// A missing status counts as success.
    pub fn is_success(&self) -> bool {
        self.status.as_deref().is_none_or(|s| s == SUCCESS_STATUS)
    }
}

/// Lines the interpreter reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    ResultsUrl,
    ProjectVersion,
    ProjectName,
    OverallStatus,
}

impl Marker {
    /// Matching order. `ProjectVersion` precedes `ProjectName`.
    pub const ALL: [Marker; 4] = [
        Marker::ResultsUrl,
        Marker::ProjectVersion,
        Marker::ProjectName,
        Marker::OverallStatus,
    ];

    pub fn text(self) -> &'static str {
        match self {
            Self::ResultsUrl => "To see your results, follow the URL",
            Self::ProjectVersion => "Project version",
            Self::ProjectName => "Project name",
            Self::OverallStatus => "Overall Status",
        }
    }

    fn find(line: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|marker| line.contains(marker.text()))
    }
}

/// Interprets captured detect stdout.
///
/// Fields whose line never appears stay empty; empty input yields an empty
/// successful result.
///
/// # Errors
///
/// - [`InterpretError::ScanFailed`] when the overall status is not `SUCCESS`;
///   the error carries the populated result
/// - [`InterpretError::MalformedLine`] when a marker line has no `": "`
pub fn interpret(log: &str) -> Result<InterpretedScan, InterpretError> {
    let mut scan = InterpretedScan::default();

    for (index, line) in log.lines().enumerate() {
        let Some(marker) = Marker::find(line) else {
            continue;
        };
        let value = value_of(line).ok_or(InterpretError::MalformedLine {
            line: index + 1,
            marker: marker.text(),
        })?;

        match marker {
            Marker::ResultsUrl => {
                scan.id = version_id(value).to_owned();
                scan.url = value.to_owned();
            }
            Marker::ProjectVersion => scan.version = value.to_owned(),
            Marker::ProjectName => scan.name = value.to_owned(),
            Marker::OverallStatus => scan.status = Some(value.to_owned()),
        }
    }

    debug!(
        id = %scan.id,
        project = %scan.name,
        version = %scan.version,
        status = scan.status.as_deref().unwrap_or(""),
        "scan log interpreted"
    );

    if scan.is_success() {
        metrics::counter!(m::SCAN_LOGS_INTERPRETED_TOTAL, m::LABEL_RESULT => "success")
            .increment(1);
        Ok(scan)
    } else {
        metrics::counter!(m::SCAN_LOGS_INTERPRETED_TOTAL, m::LABEL_RESULT => "failure")
            .increment(1);
        let status = scan.status.clone().unwrap_or_default();
        Err(InterpretError::ScanFailed {
            status,
            scan: Box::new(scan),
        })
    }
}

/// Text after the first `": "`, verbatim except for a trailing CR.
fn value_of(line: &str) -> Option<&str> {
    line.split_once(VALUE_SEPARATOR)
        .map(|(_, value)| value.strip_suffix('\r').unwrap_or(value))
}

/// Segment following the first `versions` segment, or `""`.
fn version_id(url: &str) -> &str {
    let mut segments = url.split('/');
    segments
        .by_ref()
        .find(|segment| *segment == "versions")
        .and_then(|_| segments.next())
        .unwrap_or("")
}
