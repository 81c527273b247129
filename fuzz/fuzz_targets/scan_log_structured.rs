#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use blackduck_resource_interpreter::{InterpretError, Marker, interpret};

/// 퍼저용 구조적 입력: 마커 줄과 잡음 줄의 나열
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    lines: Vec<FuzzLine>,
    crlf: bool,
}

#[derive(Arbitrary, Debug)]
enum FuzzLine {
    Noise(String),
    Marked { marker: FuzzMarker, value: String },
}

#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzMarker {
    ResultsUrl,
    ProjectVersion,
    ProjectName,
    OverallStatus,
}

impl From<FuzzMarker> for Marker {
    fn from(m: FuzzMarker) -> Self {
        match m {
            FuzzMarker::ResultsUrl => Marker::ResultsUrl,
            FuzzMarker::ProjectVersion => Marker::ProjectVersion,
            FuzzMarker::ProjectName => Marker::ProjectName,
            FuzzMarker::OverallStatus => Marker::OverallStatus,
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    let newline = if input.crlf { "\r\n" } else { "\n" };
    let log = input
        .lines
        .iter()
        .take(64)
        .map(|line| match line {
            FuzzLine::Noise(text) => text.clone(),
            FuzzLine::Marked { marker, value } => {
                format!("--- {}: {}", Marker::from(*marker).text(), value)
            }
        })
        .collect::<Vec<_>>()
        .join(newline);

    match interpret(&log) {
        Ok(scan) => assert!(scan.is_success()),
        Err(InterpretError::ScanFailed { status, .. }) => assert_ne!(status, "SUCCESS"),
        Err(InterpretError::MalformedLine { .. }) => {}
    }
});
