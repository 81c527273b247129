//! Interpreter errors.

use crate::interpreter::InterpretedScan;

#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    /// Detect reported an overall status other than `SUCCESS`.
    ///
    /// Displays exactly the status text and still carries everything the
    /// log revealed, so the caller can emit the result before failing.
    #[error("{status}")]
    ScanFailed {
        status: String,
        scan: Box<InterpretedScan>,
    },

    /// A marker line carried no `": "` separator to take the value from.
    #[error("line {line}: '{marker}' has no value")]
    MalformedLine { line: usize, marker: &'static str },
}

impl InterpretError {
    /// The partially or fully extracted result, when there is one.
    pub fn scan(&self) -> Option<&InterpretedScan> {
        match self {
            Self::ScanFailed { scan, .. } => Some(scan),
            Self::MalformedLine { .. } => None,
        }
    }
}
