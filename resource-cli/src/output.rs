//! Protocol output
//!
//! stdout belongs to the orchestrator: every command writes exactly one JSON
//! document there through [`OutputWriter`]. Logs go to stderr.

use std::io::Write;

use blackduck_resource_core::types::{MetadataEntry, Ref};
use serde::Serialize;

use crate::error::CliError;

/// Writes protocol JSON to stdout (or any writer in tests).
pub struct OutputWriter<W: Write> {
    inner: W,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Serialises `payload` as compact JSON followed by a newline.
    pub fn emit<T: Serialize + ?Sized>(&mut self, payload: &T) -> Result<(), CliError> {
        let bytes = serde_json::to_vec(payload)?;
        self.emit_bytes(&bytes)
    }

    /// Writes pre-rendered JSON followed by a newline.
    pub fn emit_bytes(&mut self, bytes: &[u8]) -> Result<(), CliError> {
        self.inner.write_all(bytes)?;
        writeln!(self.inner)?;
        self.inner.flush()?;
        Ok(())
    }

    /// The `[]` placeholder written before a failing `check` or `in` returns.
    pub fn empty_list(&mut self) -> Result<(), CliError> {
        self.emit_bytes(b"[]")
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// `{"version": {"ref": ...}, "metadata": [...]}` emitted by `in` and `out`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionOutput {
    pub version: Ref,
    pub metadata: Vec<MetadataEntry>,
}
