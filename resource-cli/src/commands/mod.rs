//! Command handlers -- one module per orchestrator program
//!
//! - [`check`]: `check`
//! - [`fetch`]: `in`
//! - [`put`]: `out`

pub mod check;
pub mod fetch;
pub mod put;

use std::io::Read;

use blackduck_resource_core::types::Request;

use crate::error::CliError;

/// Decodes the request envelope from stdin.
pub fn read_request(input: impl Read) -> Result<Request, CliError> {
    serde_json::from_reader(input).map_err(CliError::RequestDecode)
}
