//! # blackduck-resource-interpreter
//!
//! Turns the console output of a Synopsys Detect run into an
//! [`InterpretedScan`]: project version id, project name, version, results
//! URL and overall status.

pub mod error;
pub mod interpreter;

pub use error::InterpretError;
pub use interpreter::{InterpretedScan, Marker, SUCCESS_STATUS, interpret};
