//! CLI argument parsing using clap derive API
//!
//! The orchestrator runs `/opt/resource/check`, `/opt/resource/in <dir>` and
//! `/opt/resource/out <dir>`. All three are links to one binary, so the
//! program name selects the subcommand (see [`normalize_args`]). Invoking the
//! binary under its own name takes the subcommand explicitly.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

/// Black Duck resource for pipeline orchestrators.
#[derive(Parser, Debug)]
#[command(name = "blackduck-resource", version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML runtime configuration file.
    ///
    /// Defaults to the file named by BLACKDUCK_RESOURCE_CONFIG, if any.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List new versions of the project.
    Check,

    /// Fetch the metadata of one version into a directory.
    In(InArgs),

    /// Scan a source directory with detect.
    Out(OutArgs),
}

#[derive(Args, Debug)]
pub struct InArgs {
    /// Directory the result file is written to.
    pub destination: PathBuf,
}

#[derive(Args, Debug)]
pub struct OutArgs {
    /// Directory holding the build's inputs; `params.directory` is relative to it.
    pub sources: PathBuf,
}

const PROGRAM_COMMANDS: [&str; 3] = ["check", "in", "out"];

/// Inserts the subcommand implied by the program name.
///
/// `/opt/resource/in /tmp/dest` becomes `in in /tmp/dest`; any other program
/// name leaves the arguments untouched.
pub fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut args: Vec<OsString> = args.into_iter().collect();
    let implied = args
        .first()
        .and_then(|program| Path::new(program).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| PROGRAM_COMMANDS.contains(name))
        .map(OsString::from);
    if let Some(command) = implied {
        args.insert(1, command);
    }
    args
}
