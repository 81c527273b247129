//! # blackduck-resource-cli
//!
//! Entry points of the resource. The binary reads the request envelope from
//! stdin, writes protocol JSON to stdout and logs to stderr.
//!
//! - [`cli`]: argument parsing and program-name dispatch
//! - [`commands`]: `check`, `in` (`fetch`) and `out` (`put`) handlers
//! - [`detect`]: detect jar lookup, command line and process launcher
//! - [`output`]: protocol JSON writer
//! - [`logging`]: tracing subscriber setup
//! - [`error`]: `CliError` and exit codes

pub mod cli;
pub mod commands;
pub mod detect;
pub mod error;
pub mod logging;
pub mod output;

use std::path::Path;

use blackduck_resource_client::{
    BlackduckClient, FileProjectCache, NoProjectCache, ProjectCache,
};
use blackduck_resource_core::config::{HubConfig, ResourceConfig};
use blackduck_resource_core::error::ResourceError;

use crate::cli::{Cli, Commands};
use crate::detect::ProcessLauncher;
use crate::error::CliError;
use crate::output::OutputWriter;

/// Loads the runtime configuration.
///
/// An explicit `path` wins over `BLACKDUCK_RESOURCE_CONFIG`. Environment
/// overrides apply in both cases; `log_level` is applied last.
pub async fn load_config(
    path: Option<&Path>,
    log_level: Option<&str>,
) -> Result<ResourceConfig, CliError> {
    let mut config = match path {
        Some(path) => {
            let mut config = ResourceConfig::from_file(path).await?;
            config.apply_env_overrides();
            config
        }
        None => ResourceConfig::load().await?,
    };
    if let Some(level) = log_level {
        config.general.log_level = level.to_owned();
    }
    config.validate().map_err(config_error)?;
    Ok(config)
}

fn config_error(err: ResourceError) -> CliError {
    match err {
        ResourceError::Config(e) => CliError::Config(e.to_string()),
        other => CliError::Core(other),
    }
}

/// Service client as configured in `[hub]`.
pub fn build_client(hub: &HubConfig) -> BlackduckClient<Box<dyn ProjectCache>> {
    let cache: Box<dyn ProjectCache> = if hub.cache_enabled {
        Box::new(FileProjectCache::new(&hub.cache_path))
    } else {
        Box::new(NoProjectCache)
    };
    BlackduckClient::new(cache).with_timeout(hub.timeout())
}

/// Runs the selected command against the process's stdin and stdout.
pub async fn run(cli: Cli, config: &ResourceConfig) -> Result<(), CliError> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut writer = OutputWriter::new(stdout.lock());

    match cli.command {
        Commands::Check => {
            let api = build_client(&config.hub);
            commands::check::execute(stdin.lock(), &api, &mut writer).await
        }
        Commands::In(args) => {
            let api = build_client(&config.hub);
            commands::fetch::execute(
                stdin.lock(),
                &args.destination,
                &config.fetch,
                &api,
                &mut writer,
            )
            .await
        }
        Commands::Out(args) => {
            commands::put::execute(
                stdin.lock(),
                &args.sources,
                &config.detect,
                &ProcessLauncher,
                &mut writer,
            )
            .await
        }
    }
}
