use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use blackduck_resource_cli::cli::{Cli, normalize_args};
use blackduck_resource_cli::{load_config, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    let config = match load_config(cli.config.as_deref(), cli.log_level.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_code(e.exit_code());
        }
    };

    if let Err(e) = logging::init_tracing(&config.general) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    blackduck_resource_core::metrics::describe_metrics();

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {e}");
            exit_code(e.exit_code())
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
