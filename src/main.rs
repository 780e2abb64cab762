//! keyvet - batch validator for OpenRouter API keys.
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]

use std::process::ExitCode;

use clap::Parser;

use keyvet::cli::Cli;
use keyvet::config::ValidatorConfig;
use keyvet::logging;
use keyvet::orchestrator::BatchRunner;
use keyvet::report;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config first: the run log lives in the configured output directory.
    let config = match ValidatorConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("keyvet: {e}");
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let log_level = cli
        .log_level
        .as_deref()
        .and_then(logging::LogLevel::from_arg)
        .or_else(logging::parse_log_level_from_env)
        .unwrap_or_default();
    let log_format = if cli.json_output {
        logging::LogFormat::Json
    } else {
        logging::parse_log_format_from_env().unwrap_or_default()
    };
    logging::init(log_level, log_format, Some(&config.log_file()), cli.verbose);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("keyvet: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(config: ValidatorConfig) -> keyvet::Result<()> {
    let mut runner = BatchRunner::new(config)?;
    let result = runner.run().await;
    report::write_results(runner.config(), &result);
    Ok(())
}
