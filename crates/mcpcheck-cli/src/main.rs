//! CLI entry point - the composition root.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mcpcheck_cli::{Cli, CliConfig, CliError, bootstrap, handlers};

/// Logs go to stderr so stdout carries only the probe report.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(cli);
    let ctx = bootstrap(&config)?;
    handlers::probe::execute(&ctx).await
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before parsing so USER_ID can come from .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<CliError>())
                .map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}
