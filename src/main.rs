//! nuget-restore - NuGet package restore build step
//!
//! CLI entry point.

use clap::Parser;
use console::style;
use nuget_restore::cli::Cli;
use nuget_restore::error::RestoreResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> RestoreResult<()> {
    let cli = Cli::parse();

    // 0 = warn (retries, cache warnings), 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("nuget_restore=warn"),
        1 => EnvFilter::new("nuget_restore=info"),
        _ => EnvFilter::new("nuget_restore=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    nuget_restore::cli::execute(cli).await
}
