//! Run the restore step from parsed CLI arguments

use crate::cache::{CacheRegistry, EnvmanRegistry, ManifestFileRegistry};
use crate::cli::args::Cli;
use crate::config::{Config, ConfigManager};
use crate::error::RestoreResult;
use crate::pipeline::Pipeline;
use crate::request::RestoreRequest;
use crate::tool::HttpDownloader;
use crate::ui;
use tracing::debug;

/// Execute the step
pub async fn execute(cli: Cli) -> RestoreResult<()> {
    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    debug!("Loading config from {}", manager.path().display());

    let config = apply_overrides(manager.load().await?, &cli);

    print_configs(&cli, &config);

    let request = RestoreRequest::new(cli.solution.clone(), &cli.nuget_version, cli.cache_level)?;

    let registry: Box<dyn CacheRegistry> = match config.cache.manifest {
        Some(ref path) => Box::new(ManifestFileRegistry::new(path)),
        None => Box::new(EnvmanRegistry::from_env()),
    };
    let downloader = HttpDownloader::new();

    let report = Pipeline::new(&config, &downloader, registry.as_ref())
        .run(&request)
        .await?;

    debug!("Restore finished using {}", report.invocation);
    Ok(())
}

/// Layer CLI/env inputs over the file configuration
fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(ref path) = cli.nuget_path {
        config.tool.system_path = path.clone();
    }
    if let Some(ref path) = cli.mono_path {
        config.tool.interpreter = path.clone();
    }
    if let Some(ref path) = cli.cache_manifest {
        config.cache.manifest = Some(path.clone());
    }
    if cli.include_http_cache {
        config.cache.include_http_cache = true;
    }
    config
}

fn print_configs(cli: &Cli, config: &Config) {
    ui::section("Configs:");
    let solution = cli
        .solution
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    ui::key_value("XamarinSolution", &solution);
    ui::key_value("NugetVersion", &cli.nuget_version);
    ui::key_value("CacheLevel", &cli.cache_level.to_string());
    ui::key_value("NugetPath", &config.tool.system_path.display().to_string());
}
