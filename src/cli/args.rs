//! CLI argument definitions using clap derive
//!
//! Every input doubles as an environment variable so the binary can run as
//! a CI step configured purely through its environment.

use crate::cache::CacheLevel;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// nuget-restore - NuGet package restore build step
///
/// Makes the requested NuGet available, restores the given solution and
/// registers the package folders for the build cache.
#[derive(Parser, Debug)]
#[command(name = "nuget-restore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Solution or project file to restore
    #[arg(short, long, env = "xamarin_solution")]
    pub solution: Option<PathBuf>,

    /// NuGet version: empty for the pre-installed one, "latest", or e.g. 4.9.6
    #[arg(short = 'n', long, env = "nuget_version", default_value = "")]
    pub nuget_version: String,

    /// Which package folders to register for caching
    #[arg(long, env = "cache_level", value_enum, default_value_t = CacheLevel::Local)]
    pub cache_level: CacheLevel,

    /// Pre-installed NuGet binary
    #[arg(long, env = "NUGET_RESTORE_NUGET_PATH")]
    pub nuget_path: Option<PathBuf>,

    /// Mono binary used to run a downloaded nuget.exe
    #[arg(long, env = "NUGET_RESTORE_MONO_PATH")]
    pub mono_path: Option<PathBuf>,

    /// Append cache paths to this file instead of exporting them via envman
    #[arg(long, env = "NUGET_RESTORE_CACHE_MANIFEST")]
    pub cache_manifest: Option<PathBuf>,

    /// Also register NuGet's HTTP cache when registering the global cache
    #[arg(long)]
    pub include_http_cache: bool,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "NUGET_RESTORE_CONFIG")]
    pub config: Option<PathBuf>,
}
