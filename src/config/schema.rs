//! Configuration schema for nuget-restore
//!
//! Configuration is stored at `~/.config/nuget-restore/config.toml`

use crate::retry::RetryPolicy;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Mono framework install prefix on macOS build machines
const MONO_BIN: &str = "/Library/Frameworks/Mono.framework/Versions/Current/bin";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// NuGet binary and download settings
    pub tool: ToolConfig,

    /// Retry settings for download and restore
    pub retry: RetryConfig,

    /// Cache registration settings
    pub cache: CacheConfig,
}

/// NuGet binary configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Pre-installed NuGet, runnable without an interpreter
    pub system_path: PathBuf,

    /// Interpreter used to run a downloaded nuget.exe
    pub interpreter: PathBuf,

    /// Versioned download URL; `{version}` becomes `v<version>`
    pub download_url: String,

    /// Tried from the second download attempt on
    pub fallback_download_url: Option<String>,

    /// Download URL of the latest release
    pub latest_url: String,

    /// Where nuget.exe is downloaded to (defaults to `<tmp>/__nuget__`)
    pub download_dir: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            system_path: PathBuf::from(MONO_BIN).join("nuget"),
            interpreter: PathBuf::from(MONO_BIN).join("mono"),
            download_url: "https://dist.nuget.org/win-x86-commandline/{version}/nuget.exe"
                .to_string(),
            fallback_download_url: Some(
                "https://dist.nuget.org/win-x86-commandline/{version}/NuGet.exe".to_string(),
            ),
            latest_url: "https://dist.nuget.org/win-x86-commandline/latest/nuget.exe".to_string(),
            download_dir: None,
        }
    }
}

impl ToolConfig {
    /// Directory the downloaded binary is written to
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("__nuget__"))
    }
}

/// Retry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Download retries beyond the first attempt
    pub download_retries: u32,

    /// Pause before a download retry in milliseconds
    pub download_delay_ms: u64,

    /// Restore retries beyond the first attempt
    pub restore_retries: u32,

    /// Pause before a restore retry in milliseconds
    pub restore_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let download = RetryPolicy::download();
        let restore = RetryPolicy::restore();
        Self {
            download_retries: download.max_attempts,
            download_delay_ms: download.delay.as_millis() as u64,
            restore_retries: restore.max_attempts,
            restore_delay_ms: restore.delay.as_millis() as u64,
        }
    }
}

impl RetryConfig {
    pub fn download_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.download_retries,
            Duration::from_millis(self.download_delay_ms),
        )
    }

    pub fn restore_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.restore_retries,
            Duration::from_millis(self.restore_delay_ms),
        )
    }
}

/// Cache registration configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Also register the NuGet HTTP cache for `global` and `all`
    pub include_http_cache: bool,

    /// Append paths to this file instead of exporting them through envman
    pub manifest: Option<PathBuf>,
}
