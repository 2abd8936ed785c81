//! Cache registration
//!
//! Hands the collected paths to whatever persists the build cache. On
//! Bitrise that is the `BITRISE_CACHE_INCLUDE_PATHS` variable exported
//! through envman; elsewhere a plain manifest file works.

use crate::cache::collect::CacheSet;
use crate::error::{RestoreError, RestoreResult};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Variable the Bitrise cache step reads include paths from
pub const CACHE_INCLUDE_PATHS_ENV: &str = "BITRISE_CACHE_INCLUDE_PATHS";

/// Persists a cache set for later runs
#[async_trait]
pub trait CacheRegistry: Send + Sync {
    /// Register every path in `set`
    async fn commit(&self, set: &CacheSet) -> RestoreResult<()>;

    /// Human-readable destination for display
    fn describe(&self) -> String;
}

/// Default envman executable, looked up on `PATH`
pub const ENVMAN_PROGRAM: &str = "envman";

/// Exports include paths with `envman add`
pub struct EnvmanRegistry {
    program: PathBuf,
    existing: Option<String>,
}

impl EnvmanRegistry {
    /// Create a registry that appends to `existing` include paths
    pub fn new(existing: Option<String>) -> Self {
        Self {
            program: PathBuf::from(ENVMAN_PROGRAM),
            existing,
        }
    }

    /// Run a different envman binary
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Create a registry seeded from the current process environment
    pub fn from_env() -> Self {
        Self::new(std::env::var(CACHE_INCLUDE_PATHS_ENV).ok())
    }

    /// Previous include paths followed by the new ones, one per line
    pub fn merged_value(&self, set: &CacheSet) -> String {
        let mut lines: Vec<String> = self
            .existing
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        lines.extend(set.paths().map(|p| p.display().to_string()));
        lines.join("\n")
    }
}

#[async_trait]
impl CacheRegistry for EnvmanRegistry {
    async fn commit(&self, set: &CacheSet) -> RestoreResult<()> {
        if set.is_empty() {
            debug!("Nothing to register");
            return Ok(());
        }

        let value = self.merged_value(set);
        debug!("Exporting {}={:?}", CACHE_INCLUDE_PATHS_ENV, value);

        let output = Command::new(&self.program)
            .args(["add", "--key", CACHE_INCLUDE_PATHS_ENV, "--value", &value])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                RestoreError::CacheRegistry(format!(
                    "failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(RestoreError::CacheRegistry(format!(
                "envman add failed: {}",
                stderr.trim()
            )))
        }
    }

    fn describe(&self) -> String {
        format!("envman ({})", CACHE_INCLUDE_PATHS_ENV)
    }
}

/// Appends include paths to a text file, one per line
pub struct ManifestFileRegistry {
    path: PathBuf,
}

impl ManifestFileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CacheRegistry for ManifestFileRegistry {
    async fn commit(&self, set: &CacheSet) -> RestoreResult<()> {
        let registry_err = |action: &str, e: std::io::Error| {
            RestoreError::CacheRegistry(format!("{} {}: {}", action, self.path.display(), e))
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| registry_err("creating directory for", e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| registry_err("opening", e))?;

        let mut content = String::new();
        for path in set.paths() {
            content.push_str(&path.display().to_string());
            content.push('\n');
        }

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| registry_err("writing", e))?;
        file.flush().await.map_err(|e| registry_err("flushing", e))?;

        debug!("Wrote {} cache path(s) to {}", set.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
