//! NuGet binary resolution
//!
//! Decides whether the pre-installed NuGet can be used or a specific release
//! has to be downloaded, and produces the command prefix used for restore.

use crate::config::ToolConfig;
use crate::error::{RestoreError, RestoreResult};
use crate::request::ToolVersion;
use crate::retry::{retry, RetryPolicy};
use crate::tool::download::Downloader;
use crate::ui;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// File name the downloaded binary is stored under
pub const DOWNLOAD_FILE_NAME: &str = "nuget.exe";

/// Leading command-line tokens that run NuGet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    args: Vec<String>,
}

impl ToolInvocation {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    /// Run a binary directly
    pub fn system(path: impl Into<PathBuf>) -> Self {
        Self::new(vec![path.into().display().to_string()])
    }

    /// Run a binary through an interpreter
    pub fn interpreted(interpreter: impl Into<PathBuf>, binary: impl Into<PathBuf>) -> Self {
        Self::new(vec![
            interpreter.into().display().to_string(),
            binary.into().display().to_string(),
        ])
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&printable_command(&self.args))
    }
}

/// Join arguments for display, quoting those with spaces
pub fn printable_command(args: &[String]) -> String {
    args.iter()
        .map(|arg| {
            if arg.contains(char::is_whitespace) {
                format!("\"{}\"", arg)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a [`ToolVersion`] to a [`ToolInvocation`]
pub struct ToolResolver<'a> {
    config: &'a ToolConfig,
    downloader: &'a dyn Downloader,
    policy: RetryPolicy,
}

impl<'a> ToolResolver<'a> {
    pub fn new(
        config: &'a ToolConfig,
        downloader: &'a dyn Downloader,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            config,
            downloader,
            policy,
        }
    }

    /// URL to fetch `version` from on the given 0-based attempt.
    ///
    /// Returns `None` for the pre-installed binary.
    pub fn download_url(&self, version: &ToolVersion, attempt: u32) -> Option<String> {
        match version {
            ToolVersion::Preinstalled => None,
            ToolVersion::Latest => Some(self.config.latest_url.clone()),
            ToolVersion::Explicit(v) => {
                let template = match &self.config.fallback_download_url {
                    Some(fallback) if attempt > 0 => fallback,
                    _ => &self.config.download_url,
                };
                Some(template.replace("{version}", &format!("v{}", v)))
            }
        }
    }

    /// Resolve the invocation, downloading NuGet when a version was requested.
    ///
    /// Once a version is requested, a failed download is final; the
    /// pre-installed binary is never used as a fallback.
    pub async fn resolve(&self, version: &ToolVersion) -> RestoreResult<ToolInvocation> {
        if !version.needs_download() {
            debug!("Using pre-installed NuGet at {}", self.config.system_path.display());
            return Ok(ToolInvocation::system(&self.config.system_path));
        }

        let dir = self.config.download_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| RestoreError::DownloadCreate {
                path: dir.clone(),
                source: e,
            })?;
        let destination = dir.join(DOWNLOAD_FILE_NAME);

        let downloader = self.downloader;
        let dest = destination.as_path();
        retry(&self.policy, "NuGet download", move |attempt| {
            let url = self.download_url(version, attempt).unwrap_or_default();
            ui::key_value("Download URL", &url);
            async move { downloader.download(&url, dest).await }
        })
        .await?;

        Ok(ToolInvocation::interpreted(
            &self.config.interpreter,
            destination,
        ))
    }
}
