//! HTTP download of the NuGet binary

use crate::error::{RestoreError, RestoreResult};
use async_trait::async_trait;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;
use ureq::http::StatusCode;
use ureq::Agent;

/// Fetches a URL into a local file
///
/// Implementations must truncate `destination` before transferring so a
/// retry never builds on a partial file from an earlier attempt.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, url: &str, destination: &Path) -> RestoreResult<()>;
}

/// Blocking `ureq` downloader run on the blocking thread pool
#[derive(Clone)]
pub struct HttpDownloader {
    agent: Agent,
}

impl HttpDownloader {
    /// Create a downloader with default agent settings
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self::with_agent(Agent::new_with_config(config))
    }

    /// Use a preconfigured agent. It must not turn HTTP statuses into
    /// errors; status handling happens here.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, destination: &Path) -> RestoreResult<()> {
        let agent = self.agent.clone();
        let url = url.to_string();
        let destination = destination.to_path_buf();

        tokio::task::spawn_blocking(move || fetch_to_file(&agent, &url, &destination))
            .await
            .map_err(|e| RestoreError::Internal(format!("download task failed: {}", e)))?
    }
}

fn fetch_to_file(agent: &Agent, url: &str, destination: &Path) -> RestoreResult<()> {
    let mut file = File::create(destination).map_err(|e| RestoreError::DownloadCreate {
        path: destination.to_path_buf(),
        source: e,
    })?;

    debug!("GET {}", url);
    let response = agent
        .get(url)
        .call()
        .map_err(|e| RestoreError::DownloadTransport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(RestoreError::DownloadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let copy_err = |e: io::Error| RestoreError::DownloadCopy {
        url: url.to_string(),
        source: e,
    };

    let mut body = response.into_body().into_reader();
    let written = io::copy(&mut body, &mut file).map_err(copy_err)?;
    file.flush().map_err(copy_err)?;

    debug!("Downloaded {} bytes to {}", written, destination.display());
    Ok(())
}
