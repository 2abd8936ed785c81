//! Error types for nuget-restore
//!
//! All modules use `RestoreResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for nuget-restore operations
pub type RestoreResult<T> = Result<T, RestoreError>;

/// Pipeline stage an error belongs to
///
/// The orchestrator uses this to decide between aborting and warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    Configuration,
    Acquisition,
    Execution,
    CacheCollection,
    Internal,
}

impl ErrorStage {
    /// Whether an error of this stage terminates the pipeline
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::CacheCollection)
    }
}

/// All errors that can occur while restoring packages
#[derive(Error, Debug)]
pub enum RestoreError {
    // Configuration errors
    #[error("No solution specified")]
    SolutionMissing,

    #[error("Solution not found at: {0}")]
    SolutionNotFound(PathBuf),

    #[error("Solution path is not a file: {0}")]
    SolutionNotFile(PathBuf),

    #[error("Cannot read solution {path}: {source}")]
    SolutionUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid NuGet version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // Acquisition errors
    #[error("Failed to create {path}: {source}")]
    DownloadCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to download from {url}: {reason}")]
    DownloadTransport { url: String, reason: String },

    #[error("Download from {url} returned non success status code: {status}")]
    DownloadStatus { url: String, status: u16 },

    #[error("Failed to write download from {url}: {source}")]
    DownloadCopy {
        url: String,
        #[source]
        source: std::io::Error,
    },

    // Execution errors
    #[error("Command failed to start: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {command}, exit code: {}", display_code(.code))]
    CommandExit { command: String, code: Option<i32> },

    // Cache errors
    #[error("Failed to resolve project root {path}: {source}")]
    CacheRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {root}: {reason}")]
    CacheWalk { root: PathBuf, reason: String },

    #[error("Cannot determine {what}: home directory unavailable")]
    CacheLocation { what: &'static str },

    #[error("Failed to register cache paths: {0}")]
    CacheRegistry(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

impl RestoreError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Classify the error into its pipeline stage
    pub fn stage(&self) -> ErrorStage {
        match self {
            Self::SolutionMissing
            | Self::SolutionNotFound(_)
            | Self::SolutionNotFile(_)
            | Self::SolutionUnreadable { .. }
            | Self::InvalidVersion { .. }
            | Self::ConfigInvalid { .. } => ErrorStage::Configuration,
            Self::DownloadCreate { .. }
            | Self::DownloadTransport { .. }
            | Self::DownloadStatus { .. }
            | Self::DownloadCopy { .. } => ErrorStage::Acquisition,
            Self::CommandFailed { .. } | Self::CommandExit { .. } => ErrorStage::Execution,
            Self::CacheRoot { .. }
            | Self::CacheWalk { .. }
            | Self::CacheLocation { .. }
            | Self::CacheRegistry(_) => ErrorStage::CacheCollection,
            Self::Io { .. } | Self::Internal(_) => ErrorStage::Internal,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::SolutionMissing => Some("Pass --solution or set xamarin_solution"),
            Self::DownloadStatus { .. } => {
                Some("Check that the requested nuget_version exists on dist.nuget.org")
            }
            Self::CommandFailed { .. } => {
                Some("Check that NuGet and Mono are installed, or set --nuget-path")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RestoreError::SolutionNotFound(PathBuf::from("/tmp/App.sln"));
        assert_eq!(err.to_string(), "Solution not found at: /tmp/App.sln");
    }

    #[test]
    fn command_exit_display() {
        let err = RestoreError::CommandExit {
            command: "nuget restore App.sln".to_string(),
            code: Some(1),
        };
        assert!(err.to_string().contains("exit code: 1"));

        let err = RestoreError::CommandExit {
            command: "nuget restore App.sln".to_string(),
            code: None,
        };
        assert!(err.to_string().contains("exit code: signal"));
    }

    #[test]
    fn error_hint() {
        assert_eq!(
            RestoreError::SolutionMissing.hint(),
            Some("Pass --solution or set xamarin_solution")
        );
        assert_eq!(RestoreError::Internal("x".to_string()).hint(), None);
    }

    #[test]
    fn cache_errors_are_not_fatal() {
        let err = RestoreError::CacheRegistry("envman missing".to_string());
        assert_eq!(err.stage(), ErrorStage::CacheCollection);
        assert!(!err.stage().is_fatal());

        let err = RestoreError::DownloadStatus {
            url: "https://example.invalid".to_string(),
            status: 404,
        };
        assert_eq!(err.stage(), ErrorStage::Acquisition);
        assert!(err.stage().is_fatal());
    }
}
