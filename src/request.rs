//! Validated input for a single restore run

use crate::cache::CacheLevel;
use crate::error::{RestoreError, RestoreResult};
use std::fmt;
use std::path::{Path, PathBuf};

/// Sentinel selecting the latest NuGet release
pub const LATEST: &str = "latest";

/// Which NuGet binary the run should use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolVersion {
    /// The NuGet already installed alongside Mono
    Preinstalled,

    /// Whatever dist.nuget.org currently serves as latest
    Latest,

    /// A specific release, without the leading `v`
    Explicit(String),
}

impl ToolVersion {
    /// Parse the `nuget_version` input
    pub fn parse(input: &str) -> RestoreResult<Self> {
        let version = input.trim();

        if version.is_empty() {
            return Ok(Self::Preinstalled);
        }
        if version == LATEST {
            return Ok(Self::Latest);
        }
        if version.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
            return Err(RestoreError::InvalidVersion {
                version: version.to_string(),
                reason: "must not contain whitespace or path separators".to_string(),
            });
        }

        Ok(Self::Explicit(version.to_string()))
    }

    /// Whether this version requires a download
    pub fn needs_download(&self) -> bool {
        !matches!(self, Self::Preinstalled)
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preinstalled => write!(f, "pre-installed"),
            Self::Latest => write!(f, "{}", LATEST),
            Self::Explicit(v) => write!(f, "{}", v),
        }
    }
}

/// Immutable input to the pipeline
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    solution: PathBuf,
    tool_version: ToolVersion,
    cache_level: CacheLevel,
}

impl RestoreRequest {
    /// Validate the raw inputs. The solution must be an existing file.
    pub fn new(
        solution: Option<PathBuf>,
        tool_version: &str,
        cache_level: CacheLevel,
    ) -> RestoreResult<Self> {
        let solution = match solution {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => return Err(RestoreError::SolutionMissing),
        };

        let metadata = std::fs::metadata(&solution).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RestoreError::SolutionNotFound(solution.clone()),
            _ => RestoreError::SolutionUnreadable {
                path: solution.clone(),
                source: e,
            },
        })?;
        if !metadata.is_file() {
            return Err(RestoreError::SolutionNotFile(solution));
        }

        Ok(Self {
            tool_version: ToolVersion::parse(tool_version)?,
            solution,
            cache_level,
        })
    }

    pub fn solution(&self) -> &Path {
        &self.solution
    }

    pub fn tool_version(&self) -> &ToolVersion {
        &self.tool_version
    }

    pub fn cache_level(&self) -> CacheLevel {
        self.cache_level
    }

    /// Directory searched for the local `packages` folder
    pub fn project_root(&self) -> &Path {
        match self.solution.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}
