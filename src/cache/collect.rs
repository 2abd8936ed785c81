//! Cache path discovery
//!
//! Finds the directories worth preserving between builds: the solution-local
//! `packages` folder and NuGet's global package (and optionally HTTP) cache.

use crate::error::{RestoreError, RestoreResult};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Name of the solution-local package folder
pub const PACKAGES_DIR: &str = "packages";

/// Overrides the global package folder
pub const GLOBAL_PACKAGES_ENV: &str = "NUGET_PACKAGES";

/// Overrides the HTTP cache folder
pub const HTTP_CACHE_ENV: &str = "NUGET_HTTP_CACHE_PATH";

/// Which cache categories to register
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CacheLevel {
    /// Register nothing
    None,
    /// The `packages` folder next to the solution
    #[default]
    Local,
    /// NuGet's global package folder
    Global,
    /// Local and global
    All,
}

impl CacheLevel {
    pub fn includes_local(&self) -> bool {
        matches!(self, Self::Local | Self::All)
    }

    pub fn includes_global(&self) -> bool {
        matches!(self, Self::Global | Self::All)
    }
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Local => write!(f, "local"),
            Self::Global => write!(f, "global"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Kind of cache a path holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheCategory {
    LocalPackageCache,
    GlobalPackageCache,
    HttpCache,
}

impl CacheCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocalPackageCache => "local-package-cache",
            Self::GlobalPackageCache => "global-package-cache",
            Self::HttpCache => "http-cache",
        }
    }
}

impl fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directory to preserve, tagged with its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub path: PathBuf,
    pub category: CacheCategory,
}

impl CacheEntry {
    pub fn new(path: impl Into<PathBuf>, category: CacheCategory) -> Self {
        Self {
            path: path.into(),
            category,
        }
    }
}

/// Paths collected for one run. Unordered; duplicates are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSet {
    entries: Vec<CacheEntry>,
}

impl CacheSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: CacheEntry) {
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.path.as_path())
    }

    /// Entries of a single category
    pub fn of(&self, category: CacheCategory) -> impl Iterator<Item = &CacheEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }
}

/// Source of environment variables
pub trait EnvLookup: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Assembles the cache set for a [`CacheLevel`]
pub struct CachePathCollector<'a> {
    env: &'a dyn EnvLookup,
    home: Option<PathBuf>,
    include_http_cache: bool,
}

impl<'a> CachePathCollector<'a> {
    /// Create a collector resolving defaults under `home`
    pub fn new(env: &'a dyn EnvLookup, home: Option<PathBuf>) -> Self {
        Self {
            env,
            home,
            include_http_cache: false,
        }
    }

    /// Also register the HTTP cache whenever the global cache is registered
    pub fn with_http_cache(mut self, include: bool) -> Self {
        self.include_http_cache = include;
        self
    }

    /// Collect the cache paths for `level` below `project_root`
    pub fn collect(&self, level: CacheLevel, project_root: &Path) -> RestoreResult<CacheSet> {
        let mut set = CacheSet::new();

        if level.includes_local() {
            let root = std::path::absolute(project_root).map_err(|e| RestoreError::CacheRoot {
                path: project_root.to_path_buf(),
                source: e,
            })?;

            match find_packages_dir(&root)? {
                Some(path) => {
                    debug!("Found local packages dir: {}", path.display());
                    set.push(CacheEntry::new(path, CacheCategory::LocalPackageCache));
                }
                None => debug!("No {} dir below {}", PACKAGES_DIR, root.display()),
            }
        }

        if level.includes_global() {
            set.push(CacheEntry::new(
                self.global_packages_dir()?,
                CacheCategory::GlobalPackageCache,
            ));

            if self.include_http_cache {
                set.push(CacheEntry::new(self.http_cache_dir()?, CacheCategory::HttpCache));
            }
        }

        Ok(set)
    }

    /// `$NUGET_PACKAGES`, else `~/.nuget/packages`
    pub fn global_packages_dir(&self) -> RestoreResult<PathBuf> {
        if let Some(dir) = self.env_path(GLOBAL_PACKAGES_ENV) {
            return Ok(dir);
        }

        self.home
            .as_ref()
            .map(|home| home.join(".nuget").join("packages"))
            .ok_or(RestoreError::CacheLocation {
                what: "global packages folder",
            })
    }

    /// `$NUGET_HTTP_CACHE_PATH`, else the platform's NuGet v3-cache
    pub fn http_cache_dir(&self) -> RestoreResult<PathBuf> {
        if let Some(dir) = self.env_path(HTTP_CACHE_ENV) {
            return Ok(dir);
        }

        #[cfg(windows)]
        let base = dirs::data_local_dir();
        #[cfg(not(windows))]
        let base = self
            .home
            .as_ref()
            .map(|home| home.join(".local").join("share"));

        base.map(|dir| dir.join("NuGet").join("v3-cache"))
            .ok_or(RestoreError::CacheLocation { what: "http cache" })
    }

    fn env_path(&self, key: &str) -> Option<PathBuf> {
        self.env
            .var(key)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }
}

/// Depth-first search for the first directory named `packages`.
///
/// The walk is abandoned as soon as a match is found, so nested package
/// folders are never visited.
pub fn find_packages_dir(root: &Path) -> RestoreResult<Option<PathBuf>> {
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| RestoreError::CacheWalk {
            root: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        if entry.file_type().is_dir() && entry.file_name() == PACKAGES_DIR {
            return Ok(Some(entry.into_path()));
        }
    }

    Ok(None)
}
