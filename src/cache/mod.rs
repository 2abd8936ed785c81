//! Build cache discovery and registration
//!
//! After a successful restore, the directories NuGet populated are collected
//! according to the configured [`CacheLevel`] and committed to a
//! [`CacheRegistry`] so the next build starts warm.
//!
//! # Cache Levels
//!
//! | Level | Registered paths |
//! |-------|------------------|
//! | none | nothing |
//! | local | first `packages` dir below the solution |
//! | global | `$NUGET_PACKAGES` or `~/.nuget/packages` |
//! | all | local + global |
//!
//! Failures here never fail the build; the pipeline downgrades them to warnings.

pub mod collect;
pub mod registry;

pub use collect::{
    find_packages_dir, CacheCategory, CacheEntry, CacheLevel, CachePathCollector, CacheSet,
    EnvLookup, ProcessEnv, GLOBAL_PACKAGES_ENV, HTTP_CACHE_ENV, PACKAGES_DIR,
};
pub use registry::{
    CacheRegistry, EnvmanRegistry, ManifestFileRegistry, CACHE_INCLUDE_PATHS_ENV, ENVMAN_PROGRAM,
};
