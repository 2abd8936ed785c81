//! nuget-restore - NuGet package restore build step
//!
//! Ensures the requested NuGet is available, restores a solution with it and
//! registers the resulting package folders with the build cache.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod request;
pub mod restore;
pub mod retry;
pub mod tool;
pub mod ui;

pub use error::{RestoreError, RestoreResult};
