//! Restore pipeline
//!
//! acquire NuGet -> `nuget restore` -> register caches.
//!
//! The first two stages are fatal on failure. Cache registration only ever
//! produces a warning: a cold cache slows the next build down but does not
//! break this one.

use crate::cache::{CachePathCollector, CacheRegistry, CacheSet, EnvLookup, ProcessEnv};
use crate::config::Config;
use crate::error::RestoreResult;
use crate::request::{RestoreRequest, ToolVersion};
use crate::restore::RestoreRunner;
use crate::tool::{printable_command, Downloader, ToolInvocation, ToolResolver};
use crate::ui;
use std::path::PathBuf;
use tracing::{debug, warn};

static PROCESS_ENV: ProcessEnv = ProcessEnv;

/// What a successful run did
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Command prefix the restore ran with
    pub invocation: ToolInvocation,

    /// Registered cache paths; `None` if registration failed
    pub cache: Option<CacheSet>,
}

/// Runs the three stages with injected collaborators
pub struct Pipeline<'a> {
    config: &'a Config,
    downloader: &'a dyn Downloader,
    registry: &'a dyn CacheRegistry,
    env: &'a dyn EnvLookup,
    home: Option<PathBuf>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline reading cache locations from the process environment
    pub fn new(
        config: &'a Config,
        downloader: &'a dyn Downloader,
        registry: &'a dyn CacheRegistry,
    ) -> Self {
        Self {
            config,
            downloader,
            registry,
            env: &PROCESS_ENV,
            home: dirs::home_dir(),
        }
    }

    /// Use a different environment for cache location lookups
    pub fn with_env(mut self, env: &'a dyn EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Use a different home directory for default cache locations
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Run the pipeline for `request`
    pub async fn run(&self, request: &RestoreRequest) -> RestoreResult<PipelineReport> {
        let invocation = self.acquire(request.tool_version()).await?;

        self.restore(&invocation, request).await?;

        let cache = match self.register_caches(request).await {
            Ok(set) => Some(set),
            Err(e) => {
                warn!("Cache collection failed: {}", e);
                ui::step_warn(&format!("Failed to register cache paths: {}", e));
                None
            }
        };

        Ok(PipelineReport { invocation, cache })
    }

    async fn acquire(&self, version: &ToolVersion) -> RestoreResult<ToolInvocation> {
        if version.needs_download() {
            ui::section(&format!("Downloading NuGet {} version...", version));
        }

        let resolver = ToolResolver::new(
            &self.config.tool,
            self.downloader,
            self.config.retry.download_policy(),
        );
        let invocation = resolver.resolve(version).await?;
        debug!("Resolved NuGet invocation: {}", invocation);

        Ok(invocation)
    }

    async fn restore(
        &self,
        invocation: &ToolInvocation,
        request: &RestoreRequest,
    ) -> RestoreResult<()> {
        ui::section("Restoring NuGet packages...");

        let args = RestoreRunner::build_args(invocation, request.solution());
        ui::command(&printable_command(&args));

        RestoreRunner::new(self.config.retry.restore_policy())
            .restore(invocation, request.solution())
            .await?;

        ui::step_ok("NuGet packages restored");
        Ok(())
    }

    async fn register_caches(&self, request: &RestoreRequest) -> RestoreResult<CacheSet> {
        let level = request.cache_level();
        if !level.includes_local() && !level.includes_global() {
            debug!("Cache level {}, skipping cache collection", level);
            return Ok(CacheSet::new());
        }

        ui::section("Collecting cache paths...");

        let collector = CachePathCollector::new(self.env, self.home.clone())
            .with_http_cache(self.config.cache.include_http_cache);
        let set = collector.collect(level, request.project_root())?;

        for entry in set.entries() {
            ui::step_info(&format!("{} ({})", entry.path.display(), entry.category));
        }

        if set.is_empty() {
            ui::step_info("No cache paths found");
            return Ok(set);
        }

        self.registry.commit(&set).await?;
        ui::step_ok(&format!(
            "Registered {} cache path(s) with {}",
            set.len(),
            self.registry.describe()
        ));

        Ok(set)
    }
}
