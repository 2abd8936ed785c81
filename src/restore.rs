//! `nuget restore` execution
//!
//! The child inherits stdout and stderr, so NuGet's own output is the log.

use crate::error::{RestoreError, RestoreResult};
use crate::retry::{retry, RetryPolicy};
use crate::tool::{printable_command, ToolInvocation};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Subcommand appended to the tool invocation
pub const RESTORE_SUBCOMMAND: &str = "restore";

/// Runs the restore command with bounded retry
pub struct RestoreRunner {
    policy: RetryPolicy,
}

impl RestoreRunner {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// `[invocation..., "restore", solution]`
    pub fn build_args(invocation: &ToolInvocation, solution: &Path) -> Vec<String> {
        let mut args = invocation.args().to_vec();
        args.push(RESTORE_SUBCOMMAND.to_string());
        args.push(solution.display().to_string());
        args
    }

    /// Restore `solution`. Fails once every attempt has failed to start or
    /// exited non-zero.
    pub async fn restore(
        &self,
        invocation: &ToolInvocation,
        solution: &Path,
    ) -> RestoreResult<()> {
        let args = Self::build_args(invocation, solution);
        let command = printable_command(&args);
        let (args, command) = (args.as_slice(), command.as_str());

        retry(&self.policy, "NuGet restore", move |attempt| async move {
            debug!("Restore attempt {}: {}", attempt + 1, command);
            exec_inherited(args, command).await
        })
        .await
    }
}

/// Run a command with inherited output streams
async fn exec_inherited(args: &[String], command: &str) -> RestoreResult<()> {
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| RestoreError::Internal("empty command line".to_string()))?;

    let status = Command::new(program)
        .args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| RestoreError::command_failed(command, e))?;

    if status.success() {
        Ok(())
    } else {
        Err(RestoreError::CommandExit {
            command: command.to_string(),
            code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn runner() -> RestoreRunner {
        RestoreRunner::new(RetryPolicy::new(1, Duration::ZERO))
    }

    #[test]
    fn build_args_appends_restore_and_solution() {
        let invocation = ToolInvocation::system("/opt/mono/bin/nuget");

        let args = RestoreRunner::build_args(&invocation, Path::new("/src/App.sln"));

        assert_eq!(args, ["/opt/mono/bin/nuget", "restore", "/src/App.sln"]);
    }

    #[test]
    fn build_args_with_interpreter() {
        let invocation = ToolInvocation::interpreted("/opt/mono/bin/mono", "/tmp/nuget.exe");

        let args = RestoreRunner::build_args(&invocation, Path::new("App.sln"));

        assert_eq!(
            args,
            ["/opt/mono/bin/mono", "/tmp/nuget.exe", "restore", "App.sln"]
        );
    }

    #[tokio::test]
    async fn missing_binary_fails_to_start() {
        let temp = TempDir::new().unwrap();
        let invocation = ToolInvocation::system(temp.path().join("no-such-nuget"));

        let err = runner()
            .restore(&invocation, Path::new("App.sln"))
            .await
            .unwrap_err();

        assert!(matches!(err, RestoreError::CommandFailed { .. }));
    }

    /// Shell script standing in for NuGet, run through `/bin/sh`
    #[cfg(unix)]
    fn fake_tool(dir: &Path, body: &str) -> ToolInvocation {
        let path = dir.join("nuget.sh");
        std::fs::write(&path, format!("{}\n", body)).unwrap();
        ToolInvocation::interpreted("/bin/sh", path)
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_restore_passes_arguments() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("args.log");
        let tool = fake_tool(
            temp.path(),
            &format!("echo \"$@\" >> {}", log.display()),
        );

        runner()
            .restore(&tool, Path::new("/src/App.sln"))
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&log).unwrap(),
            "restore /src/App.sln\n"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_restore_is_attempted_twice() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("attempts.log");
        let tool = fake_tool(
            temp.path(),
            &format!("echo attempt >> {}\nexit 3", log.display()),
        );

        let err = runner()
            .restore(&tool, Path::new("App.sln"))
            .await
            .unwrap_err();

        assert!(matches!(err, RestoreError::CommandExit { code: Some(3), .. }));
        assert_eq!(std::fs::read_to_string(&log).unwrap().lines().count(), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn restore_recovers_on_retry() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join("first-run");
        let tool = fake_tool(
            temp.path(),
            &format!(
                "if [ -f {m} ]; then exit 0; fi\ntouch {m}\nexit 1",
                m = marker.display()
            ),
        );

        runner()
            .restore(&tool, Path::new("App.sln"))
            .await
            .unwrap();

        assert!(marker.exists());
    }
}
