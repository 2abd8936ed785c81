//! Integration tests for nuget-restore

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Binary with a clean, isolated environment
    fn nuget_restore(temp: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("nuget-restore");
        cmd.env("NUGET_RESTORE_CONFIG", temp.join("no-config.toml"))
            .env_remove("xamarin_solution")
            .env_remove("nuget_version")
            .env_remove("cache_level")
            .env_remove("NUGET_RESTORE_NUGET_PATH")
            .env_remove("NUGET_RESTORE_MONO_PATH")
            .env_remove("NUGET_RESTORE_CACHE_MANIFEST")
            .env_remove("NUGET_PACKAGES");
        cmd
    }

    /// `src/App.sln` with a sibling `packages` dir
    fn project(temp: &Path) -> PathBuf {
        let src = temp.join("src");
        fs::create_dir_all(src.join("packages")).unwrap();
        let solution = src.join("App.sln");
        fs::write(&solution, "").unwrap();
        solution
    }

    #[cfg(unix)]
    fn fake_nuget(temp: &Path, body: &str) -> PathBuf {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let path = temp.join("nuget");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\n{}", body).unwrap();
        file.sync_all().unwrap();
        drop(file);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        nuget_restore(temp.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Build step that acquires NuGet"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        nuget_restore(temp.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("nuget-restore"));
    }

    #[test]
    fn missing_solution_fails() {
        let temp = TempDir::new().unwrap();
        nuget_restore(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("No solution specified"));
    }

    #[test]
    fn nonexistent_solution_fails() {
        let temp = TempDir::new().unwrap();
        nuget_restore(temp.path())
            .env("xamarin_solution", temp.path().join("Nope.sln"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Solution not found"));
    }

    #[test]
    fn invalid_cache_level_fails() {
        let temp = TempDir::new().unwrap();
        let solution = project(temp.path());
        nuget_restore(temp.path())
            .arg("--solution")
            .arg(&solution)
            .args(["--cache-level", "everything"])
            .assert()
            .failure();
    }

    #[test]
    fn failed_download_prints_each_url() {
        let temp = TempDir::new().unwrap();
        let solution = project(temp.path());
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = temp.path().join("config.toml");
        fs::write(
            &config,
            format!(
                "[tool]\n\
                 download_url = \"http://127.0.0.1:{port}/{{version}}/nuget.exe\"\n\
                 fallback_download_url = \"http://127.0.0.1:{port}/{{version}}/NuGet.exe\"\n\
                 download_dir = {dir:?}\n\
                 [retry]\n\
                 download_delay_ms = 0\n",
                port = port,
                dir = temp.path().join("dl"),
            ),
        )
        .unwrap();

        nuget_restore(temp.path())
            .env("NUGET_RESTORE_CONFIG", &config)
            .arg("--solution")
            .arg(&solution)
            .args(["--nuget-version", "1.0.0"])
            .assert()
            .failure()
            .stdout(predicate::str::contains(format!(
                "Download URL: http://127.0.0.1:{}/v1.0.0/nuget.exe",
                port
            )))
            .stdout(predicate::str::contains(format!(
                "Download URL: http://127.0.0.1:{}/v1.0.0/NuGet.exe",
                port
            )));
    }

    #[cfg(unix)]
    #[test]
    fn restore_and_register_all_caches() {
        let temp = TempDir::new().unwrap();
        let solution = project(temp.path());
        let calls = temp.path().join("calls.log");
        let nuget = fake_nuget(temp.path(), &format!("echo \"$@\" >> {}", calls.display()));
        let manifest = temp.path().join("cache-paths.txt");

        nuget_restore(temp.path())
            .env("xamarin_solution", &solution)
            .env("cache_level", "all")
            .env("NUGET_PACKAGES", "/custom/path")
            .arg("--nuget-path")
            .arg(&nuget)
            .arg("--cache-manifest")
            .arg(&manifest)
            .assert()
            .success()
            .stdout(predicate::str::contains("Restoring NuGet packages"));

        assert_eq!(
            fs::read_to_string(&calls).unwrap(),
            format!("restore {}\n", solution.display())
        );

        let registered = fs::read_to_string(&manifest).unwrap();
        let lines: Vec<&str> = registered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.contains(&temp.path().join("src").join("packages").to_str().unwrap()));
        assert!(lines.contains(&"/custom/path"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_restore_exits_non_zero() {
        let temp = TempDir::new().unwrap();
        let solution = project(temp.path());
        let nuget = fake_nuget(temp.path(), "exit 1");

        nuget_restore(temp.path())
            .arg("--solution")
            .arg(&solution)
            .arg("--nuget-path")
            .arg(&nuget)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Command failed"));
    }

    #[cfg(unix)]
    #[test]
    fn cache_registration_failure_still_succeeds() {
        let temp = TempDir::new().unwrap();
        let solution = project(temp.path());
        let nuget = fake_nuget(temp.path(), "exit 0");

        // A directory cannot be appended to
        nuget_restore(temp.path())
            .arg("--solution")
            .arg(&solution)
            .arg("--nuget-path")
            .arg(&nuget)
            .arg("--cache-manifest")
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Failed to register cache paths"));
    }
}
