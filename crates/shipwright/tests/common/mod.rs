use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated working directory plus an optional stand-in for the aws CLI
pub struct TestEnv {
    pub root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    /// `shipwright` command that ignores the developer's own configuration
    pub fn command(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("shipwright").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path())
            .env("HOME", self.path())
            .env("SHIPWRIGHT_AWS_CLI", self.path().join("no-such-aws"))
            .env_remove("SHIPWRIGHT_CONFIG_PATH")
            .env_remove("AWS_PROFILE")
            .env_remove("AWS_REGION")
            .env_remove("AWS_DEFAULT_REGION")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Install a shell script answering aws calls; returns its path
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn fake_aws(&self, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path().join("aws");
        fs::write(&path, format!("#!/bin/sh\n{}", script)).unwrap();
        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&path, permissions).unwrap();
        path
    }

    #[allow(dead_code)]
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}
