//! aws CLI wrapper
//!
//! Runs the `aws` command line tool with JSON output and hands back raw
//! stdout/stderr. Credentials never appear in the argument list: static keys
//! travel through the child's environment.

use crate::error::{AwsError, Result};
use shipwright_cloud::Profile;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of one aws CLI run
#[derive(Debug, Clone)]
pub struct CliOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CliOutput {
    /// Decode stdout, treating empty output as JSON null
    pub fn json(&self) -> Result<serde_json::Value> {
        let trimmed = self.stdout.trim();
        if trimmed.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(trimmed)?)
    }
}

/// aws CLI wrapper
#[derive(Debug, Clone)]
pub struct AwsCli {
    program: String,
}

impl Default for AwsCli {
    fn default() -> Self {
        Self::new()
    }
}

impl AwsCli {
    pub fn new() -> Self {
        Self {
            program: "aws".to_string(),
        }
    }

    /// Use a different executable (e.g. a pinned path)
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Global options selecting output format, profile and region
    pub fn global_args(profile: &Profile) -> Vec<String> {
        let mut args = vec!["--output".to_string(), "json".to_string()];

        // Static keys win over a named profile
        if profile.credentials.is_none()
            && let Some(name) = &profile.name
        {
            args.push("--profile".to_string());
            args.push(name.clone());
        }

        if let Some(region) = &profile.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }

        args
    }

    /// Run one command and capture its output.
    ///
    /// A non-zero exit status is not an error here; callers decide what a
    /// failed run means.
    pub async fn run(&self, profile: &Profile, args: &[String]) -> Result<CliOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(Self::global_args(profile));
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        if let Some(credentials) = &profile.credentials {
            cmd.env("AWS_ACCESS_KEY_ID", &credentials.access_key_id);
            cmd.env("AWS_SECRET_ACCESS_KEY", &credentials.secret_access_key);
            cmd.env_remove("AWS_PROFILE");
            cmd.env_remove("AWS_SESSION_TOKEN");
        }

        tracing::debug!("Running: {} {}", self.program, args.join(" "));

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AwsError::AwsCliNotFound);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(CliOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Run a read-only command and decode its JSON output
    pub async fn query(&self, profile: &Profile, args: &[String]) -> Result<serde_json::Value> {
        let output = self.run(profile, args).await?;
        if !output.success {
            return Err(AwsError::CommandFailed(output.stderr.trim().to_string()));
        }
        output.json()
    }
}

/// Owned argument list from string slices
pub(crate) fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}
