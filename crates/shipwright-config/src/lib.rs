pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use shipwright_cloud::{Profile, Reports};
use std::path::{Path, PathBuf};

const CONFIG_PATH_ENV: &str = "SHIPWRIGHT_CONFIG_PATH";
const LOCAL_CONFIG_FILE: &str = "shipwright.yaml";
const GLOBAL_CONFIG_FILE: &str = "config.yaml";

/// Shipwright's directory under the user config dir
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("shipwright");

    Ok(config_dir)
}

/// Locate the settings file.
///
/// Search order:
/// 1. `SHIPWRIGHT_CONFIG_PATH` (direct path)
/// 2. `./shipwright.yaml`
/// 3. `~/.config/shipwright/config.yaml`
///
/// Having no settings file at all is fine; defaults apply.
pub fn find_config_file() -> Result<Option<PathBuf>> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        tracing::warn!("{} points at a missing file: {}", CONFIG_PATH_ENV, path.display());
    }

    let local = std::env::current_dir()?.join(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Ok(Some(local));
    }

    if let Ok(config_dir) = get_config_dir() {
        let global = config_dir.join(GLOBAL_CONFIG_FILE);
        if global.exists() {
            return Ok(Some(global));
        }
    }

    Ok(None)
}

/// User settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Profile used when none is given on the command line or in AWS_PROFILE
    pub default_profile: Option<String>,

    /// Region used when none is given on the command line or in the environment
    pub region: Option<String>,

    /// Report levels used when `--report` is not given
    pub report: Vec<String>,
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings from the discovered file, or defaults
    pub fn load() -> Result<Self> {
        match find_config_file()? {
            Some(path) => {
                tracing::debug!("Loading settings from {}", path.display());
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Profile-related command line options
#[derive(Debug, Clone, Default)]
pub struct ProfileFlags {
    pub profile: Option<String>,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub region: Option<String>,
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Build the profile handed to the provider client.
///
/// A static key pair wins over everything else. Otherwise the named profile
/// is `--profile`, then `AWS_PROFILE`, then the settings default; with none
/// of those the provider's default session is used.
pub fn resolve_profile(flags: &ProfileFlags, settings: &Settings) -> Result<Profile> {
    let mut profile = match (&flags.access_key_id, &flags.access_key_secret) {
        (Some(id), Some(secret)) => Profile::ephemeral(id.clone(), secret.clone()),
        (None, None) => {
            let name = flags
                .profile
                .clone()
                .or_else(|| env_value("AWS_PROFILE"))
                .or_else(|| settings.default_profile.clone());
            match name {
                Some(name) => Profile::named(name),
                None => Profile::default_session(),
            }
        }
        _ => return Err(ConfigError::IncompleteCredentials),
    };

    profile.region = flags
        .region
        .clone()
        .or_else(|| env_value("AWS_REGION"))
        .or_else(|| env_value("AWS_DEFAULT_REGION"))
        .or_else(|| settings.region.clone());

    Ok(profile)
}

/// Report levels from `--report` flags, falling back to the settings
pub fn resolve_reports(flags: &[String], settings: &Settings) -> Result<Reports> {
    let names = if flags.is_empty() {
        &settings.report
    } else {
        flags
    };

    if names.is_empty() {
        return Ok(Reports::default());
    }

    Reports::parse(names).map_err(|e| ConfigError::InvalidReport(e.to_string()))
}
