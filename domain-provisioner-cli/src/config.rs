//! CLI configuration file and environment overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use domain_provisioner_core::DomainSyncConfig;

const APP_DIR: &str = "domain-provisioner";

/// Contents of `config.toml`.
///
/// ```toml
/// database_path = "/var/lib/domain-provisioner/provisioner.db"
/// log_level = "info"
///
/// [sync]
/// enabled = true
/// endpoint = "https://node.example.com/api/domains"
/// token = "secret"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub database_path: PathBuf,
    pub log_level: String,
    pub sync: DomainSyncConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            database_path: default_data_dir().join("provisioner.db"),
            log_level: "info".to_string(),
            sync: DomainSyncConfig::default(),
        }
    }
}

/// Values taken from flags or `DOMAIN_SYNC_*` variables. Set values win over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOverrides {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub timeout: Option<u64>,
}

impl CliConfig {
    /// Load `path`, or the default location when `path` is `None`.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (default_config_path(), false),
        };

        if !explicit && !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply(&mut self, overrides: SyncOverrides) {
        if let Some(enabled) = overrides.enabled {
            self.sync.enabled = enabled;
        }
        if let Some(endpoint) = overrides.endpoint {
            self.sync.endpoint = endpoint;
        }
        if let Some(token) = overrides.token {
            self.sync.token = Some(token);
        }
        if let Some(timeout) = overrides.timeout {
            self.sync.timeout = timeout;
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}
