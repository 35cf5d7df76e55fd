//! Daemon sync configuration

use serde::{Deserialize, Serialize};

const fn default_timeout() -> u64 {
    10
}

const fn default_max_retries() -> u32 {
    2
}

/// Settings for notifying the remote node agent of domain lifecycle changes.
///
/// Read from the `[sync]` table of the config file. Sync is off unless
/// `enabled` is set and `endpoint` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainSyncConfig {
    pub enabled: bool,
    /// Base URL that lifecycle events are POSTed to.
    pub endpoint: String,
    /// Bearer token sent with every notification.
    pub token: Option<String>,
    /// Per-request timeout in seconds; `0` disables it.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Extra attempts after a transient failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for DomainSyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            token: None,
            timeout: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl DomainSyncConfig {
    /// Endpoint without trailing slashes, `None` when blank.
    pub fn normalized_endpoint(&self) -> Option<&str> {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        (!endpoint.is_empty()).then_some(endpoint)
    }

    /// Token, `None` when blank.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}
