//! Daemon sync: tells the remote node agent about domain lifecycle changes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use domain_provisioner_provider::backoff::backoff_delay;
use domain_provisioner_provider::log_sanitizer::truncate_for_log;

use crate::config::DomainSyncConfig;
use crate::traits::DomainRootRepository;
use crate::types::{DomainRoot, DomainStatus, ProviderPayload, ServerDomain};

/// One-way lifecycle notifications. Implementations never fail the caller.
#[async_trait]
pub trait DomainDaemonSync: Send + Sync {
    async fn requested(&self, domain: &ServerDomain);

    async fn provisioned(&self, domain: &ServerDomain);

    /// `reason` is forwarded unchanged.
    async fn failed(&self, domain: &ServerDomain, reason: &str);
}

/// Event names on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncEvent {
    #[serde(rename = "domain.requested")]
    Requested,
    #[serde(rename = "domain.provisioned")]
    Provisioned,
    #[serde(rename = "domain.failed")]
    Failed,
}

impl SyncEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "domain.requested",
            Self::Provisioned => "domain.provisioned",
            Self::Failed => "domain.failed",
        }
    }
}

#[derive(Serialize)]
struct SyncRequest<'a> {
    event: SyncEvent,
    domain: SyncDomain<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

#[derive(Serialize)]
struct SyncDomain<'a> {
    id: i64,
    server_id: i64,
    hostname: &'a str,
    status: DomainStatus,
    #[serde(rename = "type")]
    domain_type: &'a str,
    provider_payload: Option<&'a ProviderPayload>,
    root: Option<SyncRoot>,
}

#[derive(Serialize)]
struct SyncRoot {
    id: i64,
    name: String,
    root_domain: String,
    provider: String,
}

impl From<DomainRoot> for SyncRoot {
    fn from(root: DomainRoot) -> Self {
        Self {
            id: root.id,
            name: root.name,
            root_domain: root.root_domain,
            provider: root.provider,
        }
    }
}

/// HTTP implementation of [`DomainDaemonSync`].
///
/// Each notification is a JSON `POST` to the configured endpoint. Transport
/// failures and 429/502/503/504 answers are retried up to
/// `config.max_retries` times with exponential backoff; anything still failing
/// is logged and dropped.
pub struct DomainDaemonSyncService {
    config: DomainSyncConfig,
    roots: Arc<dyn DomainRootRepository>,
    client: Client,
}

impl DomainDaemonSyncService {
    #[must_use]
    pub fn new(config: DomainSyncConfig, roots: Arc<dyn DomainRootRepository>) -> Self {
        let mut builder = Client::builder();
        if config.timeout > 0 {
            builder = builder.connect_timeout(Duration::from_secs(config.timeout));
        }
        let client = builder
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to build domain sync HTTP client, using defaults: {e}");
                Client::new()
            });
        Self::with_client(config, roots, client)
    }

    #[must_use]
    pub fn with_client(
        config: DomainSyncConfig,
        roots: Arc<dyn DomainRootRepository>,
        client: Client,
    ) -> Self {
        Self {
            config,
            roots,
            client,
        }
    }

    async fn load_root(&self, domain: &ServerDomain) -> Option<SyncRoot> {
        let root_id = domain.domain_root_id?;
        match self.roots.find_by_id(root_id).await {
            Ok(root) => root.map(SyncRoot::from),
            Err(e) => {
                log::warn!("Domain sync: failed to load root {root_id} for {}: {e}", domain.hostname);
                None
            }
        }
    }

    async fn send(&self, event: SyncEvent, domain: &ServerDomain, reason: Option<&str>) {
        if !self.config.enabled {
            return;
        }
        let Some(endpoint) = self.config.normalized_endpoint() else {
            log::warn!("Domain sync is enabled but no endpoint is configured.");
            return;
        };

        let body = SyncRequest {
            event,
            domain: SyncDomain {
                id: domain.id,
                server_id: domain.server_id,
                hostname: &domain.hostname,
                status: domain.status,
                domain_type: &domain.domain_type,
                provider_payload: domain.provider_payload.as_ref(),
                root: self.load_root(domain).await,
            },
            reason,
        };

        let mut attempt = 0;
        loop {
            let mut request = self.client.post(endpoint).json(&body);
            // 0 leaves the request unbounded
            if self.config.timeout > 0 {
                request = request.timeout(Duration::from_secs(self.config.timeout));
            }
            if let Some(token) = self.config.bearer_token() {
                request = request.bearer_auth(token);
            }

            let retry_reason = match request.send().await {
                Ok(response) if response.status().is_success() => {
                    log::debug!(
                        "Domain sync delivered: event={} domain={}",
                        event.as_str(),
                        domain.hostname
                    );
                    return;
                }
                Ok(response) if is_transient(response.status()) => {
                    format!("HTTP {}", response.status().as_u16())
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let text = response.text().await.unwrap_or_default();
                    log::warn!(
                        "Failed to sync domain event with daemon: event={} domain={} status={status} body={}",
                        event.as_str(),
                        domain.hostname,
                        truncate_for_log(&text)
                    );
                    return;
                }
                Err(e) => e.to_string(),
            };

            if attempt >= self.config.max_retries {
                log::error!(
                    "Unable to reach domain sync endpoint: event={} domain={} attempts={} error={retry_reason}",
                    event.as_str(),
                    domain.hostname,
                    attempt + 1
                );
                return;
            }

            let delay = backoff_delay(attempt);
            log::warn!(
                "Domain sync attempt {} failed ({retry_reason}), retrying in {}ms",
                attempt + 1,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn is_transient(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 502..=504)
}

#[async_trait]
impl DomainDaemonSync for DomainDaemonSyncService {
    async fn requested(&self, domain: &ServerDomain) {
        self.send(SyncEvent::Requested, domain, None).await;
    }

    async fn provisioned(&self, domain: &ServerDomain) {
        self.send(SyncEvent::Provisioned, domain, None).await;
    }

    async fn failed(&self, domain: &ServerDomain, reason: &str) {
        self.send(SyncEvent::Failed, domain, Some(reason)).await;
    }
}
