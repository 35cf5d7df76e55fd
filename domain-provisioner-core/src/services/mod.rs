//! Business logic service layer

mod daemon_sync;
mod domain_root_service;
mod event_subscriber;
mod provider_metadata_service;
mod provision_job;
mod provision_worker;
mod provisioning_service;

pub use daemon_sync::{DomainDaemonSync, DomainDaemonSyncService, SyncEvent};
pub use domain_root_service::{DomainRootService, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use event_subscriber::DomainEventSubscriber;
pub use provider_metadata_service::ProviderMetadataService;
pub use provision_job::{ProvisionServerDomain, ROOT_DISABLED_REASON};
pub use provision_worker::{ChannelProvisionQueue, ProvisionReceiver, ProvisionWorker};
pub use provisioning_service::{normalize_subdomain, DomainProvisioningService};

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::events::{DomainEvent, EventDispatcher};
use crate::traits::{DomainRootRepository, ProviderRegistry, ServerDomainRepository};
use crate::types::{DomainStatus, ServerDomain};

/// Service context - holds all dependencies
///
/// The composition root builds this once and shares it between the
/// provisioning service and the job.
pub struct ServiceContext {
    pub domain_repository: Arc<dyn ServerDomainRepository>,
    pub root_repository: Arc<dyn DomainRootRepository>,
    pub provider_registry: Arc<dyn ProviderRegistry>,
    /// Dispatch table for lifecycle events
    pub events: Arc<EventDispatcher>,
}

impl ServiceContext {
    #[must_use]
    pub fn new(
        domain_repository: Arc<dyn ServerDomainRepository>,
        root_repository: Arc<dyn DomainRootRepository>,
        provider_registry: Arc<dyn ProviderRegistry>,
        events: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            domain_repository,
            root_repository,
            provider_registry,
            events,
        }
    }

    /// Load a server domain or fail with `DomainNotFound`
    pub async fn find_domain(&self, domain_id: i64) -> CoreResult<ServerDomain> {
        self.domain_repository
            .find_by_id(domain_id)
            .await?
            .ok_or(CoreError::DomainNotFound(domain_id))
    }

    /// Move a domain to `error`, keep `reason` as `last_error` and publish `Failed`.
    pub(crate) async fn mark_failed(&self, domain: &mut ServerDomain, reason: &str) -> CoreResult<()> {
        domain
            .provider_payload
            .get_or_insert_with(Default::default)
            .insert("last_error".to_string(), Value::String(reason.to_string()));
        domain.status = DomainStatus::Error;
        domain.last_synced_at = Some(Utc::now());
        self.domain_repository.save(domain).await?;

        log::warn!("Provisioning failed for {}: {reason}", domain.hostname);
        self.events.publish(DomainEvent::failed(domain.id, reason)).await;
        Ok(())
    }
}
