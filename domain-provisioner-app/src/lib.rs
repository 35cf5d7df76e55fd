//! Platform-agnostic application bootstrap for the domain provisioner.
//!
//! Provides `AppState` (service container) and `AppStateBuilder` (adapter
//! injection). The builder is the only place the event dispatcher, the
//! provisioning queue and the daemon sync client are wired together.

pub mod adapters;

use std::sync::Arc;

use tokio::sync::Mutex;

use domain_provisioner_core::error::{CoreError, CoreResult};
use domain_provisioner_core::events::EventDispatcherBuilder;
use domain_provisioner_core::services::{
    ChannelProvisionQueue, DomainDaemonSync, DomainDaemonSyncService, DomainEventSubscriber,
    DomainProvisioningService, DomainRootService, ProviderMetadataService, ProvisionServerDomain,
    ProvisionWorker, ServiceContext,
};
use domain_provisioner_core::traits::{
    DomainRootRepository, InMemoryProviderRegistry, ProviderRegistry, ServerDomainRepository,
};
use domain_provisioner_core::DomainSyncConfig;
use domain_provisioner_provider::create_default_providers;

/// Platform-agnostic application state.
///
/// Every frontend constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all storage adapters and the dispatcher)
    pub ctx: Arc<ServiceContext>,
    /// Request and retry entry points
    pub provisioning_service: DomainProvisioningService,
    /// Admin CRUD over domain roots
    pub domain_root_service: DomainRootService,
    /// Provider metadata service
    pub provider_metadata_service: ProviderMetadataService,
    /// The job runner used directly, outside the queue
    pub provision_job: ProvisionServerDomain,
    worker: Mutex<Option<ProvisionWorker>>,
}

impl AppState {
    /// Hand out the queue worker. Only the first caller gets it.
    pub async fn take_worker(&self) -> Option<ProvisionWorker> {
        let worker = self.worker.lock().await.take();
        if worker.is_none() {
            log::debug!("Provisioning worker already taken");
        }
        worker
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `domain_repository`: where server domains are stored
/// - `root_repository`: where domain roots are stored
///
/// # Optional
/// - `provider_registry`: defaults to every compiled-in provider
/// - `daemon_sync`: defaults to `DomainDaemonSyncService` built from `sync_config`
/// - `sync_config`: defaults to a disabled `DomainSyncConfig`
#[derive(Default)]
pub struct AppStateBuilder {
    domain_repository: Option<Arc<dyn ServerDomainRepository>>,
    root_repository: Option<Arc<dyn DomainRootRepository>>,
    provider_registry: Option<Arc<dyn ProviderRegistry>>,
    daemon_sync: Option<Arc<dyn DomainDaemonSync>>,
    sync_config: Option<DomainSyncConfig>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn domain_repository(mut self, repo: Arc<dyn ServerDomainRepository>) -> Self {
        self.domain_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn root_repository(mut self, repo: Arc<dyn DomainRootRepository>) -> Self {
        self.root_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn provider_registry(mut self, registry: Arc<dyn ProviderRegistry>) -> Self {
        self.provider_registry = Some(registry);
        self
    }

    #[must_use]
    pub fn daemon_sync(mut self, sync: Arc<dyn DomainDaemonSync>) -> Self {
        self.daemon_sync = Some(sync);
        self
    }

    #[must_use]
    pub fn sync_config(mut self, config: DomainSyncConfig) -> Self {
        self.sync_config = Some(config);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let domain_repository = self.domain_repository.ok_or_else(|| {
            CoreError::ValidationError("domain_repository is required".to_string())
        })?;
        let root_repository = self.root_repository.ok_or_else(|| {
            CoreError::ValidationError("root_repository is required".to_string())
        })?;
        let provider_registry = self.provider_registry.unwrap_or_else(|| {
            Arc::new(InMemoryProviderRegistry::with_providers(
                create_default_providers(),
            ))
        });
        let sync_config = self.sync_config.unwrap_or_default();
        let daemon_sync = self.daemon_sync.unwrap_or_else(|| {
            Arc::new(DomainDaemonSyncService::new(
                sync_config,
                Arc::clone(&root_repository),
            ))
        });

        let mut events = EventDispatcherBuilder::new();
        events.subscribe(Arc::new(DomainEventSubscriber::new(
            Arc::clone(&domain_repository),
            daemon_sync,
        )));

        let ctx = Arc::new(ServiceContext::new(
            domain_repository,
            Arc::clone(&root_repository),
            provider_registry,
            Arc::new(events.build()),
        ));

        let (queue, receiver) = ChannelProvisionQueue::new();
        let worker = ProvisionWorker::new(ProvisionServerDomain::new(Arc::clone(&ctx)), receiver);

        Ok(AppState {
            provisioning_service: DomainProvisioningService::new(
                Arc::clone(&ctx),
                Arc::new(queue),
            ),
            domain_root_service: DomainRootService::new(root_repository),
            provider_metadata_service: ProviderMetadataService::new(),
            provision_job: ProvisionServerDomain::new(Arc::clone(&ctx)),
            worker: Mutex::new(Some(worker)),
            ctx,
        })
    }
}
