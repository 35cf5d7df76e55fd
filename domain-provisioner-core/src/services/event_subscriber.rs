//! Forwards domain lifecycle events to the daemon sync service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{CoreError, CoreResult};
use crate::events::{DomainEvent, DomainEventKind, DomainEventListener, EventDispatcherBuilder, EventSubscriber};
use crate::services::DomainDaemonSync;
use crate::traits::ServerDomainRepository;

/// Listens for all three lifecycle events and forwards each to
/// [`DomainDaemonSync`].
///
/// No transition check is made: every event is forwarded whatever the
/// domain's current status.
pub struct DomainEventSubscriber {
    domains: Arc<dyn ServerDomainRepository>,
    sync: Arc<dyn DomainDaemonSync>,
}

impl DomainEventSubscriber {
    #[must_use]
    pub fn new(domains: Arc<dyn ServerDomainRepository>, sync: Arc<dyn DomainDaemonSync>) -> Self {
        Self { domains, sync }
    }
}

impl EventSubscriber for DomainEventSubscriber {
    fn subscribe(self: Arc<Self>, builder: &mut EventDispatcherBuilder) {
        for kind in DomainEventKind::ALL {
            builder.listen(kind, self.clone());
        }
    }
}

#[async_trait]
impl DomainEventListener for DomainEventSubscriber {
    async fn handle(&self, event: &DomainEvent) -> CoreResult<()> {
        let domain_id = event.domain_id();
        let domain = self
            .domains
            .find_by_id(domain_id)
            .await?
            .ok_or(CoreError::DomainNotFound(domain_id))?;

        match event {
            DomainEvent::ProvisionRequested(_) => self.sync.requested(&domain).await,
            DomainEvent::Provisioned(_) => self.sync.provisioned(&domain).await,
            DomainEvent::ProvisionFailed(e) => self.sync.failed(&domain, &e.reason).await,
        }
        Ok(())
    }
}
