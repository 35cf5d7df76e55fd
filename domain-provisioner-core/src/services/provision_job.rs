//! `ProvisionServerDomain` job

use std::sync::Arc;

use chrono::Utc;

use crate::error::CoreResult;
use crate::events::DomainEvent;
use crate::services::ServiceContext;
use crate::types::DomainStatus;

/// Failure reason when the root is missing or deactivated.
pub const ROOT_DISABLED_REASON: &str = "Root domain is disabled.";

/// Provisions one server domain through its root's provider.
///
/// Outcomes:
/// - root missing or inactive: marked failed, `Ok`
/// - root without a registered provider (`manual`): activated, `Ok`
/// - provider success: activated with the provider payload, `Ok`
/// - provider failure: marked failed, provider error returned
///
/// Domains no longer `pending`/`provisioning` are left untouched.
pub struct ProvisionServerDomain {
    ctx: Arc<ServiceContext>,
}

impl ProvisionServerDomain {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn handle(&self, domain_id: i64) -> CoreResult<()> {
        let mut domain = self.ctx.find_domain(domain_id).await?;
        if !domain.status.is_provisionable() {
            log::info!(
                "Skipping provisioning for {}: status is {}",
                domain.hostname,
                domain.status
            );
            return Ok(());
        }

        let root = match domain.domain_root_id {
            Some(root_id) => self.ctx.root_repository.find_by_id(root_id).await?,
            None => None,
        };
        let Some(root) = root.filter(|r| r.is_active) else {
            self.ctx.mark_failed(&mut domain, ROOT_DISABLED_REASON).await?;
            return Ok(());
        };

        let Some(provider) = self.ctx.provider_registry.resolve(&root).await else {
            domain.status = DomainStatus::Active;
            domain.last_synced_at = Some(Utc::now());
            self.ctx.domain_repository.save(&domain).await?;
            log::info!(
                "Activated {} without provider automation (root provider: {})",
                domain.hostname,
                root.provider
            );
            self.ctx.events.publish(DomainEvent::provisioned(domain.id)).await;
            return Ok(());
        };

        domain.status = DomainStatus::Provisioning;
        self.ctx.domain_repository.save(&domain).await?;

        match provider.provision(&domain, &root).await {
            Ok(response) => {
                domain.status = DomainStatus::Active;
                domain.provider_payload = Some(response.provider_payload);
                domain.verified_at = if response.verified {
                    response.verified_at
                } else {
                    None
                };
                domain.last_synced_at = Some(response.synced_at);
                self.ctx.domain_repository.save(&domain).await?;
                log::info!("Provisioned {} via {}", domain.hostname, provider.id());
                self.ctx.events.publish(DomainEvent::provisioned(domain.id)).await;
                Ok(())
            }
            Err(e) => {
                self.ctx.mark_failed(&mut domain, &e.to_string()).await?;
                Err(e.into())
            }
        }
    }
}
