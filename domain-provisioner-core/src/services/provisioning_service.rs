//! Hostname requests and retries

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::events::DomainEvent;
use crate::services::ServiceContext;
use crate::traits::ProvisionQueue;
use crate::types::{
    DomainRequest, DomainStatus, NewServerDomain, ServerDomain, ServerRef, DEFAULT_DOMAIN_TYPE,
};

/// DNS label length limit
const MAX_SUBDOMAIN_LEN: usize = 63;

/// Turn a requested subdomain into a DNS label.
///
/// Lower-cases, replaces everything outside `[a-z0-9-]` with `-`, trims
/// leading/trailing `-` and truncates to 63 characters. A missing or empty
/// request normalises `fallback` instead; an empty result falls back to the
/// lower-cased `fallback`.
pub fn normalize_subdomain(requested: Option<&str>, fallback: &str) -> String {
    let source = requested
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_lowercase();
    let replaced: String = source
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let label: String = replaced
        .trim_matches('-')
        .chars()
        .take(MAX_SUBDOMAIN_LEN)
        .collect();

    if label.is_empty() {
        fallback.to_lowercase()
    } else {
        label
    }
}

/// Entry point for binding hostnames to servers.
pub struct DomainProvisioningService {
    ctx: Arc<ServiceContext>,
    queue: Arc<dyn ProvisionQueue>,
}

impl DomainProvisioningService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, queue: Arc<dyn ProvisionQueue>) -> Self {
        Self { ctx, queue }
    }

    /// Create a pending server domain and queue its provisioning.
    ///
    /// Returns `Ok(None)` when there is nothing to request (no request, or no
    /// root selected).
    pub async fn request_provision(
        &self,
        server: &ServerRef,
        request: Option<DomainRequest>,
    ) -> CoreResult<Option<ServerDomain>> {
        let Some(request) = request else {
            return Ok(None);
        };
        let Some(root_id) = request.root_id.filter(|id| *id != 0) else {
            return Ok(None);
        };

        let root = self
            .ctx
            .root_repository
            .find_by_id(root_id)
            .await?
            .filter(|r| r.is_active)
            .ok_or(CoreError::DomainRootUnavailable)?;

        let subdomain = normalize_subdomain(request.subdomain.as_deref(), &server.uuid_short);
        let hostname = format!("{subdomain}.{}", root.root_domain);

        if self
            .ctx
            .domain_repository
            .find_by_hostname(&hostname)
            .await?
            .is_some()
        {
            return Err(CoreError::HostnameInUse(hostname));
        }

        let mut domain = self
            .ctx
            .domain_repository
            .create(NewServerDomain {
                server_id: server.id,
                domain_root_id: Some(root.id),
                domain_type: request
                    .domain_type
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_DOMAIN_TYPE.to_string()),
                hostname,
                subdomain: Some(subdomain),
                status: DomainStatus::Pending,
                verification_method: request.verification_method,
                verification_token: request.verification_token,
            })
            .await?;

        log::info!(
            "Requested {} for server {} under root {}",
            domain.hostname,
            server.id,
            root.root_domain
        );
        self.enqueue(&mut domain).await?;

        Ok(Some(domain))
    }

    /// Re-request a failed domain.
    ///
    /// Only `error` may move back to `pending`; anything else is
    /// `InvalidTransition`.
    pub async fn retry_provision(&self, domain_id: i64) -> CoreResult<ServerDomain> {
        let mut domain = self.ctx.find_domain(domain_id).await?;
        if !domain.status.can_transition_to(DomainStatus::Pending) {
            return Err(CoreError::InvalidTransition {
                from: domain.status,
                to: DomainStatus::Pending,
            });
        }

        domain.status = DomainStatus::Pending;
        self.ctx.domain_repository.save(&domain).await?;

        log::info!("Retrying provisioning for {}", domain.hostname);
        self.enqueue(&mut domain).await?;

        Ok(domain)
    }

    /// Publish `Requested` and queue the job.
    ///
    /// A refused dispatch marks the domain failed so listeners that saw
    /// `Requested` also see `Failed`.
    async fn enqueue(&self, domain: &mut ServerDomain) -> CoreResult<()> {
        self.ctx
            .events
            .publish(DomainEvent::requested(domain.id))
            .await;
        if let Err(e) = self.queue.dispatch(domain.id).await {
            self.ctx.mark_failed(domain, &e.to_string()).await?;
            return Err(e);
        }
        Ok(())
    }
}
