//! Provisioning job queue abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// Hands `ProvisionServerDomain` jobs to a worker.
#[async_trait]
pub trait ProvisionQueue: Send + Sync {
    /// Queue provisioning for a server domain.
    async fn dispatch(&self, domain_id: i64) -> CoreResult<()>;
}
