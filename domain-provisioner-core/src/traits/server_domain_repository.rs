//! Server domain persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{NewServerDomain, ServerDomain};

/// Server domain repository Trait
///
/// Platform implementation:
/// - `SqliteStore` (`SeaORM`, `domain-provisioner-app`)
#[async_trait]
pub trait ServerDomainRepository: Send + Sync {
    /// Get a domain by ID
    async fn find_by_id(&self, id: i64) -> CoreResult<Option<ServerDomain>>;

    /// Get a domain by its fully-qualified hostname
    async fn find_by_hostname(&self, hostname: &str) -> CoreResult<Option<ServerDomain>>;

    /// All domains bound to a server, oldest first
    async fn find_by_server(&self, server_id: i64) -> CoreResult<Vec<ServerDomain>>;

    /// Insert a new domain, assigning `id`, `created_at` and `updated_at`
    async fn create(&self, domain: NewServerDomain) -> CoreResult<ServerDomain>;

    /// Persist every mutable field of an existing domain and bump `updated_at`
    async fn save(&self, domain: &ServerDomain) -> CoreResult<()>;
}
