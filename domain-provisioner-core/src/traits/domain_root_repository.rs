//! Domain root persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{DomainRoot, DomainRootListQuery, NewDomainRoot, PaginatedResponse};

/// Domain root repository Trait
#[async_trait]
pub trait DomainRootRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> CoreResult<Option<DomainRoot>>;

    /// Exact lookup on the unique `root_domain` column
    async fn find_by_root_domain(&self, root_domain: &str) -> CoreResult<Option<DomainRoot>>;

    /// Filtered, sorted, paginated listing
    async fn list(&self, query: &DomainRootListQuery) -> CoreResult<PaginatedResponse<DomainRoot>>;

    async fn create(&self, root: NewDomainRoot) -> CoreResult<DomainRoot>;

    /// Replace a root's fields; `None` if it does not exist
    async fn update(&self, id: i64, root: NewDomainRoot) -> CoreResult<Option<DomainRoot>>;

    /// Delete a root; `false` if it did not exist
    async fn delete(&self, id: i64) -> CoreResult<bool>;
}
