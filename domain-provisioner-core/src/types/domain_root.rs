//! Domain root admin types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};

/// Largest row offset a SQL backend binds (signed 64-bit).
pub const MAX_ROW_OFFSET: u64 = i64::MAX.unsigned_abs();

/// Admin input for creating or updating a root, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainRootInput {
    pub name: Option<String>,
    pub root_domain: Option<String>,
    pub provider: Option<String>,
    pub provider_config: Option<Map<String, Value>>,
    pub is_active: Option<bool>,
}

/// Validated root ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDomainRoot {
    pub name: String,
    pub root_domain: String,
    pub provider: String,
    pub provider_config: Map<String, Value>,
    pub is_active: bool,
}

/// Filters accepted by the root listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRootFilter {
    /// Exact match
    pub id: Option<i64>,
    /// Partial match
    pub name: Option<String>,
    /// Partial match
    pub root_domain: Option<String>,
    /// Exact match
    pub provider: Option<String>,
    /// Exact match
    pub is_active: Option<bool>,
}

/// Raw listing query as received from an admin surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRootQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    #[serde(default)]
    pub filter: DomainRootFilter,
    /// Field name, `-` prefix for descending (e.g. `-created_at`).
    pub sort: Option<String>,
}

/// Sortable root columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainRootSortField {
    Id,
    Name,
    RootDomain,
    Provider,
    IsActive,
    CreatedAt,
}

impl DomainRootSortField {
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "root_domain" => Some(Self::RootDomain),
            "provider" => Some(Self::Provider),
            "is_active" => Some(Self::IsActive),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainRootSort {
    pub field: DomainRootSortField,
    pub descending: bool,
}

impl Default for DomainRootSort {
    fn default() -> Self {
        Self {
            field: DomainRootSortField::Id,
            descending: false,
        }
    }
}

impl DomainRootSort {
    /// Parse `name` / `-name`. Unknown fields yield `None`.
    pub fn parse(sort: &str) -> Option<Self> {
        let sort = sort.trim();
        let (field, descending) = match sort.strip_prefix('-') {
            Some(field) => (field, true),
            None => (sort, false),
        };
        DomainRootSortField::parse(field).map(|field| Self { field, descending })
    }
}

/// Validated listing query handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRootListQuery {
    pub filter: DomainRootFilter,
    pub sort: DomainRootSort,
    /// Page number, starting at 1
    pub page: u64,
    pub per_page: u64,
}

impl DomainRootListQuery {
    /// Rows skipped before this page.
    ///
    /// Fails with `QueryValueOutOfRange` on `page` when the offset would pass
    /// [`MAX_ROW_OFFSET`].
    pub fn offset(&self) -> CoreResult<u64> {
        let per_page = self.per_page.max(1);
        self.page
            .saturating_sub(1)
            .checked_mul(per_page)
            .filter(|offset| *offset <= MAX_ROW_OFFSET)
            .ok_or_else(|| CoreError::QueryValueOutOfRange {
                parameter: "page".to_string(),
                min: 1,
                max: MAX_ROW_OFFSET / per_page + 1,
            })
    }
}
