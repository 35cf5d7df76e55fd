//! Domain root administration

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::traits::DomainRootRepository;
use crate::types::{
    DomainRoot, DomainRootInput, DomainRootListQuery, DomainRootQuery, DomainRootSort,
    NewDomainRoot, PaginatedResponse, ProviderType,
};

pub const DEFAULT_PER_PAGE: u64 = 50;
pub const MAX_PER_PAGE: u64 = 100;
/// Column limit for name, root domain and provider
const MAX_FIELD_LEN: usize = 191;

/// Admin operations on domain roots.
pub struct DomainRootService {
    roots: Arc<dyn DomainRootRepository>,
}

impl DomainRootService {
    #[must_use]
    pub fn new(roots: Arc<dyn DomainRootRepository>) -> Self {
        Self { roots }
    }

    pub async fn list(&self, query: DomainRootQuery) -> CoreResult<PaginatedResponse<DomainRoot>> {
        let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(CoreError::QueryValueOutOfRange {
                parameter: "per_page".to_string(),
                min: 1,
                max: MAX_PER_PAGE,
            });
        }

        let sort = match query.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(sort) => DomainRootSort::parse(sort).ok_or_else(|| {
                CoreError::ValidationError(format!("Unsupported sort field: {sort}"))
            })?,
            None => DomainRootSort::default(),
        };

        let query = DomainRootListQuery {
            filter: query.filter,
            sort,
            page: query.page.unwrap_or(1).max(1),
            per_page,
        };
        query.offset()?;

        self.roots.list(&query).await
    }

    pub async fn get(&self, id: i64) -> CoreResult<DomainRoot> {
        self.roots
            .find_by_id(id)
            .await?
            .ok_or(CoreError::DomainRootNotFound(id))
    }

    pub async fn create(&self, input: DomainRootInput) -> CoreResult<DomainRoot> {
        let root = self.validate(input, None).await?;
        let root = self.roots.create(root).await?;
        log_activity("admin:domains:root:create", &root);
        Ok(root)
    }

    pub async fn update(&self, id: i64, input: DomainRootInput) -> CoreResult<DomainRoot> {
        let root = self.validate(input, Some(id)).await?;
        let root = self
            .roots
            .update(id, root)
            .await?
            .ok_or(CoreError::DomainRootNotFound(id))?;
        log_activity("admin:domains:root:update", &root);
        Ok(root)
    }

    pub async fn delete(&self, id: i64) -> CoreResult<()> {
        let root = self.get(id).await?;
        if !self.roots.delete(id).await? {
            return Err(CoreError::DomainRootNotFound(id));
        }
        log_activity("admin:domains:root:delete", &root);
        Ok(())
    }

    async fn validate(&self, input: DomainRootInput, ignore_id: Option<i64>) -> CoreResult<NewDomainRoot> {
        let name = required_field("name", input.name)?;
        let root_domain = required_field("root_domain", input.root_domain)?;
        let provider = match input.provider.map(|p| p.trim().to_string()) {
            Some(p) if !p.is_empty() => {
                check_length("provider", &p)?;
                p
            }
            _ => ProviderType::Manual.as_str().to_string(),
        };

        if let Some(existing) = self.roots.find_by_root_domain(&root_domain).await? {
            if Some(existing.id) != ignore_id {
                return Err(CoreError::ValidationError(format!(
                    "The root_domain {root_domain} has already been taken."
                )));
            }
        }

        Ok(NewDomainRoot {
            name,
            root_domain,
            provider,
            provider_config: clean_provider_config(input.provider_config.unwrap_or_default()),
            is_active: input.is_active.unwrap_or(true),
        })
    }
}

fn required_field(field: &str, value: Option<String>) -> CoreResult<String> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(CoreError::ValidationError(format!("The {field} field is required.")));
    }
    check_length(field, &value)?;
    Ok(value)
}

fn check_length(field: &str, value: &str) -> CoreResult<()> {
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(CoreError::ValidationError(format!(
            "The {field} may not be greater than {MAX_FIELD_LEN} characters."
        )));
    }
    Ok(())
}

/// Drop empty-string and null entries.
fn clean_provider_config(config: Map<String, Value>) -> Map<String, Value> {
    config
        .into_iter()
        .filter(|(_, v)| !matches!(v, Value::Null) && v.as_str() != Some(""))
        .collect()
}

fn log_activity(event: &str, root: &DomainRoot) {
    log::info!(
        "activity {event}: root={} name={} root_domain={}",
        root.id,
        root.name,
        root.root_domain
    );
}
