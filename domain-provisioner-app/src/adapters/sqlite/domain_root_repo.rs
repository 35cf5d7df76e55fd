//! `DomainRootRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
    sea_query::Order,
};
use serde_json::{Map, Value};

use domain_provisioner_core::error::{CoreError, CoreResult};
use domain_provisioner_core::traits::DomainRootRepository;
use domain_provisioner_core::types::{
    DomainRoot, DomainRootFilter, DomainRootListQuery, DomainRootSortField, NewDomainRoot,
    PaginatedResponse,
};

use super::entity::domain_root;
use super::{SqliteStore, parse_timestamp, storage_error};

impl domain_root::Model {
    /// Convert a row into a `DomainRoot`.
    fn into_domain_root(self) -> CoreResult<DomainRoot> {
        let provider_config = match serde_json::from_str(&self.provider_config).map_err(|e| {
            CoreError::SerializationError(format!("Invalid provider_config: {e}"))
        })? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Ok(DomainRoot {
            id: self.id,
            name: self.name,
            root_domain: self.root_domain,
            provider: self.provider,
            provider_config,
            is_active: self.is_active,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

fn config_to_string(config: &Map<String, Value>) -> CoreResult<String> {
    serde_json::to_string(config).map_err(|e| CoreError::SerializationError(e.to_string()))
}

fn sort_column(field: DomainRootSortField) -> domain_root::Column {
    match field {
        DomainRootSortField::Id => domain_root::Column::Id,
        DomainRootSortField::Name => domain_root::Column::Name,
        DomainRootSortField::RootDomain => domain_root::Column::RootDomain,
        DomainRootSortField::Provider => domain_root::Column::Provider,
        DomainRootSortField::IsActive => domain_root::Column::IsActive,
        DomainRootSortField::CreatedAt => domain_root::Column::CreatedAt,
    }
}

fn apply_filter(
    mut select: Select<domain_root::Entity>,
    filter: &DomainRootFilter,
) -> Select<domain_root::Entity> {
    if let Some(id) = filter.id {
        select = select.filter(domain_root::Column::Id.eq(id));
    }
    if let Some(name) = filter.name.as_deref() {
        select = select.filter(domain_root::Column::Name.contains(name));
    }
    if let Some(root_domain) = filter.root_domain.as_deref() {
        select = select.filter(domain_root::Column::RootDomain.contains(root_domain));
    }
    if let Some(provider) = filter.provider.as_deref() {
        select = select.filter(domain_root::Column::Provider.eq(provider));
    }
    if let Some(is_active) = filter.is_active {
        select = select.filter(domain_root::Column::IsActive.eq(is_active));
    }
    select
}

#[async_trait]
impl DomainRootRepository for SqliteStore {
    async fn find_by_id(&self, id: i64) -> CoreResult<Option<DomainRoot>> {
        domain_root::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage_error("query domain root"))?
            .map(domain_root::Model::into_domain_root)
            .transpose()
    }

    async fn find_by_root_domain(&self, root_domain: &str) -> CoreResult<Option<DomainRoot>> {
        domain_root::Entity::find()
            .filter(domain_root::Column::RootDomain.eq(root_domain))
            .one(&self.db)
            .await
            .map_err(storage_error("query domain root"))?
            .map(domain_root::Model::into_domain_root)
            .transpose()
    }

    async fn list(&self, query: &DomainRootListQuery) -> CoreResult<PaginatedResponse<DomainRoot>> {
        // The paginator multiplies page by size unchecked.
        query.offset()?;

        let order = if query.sort.descending {
            Order::Desc
        } else {
            Order::Asc
        };
        let select = apply_filter(domain_root::Entity::find(), &query.filter)
            .order_by(sort_column(query.sort.field), order)
            .order_by(domain_root::Column::Id, Order::Asc);

        let paginator = select.paginate(&self.db, query.per_page.max(1));
        let total_count = paginator
            .num_items()
            .await
            .map_err(storage_error("count domain roots"))?;
        let rows = paginator
            .fetch_page(query.page.saturating_sub(1))
            .await
            .map_err(storage_error("query domain roots"))?;

        let items = rows
            .into_iter()
            .map(domain_root::Model::into_domain_root)
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(PaginatedResponse::new(
            items,
            query.page,
            query.per_page,
            total_count,
        ))
    }

    async fn create(&self, root: NewDomainRoot) -> CoreResult<DomainRoot> {
        let now = Utc::now().to_rfc3339();
        let model = domain_root::ActiveModel {
            id: NotSet,
            name: Set(root.name),
            root_domain: Set(root.root_domain),
            provider: Set(root.provider),
            provider_config: Set(config_to_string(&root.provider_config)?),
            is_active: Set(root.is_active),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        model
            .insert(&self.db)
            .await
            .map_err(storage_error("insert domain root"))?
            .into_domain_root()
    }

    async fn update(&self, id: i64, root: NewDomainRoot) -> CoreResult<Option<DomainRoot>> {
        let Some(existing) = domain_root::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage_error("query domain root"))?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.name = Set(root.name);
        model.root_domain = Set(root.root_domain);
        model.provider = Set(root.provider);
        model.provider_config = Set(config_to_string(&root.provider_config)?);
        model.is_active = Set(root.is_active);
        model.updated_at = Set(Utc::now().to_rfc3339());

        model
            .update(&self.db)
            .await
            .map_err(storage_error("update domain root"))?
            .into_domain_root()
            .map(Some)
    }

    async fn delete(&self, id: i64) -> CoreResult<bool> {
        let Some(existing) = domain_root::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage_error("query domain root"))?
        else {
            return Ok(false);
        };

        existing
            .delete(&self.db)
            .await
            .map_err(storage_error("delete domain root"))?;

        Ok(true)
    }
}
