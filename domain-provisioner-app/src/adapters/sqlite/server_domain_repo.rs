//! `ServerDomainRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde_json::Value;

use domain_provisioner_core::error::{CoreError, CoreResult};
use domain_provisioner_core::traits::ServerDomainRepository;
use domain_provisioner_core::types::{NewServerDomain, ProviderPayload, ServerDomain};

use super::entity::server_domain;
use super::{SqliteStore, parse_timestamp, storage_error};

impl server_domain::Model {
    /// Convert a row into a `ServerDomain`, parsing string-backed columns.
    fn into_server_domain(self) -> CoreResult<ServerDomain> {
        let status = self
            .status
            .parse()
            .map_err(|e: String| CoreError::SerializationError(e))?;
        let provider_payload = self
            .provider_payload
            .as_deref()
            .map(parse_payload)
            .transpose()?;
        let verified_at = self
            .verified_at
            .as_deref()
            .map(|s| parse_timestamp("verified_at", s))
            .transpose()?;
        let last_synced_at = self
            .last_synced_at
            .as_deref()
            .map(|s| parse_timestamp("last_synced_at", s))
            .transpose()?;

        Ok(ServerDomain {
            id: self.id,
            server_id: self.server_id,
            domain_root_id: self.domain_root_id,
            domain_type: self.domain_type,
            hostname: self.hostname,
            subdomain: self.subdomain,
            status,
            verification_method: self.verification_method,
            verification_token: self.verification_token,
            verified_at,
            provider_payload,
            last_synced_at,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

fn parse_payload(raw: &str) -> CoreResult<ProviderPayload> {
    match serde_json::from_str(raw)
        .map_err(|e| CoreError::SerializationError(format!("Invalid provider_payload: {e}")))?
    {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(ProviderPayload::new()),
        other => Err(CoreError::SerializationError(format!(
            "Invalid provider_payload: expected object, got {other}"
        ))),
    }
}

fn payload_to_string(payload: Option<&ProviderPayload>) -> CoreResult<Option<String>> {
    payload
        .map(|p| {
            serde_json::to_string(p).map_err(|e| CoreError::SerializationError(e.to_string()))
        })
        .transpose()
}

#[async_trait]
impl ServerDomainRepository for SqliteStore {
    async fn find_by_id(&self, id: i64) -> CoreResult<Option<ServerDomain>> {
        server_domain::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage_error("query server domain"))?
            .map(server_domain::Model::into_server_domain)
            .transpose()
    }

    async fn find_by_hostname(&self, hostname: &str) -> CoreResult<Option<ServerDomain>> {
        server_domain::Entity::find()
            .filter(server_domain::Column::Hostname.eq(hostname))
            .one(&self.db)
            .await
            .map_err(storage_error("query server domain"))?
            .map(server_domain::Model::into_server_domain)
            .transpose()
    }

    async fn find_by_server(&self, server_id: i64) -> CoreResult<Vec<ServerDomain>> {
        let rows = server_domain::Entity::find()
            .filter(server_domain::Column::ServerId.eq(server_id))
            .order_by_asc(server_domain::Column::CreatedAt)
            .order_by_asc(server_domain::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage_error("query server domains"))?;

        rows.into_iter()
            .map(server_domain::Model::into_server_domain)
            .collect()
    }

    async fn create(&self, domain: NewServerDomain) -> CoreResult<ServerDomain> {
        let now = Utc::now().to_rfc3339();
        let model = server_domain::ActiveModel {
            id: NotSet,
            server_id: Set(domain.server_id),
            domain_root_id: Set(domain.domain_root_id),
            domain_type: Set(domain.domain_type),
            hostname: Set(domain.hostname),
            subdomain: Set(domain.subdomain),
            status: Set(domain.status.as_str().to_string()),
            verification_method: Set(domain.verification_method),
            verification_token: Set(domain.verification_token),
            verified_at: Set(None),
            provider_payload: Set(None),
            last_synced_at: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        model
            .insert(&self.db)
            .await
            .map_err(storage_error("insert server domain"))?
            .into_server_domain()
    }

    async fn save(&self, domain: &ServerDomain) -> CoreResult<()> {
        let model = server_domain::ActiveModel {
            id: Set(domain.id),
            server_id: Set(domain.server_id),
            domain_root_id: Set(domain.domain_root_id),
            domain_type: Set(domain.domain_type.clone()),
            hostname: Set(domain.hostname.clone()),
            subdomain: Set(domain.subdomain.clone()),
            status: Set(domain.status.as_str().to_string()),
            verification_method: Set(domain.verification_method.clone()),
            verification_token: Set(domain.verification_token.clone()),
            verified_at: Set(domain.verified_at.map(|dt| dt.to_rfc3339())),
            provider_payload: Set(payload_to_string(domain.provider_payload.as_ref())?),
            last_synced_at: Set(domain.last_synced_at.map(|dt| dt.to_rfc3339())),
            created_at: Set(domain.created_at.to_rfc3339()),
            updated_at: Set(Utc::now().to_rfc3339()),
        };

        model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => CoreError::DomainNotFound(domain.id),
            other => CoreError::StorageError(format!("Failed to update server domain: {other}")),
        })?;

        Ok(())
    }
}
