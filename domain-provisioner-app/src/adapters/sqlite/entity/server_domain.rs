//! `SeaORM` entity for the `server_domains` table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "server_domains")]
/// Database row model for a server domain.
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub server_id: i64,
    pub domain_root_id: Option<i64>,
    #[sea_orm(column_name = "type")]
    pub domain_type: String,
    #[sea_orm(unique)]
    pub hostname: String,
    pub subdomain: Option<String>,
    pub status: String,
    pub verification_method: Option<String>,
    pub verification_token: Option<String>,
    pub verified_at: Option<String>,
    /// JSON object
    pub provider_payload: Option<String>,
    pub last_synced_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
