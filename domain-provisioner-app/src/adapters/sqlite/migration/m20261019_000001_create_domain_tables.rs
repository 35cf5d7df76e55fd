use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DomainRoot::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DomainRoot::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DomainRoot::Name).string().not_null())
                    .col(
                        ColumnDef::new(DomainRoot::RootDomain)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DomainRoot::Provider)
                            .string()
                            .not_null()
                            .default("manual"),
                    )
                    .col(
                        ColumnDef::new(DomainRoot::ProviderConfig)
                            .string()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(DomainRoot::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(DomainRoot::CreatedAt).string().not_null())
                    .col(ColumnDef::new(DomainRoot::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ServerDomain::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServerDomain::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServerDomain::ServerId).big_integer().not_null())
                    .col(ColumnDef::new(ServerDomain::DomainRootId).integer().null())
                    .col(
                        ColumnDef::new(ServerDomain::Type)
                            .string()
                            .not_null()
                            .default("managed"),
                    )
                    .col(
                        ColumnDef::new(ServerDomain::Hostname)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ServerDomain::Subdomain).string().null())
                    .col(
                        ColumnDef::new(ServerDomain::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ServerDomain::VerificationMethod).string().null())
                    .col(ColumnDef::new(ServerDomain::VerificationToken).string().null())
                    .col(ColumnDef::new(ServerDomain::VerifiedAt).string().null())
                    .col(ColumnDef::new(ServerDomain::ProviderPayload).string().null())
                    .col(ColumnDef::new(ServerDomain::LastSyncedAt).string().null())
                    .col(ColumnDef::new(ServerDomain::CreatedAt).string().not_null())
                    .col(ColumnDef::new(ServerDomain::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_server_domains_domain_root")
                            .from(ServerDomain::Table, ServerDomain::DomainRootId)
                            .to(DomainRoot::Table, DomainRoot::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_server_domains_server_id")
                    .table(ServerDomain::Table)
                    .col(ServerDomain::ServerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServerDomain::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DomainRoot::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum DomainRoot {
    #[sea_orm(iden = "domain_roots")]
    Table,
    Id,
    Name,
    RootDomain,
    Provider,
    ProviderConfig,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ServerDomain {
    #[sea_orm(iden = "server_domains")]
    Table,
    Id,
    ServerId,
    DomainRootId,
    Type,
    Hostname,
    Subdomain,
    Status,
    VerificationMethod,
    VerificationToken,
    VerifiedAt,
    ProviderPayload,
    LastSyncedAt,
    CreatedAt,
    UpdatedAt,
}
