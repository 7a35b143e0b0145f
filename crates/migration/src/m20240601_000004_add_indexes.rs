use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Content: index on tenant_id
        manager
            .create_index(
                Index::create()
                    .name("idx_content_tenant")
                    .table(Content::Table)
                    .col(Content::TenantId)
                    .to_owned(),
            )
            .await?;

        // Content: index on code — lookup key; uniqueness is NOT enforced
        manager
            .create_index(
                Index::create()
                    .name("idx_content_code")
                    .table(Content::Table)
                    .col(Content::Code)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_content_tenant").table(Content::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_content_code").table(Content::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Content { Table, TenantId, Code }
