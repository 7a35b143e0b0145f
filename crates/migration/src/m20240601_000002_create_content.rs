//! Create `content` table.
//! Administrative records for published material (text/voice/category),
//! tenant-scoped and soft-deletable.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Content::Table)
                    .if_not_exists()
                    .col(uuid(Content::Id).primary_key())
                    .col(uuid(Content::TenantId).not_null())
                    .col(integer(Content::Code).not_null())
                    .col(integer_null(Content::CategoryId))
                    .col(string_len_null(Content::ImgUrl, 512))
                    .col(string_len(Content::Name, 128).not_null())
                    .col(text_null(Content::Introduction))
                    .col(text_null(Content::Body))
                    .col(string_len_null(Content::Voice, 512))
                    .col(integer(Content::Sort).not_null().default(0))
                    .col(boolean(Content::Enabled).not_null().default(false))
                    .col(string_len_null(Content::Creator, 64))
                    .col(string_len_null(Content::Updater, 64))
                    .col(timestamp_with_time_zone(Content::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Content::UpdatedAt).not_null())
                    .col(timestamp_with_time_zone_null(Content::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_tenant")
                            .from(Content::Table, Content::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Content::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Content {
    Table,
    Id,
    TenantId,
    Code,
    CategoryId,
    ImgUrl,
    Name,
    Introduction,
    Body,
    Voice,
    Sort,
    Enabled,
    Creator,
    Updater,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Tenant { Table, Id }
