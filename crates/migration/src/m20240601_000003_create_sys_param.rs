//! Create `sys_param` table.
//! Key-value configuration store queried at runtime for feature settings
//! such as the knowledge-base API endpoint and token.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SysParam::Table)
                    .if_not_exists()
                    .col(uuid(SysParam::Id).primary_key())
                    .col(string_len(SysParam::Code, 128).unique_key().not_null())
                    .col(string_len(SysParam::Value, 1024).not_null())
                    .col(string_len_null(SysParam::Remark, 256))
                    .col(timestamp_with_time_zone(SysParam::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SysParam::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SysParam { Table, Id, Code, Value, Remark, UpdatedAt }
