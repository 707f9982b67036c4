use sea_orm_migration::prelude::*;

/// Entitlements have no foreign key to the identity record so that purchase
/// history outlives account erasure.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entitlements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entitlements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Entitlements::UserId).uuid().not_null())
                    .col(ColumnDef::new(Entitlements::ProductId).string().not_null())
                    .col(ColumnDef::new(Entitlements::Source).string().not_null())
                    .col(
                        ColumnDef::new(Entitlements::GrantedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Entitlements::ExpiresAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Entitlements::Table)
                    .col(Entitlements::UserId)
                    .name("idx_entitlements_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entitlements::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Entitlements {
    Table,
    Id,
    UserId,
    ProductId,
    Source,
    GrantedAt,
    ExpiresAt,
}
