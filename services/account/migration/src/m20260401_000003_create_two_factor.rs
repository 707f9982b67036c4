use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TwoFactorCredentials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TwoFactorCredentials::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TwoFactorCredentials::Secret).string().not_null())
                    .col(
                        ColumnDef::new(TwoFactorCredentials::Enabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TwoFactorCredentials::LastVerifiedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(TwoFactorCredentials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TwoFactorCredentials::DeletedAt)
                            .timestamp_with_time_zone(),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite key: a code hash exists at most once per user, so a
        // DELETE by (user_id, code_hash) redeems it at most once.
        manager
            .create_table(
                Table::create()
                    .table(BackupCodes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BackupCodes::UserId).uuid().not_null())
                    .col(ColumnDef::new(BackupCodes::CodeHash).string_len(64).not_null())
                    .col(
                        ColumnDef::new(BackupCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(BackupCodes::UserId)
                            .col(BackupCodes::CodeHash),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BackupCodes::Table, BackupCodes::UserId)
                            .to(TwoFactorCredentials::Table, TwoFactorCredentials::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BackupCodes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TwoFactorCredentials::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TwoFactorCredentials {
    Table,
    UserId,
    Secret,
    Enabled,
    LastVerifiedAt,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum BackupCodes {
    Table,
    UserId,
    CodeHash,
    CreatedAt,
}
