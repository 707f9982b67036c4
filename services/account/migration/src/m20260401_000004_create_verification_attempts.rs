use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VerificationAttempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VerificationAttempts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VerificationAttempts::UserId).uuid().not_null())
                    .col(ColumnDef::new(VerificationAttempts::Success).boolean().not_null())
                    .col(ColumnDef::new(VerificationAttempts::FailureReason).string())
                    .col(
                        ColumnDef::new(VerificationAttempts::Kind)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(VerificationAttempts::IpAddress).string())
                    .col(ColumnDef::new(VerificationAttempts::UserAgent).string())
                    .col(
                        ColumnDef::new(VerificationAttempts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(VerificationAttempts::Table)
                    .col(VerificationAttempts::UserId)
                    .col(VerificationAttempts::CreatedAt)
                    .name("idx_verification_attempts_user_id_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VerificationAttempts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VerificationAttempts {
    Table,
    Id,
    UserId,
    Success,
    FailureReason,
    Kind,
    IpAddress,
    UserAgent,
    CreatedAt,
}
