use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountDeletionRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountDeletionRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccountDeletionRequests::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(AccountDeletionRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(
                        ColumnDef::new(AccountDeletionRequests::ScheduledFor)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountDeletionRequests::ProcessingStartedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(AccountDeletionRequests::CompletedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(AccountDeletionRequests::Notes).text())
                    .col(
                        ColumnDef::new(AccountDeletionRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountDeletionRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Sweep poll: WHERE status = .. ORDER BY scheduled_for.
        manager
            .create_index(
                Index::create()
                    .table(AccountDeletionRequests::Table)
                    .col(AccountDeletionRequests::Status)
                    .col(AccountDeletionRequests::ScheduledFor)
                    .name("idx_account_deletion_requests_status_scheduled_for")
                    .to_owned(),
            )
            .await?;

        // One active request per user.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_account_deletion_requests_active_user \
                 ON account_deletion_requests (user_id) \
                 WHERE status IN ('scheduled', 'processing')",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountDeletionRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AccountDeletionRequests {
    Table,
    Id,
    UserId,
    Status,
    ScheduledFor,
    ProcessingStartedAt,
    CompletedAt,
    Notes,
    CreatedAt,
    UpdatedAt,
}
