use sea_orm::entity::prelude::*;

/// One single-use backup code (stored hashed). Redeeming a code deletes its row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "backup_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    /// Hex SHA-256 of the `XXXX-XXXX-XXXX` code.
    #[sea_orm(primary_key, auto_increment = false)]
    pub code_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::two_factor_credentials::Entity",
        from = "Column::UserId",
        to = "super::two_factor_credentials::Column::UserId"
    )]
    Credential,
}

impl Related<super::two_factor_credentials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Credential.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
