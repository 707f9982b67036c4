pub use sea_orm_migration::prelude::*;

mod m20260401_000001_create_profiles;
mod m20260401_000002_create_user_data;
mod m20260401_000003_create_two_factor;
mod m20260401_000004_create_verification_attempts;
mod m20260401_000005_create_account_deletion_requests;
mod m20260401_000006_create_entitlements;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_profiles::Migration),
            Box::new(m20260401_000002_create_user_data::Migration),
            Box::new(m20260401_000003_create_two_factor::Migration),
            Box::new(m20260401_000004_create_verification_attempts::Migration),
            Box::new(m20260401_000005_create_account_deletion_requests::Migration),
            Box::new(m20260401_000006_create_entitlements::Migration),
        ]
    }
}
