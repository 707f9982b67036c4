//! sea-orm entities for the account service tables.

pub mod account_deletion_requests;
pub mod backup_codes;
pub mod entitlements;
pub mod login_activity;
pub mod notifications;
pub mod profiles;
pub mod sessions;
pub mod two_factor_credentials;
pub mod user_preferences;
pub mod verification_attempts;
