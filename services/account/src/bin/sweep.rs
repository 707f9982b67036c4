//! One-shot account-deletion sweep for cron, bypassing HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Show what would be erased
//! sweep --dry-run
//!
//! # Erase everything due, reclaiming requests stuck for more than 10 minutes
//! sweep --stale-after-secs 600
//! ```

use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Parser;
use sea_orm::Database;

use meridian_core::config::Config;
use meridian_core::tracing::init_tracing;

use meridian_account::config::AccountConfig;
use meridian_account::domain::repository::DeletionRequestRepository;
use meridian_account::handlers::sweep::SweepResponse;
use meridian_account::state::AppState;
use meridian_account::usecase::sweep::ProcessDeletionsUseCase;

#[derive(Parser)]
#[command(about = "Erase every account whose deletion grace period has expired")]
struct Args {
    /// List due requests without modifying anything
    #[arg(long)]
    dry_run: bool,

    /// Reclaim `processing` requests older than this (overrides STALE_PROCESSING_SECS)
    #[arg(long)]
    stale_after_secs: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = AccountConfig::try_from_env().context("load configuration")?;
    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;
    let state = AppState::new(db, &config)?;
    let stale_after = args
        .stale_after_secs
        .map(chrono::Duration::seconds)
        .unwrap_or(state.stale_after);

    if args.dry_run {
        let now = Utc::now();
        let due = state
            .deletion_repo()
            .find_due(now, now - stale_after)
            .await?;
        let listed: Vec<_> = due
            .iter()
            .map(|r| {
                serde_json::json!({
                    "request_id": r.id,
                    "user_id": r.user_id,
                    "status": r.status,
                    "scheduled_for": r.scheduled_for,
                })
            })
            .collect();
        let body = serde_json::json!({ "dry_run": true, "due": listed });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let usecase = ProcessDeletionsUseCase {
        deletions: state.deletion_repo(),
        account_data: state.account_data_repo(),
        identity: state.identity.clone(),
        mailer: state.mailer.clone(),
        stale_after,
    };
    let summary = usecase.execute().await?;
    let failed = summary.failed;
    println!(
        "{}",
        serde_json::to_string_pretty(&SweepResponse::from(summary))?
    );

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
