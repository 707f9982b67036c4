use sea_orm::Database;
use tracing::info;

use meridian_core::config::Config;
use meridian_core::tracing::init_tracing;

use meridian_account::config::AccountConfig;
use meridian_account::router::build_router;
use meridian_account::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AccountConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState::new(db, &config).expect("failed to build application state");

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.account_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("account service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
