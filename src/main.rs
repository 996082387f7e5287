// region:    --- Imports
use crate::config::Config;
use crate::database::DatabaseManager;
use crate::notifier::MailerClient;
use crate::scheduler::AuctionSweeper;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Modules
mod auction;
mod bidding;
mod config;
mod database;
mod error;
mod handlers;
mod notifier;
mod query;
mod scheduler;

// endregion: --- Modules

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = Config::load();

    let db_manager = Arc::new(DatabaseManager::new(&config.database_url).await?);
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> database initialization failed: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> database ready", "Main");

    let mailer = Arc::new(MailerClient::new(&config.mailer_url));

    // Lifecycle sweeper, owned here so shutdown can stop it.
    let sweeper = AuctionSweeper::new(
        db_manager.get_pool(),
        Duration::from_secs(config.sweep_interval_secs),
        Arc::clone(&mailer),
    );
    let sweeper_handle = sweeper.start();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes_all = Router::new()
        .route("/api/v1/bid/place/:id", post(handlers::handle_place_bid))
        .route(
            "/api/v1/bid/send-winning-notification/:auction_id",
            post(handlers::handle_send_winning_notification),
        )
        .route(
            "/api/v1/bid/history/:id",
            get(handlers::handle_get_bid_history),
        )
        .route(
            "/api/v1/bid/highest/:id",
            get(handlers::handle_get_highest_bid),
        )
        .route("/api/v1/auctionitem", get(handlers::handle_get_auctions))
        .route(
            "/api/v1/auctionitem/:id",
            get(handlers::handle_get_auction),
        )
        .layer(cors)
        .with_state((db_manager, mailer));

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    if let Err(err) = axum::serve(listener, routes_all.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("{:<12} --> Server error: {}", "Main", err);
    }

    sweeper_handle.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("{:<12} --> failed to listen for shutdown: {}", "Main", e);
    }
}
// endregion: --- Main
