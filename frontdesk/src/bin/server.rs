//! Front Desk Server
//!
//! Serves the booking engine over HTTP, backed by in-memory repositories.
//!
//! # Usage
//!
//! ```bash
//! FRONTDESK_SEED_DEMO_DATA=true cargo run --bin server
//! ```

use frontdesk::seed::seed_demo_hotel;
use frontdesk::server::{AppState, build_router};
use frontdesk::config::DEFAULT_LOG_FILTER;
use frontdesk::{Config, FrontDesk, metrics};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Front Desk server...");
    tracing::info!(
        log_filter = %config.server.log_level,
        bind = %config.bind_address(),
        hold_policy = ?config.booking.hold_policy,
        "Configuration loaded"
    );

    metrics::register_business_metrics();

    let front_desk = FrontDesk::from_config(&config);
    if config.booking.seed_demo_data {
        let demo = seed_demo_hotel(front_desk.catalog().as_ref()).await?;
        tracing::info!(hotel_id = %demo.hotel.id, "Demo data loaded");
    }

    let app = build_router(AppState::from_config(front_desk, &config));
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Front Desk server is running");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down gracefully...");
        })
        .await?;

    Ok(())
}
