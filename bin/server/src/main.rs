use std::path::Path;
use std::sync::Arc;

use fitbook_identity::GoogleIdentity;
use fitbook_server::app;
use fitbook_server::auth::AppState;
use fitbook_server::bookings::BookingStore;
use fitbook_server::catalog::EventCatalog;
use fitbook_server::config::ServerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    // Identity provider client: initialized once from required
    // configuration, read-only thereafter.
    let identity = GoogleIdentity::new(config.identity.clone())
        .expect("failed to initialize identity provider client");

    // Load the event catalog
    let catalog = EventCatalog::load_or_fallback(Path::new(&config.catalog.events_path));
    tracing::info!(events = catalog.events().len(), "Loaded event catalog");

    // Create application state
    let state = Arc::new(AppState::new(
        Arc::new(identity),
        config.session.clone(),
        catalog,
        BookingStore::new(),
        config.dev_errors,
    ));

    let app = app::router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
