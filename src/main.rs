use axum::{routing::get, Router};
use sigrelay::registry::InMemoryConnectionRegistry;
use sigrelay::room::repository::InMemoryRoomRepository;
use sigrelay::shared::AppState;
use sigrelay::signaling::{MembershipCoordinator, RelayRouter};
use sigrelay::websockets::{websocket_handler, InMemoryConnectionManager};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sigrelay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting signaling relay server");

    // Wire up shared application state
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let rooms = Arc::new(InMemoryRoomRepository::new());
    let connection_manager = Arc::new(InMemoryConnectionManager::new());

    let coordinator = Arc::new(MembershipCoordinator::new(
        rooms,
        registry.clone(),
        connection_manager.clone(),
    ));
    let relay = Arc::new(RelayRouter::new(connection_manager.clone()));

    let app_state = AppState::new(registry, connection_manager, coordinator, relay);

    // build our application
    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .unwrap();
    info!("Signaling server running on port {}", port);
    axum::serve(listener, app).await.unwrap();
}
