use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proctor::{
    api, auth::AdminAuth, config::ServerConfig, recognition::HttpRecognitionClient, state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proctor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting proctor...");

    let config = ServerConfig::from_env();
    let admin_auth = Arc::new(AdminAuth::from_env());

    let recognition =
        HttpRecognitionClient::new(config.recognition_url.clone(), config.recognition_timeout)?;
    tracing::info!(
        url = recognition.base_url(),
        timeout_secs = config.recognition_timeout.as_secs(),
        "Recognition service configured"
    );

    let state = Arc::new(AppState::new(Arc::new(recognition)));

    let app = api::router(state, admin_auth)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
