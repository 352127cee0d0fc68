use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tts_api_server::api::routes::{create_router, AppState};
use tts_api_server::store::JobStore;
use tts_api_server::tts::GoogleTranslateTts;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configuration from environment
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .expect("PORT must be a number");
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://tts.db?mode=rwc".to_string());
    let audio_dir: PathBuf = std::env::var("AUDIO_DIR")
        .unwrap_or_else(|_| "./audio".to_string())
        .into();
    let public_base_url = std::env::var("PUBLIC_BASE_URL")
        .unwrap_or_else(|_| format!("http://{}:{}", host, port));

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Invalid address");

    tracing::info!("TTS API Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Database: {}", database_url);
    tracing::info!("Audio directory: {}", audio_dir.display());

    std::fs::create_dir_all(&audio_dir).expect("Failed to create audio directory");

    // Pool lives for the process lifetime; sqlx closes it on shutdown.
    let store = JobStore::connect(&database_url)
        .await
        .expect("Failed to open job database");

    let state = Arc::new(AppState {
        synthesizer: Arc::new(GoogleTranslateTts::new()),
        store,
        audio_dir,
        public_base_url,
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
