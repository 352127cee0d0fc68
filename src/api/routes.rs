use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use crate::store::JobStore;
use crate::tts::Synthesizer;

pub struct AppState {
    pub synthesizer: Arc<dyn Synthesizer>,
    pub store: JobStore,
    pub audio_dir: PathBuf,
    pub public_base_url: String,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/convert", post(handlers::convert))
        .route("/audio/:file_id", get(handlers::retrieve_audio))
        .route("/status", get(handlers::status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
