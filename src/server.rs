use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::Result;
use crate::handlers::{AppState, chat, page, recommend};
use crate::relay::ChatRelay;
use crate::scorer::ProcessScorer;
use crate::service::RecommendationService;
use crate::transport::{OllamaTransport, Transport};

/// Wires the production scorer and model transport into app state.
pub fn build_state(cfg: &Config, transport: Arc<dyn Transport>) -> AppState {
    let scorer = Arc::new(ProcessScorer::new(&cfg.scorer));
    let recommender = RecommendationService::new(scorer, cfg.scorer.line_selection);
    let relay = ChatRelay::new(transport, &cfg.ollama);
    AppState::new(recommender, relay)
}

pub fn ollama_transport(cfg: &Config) -> Result<Arc<dyn Transport>> {
    Ok(Arc::new(OllamaTransport::new(&cfg.ollama)?))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/api/recommend", post(recommend::recommend))
        .route("/api/chat", post(chat::chat))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
