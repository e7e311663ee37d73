//! HTTP API over the summary service.

mod error;
mod handlers;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::orchestrator::SummaryService;
use crate::services::{AuthClient, Services};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub summaries: Arc<SummaryService>,
    /// Resolves bearer tokens to users; `None` disables per-user scoping.
    pub auth: Option<Arc<AuthClient>>,
}

impl AppState {
    pub fn new(summaries: Arc<SummaryService>, auth: Option<Arc<AuthClient>>) -> Self {
        Self { summaries, auth }
    }

    pub fn from_services(services: &Services) -> Self {
        Self::new(services.summaries.clone(), services.auth.clone())
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/save-content", post(handlers::save_content))
        .route("/api/delete-content", delete(handlers::delete_content))
        .route("/api/delete-summary", delete(handlers::delete_summary))
        .route(
            "/api/summaries",
            get(handlers::list_summaries).post(handlers::create_summary),
        )
        .with_state(state)
}
