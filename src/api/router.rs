//! Router assembly

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::health;
use super::routes::{catalog, workflows};
use super::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        // Workflow pipeline
        .route("/api/workflow/create", post(workflows::create_workflow))
        .route("/api/workflow/edit", post(workflows::edit_workflow))
        .route(
            "/api/workflow/conversation/{conversation_id}",
            get(workflows::get_conversation).delete(workflows::delete_conversation),
        )
        // Catalog
        .route("/api/tools", get(catalog::list_catalog))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
