//! Catalog listing endpoint

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, CatalogResponse, Json};

/// GET /api/tools
pub async fn list_catalog(State(state): State<AppState>) -> Result<Json<CatalogResponse>, ApiError> {
    let tools = state.pipeline.catalog().tools().to_vec();
    let total_count = tools.len();

    Ok(Json(CatalogResponse { tools, total_count }))
}
