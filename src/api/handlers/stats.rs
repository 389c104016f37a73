//! Handler for hit statistics.

use std::collections::BTreeMap;

use axum::{Json, extract::State};

use crate::api::dto::response::ApiResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the hit counter of every redirect that has been hit at least once.
///
/// # Endpoint
///
/// `GET /_api/stats`
///
/// # Response
///
/// ```json
/// { "ok": true, "data": { "docs": 42, "^gh/(.+)$": 7 } }
/// ```
pub async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BTreeMap<String, u64>>>, AppError> {
    let stats = state.store.stats().await?;
    Ok(Json(ApiResponse::data(stats)))
}
