//! Handlers for redirect management endpoints (list, create, update, delete).

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::api::dto::redirect::{
    CreateRedirectRequest, DeleteRedirectRequest, UpdateRedirectRequest,
};
use crate::api::dto::response::ApiResponse;
use crate::domain::entities::RedirectEntry;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every redirect in insertion order, with defaults applied.
///
/// # Endpoint
///
/// `GET /_api/redirects`
///
/// # Response
///
/// ```json
/// {
///   "ok": true,
///   "data": [
///     { "key": "docs", "url": "https://example.com/docs", "permanent": true, "allowRegex": false }
///   ]
/// }
/// ```
pub async fn list_redirects_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RedirectEntry>>>, AppError> {
    let redirects = state.store.list().await?;
    Ok(Json(ApiResponse::data(redirects)))
}

/// Creates a redirect.
///
/// # Endpoint
///
/// `POST /_api/redirects`
///
/// # Request Body
///
/// ```json
/// {
///   "slug": "^gh/(.+)$",
///   "url": "https://github.com/$1",
///   "permanent": false,     // optional, default true
///   "allowRegex": true      // optional, default false
/// }
/// ```
///
/// # Errors
///
/// - 400 if `slug` or `url` is missing, the URL is not absolute, or a pattern
///   slug does not compile
/// - 409 if the slug already exists
pub async fn create_redirect_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateRedirectRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let (key, fields) = payload.into_parts();
    state.store.add(&key, fields).await?;

    Ok(Json(ApiResponse::ok()))
}

/// Partially updates a redirect. Omitted fields keep their stored values.
///
/// # Endpoint
///
/// `PATCH /_api/redirects`
///
/// # Errors
///
/// - 400 if `slug` is missing or the merged record is invalid
/// - 404 if the slug does not exist
pub async fn update_redirect_handler(
    State(state): State<AppState>,
    payload: Result<Json<UpdateRedirectRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let (key, patch) = payload.into_parts();
    state.store.update(&key, patch).await?;

    Ok(Json(ApiResponse::ok()))
}

/// Deletes a redirect together with its hit counter.
///
/// # Endpoint
///
/// `DELETE /_api/redirects` with body `{"slug": "docs"}`
///
/// # Errors
///
/// - 400 if `slug` is missing
/// - 404 if the slug does not exist
pub async fn delete_redirect_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRedirectRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let slug = payload.into_slug();
    if !state.store.delete(&slug).await? {
        return Err(AppError::not_found(
            "Slug not found",
            json!({ "slug": slug }),
        ));
    }

    info!(slug = %slug, "Redirect deleted via API");
    Ok(Json(ApiResponse::ok()))
}
