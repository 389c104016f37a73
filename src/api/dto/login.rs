//! DTO for the login endpoint.

use std::convert::Infallible;

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::Deserialize;

/// Login attempt, accepted as a urlencoded form or as JSON.
///
/// A body that cannot be read as either is an attempt with an empty password,
/// so it fails like any other wrong password instead of with a 4xx.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

impl<S> FromRequest<S> for LoginRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let login = if is_json {
            Json::<LoginRequest>::from_request(req, state)
                .await
                .map(|Json(login)| login)
                .ok()
        } else {
            Form::<LoginRequest>::from_request(req, state)
                .await
                .map(|Form(login)| login)
                .ok()
        };
        Ok(login.unwrap_or_default())
    }
}
