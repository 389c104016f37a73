//! Success envelope shared by the management endpoints.

use serde::Serialize;

/// `{"ok": true}` or `{"ok": true, "data": ...}`.
///
/// Failures use the error body produced by [`crate::error::AppError`].
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ApiResponse<()> {
    pub fn ok() -> Self {
        Self {
            ok: true,
            data: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
        }
    }
}
