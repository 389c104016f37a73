//! Host extraction from HTTP request headers.

use axum::http::{HeaderMap, header};

use crate::AppError;

/// Extracts the host name from the `Host` header.
///
/// Handles:
/// - IPv4 addresses (e.g., `192.168.1.1`)
/// - IPv6 addresses (e.g., `[::1]`)
/// - Hostnames with ports (e.g., `example.com:3000`)
/// - Plain hostnames (e.g., `example.com`)
///
/// Port numbers are stripped and the result is lowercased, so it can be
/// compared directly against the configured management host.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if:
/// - The `Host` header is missing
/// - The header value contains invalid UTF-8
pub fn extract_host(headers: &HeaderMap) -> Result<String, AppError> {
    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", serde_json::json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", serde_json::json!({})))?;

    Ok(strip_port(host).to_ascii_lowercase())
}

/// Removes a trailing `:port` from a host, keeping IPv6 brackets intact.
pub fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        match host.find(']') {
            Some(end_bracket) => &host[..=end_bracket],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    }
}
