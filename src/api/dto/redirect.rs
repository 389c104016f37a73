//! DTOs for the redirect management endpoints.

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::RedirectFields;

/// Request body for `POST /_api/redirects`.
///
/// `permanent` and `allowRegex` may be omitted; the store applies defaults.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRedirectRequest {
    #[validate(
        required(message = "Redirect must have a slug."),
        length(min = 1, message = "Redirect must have a slug.")
    )]
    pub slug: Option<String>,

    #[validate(required(message = "Redirect must have a URL."))]
    pub url: Option<String>,

    pub permanent: Option<bool>,
    pub allow_regex: Option<bool>,
}

impl CreateRedirectRequest {
    /// Splits the request into the key and the record to store.
    pub fn into_parts(self) -> (String, RedirectFields) {
        (
            self.slug.unwrap_or_default(),
            RedirectFields {
                url: self.url,
                permanent: self.permanent,
                allow_regex: self.allow_regex,
            },
        )
    }
}

/// Request body for `PATCH /_api/redirects`.
///
/// Only provided fields are changed; everything else keeps its stored value.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRedirectRequest {
    #[validate(
        required(message = "Redirect must have a slug."),
        length(min = 1, message = "Redirect must have a slug.")
    )]
    pub slug: Option<String>,

    pub url: Option<String>,
    pub permanent: Option<bool>,
    pub allow_regex: Option<bool>,
}

impl UpdateRedirectRequest {
    /// Splits the request into the key and the partial record to merge.
    pub fn into_parts(self) -> (String, RedirectFields) {
        (
            self.slug.unwrap_or_default(),
            RedirectFields {
                url: self.url,
                permanent: self.permanent,
                allow_regex: self.allow_regex,
            },
        )
    }
}

/// Request body for `DELETE /_api/redirects`.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteRedirectRequest {
    #[validate(
        required(message = "Redirect must have a slug."),
        length(min = 1, message = "Redirect must have a slug.")
    )]
    pub slug: Option<String>,
}

impl DeleteRedirectRequest {
    pub fn into_slug(self) -> String {
        self.slug.unwrap_or_default()
    }
}
