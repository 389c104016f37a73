//! Redirect records and their defaulting and validation rules.

use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Default for [`Redirect::permanent`] when a record leaves it unset.
pub const DEFAULT_PERMANENT: bool = true;

/// Default for [`Redirect::allow_regex`] when a record leaves it unset.
pub const DEFAULT_ALLOW_REGEX: bool = false;

/// A redirect as supplied by a caller or as read back from storage.
///
/// Every field is optional: creation input may omit the flags, a partial update
/// carries only the fields it changes, and legacy stored rows may predate a flag.
/// [`RedirectFields::normalize`] fills unset flags from the default table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectFields {
    pub url: Option<String>,
    pub permanent: Option<bool>,
    pub allow_regex: Option<bool>,
}

impl RedirectFields {
    /// Fields for a new redirect to `url` with both flags left to their defaults.
    pub fn to(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn permanent(mut self, permanent: bool) -> Self {
        self.permanent = Some(permanent);
        self
    }

    pub fn allow_regex(mut self, allow_regex: bool) -> Self {
        self.allow_regex = Some(allow_regex);
        self
    }

    /// Overlays these fields onto the defaults. Fields that are set always win.
    ///
    /// Idempotent: normalizing an already normalized value returns it unchanged.
    pub fn normalize(self) -> Self {
        Self {
            url: self.url,
            permanent: Some(self.permanent.unwrap_or(DEFAULT_PERMANENT)),
            allow_regex: Some(self.allow_regex.unwrap_or(DEFAULT_ALLOW_REGEX)),
        }
    }

    /// Shallow merge: fields set in `patch` replace ours, the rest are retained.
    pub fn merge(self, patch: RedirectFields) -> Self {
        Self {
            url: patch.url.or(self.url),
            permanent: patch.permanent.or(self.permanent),
            allow_regex: patch.allow_regex.or(self.allow_regex),
        }
    }

    /// Checks that the fields describe a storable redirect.
    ///
    /// Flag types are enforced by the type system, so this only has to reject a
    /// missing or blank `url` and one that is not an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] describing the first violation.
    pub fn validate(&self) -> Result<(), AppError> {
        let url = match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => {
                return Err(AppError::bad_request(
                    "Redirect must have a URL.",
                    json!({ "field": "url" }),
                ));
            }
        };

        parse_absolute_url(url)?;
        Ok(())
    }

    /// Whether the record marks its key as a pattern once defaults are applied.
    pub fn is_pattern(&self) -> bool {
        self.allow_regex.unwrap_or(DEFAULT_ALLOW_REGEX)
    }
}

/// A fully defaulted redirect record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub url: String,
    pub permanent: bool,
    pub allow_regex: bool,
}

impl Redirect {
    /// Presents a stored record with defaults filled in.
    ///
    /// Read-side only: nothing is validated, so a record that predates a rule
    /// still reads back in full shape.
    pub fn from_stored(fields: RedirectFields) -> Self {
        let fields = fields.normalize();

        Self {
            url: fields.url.unwrap_or_default(),
            permanent: fields.permanent.unwrap_or(DEFAULT_PERMANENT),
            allow_regex: fields.allow_regex.unwrap_or(DEFAULT_ALLOW_REGEX),
        }
    }
}

impl TryFrom<RedirectFields> for Redirect {
    type Error = AppError;

    /// Validates and normalizes `fields` into a complete record.
    fn try_from(fields: RedirectFields) -> Result<Self, Self::Error> {
        fields.validate()?;
        let fields = fields.normalize();

        Ok(Self {
            url: fields.url.unwrap_or_default(),
            permanent: fields.permanent.unwrap_or(DEFAULT_PERMANENT),
            allow_regex: fields.allow_regex.unwrap_or(DEFAULT_ALLOW_REGEX),
        })
    }
}

impl From<Redirect> for RedirectFields {
    fn from(redirect: Redirect) -> Self {
        Self {
            url: Some(redirect.url),
            permanent: Some(redirect.permanent),
            allow_regex: Some(redirect.allow_regex),
        }
    }
}

/// A redirect together with the key it is stored under.
///
/// Returned by listings and by resolution, where `key` is the matched key: the
/// requested slug for exact hits, or the stored pattern for pattern hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectEntry {
    pub key: String,
    #[serde(flatten)]
    pub redirect: Redirect,
}

impl RedirectEntry {
    pub fn new(key: impl Into<String>, redirect: Redirect) -> Self {
        Self {
            key: key.into(),
            redirect,
        }
    }
}

/// Parses `input` as an absolute URL.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when `input` is relative or malformed.
pub fn parse_absolute_url(input: &str) -> Result<Url, AppError> {
    Url::parse(input).map_err(|e| {
        AppError::bad_request(
            "Redirect URL must be a valid URL.",
            json!({ "url": input, "reason": e.to_string() }),
        )
    })
}
