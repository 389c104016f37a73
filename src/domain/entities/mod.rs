//! Core domain entities.
//!
//! - [`RedirectFields`] - caller supplied or stored redirect, every field optional
//! - [`Redirect`] - fully defaulted redirect record
//! - [`RedirectEntry`] - a redirect paired with its (matched) key
//!
//! Defaults live in [`redirect::DEFAULT_PERMANENT`] and
//! [`redirect::DEFAULT_ALLOW_REGEX`].

pub mod redirect;

pub use redirect::{Redirect, RedirectEntry, RedirectFields, parse_absolute_url};
