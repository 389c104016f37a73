//! Pattern keys and capture-group URL rewriting.
//!
//! Pattern records store a regular expression as their key and a URL template
//! that may reference capture groups as `$1`, `$2`, ... (`$0` is the whole
//! match). Patterns are compiled with the `regex` crate, whose matching time is
//! linear in the input, under a fixed compiled-size limit.

use std::sync::LazyLock;

use regex::{Captures, Regex, RegexBuilder};

use crate::domain::entities::parse_absolute_url;
use crate::error::AppError;

/// Upper bound on the compiled size of a stored pattern.
pub const PATTERN_SIZE_LIMIT: usize = 1 << 20;

static GROUP_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([0-9]+)").expect("group reference pattern is valid"));

/// Compiles a stored key as a regular expression.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the pattern does not compile or exceeds
/// [`PATTERN_SIZE_LIMIT`].
pub fn compile_pattern(pattern: &str) -> Result<Regex, AppError> {
    Ok(RegexBuilder::new(pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()?)
}

/// Substitutes `$N` tokens in `template` with the capture groups of `pattern`
/// matched against `requested`, then checks the result is an absolute URL.
///
/// A group that did not participate, an index past the last group, or an input
/// the pattern does not match all substitute the empty string.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the pattern does not compile or the
/// rewritten string is not an absolute URL.
pub fn apply_regex(pattern: &str, template: &str, requested: &str) -> Result<String, AppError> {
    let regex = compile_pattern(pattern)?;
    let captures = regex.captures(requested);

    let rewritten = GROUP_REF.replace_all(template, |token: &Captures<'_>| {
        let group = token[1].parse::<usize>().ok();
        match (&captures, group) {
            (Some(caps), Some(index)) => caps
                .get(index)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            _ => String::new(),
        }
    });

    parse_absolute_url(&rewritten)?;
    Ok(rewritten.into_owned())
}
