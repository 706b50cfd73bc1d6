//! Alias matching and request rewriting.
//!
//! A request is covered by an alias when it starts with the alias key (the
//! trailing `/*` marker removed) and the match ends on a boundary: either the
//! end of the request or a `/`. So `@app` covers `@app` and `@app/x` but not
//! `@application`.

use modalias_util::path;
use std::borrow::Cow;

/// Trailing marker meaning "this alias and any sub-path".
pub const WILDCARD: &str = "/*";

/// Remove a trailing [`WILDCARD`] marker, if present.
#[must_use]
pub fn strip_wildcard(s: &str) -> &str {
    s.strip_suffix(WILDCARD).unwrap_or(s)
}

/// Return the part of `request` after `alias_key`, if the alias covers it.
///
/// The remainder is empty for an exact match and otherwise starts with `/`.
#[must_use]
pub fn remainder<'a>(request: &'a str, alias_key: &str) -> Option<&'a str> {
    let alias = strip_wildcard(alias_key);
    if request.is_empty() || alias.is_empty() {
        return None;
    }

    request
        .strip_prefix(alias)
        .filter(|rest| rest.is_empty() || rest.starts_with(path::SEPARATOR))
}

/// Returns true if `alias_key` covers `request` on a path boundary.
#[must_use]
pub fn has_alias(request: &str, alias_key: &str) -> bool {
    remainder(request, alias_key).is_some()
}

/// Target with the wildcard marker and trailing separators removed.
///
/// A root target (`/`) stays `/` rather than collapsing to nothing.
#[must_use]
pub fn normalize_target(target: &str) -> &str {
    let stripped = strip_wildcard(target);
    let trimmed = stripped.trim_end_matches(path::SEPARATOR);
    if trimmed.is_empty() && stripped.starts_with(path::SEPARATOR) {
        "/"
    } else {
        trimmed
    }
}

/// Substitute `target` for the `alias_key` prefix of `request`.
///
/// Returns `request` untouched (borrowed) when the alias does not cover it.
/// Otherwise the target and the remainder are joined and normalized, and a
/// leading `./` on the target is kept so the host loader still treats the
/// result as relative.
#[must_use]
pub fn rewrite<'a>(request: &'a str, alias_key: &str, target: &str) -> Cow<'a, str> {
    let Some(rest) = remainder(request, alias_key) else {
        return Cow::Borrowed(request);
    };

    // Must be read from the raw target: normalization drops the `./`.
    let keep_dot_prefix = target.starts_with("./");
    let joined = path::join([normalize_target(target), rest]);

    if keep_dot_prefix {
        Cow::Owned(format!("./{joined}"))
    } else {
        Cow::Owned(joined)
    }
}
