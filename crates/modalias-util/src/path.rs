//! Lexical path helpers for module specifiers.
//!
//! Specifiers always use `/` as separator regardless of the host platform,
//! so these helpers work on strings rather than `std::path::Path` (which
//! would drop trailing separators and switch to `\` on Windows).

/// Separator used in module specifiers.
pub const SEPARATOR: char = '/';

/// Normalize a specifier path lexically.
///
/// - Collapses repeated separators.
/// - Removes `.` segments.
/// - Resolves `..` against the preceding segment. Leading `..` segments are
///   kept for relative paths and dropped for absolute ones.
/// - Preserves a leading `/` and a trailing `/`.
///
/// An empty input (or one that normalizes to nothing) yields `"."`.
#[must_use]
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with(SEPARATOR);
    let trailing = path.ends_with(SEPARATOR);

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut out = String::with_capacity(path.len());
    if absolute {
        out.push(SEPARATOR);
    }
    out.push_str(&segments.join("/"));

    if out.is_empty() {
        out.push('.');
    }
    if trailing && !out.ends_with(SEPARATOR) {
        out.push(SEPARATOR);
    }
    out
}

/// Join specifier fragments with `/` and normalize the result.
///
/// Empty fragments are skipped. If every fragment is empty the result is `"."`.
#[must_use]
pub fn join<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    normalize(&joined)
}

/// Returns true if the specifier is relative (`./`, `../`, `.` or `..`).
#[must_use]
pub fn is_relative(spec: &str) -> bool {
    spec == "." || spec == ".." || spec.starts_with("./") || spec.starts_with("../")
}
