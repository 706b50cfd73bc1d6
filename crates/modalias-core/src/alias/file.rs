//! Alias tables from configuration files.
//!
//! ## Supported formats
//!
//! tsconfig/jsconfig `paths`:
//!
//! ```json
//! {
//!   // comments and trailing commas are tolerated
//!   "compilerOptions": {
//!     "baseUrl": ".",
//!     "paths": { "@app/*": ["./src/*"] },
//!   }
//! }
//! ```
//!
//! An `aliases` object, or a flat object of string targets:
//!
//! ```json
//! { "aliases": { "@app/*": "./src" } }
//! { "@app/*": "./src" }
//! ```

use super::table::AliasMap;
use crate::error::Error;
use modalias_util::fs::{find_upward, read_to_string_lossy};
use modalias_util::path;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Config file names, in lookup priority order within a directory.
pub const CONFIG_FILES: &[&str] = &["tsconfig.json", "jsconfig.json", "modalias.json"];

/// Walk up from `start` to the nearest alias config file.
#[must_use]
pub fn find_alias_config(start: &Path) -> Option<PathBuf> {
    find_upward(start, CONFIG_FILES)
}

/// Read and parse an alias config file.
pub fn load_alias_file(path: &Path) -> Result<AliasMap, Error> {
    let source = read_to_string_lossy(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let cleaned = strip_trailing_commas(&strip_comments(&source));
    let value: Value = serde_json::from_str(&cleaned).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    parse_alias_config(&value, path)
}

/// Extract an alias table from already-parsed JSON.
///
/// `path` is only used for error reporting.
pub fn parse_alias_config(value: &Value, path: &Path) -> Result<AliasMap, Error> {
    let invalid = |message: String| Error::ConfigInvalid {
        path: path.to_path_buf(),
        message,
    };

    let Some(root) = value.as_object() else {
        return Err(invalid("expected a JSON object".to_string()));
    };

    if let Some(compiler) = root.get("compilerOptions") {
        let compiler = compiler
            .as_object()
            .ok_or_else(|| invalid("`compilerOptions` must be an object".to_string()))?;
        return parse_compiler_paths(compiler).map_err(invalid);
    }

    if let Some(aliases) = root.get("aliases") {
        let aliases = aliases
            .as_object()
            .ok_or_else(|| invalid("`aliases` must be an object".to_string()))?;
        return parse_flat(aliases).map_err(invalid);
    }

    parse_flat(root).map_err(invalid)
}

fn parse_flat(obj: &Map<String, Value>) -> Result<AliasMap, String> {
    let mut aliases = AliasMap::new();
    for (key, value) in obj {
        let target = value
            .as_str()
            .ok_or_else(|| format!("target for `{key}` must be a string"))?;
        aliases.insert(key.clone(), target.to_string());
    }
    Ok(aliases)
}

fn parse_compiler_paths(compiler: &Map<String, Value>) -> Result<AliasMap, String> {
    let base_url = match compiler.get("baseUrl") {
        None => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => return Err("`baseUrl` must be a string".to_string()),
    };

    let Some(paths) = compiler.get("paths") else {
        return Ok(AliasMap::new());
    };
    let paths = paths
        .as_object()
        .ok_or_else(|| "`paths` must be an object".to_string())?;

    let mut aliases = AliasMap::new();
    for (key, value) in paths {
        // Only the first candidate is used; fallbacks need existence checks.
        let target = match value {
            Value::String(s) => s.as_str(),
            Value::Array(candidates) => candidates
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| format!("paths for `{key}` must start with a string"))?,
            _ => return Err(format!("paths for `{key}` must be a string or array")),
        };
        aliases.insert(key.clone(), apply_base_url(base_url, target));
    }
    Ok(aliases)
}

/// Resolve a `paths` target against `baseUrl`.
///
/// Targets under a base URL are relative to the config file, so the result is
/// marked relative with `./` unless it is absolute or climbs out with `..`.
fn apply_base_url(base_url: Option<&str>, target: &str) -> String {
    let Some(base) = base_url else {
        return target.to_string();
    };
    if target.starts_with(path::SEPARATOR) {
        return target.to_string();
    }

    let joined = path::join([base, target]);
    if joined.starts_with(path::SEPARATOR) || joined == ".." || joined.starts_with("../") {
        joined
    } else if joined == "." {
        "./".to_string()
    } else {
        format!("./{joined}")
    }
}

/// Remove `//` and `/* */` comments outside of strings.
fn strip_comments(source: &str) -> String {
    let mut result = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match (c, chars.peek()) {
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    if next == '\n' {
                        result.push('\n');
                    }
                    prev = next;
                }
            }
            _ => {
                if c == '"' {
                    in_string = true;
                }
                result.push(c);
            }
        }
    }

    result
}

/// Remove commas that directly precede `}` or `]` (ignoring whitespace).
fn strip_trailing_commas(source: &str) -> String {
    let mut result = String::with_capacity(source.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut pending_comma: Option<String> = None;

    for c in source.chars() {
        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if let Some(buffer) = pending_comma.as_mut() {
            if c.is_whitespace() {
                buffer.push(c);
                continue;
            }
            let buffer = pending_comma.take().unwrap_or_default();
            if c == '}' || c == ']' {
                // Drop the comma, keep the whitespace.
                result.push_str(&buffer[1..]);
            } else {
                result.push_str(&buffer);
            }
        }

        match c {
            ',' => pending_comma = Some(String::from(",")),
            '"' => {
                in_string = true;
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    if let Some(buffer) = pending_comma {
        result.push_str(&buffer);
    }
    result
}
