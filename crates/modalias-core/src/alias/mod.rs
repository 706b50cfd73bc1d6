//! Alias engine.
//!
//! - `table`: sorted alias storage; iteration order is match priority.
//! - `matcher`: boundary-aware prefix matching and target substitution.
//! - `resolver`: first-match resolution over a table.
//! - `file`: loading alias tables from tsconfig/jsconfig/modalias JSON.

mod file;
mod matcher;
mod resolver;
mod table;

pub use file::{find_alias_config, load_alias_file, parse_alias_config, CONFIG_FILES};
pub use matcher::{has_alias, normalize_target, remainder, rewrite, strip_wildcard, WILDCARD};
pub use resolver::{AliasMatch, AliasResolver};
pub use table::{AliasMap, AliasTable};
