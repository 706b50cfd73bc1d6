//! First-match alias resolution.

use super::matcher::{has_alias, rewrite};
use super::table::{AliasMap, AliasTable};
use crate::error::Error;
use serde::Serialize;
use std::borrow::Cow;

/// Which alias covered a request and what it was rewritten to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasMatch {
    /// Verbatim alias key as registered.
    pub key: String,
    /// Target registered for the key.
    pub target: String,
    /// The request after substitution.
    pub rewritten: String,
}

/// Resolves requests against an [`AliasTable`].
///
/// Aliases are tried in table order (ascending key order) and the first one
/// that covers the request wins. Later aliases are never consulted, even if
/// they are a longer, more specific prefix: with `@a/*` and `@a/b/*` both
/// registered, `@a/b/c` is rewritten by `@a/*`.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    table: AliasTable,
}

impl AliasResolver {
    /// Create a pass-through resolver with no aliases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver pre-populated with `aliases`.
    pub fn with_aliases<I, K, V>(aliases: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Ok(Self {
            table: AliasTable::from_map(aliases)?,
        })
    }

    #[must_use]
    pub fn table(&self) -> &AliasTable {
        &self.table
    }

    /// Snapshot of the registered aliases.
    #[must_use]
    pub fn aliases(&self) -> AliasMap {
        self.table.to_map()
    }

    /// Register one alias, replacing any existing target for the same key.
    pub fn register(&mut self, key: impl Into<String>, target: impl Into<String>) -> Result<(), Error> {
        self.table.insert(key, target).map(|_| ())
    }

    /// Register every alias in `aliases`.
    pub fn register_all<I, K, V>(&mut self, aliases: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.table.merge(aliases)
    }

    /// Remove an alias by its verbatim key. Returns true if it was registered.
    pub fn unregister(&mut self, key: &str) -> bool {
        self.table.remove(key).is_some()
    }

    /// Remove every alias, returning to pass-through behaviour.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn first_match(&self, request: &str) -> Option<(&str, &str)> {
        self.table.iter().find(|(key, _)| has_alias(request, key))
    }

    /// Rewrite `request` through the first matching alias.
    ///
    /// Unmatched requests are returned borrowed and unchanged.
    #[must_use]
    pub fn resolve<'a>(&self, request: &'a str) -> Cow<'a, str> {
        match self.first_match(request) {
            Some((key, target)) => rewrite(request, key, target),
            None => Cow::Borrowed(request),
        }
    }

    /// Like [`resolve`](Self::resolve), but reports which alias matched.
    #[must_use]
    pub fn lookup(&self, request: &str) -> Option<AliasMatch> {
        self.first_match(request).map(|(key, target)| AliasMatch {
            key: key.to_string(),
            target: target.to_string(),
            rewritten: rewrite(request, key, target).into_owned(),
        })
    }
}
