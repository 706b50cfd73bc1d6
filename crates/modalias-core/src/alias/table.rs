//! Sorted alias storage.

use super::matcher::strip_wildcard;
use crate::error::Error;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Plain alias mapping (key → target), as read from configuration.
pub type AliasMap = BTreeMap<String, String>;

/// Alias table keyed by the verbatim alias key.
///
/// Iteration is in ascending byte order of the key, and that order is the
/// match priority used by [`AliasResolver`](super::AliasResolver): the first
/// alias in table order that matches a request wins. When two aliases share
/// a prefix (`@a` and `@a/b`) the shorter one sorts first, so it shadows the
/// longer one for requests both could match.
///
/// Keys are stored verbatim; `@app` and `@app/*` are distinct entries.
/// Re-inserting an existing key replaces its target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: AliasMap,
}

impl AliasTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from an initial mapping.
    pub fn from_map<I, K, V>(aliases: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new();
        table.merge(aliases)?;
        Ok(table)
    }

    /// Insert or replace an alias. Returns the previous target, if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<Option<String>, Error> {
        let key = key.into();
        validate_key(&key)?;
        Ok(self.entries.insert(key, target.into()))
    }

    /// Merge a mapping into the table.
    ///
    /// All keys are validated before any is inserted, so a bad key leaves the
    /// table untouched.
    pub fn merge<I, K, V>(&mut self, aliases: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pending: Vec<(String, String)> = aliases
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        for (key, _) in &pending {
            validate_key(key)?;
        }

        self.entries.extend(pending);
        Ok(())
    }

    /// Look up the target registered for a verbatim key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an alias. Returns the removed target, if the key was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, target)` pairs in match-priority order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Snapshot of the table as a plain mapping.
    #[must_use]
    pub fn to_map(&self) -> AliasMap {
        self.entries.clone()
    }
}

/// Priority-ordered iterator over an [`AliasTable`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a AliasTable {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate_key(key: &str) -> Result<(), Error> {
    if key.is_empty() {
        return Err(Error::invalid_alias(key, "key is empty"));
    }
    if strip_wildcard(key).is_empty() {
        return Err(Error::invalid_alias(key, "key is only a wildcard marker"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_is_sorted_by_key() {
        let table = AliasTable::from_map([
            ("@z", "z"),
            ("@app/sub", "sub"),
            ("@app", "app"),
            ("@a/*", "a"),
        ])
        .unwrap();

        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["@a/*", "@app", "@app/sub", "@z"]);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut table = AliasTable::new();
        assert_eq!(table.insert("@app", "./one").unwrap(), None);
        assert_eq!(
            table.insert("@app", "./two").unwrap(),
            Some("./one".to_string())
        );
        assert_eq!(table.get("@app"), Some("./two"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_keys_are_stored_verbatim() {
        let table = AliasTable::from_map([("@app", "a"), ("@app/*", "b")]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("@app"), Some("a"));
        assert_eq!(table.get("@app/*"), Some("b"));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut table = AliasTable::from_map([("@a", "x"), ("@b", "y")]).unwrap();

        assert_eq!(table.remove("@a"), Some("x".to_string()));
        assert_eq!(table.remove("@a"), None);
        assert!(!table.contains("@a"));

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let mut table = AliasTable::new();
        assert!(matches!(
            table.insert("", "x"),
            Err(Error::InvalidAlias { .. })
        ));
        let err = table.insert("/*", "x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid alias `/*`: key is only a wildcard marker"
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_merge_is_all_or_nothing() {
        let mut table = AliasTable::from_map([("@keep", "k")]).unwrap();
        let result = table.merge([("@new", "n"), ("", "bad")]);

        assert!(result.is_err());
        assert_eq!(table.len(), 1);
        assert!(!table.contains("@new"));
    }

    #[test]
    fn test_merge_overrides_existing() {
        let mut table = AliasTable::from_map([("@a", "old")]).unwrap();
        table.merge([("@a", "new"), ("@b", "b")]).unwrap();

        assert_eq!(table.get("@a"), Some("new"));
        assert_eq!(table.get("@b"), Some("b"));
    }

    #[test]
    fn test_empty_target_allowed() {
        let table = AliasTable::from_map([("@root", "")]).unwrap();
        assert_eq!(table.get("@root"), Some(""));
    }
}
