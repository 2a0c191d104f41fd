//! Alias table for access paths.
//!
//! An [`AliasTable`] records that some access paths are other names for the
//! location of another path. It behaves like a union-find structure with full
//! path compression: every registered alias points directly at its canonical
//! path, and a canonical path is never itself registered as an alias.
//!
//! ```text
//! create(o, a)   a → o
//! create(a, b)   a → o, b → o        (b resolves through a to o)
//! create(p, o)   a → p, b → p, o → p (existing links are redirected)
//! ```
//!
//! Keeping the table flat makes resolution a single lookup, so it can never
//! loop. Registrations that would make a path resolve to itself are rejected.

use std::collections::{hash_map, HashMap};

use log::debug;
use thiserror::Error;

use crate::access_path::AccessPath;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AliasError {
    /// The alias would resolve back to itself.
    #[error("cannot alias {alias} to {original}: {original} already resolves to {alias}")]
    Cycle { alias: AccessPath, original: AccessPath },
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct AliasTable {
    links: HashMap<AccessPath, AccessPath>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Iterate over `(alias, canonical)` pairs.
    pub fn iter(&self) -> hash_map::Iter<'_, AccessPath, AccessPath> {
        self.links.iter()
    }

    pub fn contains(&self, alias: &AccessPath) -> bool {
        self.links.contains_key(alias)
    }

    /// Canonical path for `path`: its target if it is a registered alias, itself otherwise.
    pub fn resolve<'a>(&'a self, path: &'a AccessPath) -> &'a AccessPath {
        match self.links.get(path) {
            Some(target) => {
                debug_assert!(!self.links.contains_key(target), "alias table is not flat at {}", target);
                target
            }
            None => path,
        }
    }

    /// Register `alias` as another name for `original`.
    ///
    /// Returns the canonical path both names now resolve to. An existing
    /// registration for `alias` is replaced, and aliases that previously
    /// resolved to `alias` are redirected to the new canonical path.
    pub fn insert(&mut self, original: &AccessPath, alias: AccessPath) -> Result<AccessPath, AliasError> {
        let canonical = self.resolve(original).clone();
        if canonical == alias {
            return Err(AliasError::Cycle {
                alias,
                original: original.clone(),
            });
        }
        for target in self.links.values_mut() {
            if *target == alias {
                debug!("redirecting alias of {} to {}", alias, canonical);
                *target = canonical.clone();
            }
        }
        self.links.insert(alias, canonical.clone());
        Ok(canonical)
    }

    /// Forget the registration of `alias`. Other aliases are unaffected.
    pub fn remove(&mut self, alias: &AccessPath) -> Option<AccessPath> {
        self.links.remove(alias)
    }

    /// Whether both tables register `alias` with the same canonical path.
    pub fn agrees_on(&self, other: &Self, alias: &AccessPath) -> bool {
        match (self.links.get(alias), other.links.get(alias)) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => false,
        }
    }

    /// Aliases of `self` on which `other` does not agree.
    pub fn disagreeing(&self, other: &Self) -> Vec<AccessPath> {
        self.links
            .keys()
            .filter(|alias| !self.agrees_on(other, alias))
            .cloned()
            .collect()
    }

    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&AccessPath, &AccessPath) -> bool,
    {
        self.links.retain(|alias, target| f(alias, target));
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn path(name: &str) -> AccessPath {
        AccessPath::variable(name)
    }

    #[test]
    fn test_resolve_chain_is_compressed() {
        let mut table = AliasTable::new();
        table.insert(&path("o"), path("a")).unwrap();
        table.insert(&path("a"), path("b")).unwrap();
        assert_eq!(table.resolve(&path("b")), &path("o"));
        assert_eq!(table.resolve(&path("o")), &path("o"));
        assert_eq!(table.resolve(&path("z")), &path("z"));
    }

    #[test]
    fn test_insert_redirects_existing_links() {
        let mut table = AliasTable::new();
        table.insert(&path("o"), path("a")).unwrap();
        let canonical = table.insert(&path("p"), path("o")).unwrap();
        assert_eq!(canonical, path("p"));
        assert_eq!(table.resolve(&path("a")), &path("p"));
        assert_eq!(table.resolve(&path("o")), &path("p"));
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut table = AliasTable::new();
        assert!(matches!(
            table.insert(&path("x"), path("x")),
            Err(AliasError::Cycle { .. })
        ));

        table.insert(&path("o"), path("a")).unwrap();
        let err = table.insert(&path("a"), path("o")).unwrap_err();
        assert_eq!(
            err,
            AliasError::Cycle {
                alias: path("o"),
                original: path("a"),
            }
        );
        assert_eq!(err.to_string(), "cannot alias o to a: a already resolves to o");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_only_drops_registration() {
        let mut table = AliasTable::new();
        table.insert(&path("o"), path("a")).unwrap();
        table.insert(&path("o"), path("b")).unwrap();
        assert_eq!(table.remove(&path("a")), Some(path("o")));
        assert_eq!(table.resolve(&path("a")), &path("a"));
        assert_eq!(table.resolve(&path("b")), &path("o"));
    }

    #[test]
    fn test_agreement() {
        let mut left = AliasTable::new();
        left.insert(&path("o"), path("a")).unwrap();
        left.insert(&path("o"), path("b")).unwrap();
        let mut right = AliasTable::new();
        right.insert(&path("o"), path("a")).unwrap();
        right.insert(&path("p"), path("b")).unwrap();

        assert!(left.agrees_on(&right, &path("a")));
        assert!(!left.agrees_on(&right, &path("b")));
        assert_eq!(left.disagreeing(&right), vec![path("b")]);
    }
}
