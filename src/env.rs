//! Alias-aware maps over access paths.
//!
//! [`AccessPathMapDomain`] is a [`MapDomain`] keyed by [`AccessPath`] with an
//! [`AliasTable`] layered on top: every read, write and removal first resolves
//! the path to its canonical name, so two aliased paths share one value slot.
//!
//! Aliases are *must* facts. At control-flow merges only the aliases both
//! sides agree on survive; an alias dropped by a merge is first materialized,
//! i.e. its name gets its own copy of the shared value, so no information is
//! lost for that name. A meet keeps the alias facts of both sides: when the
//! two sides give one name different locations, those locations are merged
//! into a single slot.
//!
//! Ordering and equality look at what every path reads and which paths share
//! a slot, not at which name an alias class uses as its canonical path.
//!
//! [`EnvironmentDomain`] is the common instantiation where absent paths read
//! as ⊤ ("nothing known"), with helpers for whole variables.

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::ops::{Deref, DerefMut};

use log::debug;

use crate::access_path::AccessPath;
use crate::alias::{AliasError, AliasTable};
use crate::domain::{AbstractDomain, AbstractValueKind};
use crate::map::MapDomain;

#[derive(Debug, Clone)]
pub struct AccessPathMapDomain<V> {
    map: MapDomain<AccessPath, V>,
    aliases: AliasTable,
}

impl<V: AbstractDomain> AccessPathMapDomain<V> {
    /// Empty map (⊥) reading absent paths as `default`.
    pub fn new(default: V) -> Self {
        Self {
            map: MapDomain::new(default),
            aliases: AliasTable::new(),
        }
    }

    /// Canonical path for `path`.
    pub fn resolve<'a>(&'a self, path: &'a AccessPath) -> &'a AccessPath {
        self.aliases.resolve(path)
    }

    pub fn get(&self, path: &AccessPath) -> V {
        self.map.get(self.resolve(path))
    }

    pub fn put(&mut self, path: &AccessPath, value: V) {
        let canonical = self.resolve(path).clone();
        self.map.put(canonical, value);
    }

    /// Modify the value of `path` in place.
    pub fn update<F>(&mut self, path: &AccessPath, f: F)
    where
        F: FnOnce(&mut V),
    {
        let canonical = self.resolve(path).clone();
        self.map.update(canonical, f);
    }

    /// Remove `path`.
    ///
    /// For a registered alias only the alias registration is dropped and the
    /// shared value is untouched. For any other path the slot is cleared and
    /// reads fall back to the default, for every name resolving to it.
    pub fn remove(&mut self, path: &AccessPath) {
        if self.aliases.remove(path).is_some() {
            debug!("remove: dropped alias {}", path);
            return;
        }
        self.map.remove(path);
    }

    /// Register `alias` as another name for the location of `original`.
    ///
    /// Any value previously stored under `alias` itself is discarded: the
    /// name now designates the original's slot.
    pub fn create_alias(&mut self, original: &AccessPath, alias: &AccessPath) -> Result<(), AliasError> {
        let canonical = self.aliases.insert(original, alias.clone())?;
        if self.map.remove(alias).is_some() {
            debug!("create_alias: value of {} replaced by the slot of {}", alias, canonical);
        }
        debug!("create_alias: {} -> {}", alias, canonical);
        Ok(())
    }

    /// Forget the alias registration of `alias`, returning its canonical path.
    pub fn remove_alias(&mut self, alias: &AccessPath) -> Option<AccessPath> {
        self.aliases.remove(alias)
    }

    pub fn is_alias(&self, path: &AccessPath) -> bool {
        self.aliases.contains(path)
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Underlying map of canonical slots.
    pub fn slots(&self) -> &MapDomain<AccessPath, V> {
        &self.map
    }

    /// Number of stored slots.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty() && self.aliases.is_empty()
    }

    /// Rewrite every stored value in place.
    pub fn transform<F>(&mut self, f: F)
    where
        F: FnMut(&AccessPath, &mut V),
    {
        self.map.transform(f);
    }

    /// Keep only the slots satisfying `predicate`.
    pub fn filter<P>(&mut self, predicate: P)
    where
        P: FnMut(&AccessPath, &V) -> bool,
    {
        self.map.filter(predicate);
    }

    /// Drop the given alias registrations, giving each name its own copy of the shared value.
    fn materialize(&mut self, aliases: &[AccessPath]) {
        let values: Vec<(AccessPath, Option<V>)> = aliases
            .iter()
            .map(|alias| (alias.clone(), self.map.get_stored(self.aliases.resolve(alias)).cloned()))
            .collect();
        for (alias, value) in values {
            debug!("materializing alias {}", alias);
            self.aliases.remove(&alias);
            if let Some(value) = value {
                self.map.put(alias, value);
            }
        }
    }

    /// `self` with every alias `other` does not agree on materialized.
    fn aligned_to(&self, other: &Self) -> Cow<'_, Self> {
        let dropped = self.aliases.disagreeing(&other.aliases);
        if dropped.is_empty() {
            Cow::Borrowed(self)
        } else {
            let mut aligned = self.clone();
            aligned.materialize(&dropped);
            Cow::Owned(aligned)
        }
    }

    /// Keep only the aliases both sides agree on, materializing the rest on
    /// both sides. Returns `other` in aligned form.
    fn align_with<'a>(&mut self, other: &'a Self) -> Cow<'a, Self> {
        let theirs = other.aligned_to(self);
        let dropped = self.aliases.disagreeing(&other.aliases);
        self.materialize(&dropped);
        theirs
    }

    fn merge_upward<F>(&mut self, other: &Self, op: F)
    where
        F: Fn(&mut MapDomain<AccessPath, V>, &MapDomain<AccessPath, V>),
    {
        if other.is_bot() {
            return;
        }
        if self.is_bot() {
            op(&mut self.map, &other.map);
            self.aliases = other.aliases.clone();
            return;
        }
        let theirs = self.align_with(other);
        op(&mut self.map, &theirs.map);
    }

    // Union of alias facts. When `alias` and `target` resolve to different
    // slots here, the two slots are merged and their values met.
    fn adopt_aliases(&mut self, table: &AliasTable) {
        for (alias, target) in table.iter() {
            let ours = self.aliases.resolve(alias).clone();
            let theirs = self.aliases.resolve(target).clone();
            if ours == theirs {
                continue;
            }
            let (keep, merged) = if self.aliases.contains(alias) {
                (ours, theirs)
            } else {
                (theirs, ours)
            };
            match self.aliases.insert(&keep, merged.clone()) {
                Ok(canonical) => {
                    debug!("meet: {} now shares the slot of {}", merged, canonical);
                    if let Some(value) = self.map.remove(&merged) {
                        self.map.update(canonical, |slot| slot.meet_with(&value));
                    }
                }
                Err(err) => debug!("meet: skipping alias: {}", err),
            }
        }
    }

    /// Whether every alias fact of `other` also holds here.
    fn holds_aliases_of(&self, other: &Self) -> bool {
        other
            .aliases
            .iter()
            .all(|(alias, target)| self.resolve(alias) == self.resolve(target))
    }

    /// Slots with every alias name stored explicitly.
    fn flattened(&self) -> Cow<'_, MapDomain<AccessPath, V>> {
        if self.aliases.is_empty() {
            return Cow::Borrowed(&self.map);
        }
        let mut map = self.map.clone();
        for (alias, target) in self.aliases.iter() {
            if let Some(value) = self.map.get_stored(target) {
                map.put(alias.clone(), value.copy_of());
            }
        }
        Cow::Owned(map)
    }

    // Values stored under names that are aliases here belong to their canonical slot.
    fn fold_alias_slots(&mut self) {
        let stray: Vec<(AccessPath, V)> = self
            .aliases
            .iter()
            .filter_map(|(alias, target)| self.map.get_stored(alias).map(|v| (target.clone(), v.copy_of())))
            .collect();
        for (alias, _) in self.aliases.iter() {
            self.map.remove(alias);
        }
        for (canonical, value) in stray {
            self.map.update(canonical, |slot| slot.meet_with(&value));
        }
    }
}

impl<V: AbstractDomain> AbstractDomain for AccessPathMapDomain<V> {
    fn bot() -> Self {
        Self::new(V::top())
    }

    fn top() -> Self {
        Self {
            map: MapDomain::top(),
            aliases: AliasTable::new(),
        }
    }

    fn kind(&self) -> AbstractValueKind {
        if self.aliases.is_empty() {
            self.map.kind()
        } else {
            AbstractValueKind::Val
        }
    }

    fn set_to_bot(&mut self) {
        self.map.set_to_bot();
        self.aliases.clear();
    }

    fn set_to_top(&mut self) {
        self.map.set_to_top();
        self.aliases.clear();
    }

    fn leq(&self, other: &Self) -> bool {
        if self.is_bot() {
            return true;
        }
        if other.is_bot() {
            return false;
        }
        self.holds_aliases_of(other) && self.flattened().leq(&other.flattened())
    }

    fn join_with(&mut self, other: &Self) {
        self.merge_upward(other, MapDomain::join_with);
    }

    fn meet_with(&mut self, other: &Self) {
        if self.is_bot() {
            return;
        }
        if other.is_bot() {
            self.set_to_bot();
            return;
        }
        self.adopt_aliases(&other.aliases);
        self.map.meet_with(&other.map);
        self.fold_alias_slots();
    }

    fn widen_with(&mut self, other: &Self) {
        self.merge_upward(other, MapDomain::widen_with);
    }

    fn narrow_with(&mut self, other: &Self) {
        if self.is_bot() {
            return;
        }
        if other.is_bot() {
            self.set_to_bot();
            return;
        }
        let theirs = self.align_with(other);
        self.map.narrow_with(&theirs.map);
    }
}

impl<V: AbstractDomain> PartialEq for AccessPathMapDomain<V> {
    fn eq(&self, other: &Self) -> bool {
        self.holds_aliases_of(other) && other.holds_aliases_of(self) && self.flattened() == other.flattened()
    }
}

impl<V: Display> Display for AccessPathMapDomain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.map)?;
        if !self.aliases.is_empty() {
            let mut links: Vec<String> = self.aliases.iter().map(|(a, t)| format!("{} → {}", a, t)).collect();
            links.sort();
            write!(f, " aliases {{{}}}", links.join(", "))?;
        }
        Ok(())
    }
}

/// Environment of access paths where absent paths read as ⊤.
#[derive(Debug, Clone)]
pub struct EnvironmentDomain<V>(AccessPathMapDomain<V>);

impl<V: AbstractDomain> PartialEq for EnvironmentDomain<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<V: AbstractDomain> EnvironmentDomain<V> {
    /// Empty environment (⊥).
    pub fn new() -> Self {
        Self(AccessPathMapDomain::new(V::top()))
    }

    pub fn get_variable(&self, name: &str) -> V {
        self.0.get(&AccessPath::variable(name))
    }

    pub fn put_variable(&mut self, name: &str, value: V) {
        self.0.put(&AccessPath::variable(name), value);
    }

    /// Forget everything about variable `name`: every slot rooted at it, and
    /// every alias naming or targeting a path rooted at it.
    pub fn forget_variable(&mut self, name: &str) {
        debug!("forget_variable({})", name);
        self.0.aliases.retain(|alias, target| !alias.is_rooted_at(name) && !target.is_rooted_at(name));
        self.0.map.filter(|path, _| !path.is_rooted_at(name));
    }

    pub fn into_inner(self) -> AccessPathMapDomain<V> {
        self.0
    }
}

impl<V: AbstractDomain> Default for EnvironmentDomain<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Deref for EnvironmentDomain<V> {
    type Target = AccessPathMapDomain<V>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<V> DerefMut for EnvironmentDomain<V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<V: AbstractDomain> AbstractDomain for EnvironmentDomain<V> {
    fn bot() -> Self {
        Self::new()
    }

    fn top() -> Self {
        Self(AccessPathMapDomain::top())
    }

    fn kind(&self) -> AbstractValueKind {
        self.0.kind()
    }

    fn set_to_bot(&mut self) {
        self.0.set_to_bot();
    }

    fn set_to_top(&mut self) {
        self.0.set_to_top();
    }

    fn leq(&self, other: &Self) -> bool {
        self.0.leq(&other.0)
    }

    fn join_with(&mut self, other: &Self) {
        self.0.join_with(&other.0);
    }

    fn meet_with(&mut self, other: &Self) {
        self.0.meet_with(&other.0);
    }

    fn widen_with(&mut self, other: &Self) {
        self.0.widen_with(&other.0);
    }

    fn narrow_with(&mut self, other: &Self) {
        self.0.narrow_with(&other.0);
    }
}

impl<V: Display> Display for EnvironmentDomain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
