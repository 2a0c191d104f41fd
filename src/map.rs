//! Pointwise map domain.
//!
//! A [`MapDomain`] maps keys to elements of a value domain `V`. Keys that are
//! not stored read as a *default* value, so lookups never fail. The default is
//! usually `V::top()` ("nothing known about this key"), which is what
//! [`MapDomain::bot`][AbstractDomain::bot] uses.
//!
//! Lattice operations work key by key:
//!
//! ```text
//! {x: [1,5]}          ⊔ {y: [3,7]}  =  {x: [1,5], y: [3,7]}   (carried through)
//! {x: [1,5]}          ⊔ {x: [3,7]}  =  {x: [1,7]}             (V::join_with)
//! {x: [1,5], y: [0,9]} ⊓ {x: [3,7]}  =  {x: [3,5], y: [0,9]}   (V::meet_with)
//! ```
//!
//! The empty map is ⊥. A map set to ⊤ reads every absent key as `V`'s top.

use std::collections::{hash_map, HashMap};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use log::trace;

use crate::domain::{AbstractDomain, AbstractValueKind};

#[derive(Debug, Clone, PartialEq)]
pub struct MapDomain<K, V>
where
    K: Eq + Hash,
{
    entries: HashMap<K, V>,
    default: V,
    is_top: bool,
}

fn absent_value<V: AbstractDomain>(default: &V, is_top: bool) -> V {
    let mut value = default.copy_of();
    if is_top {
        value.set_to_top();
    }
    value
}

impl<K, V> MapDomain<K, V>
where
    K: Clone + Debug + Eq + Hash,
    V: AbstractDomain,
{
    /// Empty map (⊥) reading absent keys as `default`.
    pub fn new(default: V) -> Self {
        Self {
            entries: HashMap::new(),
            default,
            is_top: false,
        }
    }

    pub fn from_map(entries: HashMap<K, V>, default: V) -> Self {
        Self {
            entries,
            default,
            is_top: false,
        }
    }

    /// Value for `key`: a copy of the stored value, or of the default when absent.
    pub fn get(&self, key: &K) -> V {
        match self.entries.get(key) {
            Some(value) => value.copy_of(),
            None => absent_value(&self.default, self.is_top),
        }
    }

    /// Stored value for `key`, without falling back to the default.
    pub fn get_stored(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    /// Modify the value for `key` in place, materializing the default first if absent.
    pub fn update<F>(&mut self, key: K, f: F)
    where
        F: FnOnce(&mut V),
    {
        let (default, is_top) = (&self.default, self.is_top);
        f(self.entries.entry(key).or_insert_with(|| absent_value(default, is_top)));
    }

    /// Drop the entry for `key`; afterwards `key` reads as the default.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn keys(&self) -> hash_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    pub fn default_value(&self) -> &V {
        &self.default
    }

    /// Rewrite every stored value in place.
    pub fn transform<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V),
    {
        for (key, value) in self.entries.iter_mut() {
            f(key, value);
        }
    }

    /// Keep only the entries satisfying `predicate`.
    pub fn filter<P>(&mut self, mut predicate: P)
    where
        P: FnMut(&K, &V) -> bool,
    {
        self.entries.retain(|key, value| predicate(key, value));
    }

    // Shared by join and widen: keys missing on one side are carried through,
    // unless that side reads every absent key as ⊤.
    fn merge_upward<F>(&mut self, other: &Self, op: F)
    where
        F: Fn(&mut V, &V),
    {
        if other.is_bot() {
            return;
        }
        if self.is_bot() {
            self.entries = other.entries.clone();
            self.is_top = other.is_top;
            return;
        }
        trace!("merging {} entries into {} entries", other.entries.len(), self.entries.len());
        if other.is_top {
            self.entries.retain(|key, _| other.entries.contains_key(key));
        }
        for (key, theirs) in &other.entries {
            match self.entries.get_mut(key) {
                Some(ours) => op(ours, theirs),
                None if self.is_top => {}
                None => {
                    self.entries.insert(key.clone(), theirs.copy_of());
                }
            }
        }
        self.is_top |= other.is_top;
    }
}

impl<K, V> AbstractDomain for MapDomain<K, V>
where
    K: Clone + Debug + Eq + Hash,
    V: AbstractDomain,
{
    fn bot() -> Self {
        Self::new(V::top())
    }

    fn top() -> Self {
        let mut map = Self::new(V::top());
        map.is_top = true;
        map
    }

    fn kind(&self) -> AbstractValueKind {
        if !self.entries.is_empty() {
            AbstractValueKind::Val
        } else if self.is_top {
            AbstractValueKind::Top
        } else {
            AbstractValueKind::Bot
        }
    }

    fn set_to_bot(&mut self) {
        self.entries.clear();
        self.is_top = false;
    }

    fn set_to_top(&mut self) {
        self.entries.clear();
        self.is_top = true;
    }

    fn leq(&self, other: &Self) -> bool {
        if self.is_bot() {
            return true;
        }
        if other.is_bot() {
            return false;
        }
        if self.is_top && !other.is_top {
            return false;
        }
        if !self.entries.iter().all(|(key, value)| value.leq(&other.get(key))) {
            return false;
        }
        if self.is_top {
            let absent = absent_value(&self.default, true);
            return other
                .entries
                .iter()
                .filter(|(key, _)| !self.entries.contains_key(*key))
                .all(|(_, theirs)| absent.leq(theirs));
        }
        true
    }

    fn join_with(&mut self, other: &Self) {
        self.merge_upward(other, V::join_with);
    }

    fn meet_with(&mut self, other: &Self) {
        if self.is_bot() {
            return;
        }
        if other.is_bot() {
            self.set_to_bot();
            return;
        }
        for (key, theirs) in &other.entries {
            match self.entries.get_mut(key) {
                Some(ours) => ours.meet_with(theirs),
                None => {
                    self.entries.insert(key.clone(), theirs.copy_of());
                }
            }
        }
        self.is_top &= other.is_top;
    }

    fn widen_with(&mut self, other: &Self) {
        self.merge_upward(other, V::widen_with);
    }

    fn narrow_with(&mut self, other: &Self) {
        if self.is_bot() {
            return;
        }
        if other.is_bot() {
            self.set_to_bot();
            return;
        }
        for (key, theirs) in &other.entries {
            match self.entries.get_mut(key) {
                Some(ours) => ours.narrow_with(theirs),
                None => {
                    self.entries.insert(key.clone(), theirs.copy_of());
                }
            }
        }
        self.is_top &= other.is_top;
    }
}

impl<K, V> Display for MapDomain<K, V>
where
    K: Display + Eq + Hash,
    V: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "{}", if self.is_top { "⊤" } else { "⊥" });
        }
        let mut rendered: Vec<String> = self.entries.iter().map(|(k, v)| format!("{} ↦ {}", k, v)).collect();
        rendered.sort();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}
