//! Powerset domain over an arbitrary element type.
//!
//! ```text
//!                 ⊤ (universe, never materialized)
//!                 |
//!             {x,y,z}
//!            /   |   \
//!        {x,y} {x,z} {y,z}
//!          |  \ /  \ / |
//!         {x}  {y}  {z}
//!            \  |  /
//!               ∅ = ⊥
//! ```
//!
//! Ordering is inclusion, join is union, meet is intersection.
//!
//! The universal set cannot be enumerated, so operations that would need its
//! complement keep it as ⊤: removing an element from ⊤ or filtering ⊤ leaves
//! ⊤, and `⊤ \ s` is ⊤ unless `s` is itself ⊤.

use std::collections::hash_set;
use std::collections::HashSet;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use crate::domain::{AbstractDomain, AbstractValueKind};

#[derive(Clone, PartialEq, Eq)]
pub struct SetDomain<T>
where
    T: Eq + Hash,
{
    elements: HashSet<T>,
    is_top: bool,
}

impl<T> SetDomain<T>
where
    T: Clone + Debug + Eq + Hash,
{
    /// Empty set (⊥).
    pub fn new() -> Self {
        Self {
            elements: HashSet::new(),
            is_top: false,
        }
    }

    pub fn singleton(element: T) -> Self {
        let mut set = Self::new();
        set.add(element);
        set
    }

    pub fn add(&mut self, element: T) {
        if !self.is_top {
            self.elements.insert(element);
        }
    }

    /// Remove `element`. The universal set is left unchanged.
    pub fn remove(&mut self, element: &T) {
        if !self.is_top {
            self.elements.remove(element);
        }
    }

    pub fn contains(&self, element: &T) -> bool {
        self.is_top || self.elements.contains(element)
    }

    /// Number of explicit elements (0 for ⊤).
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.is_top && self.elements.is_empty()
    }

    /// Explicit elements, or `None` for the universal set.
    pub fn elements(&self) -> Option<&HashSet<T>> {
        if self.is_top {
            None
        } else {
            Some(&self.elements)
        }
    }

    /// Iterate over the explicit elements. Yields nothing for ⊤.
    pub fn iter(&self) -> hash_set::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn union_with(&mut self, other: &Self) {
        if self.is_top {
            return;
        }
        if other.is_top {
            self.set_to_top();
            return;
        }
        self.elements.extend(other.elements.iter().cloned());
    }

    pub fn intersection_with(&mut self, other: &Self) {
        if other.is_top {
            return;
        }
        if self.is_top {
            *self = other.clone();
            return;
        }
        self.elements.retain(|e| other.elements.contains(e));
    }

    /// Asymmetric difference `self \ other`.
    pub fn difference_with(&mut self, other: &Self) {
        if other.is_top {
            self.set_to_bot();
            return;
        }
        if self.is_top {
            return;
        }
        self.elements.retain(|e| !other.elements.contains(e));
    }

    /// Keep only the elements satisfying `predicate`. The universal set is left unchanged.
    pub fn filter<P>(&mut self, mut predicate: P)
    where
        P: FnMut(&T) -> bool,
    {
        if !self.is_top {
            self.elements.retain(|e| predicate(e));
        }
    }
}

impl<T> Default for SetDomain<T>
where
    T: Clone + Debug + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for SetDomain<T>
where
    T: Clone + Debug + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
            is_top: false,
        }
    }
}

impl<T> AbstractDomain for SetDomain<T>
where
    T: Clone + Debug + Eq + Hash,
{
    fn bot() -> Self {
        Self::new()
    }

    fn top() -> Self {
        Self {
            elements: HashSet::new(),
            is_top: true,
        }
    }

    fn kind(&self) -> AbstractValueKind {
        if self.is_top {
            AbstractValueKind::Top
        } else if self.elements.is_empty() {
            AbstractValueKind::Bot
        } else {
            AbstractValueKind::Val
        }
    }

    fn set_to_bot(&mut self) {
        self.elements.clear();
        self.is_top = false;
    }

    fn set_to_top(&mut self) {
        self.elements.clear();
        self.is_top = true;
    }

    fn leq(&self, other: &Self) -> bool {
        if other.is_top {
            return true;
        }
        if self.is_top {
            return false;
        }
        self.elements.is_subset(&other.elements)
    }

    fn join_with(&mut self, other: &Self) {
        self.union_with(other)
    }

    fn meet_with(&mut self, other: &Self) {
        self.intersection_with(other)
    }

    // Sound only when the element universe reachable by the analysis is finite.
    fn widen_with(&mut self, other: &Self) {
        self.union_with(other)
    }
}

impl<T> Debug for SetDomain<T>
where
    T: Debug + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top {
            write!(f, "⊤")
        } else {
            f.debug_set().entries(self.elements.iter()).finish()
        }
    }
}

impl<T> Display for SetDomain<T>
where
    T: Display + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top {
            return write!(f, "⊤");
        }
        write!(f, "{{")?;
        for (i, e) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, "}}")
    }
}
