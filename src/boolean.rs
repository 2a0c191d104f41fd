//! Two-point boolean domains.
//!
//! Both domains carry a single flag, with `false` labelled ⊥ and `true` ⊤.
//! They differ in the merge they apply at control-flow joins:
//!
//! - [`BooleanAndDomain`]: a property that must hold on *all* incoming paths (join = AND).
//! - [`BooleanOrDomain`]: a property that holds on *some* incoming path (join = OR).
//!
//! The lattice is finite, so widening is just join.
//!
//! Note that for [`BooleanAndDomain`] the partial order used by `leq` runs
//! opposite to the ⊥/⊤ labels: `true ⊑ false`. This is the order for which
//! AND is the least upper bound.

use std::fmt::{self, Display};

use crate::domain::{AbstractDomain, AbstractValueKind};

/// Must-hold boolean: join is logical AND.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BooleanAndDomain {
    value: bool,
}

/// May-hold boolean: join is logical OR.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BooleanOrDomain {
    value: bool,
}

impl BooleanAndDomain {
    pub const fn new(value: bool) -> Self {
        Self { value }
    }

    pub const fn value(&self) -> bool {
        self.value
    }
}

impl BooleanOrDomain {
    pub const fn new(value: bool) -> Self {
        Self { value }
    }

    pub const fn value(&self) -> bool {
        self.value
    }
}

impl Default for BooleanAndDomain {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Default for BooleanOrDomain {
    fn default() -> Self {
        Self::new(false)
    }
}

impl From<bool> for BooleanAndDomain {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

impl From<bool> for BooleanOrDomain {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

fn kind_of(value: bool) -> AbstractValueKind {
    if value {
        AbstractValueKind::Top
    } else {
        AbstractValueKind::Bot
    }
}

impl AbstractDomain for BooleanAndDomain {
    fn bot() -> Self {
        Self::new(false)
    }

    fn top() -> Self {
        Self::new(true)
    }

    fn kind(&self) -> AbstractValueKind {
        kind_of(self.value)
    }

    fn set_to_bot(&mut self) {
        self.value = false;
    }

    fn set_to_top(&mut self) {
        self.value = true;
    }

    // `true ⊑ false`: the order under which AND is the join.
    fn leq(&self, other: &Self) -> bool {
        self.value || !other.value
    }

    fn join_with(&mut self, other: &Self) {
        self.value &= other.value;
    }

    fn meet_with(&mut self, other: &Self) {
        self.value |= other.value;
    }

    fn widen_with(&mut self, other: &Self) {
        self.join_with(other)
    }
}

impl AbstractDomain for BooleanOrDomain {
    fn bot() -> Self {
        Self::new(false)
    }

    fn top() -> Self {
        Self::new(true)
    }

    fn kind(&self) -> AbstractValueKind {
        kind_of(self.value)
    }

    fn set_to_bot(&mut self) {
        self.value = false;
    }

    fn set_to_top(&mut self) {
        self.value = true;
    }

    fn leq(&self, other: &Self) -> bool {
        !self.value || other.value
    }

    fn join_with(&mut self, other: &Self) {
        self.value |= other.value;
    }

    fn meet_with(&mut self, other: &Self) {
        self.value &= other.value;
    }

    fn widen_with(&mut self, other: &Self) {
        self.join_with(other)
    }
}

impl Display for BooleanAndDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for BooleanOrDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tests::{check_bot_top_absorption, check_lattice_laws};

    use test_log::test;

    #[test]
    fn test_and_join() {
        let t = BooleanAndDomain::new(true);
        let f = BooleanAndDomain::new(false);
        assert_eq!(t.join(&t), t);
        assert_eq!(t.join(&f), f);
        assert_eq!(f.join(&t), f);
        assert_eq!(f.join(&f), f);
        assert_eq!(t.widen(&f), f);
    }

    #[test]
    fn test_and_meet() {
        let t = BooleanAndDomain::new(true);
        let f = BooleanAndDomain::new(false);
        assert_eq!(t.meet(&f), t);
        assert_eq!(f.meet(&f), f);
    }

    #[test]
    fn test_and_leq_is_reversed() {
        let t = BooleanAndDomain::new(true);
        let f = BooleanAndDomain::new(false);
        assert!(!f.leq(&t));
        assert!(t.leq(&f));
        assert!(t.leq(&t));
        assert!(f.leq(&f));
    }

    #[test]
    fn test_or_semantics() {
        let t = BooleanOrDomain::new(true);
        let f = BooleanOrDomain::new(false);
        assert_eq!(f.join(&t), t);
        assert_eq!(f.join(&f), f);
        assert_eq!(t.meet(&f), f);
        assert!(f.leq(&t));
        assert!(!t.leq(&f));
    }

    #[test]
    fn test_defaults_and_kinds() {
        assert!(BooleanAndDomain::default().value());
        assert!(BooleanAndDomain::default().is_top());
        assert!(!BooleanOrDomain::default().value());
        assert!(BooleanOrDomain::default().is_bot());

        let mut b = BooleanOrDomain::from(true);
        b.set_to_bot();
        assert!(!b.value());
    }

    #[test]
    fn test_boolean_lattice_axioms() {
        check_lattice_laws(&[BooleanAndDomain::new(true), BooleanAndDomain::new(false)]);

        let or_samples = [BooleanOrDomain::new(true), BooleanOrDomain::new(false)];
        check_lattice_laws(&or_samples);
        check_bot_top_absorption(&or_samples);
    }
}
