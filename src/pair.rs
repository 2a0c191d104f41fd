//! Product domain: combines two abstract domains component-wise.

use std::fmt::{self, Display};

use crate::domain::{AbstractDomain, AbstractValueKind};

/// Product of two abstract domains.
///
/// Every lattice operation is applied to both components independently; no
/// reduction between the components takes place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairDomain<A, B> {
    first: A,
    second: B,
}

impl<A, B> PairDomain<A, B>
where
    A: AbstractDomain,
    B: AbstractDomain,
{
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }

    pub fn first_mut(&mut self) -> &mut A {
        &mut self.first
    }

    pub fn second_mut(&mut self) -> &mut B {
        &mut self.second
    }

    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A, B> AbstractDomain for PairDomain<A, B>
where
    A: AbstractDomain,
    B: AbstractDomain,
{
    fn bot() -> Self {
        Self::new(A::bot(), B::bot())
    }

    fn top() -> Self {
        Self::new(A::top(), B::top())
    }

    fn kind(&self) -> AbstractValueKind {
        match (self.first.kind(), self.second.kind()) {
            (AbstractValueKind::Bot, AbstractValueKind::Bot) => AbstractValueKind::Bot,
            (AbstractValueKind::Top, AbstractValueKind::Top) => AbstractValueKind::Top,
            _ => AbstractValueKind::Val,
        }
    }

    fn set_to_bot(&mut self) {
        self.first.set_to_bot();
        self.second.set_to_bot();
    }

    fn set_to_top(&mut self) {
        self.first.set_to_top();
        self.second.set_to_top();
    }

    fn leq(&self, other: &Self) -> bool {
        self.first.leq(&other.first) && self.second.leq(&other.second)
    }

    fn join_with(&mut self, other: &Self) {
        self.first.join_with(&other.first);
        self.second.join_with(&other.second);
    }

    fn meet_with(&mut self, other: &Self) {
        self.first.meet_with(&other.first);
        self.second.meet_with(&other.second);
    }

    fn widen_with(&mut self, other: &Self) {
        self.first.widen_with(&other.first);
        self.second.widen_with(&other.second);
    }

    fn narrow_with(&mut self, other: &Self) {
        self.first.narrow_with(&other.first);
        self.second.narrow_with(&other.second);
    }
}

impl<A: Display, B: Display> Display for PairDomain<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}
