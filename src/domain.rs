//! Core abstract domain trait and utilities.

use std::fmt::{self, Debug, Display};

/// State tag shared by every abstract domain.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AbstractValueKind {
    /// No information yet (unreachable, or nothing observed).
    Bot,
    /// Regular element carrying payload data.
    Val,
    /// All possibilities.
    Top,
}

impl Display for AbstractValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractValueKind::Bot => write!(f, "⊥"),
            AbstractValueKind::Val => write!(f, "val"),
            AbstractValueKind::Top => write!(f, "⊤"),
        }
    }
}

/// Abstract domain interface.
///
/// An abstract domain is a lattice of values approximating sets of concrete
/// program states. Elements are plain values: the lattice operations mutate
/// `self` in place, and [`copy_of`][AbstractDomain::copy_of] produces a fully
/// independent copy. Structural equality is `PartialEq`.
///
/// # Lattice Properties
///
/// An abstract domain must satisfy:
/// - Reflexivity: `∀a. a ⊑ a`
/// - Join is an upper bound: `a ⊑ a ⊔ b` and `b ⊑ a ⊔ b`
/// - Meet is a lower bound: `a ⊓ b ⊑ a`
/// - Widening terminates: every chain `x₀, x₀ ∇ x₁, (x₀ ∇ x₁) ∇ x₂, ...` stabilizes
pub trait AbstractDomain: Clone + Debug + PartialEq {
    /// Create the bottom element (⊥).
    fn bot() -> Self;

    /// Create the top element (⊤).
    fn top() -> Self;

    /// Current state of the element.
    fn kind(&self) -> AbstractValueKind;

    fn is_bot(&self) -> bool {
        self.kind() == AbstractValueKind::Bot
    }

    fn is_top(&self) -> bool {
        self.kind() == AbstractValueKind::Top
    }

    /// Force the element to ⊥, discarding its payload.
    fn set_to_bot(&mut self);

    /// Force the element to ⊤, discarding its payload.
    fn set_to_top(&mut self);

    /// Partial order: `self ⊑ other`.
    fn leq(&self, other: &Self) -> bool;

    /// In-place join (`⊔`): least upper bound, used at control-flow merges.
    fn join_with(&mut self, other: &Self);

    /// In-place meet (`⊓`): greatest lower bound, used to apply guards.
    fn meet_with(&mut self, other: &Self);

    /// In-place widening (`∇`), used on loop back-edges.
    ///
    /// Must satisfy `self ⊑ self ∇ other` and `other ⊑ self ∇ other`, and
    /// must not admit infinite ascending chains.
    fn widen_with(&mut self, other: &Self);

    /// In-place narrowing (`∆`): refines an over-approximation after widening.
    ///
    /// Defaults to meet, which is safe for finite narrowing sequences.
    fn narrow_with(&mut self, other: &Self) {
        self.meet_with(other)
    }

    /// Independent deep copy.
    fn copy_of(&self) -> Self {
        self.clone()
    }

    fn join(&self, other: &Self) -> Self {
        let mut result = self.copy_of();
        result.join_with(other);
        result
    }

    fn meet(&self, other: &Self) -> Self {
        let mut result = self.copy_of();
        result.meet_with(other);
        result
    }

    fn widen(&self, other: &Self) -> Self {
        let mut result = self.copy_of();
        result.widen_with(other);
        result
    }

    fn narrow(&self, other: &Self) -> Self {
        let mut result = self.copy_of();
        result.narrow_with(other);
        result
    }
}
