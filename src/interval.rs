//! Integer interval abstract domain.
//!
//! An [`IntInterval`] tracks a closed range `[lower, upper]` of `i64` values.
//! The extreme values [`IntInterval::MIN`] and [`IntInterval::MAX`] are
//! sentinels standing for `-∞` and `+∞`: arithmetic saturates onto them and
//! never overflows.
//!
//! ```text
//!                [MIN, MAX]  (⊤)
//!               /          \
//!         [MIN, 5]        [1, MAX]
//!               \          /
//!                 [1, 5]
//!                /      \
//!           [1, 1]      [5, 5]
//!                \      /
//!                   ⊥
//! ```
//!
//! The lattice has infinite ascending chains (`[0,0] ⊑ [0,1] ⊑ [0,2] ⊑ ...`),
//! so a fixpoint driver must use [`widen_with`][AbstractDomain::widen_with]
//! on loop back-edges.

use std::cmp::{max, min};
use std::fmt::{self, Display};

use log::debug;

use crate::domain::{AbstractDomain, AbstractValueKind};

const NEG_INF: i64 = i64::MIN;
const POS_INF: i64 = i64::MAX;

/// Closed integer interval `[lower, upper]`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct IntInterval {
    lower: i64,
    upper: i64,
}

impl IntInterval {
    /// Smallest representable bound, read as `-∞`.
    pub const MIN: i64 = NEG_INF;
    /// Largest representable bound, read as `+∞`.
    pub const MAX: i64 = POS_INF;

    // Canonical empty interval: every operation producing an empty range returns exactly this.
    const EMPTY: Self = Self {
        lower: POS_INF,
        upper: NEG_INF,
    };
    const FULL: Self = Self {
        lower: NEG_INF,
        upper: POS_INF,
    };

    /// Create `[lower, upper]`. An empty range (`lower > upper`) is ⊥.
    pub const fn new(lower: i64, upper: i64) -> Self {
        if lower > upper {
            Self::EMPTY
        } else {
            Self { lower, upper }
        }
    }

    pub const fn constant(value: i64) -> Self {
        Self::new(value, value)
    }

    /// `[value, +∞]`
    pub const fn at_least(value: i64) -> Self {
        Self::new(value, POS_INF)
    }

    /// `[-∞, value]`
    pub const fn at_most(value: i64) -> Self {
        Self::new(NEG_INF, value)
    }

    /// Lower bound. Meaningless (`MAX`) for ⊥.
    pub const fn lower(&self) -> i64 {
        self.lower
    }

    /// Upper bound. Meaningless (`MIN`) for ⊥.
    pub const fn upper(&self) -> i64 {
        self.upper
    }

    /// Both bounds, or `None` for ⊥.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        if self.is_bot() {
            None
        } else {
            Some((self.lower, self.upper))
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// The single value of a singleton interval.
    pub fn as_constant(&self) -> Option<i64> {
        if self.lower == self.upper && is_finite(self.lower) {
            Some(self.lower)
        } else {
            None
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        if self.is_bot() || other.is_bot() {
            return Self::EMPTY;
        }
        Self::new(
            add_bounds(self.lower, other.lower, NEG_INF),
            add_bounds(self.upper, other.upper, POS_INF),
        )
    }

    /// Bound-wise difference `[lower - other.lower, upper - other.upper]`,
    /// reordered when the differences cross.
    ///
    /// Exact when `other` is a constant. For a wider `other` the result is not
    /// a sound over-approximation (`[5,7] - [2,3]` gives `[3,4]`, missing
    /// `5 - 3`); use `add(&other.inverse())` for the full range.
    pub fn sub(&self, other: &Self) -> Self {
        if self.is_bot() || other.is_bot() {
            return Self::EMPTY;
        }
        Self::hull_of(&[
            add_bounds(self.lower, neg_bound(other.lower), NEG_INF),
            add_bounds(self.upper, neg_bound(other.upper), POS_INF),
        ])
    }

    pub fn mul(&self, other: &Self) -> Self {
        if self.is_bot() || other.is_bot() {
            return Self::EMPTY;
        }
        Self::hull_of(&[
            mul_bounds(self.lower, other.lower),
            mul_bounds(self.lower, other.upper),
            mul_bounds(self.upper, other.lower),
            mul_bounds(self.upper, other.upper),
        ])
    }

    /// Truncating division.
    ///
    /// A divisor straddling zero is split into its negative and positive parts;
    /// a divisor of exactly `[0, 0]` has no result (⊥).
    pub fn div(&self, other: &Self) -> Self {
        self.by_nonzero_parts(other, |dividend, lo, hi| {
            Self::hull_of(&[
                div_bounds(dividend.lower, lo),
                div_bounds(dividend.lower, hi),
                div_bounds(dividend.upper, lo),
                div_bounds(dividend.upper, hi),
            ])
        })
    }

    /// Truncating remainder.
    ///
    /// For finite operands the result spans the remainders of the four bound
    /// combinations. With an infinite operand the result is only bounded by the
    /// divisor magnitude and the dividend sign.
    ///
    /// The finite case is not a sound over-approximation: `[0,10] % [3,3]`
    /// gives `[0,1]` although `5 % 3 = 2`. Callers needing soundness should
    /// bound the result by the divisor magnitude instead.
    pub fn rem(&self, other: &Self) -> Self {
        self.by_nonzero_parts(other, |dividend, lo, hi| {
            if is_finite(dividend.lower) && is_finite(dividend.upper) && is_finite(lo) && is_finite(hi) {
                Self::hull_of(&[
                    dividend.lower.wrapping_rem(lo),
                    dividend.lower.wrapping_rem(hi),
                    dividend.upper.wrapping_rem(lo),
                    dividend.upper.wrapping_rem(hi),
                ])
            } else {
                let magnitude = max(neg_bound(lo), hi);
                let limit = if magnitude == POS_INF { POS_INF } else { magnitude - 1 };
                Self::new(
                    if dividend.lower < 0 { neg_bound(limit) } else { 0 },
                    if dividend.upper > 0 { limit } else { 0 },
                )
            }
        })
    }

    /// Additive inverse `[-upper, -lower]`.
    pub fn inverse(&self) -> Self {
        if self.is_bot() {
            return Self::EMPTY;
        }
        Self::new(neg_bound(self.upper), neg_bound(self.lower))
    }

    /// Widening that stops at the nearest enclosing landmark instead of jumping
    /// straight to `±∞`.
    pub fn widen_with_thresholds(&mut self, other: &Self, thresholds: &WideningThresholds) {
        if other.is_bot() {
            return;
        }
        if self.is_bot() {
            *self = *other;
            return;
        }
        let lower = if other.lower < self.lower {
            thresholds.below(other.lower)
        } else {
            self.lower
        };
        let upper = if other.upper > self.upper {
            thresholds.above(other.upper)
        } else {
            self.upper
        };
        debug!("widen_with_thresholds({}, {}) -> [{}, {}]", self, other, lower, upper);
        *self = Self::new(lower, upper);
    }

    fn hull_of(bounds: &[i64]) -> Self {
        let lower = bounds.iter().copied().min().unwrap_or(POS_INF);
        let upper = bounds.iter().copied().max().unwrap_or(NEG_INF);
        Self::new(lower, upper)
    }

    fn by_nonzero_parts<F>(&self, divisor: &Self, op: F) -> Self
    where
        F: Fn(&Self, i64, i64) -> Self,
    {
        if self.is_bot() || divisor.is_bot() {
            return Self::EMPTY;
        }
        let mut result = Self::EMPTY;
        if divisor.lower < 0 {
            result.join_with(&op(self, divisor.lower, min(divisor.upper, -1)));
        }
        if divisor.upper > 0 {
            result.join_with(&op(self, max(divisor.lower, 1), divisor.upper));
        }
        result
    }
}

impl Default for IntInterval {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl AbstractDomain for IntInterval {
    fn bot() -> Self {
        Self::EMPTY
    }

    fn top() -> Self {
        Self::FULL
    }

    fn kind(&self) -> AbstractValueKind {
        if self.lower > self.upper {
            AbstractValueKind::Bot
        } else if self.lower == NEG_INF && self.upper == POS_INF {
            AbstractValueKind::Top
        } else {
            AbstractValueKind::Val
        }
    }

    fn set_to_bot(&mut self) {
        *self = Self::EMPTY;
    }

    fn set_to_top(&mut self) {
        *self = Self::FULL;
    }

    fn leq(&self, other: &Self) -> bool {
        if self.is_bot() {
            return true;
        }
        if other.is_bot() {
            return false;
        }
        other.lower <= self.lower && self.upper <= other.upper
    }

    fn join_with(&mut self, other: &Self) {
        if other.is_bot() {
            return;
        }
        if self.is_bot() {
            *self = *other;
            return;
        }
        self.lower = min(self.lower, other.lower);
        self.upper = max(self.upper, other.upper);
    }

    fn meet_with(&mut self, other: &Self) {
        *self = Self::new(max(self.lower, other.lower), min(self.upper, other.upper));
    }

    fn widen_with(&mut self, other: &Self) {
        if other.is_bot() {
            return;
        }
        if self.is_bot() {
            *self = *other;
            return;
        }
        if other.lower < self.lower {
            debug!("widen: lower bound of {} jumps to -∞", self);
            self.lower = NEG_INF;
        }
        if other.upper > self.upper {
            debug!("widen: upper bound of {} jumps to +∞", self);
            self.upper = POS_INF;
        }
    }

    fn narrow_with(&mut self, other: &Self) {
        if self.is_bot() || other.is_bot() {
            *self = Self::EMPTY;
            return;
        }
        let lower = if self.lower == NEG_INF { other.lower } else { self.lower };
        let upper = if self.upper == POS_INF { other.upper } else { self.upper };
        *self = Self::new(lower, upper);
    }
}

impl Display for IntInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bot() {
            return write!(f, "⊥");
        }
        write!(f, "[")?;
        fmt_bound(f, self.lower)?;
        write!(f, ", ")?;
        fmt_bound(f, self.upper)?;
        write!(f, "]")
    }
}

fn fmt_bound(f: &mut fmt::Formatter<'_>, bound: i64) -> fmt::Result {
    match bound {
        NEG_INF => write!(f, "-∞"),
        POS_INF => write!(f, "+∞"),
        n => write!(f, "{}", n),
    }
}

/// Ordered set of landmark constants used by
/// [`IntInterval::widen_with_thresholds`].
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct WideningThresholds {
    values: Vec<i64>,
}

impl WideningThresholds {
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut values: Vec<i64> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Self { values }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Largest threshold `<= value`, or `-∞`.
    pub fn below(&self, value: i64) -> i64 {
        match self.values.partition_point(|&t| t <= value) {
            0 => NEG_INF,
            i => self.values[i - 1],
        }
    }

    /// Smallest threshold `>= value`, or `+∞`.
    pub fn above(&self, value: i64) -> i64 {
        let i = self.values.partition_point(|&t| t < value);
        self.values.get(i).copied().unwrap_or(POS_INF)
    }
}

impl FromIterator<i64> for WideningThresholds {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self::new(iter)
    }
}

fn is_finite(bound: i64) -> bool {
    bound != NEG_INF && bound != POS_INF
}

fn neg_bound(bound: i64) -> i64 {
    match bound {
        NEG_INF => POS_INF,
        POS_INF => NEG_INF,
        n => -n,
    }
}

/// Sum of two bounds of the same side. `infinity` is the sentinel that wins
/// when both infinities meet (`-∞` for lower bounds, `+∞` for upper bounds).
fn add_bounds(a: i64, b: i64, infinity: i64) -> i64 {
    if a == infinity || b == infinity {
        infinity
    } else if !is_finite(a) {
        a
    } else if !is_finite(b) {
        b
    } else {
        a.saturating_add(b)
    }
}

fn mul_bounds(a: i64, b: i64) -> i64 {
    if a == 0 || b == 0 {
        return 0;
    }
    if !is_finite(a) || !is_finite(b) {
        return if (a < 0) == (b < 0) { POS_INF } else { NEG_INF };
    }
    a.saturating_mul(b)
}

/// Quotient of two bounds; `b` is never zero.
fn div_bounds(a: i64, b: i64) -> i64 {
    if !is_finite(a) {
        if (a < 0) == (b < 0) {
            POS_INF
        } else {
            NEG_INF
        }
    } else if !is_finite(b) {
        0
    } else {
        a / b
    }
}
