//! Property-based soundness checks for interval arithmetic.
//!
//! For every concrete pair `a ∈ A`, `b ∈ B`, the concrete result of an
//! operation must lie in the abstract result of the same operation on `A, B`.
//! `rem` uses bound corners and `sub` is bound-wise, so neither is checked
//! over arbitrary operands.

use abstract_domains::{AbstractDomain, IntInterval, WideningThresholds};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// A small finite interval together with one of its members.
fn interval_with_member() -> impl Strategy<Value = (IntInterval, i64)> {
    (-1000i64..1000, 0i64..200).prop_flat_map(|(lower, width)| {
        let upper = lower + width;
        (Just(IntInterval::new(lower, upper)), lower..=upper)
    })
}

fn interval() -> impl Strategy<Value = IntInterval> {
    prop_oneof![
        1 => Just(IntInterval::bot()),
        1 => Just(IntInterval::top()),
        1 => (-1000i64..1000).prop_map(IntInterval::at_least),
        1 => (-1000i64..1000).prop_map(IntInterval::at_most),
        6 => interval_with_member().prop_map(|(i, _)| i),
    ]
}

// ============================================================================
// Arithmetic soundness
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_add_sound((a, x) in interval_with_member(), (b, y) in interval_with_member()) {
        let result = a.add(&b);
        prop_assert!(result.contains(x + y), "{} + {} = {} misses {}", a, b, result, x + y);
    }

    // `sub` is bound-wise, so it only covers every difference for a constant subtrahend.
    #[test]
    fn prop_sub_constant_sound((a, x) in interval_with_member(), y in -1000i64..1000) {
        let b = IntInterval::constant(y);
        let result = a.sub(&b);
        prop_assert!(result.contains(x - y), "{} - {} = {} misses {}", a, b, result, x - y);
    }

    #[test]
    fn prop_add_inverse_sound((a, x) in interval_with_member(), (b, y) in interval_with_member()) {
        let result = a.add(&b.inverse());
        prop_assert!(result.contains(x - y), "{} + -{} = {} misses {}", a, b, result, x - y);
    }

    #[test]
    fn prop_mul_sound((a, x) in interval_with_member(), (b, y) in interval_with_member()) {
        let result = a.mul(&b);
        prop_assert!(result.contains(x * y), "{} * {} = {} misses {}", a, b, result, x * y);
    }

    #[test]
    fn prop_div_sound((a, x) in interval_with_member(), (b, y) in interval_with_member()) {
        prop_assume!(y != 0);
        let result = a.div(&b);
        prop_assert!(result.contains(x / y), "{} / {} = {} misses {}", a, b, result, x / y);
    }

    #[test]
    fn prop_inverse_sound((a, x) in interval_with_member()) {
        prop_assert!(a.inverse().contains(-x));
    }
}

// ============================================================================
// Lattice properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_join_is_least_upper_bound(a in interval(), b in interval(), c in interval()) {
        let joined = a.join(&b);
        prop_assert!(a.leq(&joined));
        prop_assert!(b.leq(&joined));
        if a.leq(&c) && b.leq(&c) {
            prop_assert!(joined.leq(&c));
        }
        prop_assert_eq!(joined, b.join(&a));
    }

    #[test]
    fn prop_meet_is_greatest_lower_bound(a in interval(), b in interval(), c in interval()) {
        let met = a.meet(&b);
        prop_assert!(met.leq(&a));
        prop_assert!(met.leq(&b));
        if c.leq(&a) && c.leq(&b) {
            prop_assert!(c.leq(&met));
        }
        prop_assert_eq!(met, b.meet(&a));
    }

    #[test]
    fn prop_widen_covers_operands(a in interval(), b in interval()) {
        let widened = a.widen(&b);
        prop_assert!(a.leq(&widened));
        prop_assert!(b.leq(&widened));
    }

    #[test]
    fn prop_threshold_widen_covers_operands(
        a in interval(),
        b in interval(),
        thresholds in prop::collection::vec(-2000i64..2000, 0..6),
    ) {
        let thresholds = WideningThresholds::new(thresholds);
        let mut widened = a;
        widened.widen_with_thresholds(&b, &thresholds);
        prop_assert!(a.leq(&widened));
        prop_assert!(b.leq(&widened));
        prop_assert!(widened.leq(&a.widen(&b)));
    }

    #[test]
    fn prop_narrow_stays_between(a in interval(), b in interval()) {
        // Narrowing is only meaningful when refining a post-fixpoint.
        prop_assume!(b.leq(&a));
        let narrowed = a.narrow(&b);
        prop_assert!(narrowed.leq(&a));
        prop_assert!(b.leq(&narrowed));
    }
}
