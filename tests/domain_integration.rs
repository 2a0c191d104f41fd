//! End-to-end scenarios composing several domains, the way an analysis
//! client uses them at control-flow merges and guards.

use abstract_domains::*;

use test_log::test;

type PointsTo = MapDomain<String, SetDomain<&'static str>>;

fn path(name: &str) -> AccessPath {
    AccessPath::variable(name)
}

fn iv(lower: i64, upper: i64) -> IntInterval {
    IntInterval::new(lower, upper)
}

#[test]
fn test_branch_merge_then_guard() {
    let x_f = path("x").append_field("f");
    let y_g = path("y").append_field("g");

    let mut then_state = EnvironmentDomain::new();
    then_state.put(&x_f, iv(1, 5));
    then_state.put(&y_g, iv(2, 6));

    let mut else_state = EnvironmentDomain::new();
    else_state.put(&x_f, iv(3, 7));
    else_state.put(&y_g, iv(4, 8));

    let mut merged = then_state.join(&else_state);
    assert_eq!(merged.get(&x_f), iv(1, 7));
    assert_eq!(merged.get(&y_g), iv(2, 8));

    // assume(x.f >= 4)
    let mut guard = EnvironmentDomain::new();
    guard.put(&x_f, IntInterval::at_least(4));
    merged.meet_with(&guard);
    assert_eq!(merged.get(&x_f), iv(4, 7));
    assert_eq!(merged.get(&y_g), iv(2, 8));

    let met = then_state.meet(&else_state);
    assert_eq!(met.get(&x_f), iv(3, 5));
    assert_eq!(met.get(&y_g), iv(4, 6));
}

#[test]
fn test_unreachable_branch_is_neutral() {
    let mut state = EnvironmentDomain::new();
    state.put_variable("n", iv(0, 10));

    let unreachable = EnvironmentDomain::<IntInterval>::bot();
    assert_eq!(state.join(&unreachable), state);
    assert!(unreachable.leq(&state));
    assert!(state.meet(&unreachable).is_bot());
}

#[test]
fn test_alias_survives_merge_only_when_shared() {
    let o = path("o").append_field("f");
    let a = path("a");

    let mut left = EnvironmentDomain::new();
    left.put(&o, iv(0, 0));
    left.create_alias(&o, &a).unwrap();

    let mut right = left.copy_of();
    right.put(&a, iv(10, 10));
    assert_eq!(right.get(&o), iv(10, 10));

    let merged = left.join(&right);
    assert!(merged.is_alias(&a));
    assert_eq!(merged.get(&a), iv(0, 10));

    let mut plain = EnvironmentDomain::new();
    plain.put(&o, iv(5, 5));
    let merged = left.join(&plain);
    assert!(!merged.is_alias(&a));
    assert_eq!(merged.get(&o), iv(0, 5));
    // `a` keeps its own copy of the value it shared with `o` in `left`.
    assert_eq!(merged.get(&a), iv(0, 0));
}

#[test]
fn test_alias_cycle_is_reported() {
    let mut env = EnvironmentDomain::<IntInterval>::new();
    env.create_alias(&path("p"), &path("q")).unwrap();
    let err = env.create_alias(&path("q"), &path("p")).unwrap_err();
    assert!(matches!(err, AliasError::Cycle { .. }));
    assert_eq!(env.resolve(&path("q")), &path("p"));
}

#[test]
fn test_nested_points_to_per_call_site() {
    let mut site1 = PointsTo::new(SetDomain::new());
    site1.update("p".to_string(), |targets| targets.add("h1"));
    let mut site2 = PointsTo::new(SetDomain::new());
    site2.update("p".to_string(), |targets| targets.add("h2"));
    site2.update("q".to_string(), |targets| targets.add("h3"));

    let mut by_site: MapDomain<u32, PointsTo> = MapDomain::new(PointsTo::new(SetDomain::new()));
    by_site.put(1, site1.clone());
    by_site.put(2, site2.clone());

    let mut other: MapDomain<u32, PointsTo> = MapDomain::new(PointsTo::new(SetDomain::new()));
    let mut site1_late = PointsTo::new(SetDomain::new());
    site1_late.update("p".to_string(), |targets| targets.add("h4"));
    other.put(1, site1_late);

    let merged = by_site.join(&other);
    let p_at_1 = merged.get(&1).get(&"p".to_string());
    assert_eq!(p_at_1.len(), 2);
    assert!(p_at_1.contains(&"h1") && p_at_1.contains(&"h4"));
    assert_eq!(merged.get(&2), site2);
    assert!(by_site.leq(&merged));
    assert!(other.leq(&merged));
}

#[test]
fn test_product_of_interval_and_flags() {
    type Fact = PairDomain<IntInterval, PairDomain<BooleanAndDomain, BooleanOrDomain>>;

    let fact = |lower, upper, must, may| {
        PairDomain::new(
            iv(lower, upper),
            PairDomain::new(BooleanAndDomain::new(must), BooleanOrDomain::new(may)),
        )
    };

    let a: Fact = fact(0, 3, true, false);
    let b: Fact = fact(2, 9, false, true);
    let joined = a.join(&b);
    assert_eq!(joined.first(), &iv(0, 9));
    assert!(!joined.second().first().value());
    assert!(joined.second().second().value());

    let widened = a.widen(&b);
    assert_eq!(widened.first(), &IntInterval::at_least(0));
}

#[test]
fn test_loop_with_widening_and_narrowing() {
    // i = 0; while i < 100 { i += 1 }
    let i = path("i");
    let guard = IntInterval::at_most(99);
    let step = IntInterval::constant(1);

    let mut entry = EnvironmentDomain::new();
    entry.put(&i, IntInterval::constant(0));

    let body = |head: &EnvironmentDomain<IntInterval>| {
        let mut next = head.copy_of();
        next.update(&i, |v| v.meet_with(&guard));
        next.update(&i, |v| *v = v.add(&step));
        next
    };

    let mut head = entry.copy_of();
    loop {
        let next = entry.join(&body(&head));
        let candidate = head.widen(&next);
        if candidate.leq(&head) {
            break;
        }
        head = candidate;
    }
    assert_eq!(head.get(&i), IntInterval::at_least(0));

    head.narrow_with(&entry.join(&body(&head)));
    assert_eq!(head.get(&i), iv(0, 100));
}
