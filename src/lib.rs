//! # abstract-domains: Composable Lattices for Static Analysis
//!
//! **`abstract-domains`** provides the value types a fixpoint-based static analysis
//! (points-to, escape, range analysis) manipulates at every program point.
//! Each type is a lattice implementing the common [`AbstractDomain`] contract,
//! and the container domains are generic, so they compose freely.
//!
//! ## What is an Abstract Domain?
//!
//! An abstract domain approximates a set of concrete program states. Its elements
//! are ordered by precision (`⊑`), from ⊥ ("unreachable / nothing seen yet") to
//! ⊤ ("anything is possible"). A fixpoint driver merges the states flowing into a
//! control-flow join with [`join_with`][AbstractDomain::join_with], refines them
//! at guards with [`meet_with`][AbstractDomain::meet_with], and uses
//! [`widen_with`][AbstractDomain::widen_with] on loop back-edges so that the
//! iteration terminates.
//!
//! ## Domains
//!
//! - **[`IntInterval`]**: closed `i64` ranges with saturating interval arithmetic.
//! - **[`BooleanAndDomain`] / [`BooleanOrDomain`]**: must-hold and may-hold flags.
//! - **[`SetDomain`]**: powerset of any hashable element type.
//! - **[`MapDomain`]**: pointwise map from keys to any domain, with a default for absent keys.
//! - **[`PairDomain`]**: component-wise product of two domains.
//! - **[`AccessPathMapDomain`] / [`EnvironmentDomain`]**: maps over [`AccessPath`]s
//!   (`x.f.g`) where aliased paths share one value slot.
//!
//! ## Basic Usage
//!
//! ```rust
//! use abstract_domains::{AbstractDomain, AccessPath, EnvironmentDomain, IntInterval};
//!
//! let x = AccessPath::variable("x").append_field("f");
//! let y = AccessPath::variable("y");
//!
//! // State on the `then` branch: x.f ∈ [1, 5], and y is another name for x.f
//! let mut then_state = EnvironmentDomain::new();
//! then_state.put(&x, IntInterval::new(1, 5));
//! then_state.create_alias(&x, &y).unwrap();
//! assert_eq!(then_state.get(&y), IntInterval::new(1, 5));
//!
//! // State on the `else` branch: x.f ∈ [3, 7]
//! let mut else_state = EnvironmentDomain::new();
//! else_state.put(&x, IntInterval::new(3, 7));
//!
//! // Merge point
//! let merged = then_state.join(&else_state);
//! assert_eq!(merged.get(&x), IntInterval::new(1, 7));
//! assert!(then_state.leq(&merged));
//! ```

pub mod access_path;
pub mod alias;
pub mod boolean;
pub mod domain;
pub mod env;
pub mod interval;
pub mod map;
pub mod pair;
pub mod set;

pub use access_path::{AccessPath, AccessPathBase, FieldSegment};
pub use alias::{AliasError, AliasTable};
pub use boolean::{BooleanAndDomain, BooleanOrDomain};
pub use domain::{AbstractDomain, AbstractValueKind};
pub use env::{AccessPathMapDomain, EnvironmentDomain};
pub use interval::{IntInterval, WideningThresholds};
pub use map::MapDomain;
pub use pair::PairDomain;
pub use set::SetDomain;
