//! Abstractions and combinators for abstract domains.
//!
//! An abstract domain is a set of abstract values with a partial order and
//! lattice operations, used to over-approximate the concrete semantics of a
//! program. This module splits the work of defining one in two:
//!
//! * [`AbstractValue`] describes the *regular* elements of a domain (a set,
//!   an interval pair, a hash table) and their operations;
//! * [`Scaffolding`] lifts an `AbstractValue` into a full
//!   [`AbstractDomain`], handling the Top/Bottom case analysis once and for
//!   all.
//!
//! Domains are deliberately value-semantic. Elements are mutable and the
//! basic operations have side effects; the functional interface
//! ([`AbstractDomain::join`] and friends) is a convenience layer which
//! copies, then mutates. Side-effecting operations are only ever invoked on
//! elements a single analysis thread owns, which Rust's `&mut` discipline
//! enforces within one fixpoint run.

mod interval;
mod powerset;
mod scaffolding;

pub use self::interval::{Bound, IntervalDomain, IntervalValue};
pub use self::powerset::{PowersetDomain, PowersetValue};
pub use self::scaffolding::Scaffolding;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Classifies a lattice element as Bottom, a regular value, or Top.
///
/// Operations on regular abstract values may collapse to an extremal
/// element; they report this through their returned `Kind` so that the
/// owner can coalesce the result.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Kind {
    Bottom,
    Value,
    Top,
}

/// A regular lattice element: the representation-carrying part of an
/// abstract domain.
///
/// Implementors only supply the Value-kind logic; [`Scaffolding`] wraps it
/// into a full [`AbstractDomain`] and takes care of the extremal cases.
pub trait AbstractValue: Clone + Debug + Default {
    /// Releases the representation resources held by this value. Callers
    /// only invoke this when they are about to overwrite the element's
    /// kind, so the kind after clearing is whatever is consistent with the
    /// cleared representation.
    fn clear(&mut self);

    /// Classifies the current element. If the representation can itself
    /// denote Top or Bottom (the interval `[-oo, +oo]`, an empty interval),
    /// this must return the corresponding extremum so that the owner can
    /// normalize.
    fn kind(&self) -> Kind;

    /// The partial order, defined among Value-kind elements. Behavior on
    /// other kinds is unspecified; `Scaffolding` never calls it then.
    fn leq(&self, other: &Self) -> bool;

    /// Equality among Value-kind elements.
    fn equals(&self, other: &Self) -> bool;

    /// Mutates `self` to the least upper bound of both operands and returns
    /// the kind of the result. When the result is extremal, `self` may
    /// still hold representation resources; the owner will `clear()` it.
    fn join_with(&mut self, other: &Self) -> Kind;

    /// Like `join_with`, but must additionally stabilize every ascending
    /// chain in finitely many steps. Domains with finite ascending chains
    /// can simply delegate to the join.
    fn widen_with(&mut self, other: &Self) -> Kind;

    /// Mutates `self` to the greatest lower bound of both operands and
    /// returns the kind of the result.
    fn meet_with(&mut self, other: &Self) -> Kind;

    /// Dual of `widen_with`: refines an over-approximation obtained by
    /// widening. Domains with finite descending chains can simply delegate
    /// to the meet.
    fn narrow_with(&mut self, other: &Self) -> Kind;
}

/// A full lattice element.
///
/// All operations carry the concrete domain type; nothing is erased to a
/// trait object, so a monomorphized fixpoint loop pays no dispatch cost.
pub trait AbstractDomain: Clone + Debug {
    /// Produces the least element.
    fn bottom() -> Self;

    /// Produces the greatest element.
    fn top() -> Self;

    fn is_bottom(&self) -> bool;

    fn is_top(&self) -> bool;

    /// The partial order relation.
    fn leq(&self, other: &Self) -> bool;

    /// `a.equals(b)` is semantically equivalent to `a.leq(b) && b.leq(a)`.
    fn equals(&self, other: &Self) -> bool;

    fn set_to_bottom(&mut self);

    fn set_to_top(&mut self);

    /// In-place least upper bound.
    fn join_with(&mut self, other: &Self);

    /// In-place widening. An upper bound of both operands which, applied
    /// iteratively along an ascending chain, stabilizes in finitely many
    /// steps regardless of the lattice height.
    fn widen_with(&mut self, other: &Self);

    /// In-place greatest lower bound.
    fn meet_with(&mut self, other: &Self);

    /// In-place narrowing.
    fn narrow_with(&mut self, other: &Self);

    /// Functional mirror of [`join_with`](Self::join_with): copies, then
    /// mutates, leaving both operands unchanged.
    fn join(&self, other: &Self) -> Self {
        let mut tmp = self.clone();
        tmp.join_with(other);
        tmp
    }

    /// Functional mirror of [`widen_with`](Self::widen_with).
    fn widening(&self, other: &Self) -> Self {
        let mut tmp = self.clone();
        tmp.widen_with(other);
        tmp
    }

    /// Functional mirror of [`meet_with`](Self::meet_with).
    fn meet(&self, other: &Self) -> Self {
        let mut tmp = self.clone();
        tmp.meet_with(other);
        tmp
    }

    /// Functional mirror of [`narrow_with`](Self::narrow_with).
    fn narrowing(&self, other: &Self) -> Self {
        let mut tmp = self.clone();
        tmp.narrow_with(other);
        tmp
    }
}
