//! A combinator which lifts an [`AbstractValue`] into an
//! [`AbstractDomain`].

use serde::{Deserialize, Serialize};

use crate::domain::{AbstractDomain, AbstractValue, Kind};

/// Builds a full abstract domain out of an abstract value specification.
///
/// Encoding Top and Bottom inside a value representation leads to a
/// nontrivial case analysis in every domain operation. `Scaffolding`
/// implements that boilerplate once: it takes the poset described by an
/// [`AbstractValue`] and adds the two extremal elements, keeping a `kind`
/// tag alongside the value. Whenever a value-level operation reports an
/// extremal result, the tag is updated and the stale representation is
/// cleared, so an extremal element never holds resources.
///
/// Domains which can already denote an extremum in their representation
/// (the interval `[-oo, +oo]`) are coalesced through
/// [`normalize`](Scaffolding::normalize).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Scaffolding<V> {
    kind: Kind,
    value: V,
}

impl<V: AbstractValue> Scaffolding<V> {
    /// Creates Bottom or Top directly.
    ///
    /// Debug builds assert that `kind` is not `Kind::Value`; a Value
    /// element must be built with [`from_value`](Scaffolding::from_value).
    pub fn with_kind(kind: Kind) -> Scaffolding<V> {
        debug_assert!(kind != Kind::Value);
        Scaffolding {
            kind,
            value: V::default(),
        }
    }

    /// Wraps a value, coalescing it when its representation denotes an
    /// extremum.
    pub fn from_value(value: V) -> Scaffolding<V> {
        let mut domain = Scaffolding {
            kind: Kind::Value,
            value,
        };
        domain.normalize();
        domain
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_value(&self) -> bool {
        self.kind == Kind::Value
    }

    /// The underlying value. Only meaningful when
    /// [`is_value`](Scaffolding::is_value) holds; extremal elements hold a
    /// cleared value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Mutable access to the underlying value. Callers which mutate the
    /// value directly must call [`normalize`](Scaffolding::normalize)
    /// afterwards.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Replaces the underlying value, then normalizes.
    pub fn set_to_value(&mut self, value: V) {
        self.value = value;
        self.normalize();
    }

    /// Re-derives the kind tag from the value, clearing the representation
    /// when it denotes an extremum.
    pub fn normalize(&mut self) {
        self.kind = self.value.kind();
        if self.kind != Kind::Value {
            self.value.clear();
        }
    }

    fn join_like_operation_with(
        &mut self,
        other: &Self,
        operation: impl FnOnce(&mut V, &V) -> Kind,
    ) {
        if self.is_top() || other.is_bottom() {
            return;
        }
        if other.is_top() {
            self.set_to_top();
            return;
        }
        if self.is_bottom() {
            self.kind = other.kind;
            self.value = other.value.clone();
            return;
        }
        self.kind = operation(&mut self.value, &other.value);
        if self.kind != Kind::Value {
            self.value.clear();
        }
    }

    fn meet_like_operation_with(
        &mut self,
        other: &Self,
        operation: impl FnOnce(&mut V, &V) -> Kind,
    ) {
        if self.is_bottom() || other.is_top() {
            return;
        }
        if other.is_bottom() {
            self.set_to_bottom();
            return;
        }
        if self.is_top() {
            self.kind = other.kind;
            self.value = other.value.clone();
            return;
        }
        self.kind = operation(&mut self.value, &other.value);
        if self.kind != Kind::Value {
            self.value.clear();
        }
    }
}

impl<V: AbstractValue> Default for Scaffolding<V> {
    /// The element wrapping a default-constructed value. The choice is
    /// arbitrary as far as the lattice is concerned, but it is the element
    /// most fixpoint seeds are built from.
    fn default() -> Scaffolding<V> {
        Scaffolding::from_value(V::default())
    }
}

impl<V: AbstractValue> AbstractDomain for Scaffolding<V> {
    fn bottom() -> Self {
        Scaffolding::with_kind(Kind::Bottom)
    }

    fn top() -> Self {
        Scaffolding::with_kind(Kind::Top)
    }

    fn is_bottom(&self) -> bool {
        self.kind == Kind::Bottom
    }

    fn is_top(&self) -> bool {
        self.kind == Kind::Top
    }

    fn leq(&self, other: &Self) -> bool {
        if self.is_bottom() {
            return true;
        }
        if other.is_bottom() {
            return false;
        }
        if other.is_top() {
            return true;
        }
        if self.is_top() {
            return false;
        }
        self.value.leq(&other.value)
    }

    fn equals(&self, other: &Self) -> bool {
        self.kind == other.kind
            && (self.kind != Kind::Value || self.value.equals(&other.value))
    }

    fn set_to_bottom(&mut self) {
        self.kind = Kind::Bottom;
        self.value.clear();
    }

    fn set_to_top(&mut self) {
        self.kind = Kind::Top;
        self.value.clear();
    }

    fn join_with(&mut self, other: &Self) {
        self.join_like_operation_with(other, V::join_with);
    }

    fn widen_with(&mut self, other: &Self) {
        self.join_like_operation_with(other, V::widen_with);
    }

    fn meet_with(&mut self, other: &Self) {
        self.meet_like_operation_with(other, V::meet_with);
    }

    fn narrow_with(&mut self, other: &Self) {
        self.meet_like_operation_with(other, V::narrow_with);
    }
}
