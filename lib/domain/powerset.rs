//! A powerset value and domain over hashable elements.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::FromIterator;

use crate::domain::{AbstractValue, Kind, Scaffolding};

/// A finite set of `T`, with an explicit marker for the whole universe.
///
/// Every finite set is a regular value, including the empty one; the kind
/// is `Top` once the set has been saturated to the universe. Bottom has no
/// representation of its own and is managed entirely by the scaffolding.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PowersetValue<T: Eq + Hash> {
    elements: FxHashSet<T>,
    top: bool,
}

impl<T: Eq + Hash> Default for PowersetValue<T> {
    fn default() -> PowersetValue<T> {
        PowersetValue {
            elements: FxHashSet::default(),
            top: false,
        }
    }
}

impl<T: Clone + Debug + Eq + Hash> PowersetValue<T> {
    /// Adds an element to the set. No effect once saturated.
    pub fn insert(&mut self, element: T) {
        if !self.top {
            self.elements.insert(element);
        }
    }

    /// Removes an element from the set. No effect once saturated.
    pub fn remove(&mut self, element: &T) {
        if !self.top {
            self.elements.remove(element);
        }
    }

    pub fn contains(&self, element: &T) -> bool {
        self.top || self.elements.contains(element)
    }

    /// The number of elements held. Only meaningful for finite sets.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.top && self.elements.is_empty()
    }

    /// The elements of a finite set. Empty once saturated.
    pub fn elements(&self) -> &FxHashSet<T> {
        &self.elements
    }

    /// Saturates the set to the universe.
    pub fn set_to_universe(&mut self) {
        self.top = true;
        self.elements.clear();
    }
}

impl<T: Clone + Debug + Eq + Hash> AbstractValue for PowersetValue<T> {
    fn clear(&mut self) {
        self.elements.clear();
        self.top = false;
    }

    fn kind(&self) -> Kind {
        if self.top {
            Kind::Top
        } else {
            Kind::Value
        }
    }

    fn leq(&self, other: &Self) -> bool {
        self.elements.is_subset(&other.elements)
    }

    fn equals(&self, other: &Self) -> bool {
        self.elements == other.elements
    }

    fn join_with(&mut self, other: &Self) -> Kind {
        if self.top {
            return Kind::Top;
        }
        if other.top {
            self.set_to_universe();
        } else {
            for element in &other.elements {
                self.elements.insert(element.clone());
            }
        }
        self.kind()
    }

    fn widen_with(&mut self, other: &Self) -> Kind {
        // The lattice of finite sets has no infinite ascending chains.
        self.join_with(other)
    }

    fn meet_with(&mut self, other: &Self) -> Kind {
        if other.top {
            return self.kind();
        }
        if self.top {
            self.top = false;
            self.elements = other.elements.clone();
        } else {
            self.elements.retain(|element| other.elements.contains(element));
        }
        self.kind()
    }

    fn narrow_with(&mut self, other: &Self) -> Kind {
        self.meet_with(other)
    }
}

/// A powerset domain: [`Scaffolding`] over a [`PowersetValue`].
///
/// The default element is the empty set (a regular value, not Bottom),
/// which is what most analyses seed their fixpoint with.
pub type PowersetDomain<T> = Scaffolding<PowersetValue<T>>;

impl<T: Clone + Debug + Eq + Hash> Scaffolding<PowersetValue<T>> {
    /// Adds an element. No effect on extremal elements: Top already
    /// contains everything, and Bottom denotes unreachability.
    pub fn insert(&mut self, element: T) {
        if self.is_value() {
            self.value_mut().insert(element);
            self.normalize();
        }
    }

    /// Removes an element. No effect on extremal elements.
    pub fn remove(&mut self, element: &T) {
        if self.is_value() {
            self.value_mut().remove(element);
            self.normalize();
        }
    }

    /// Membership. Top contains every element; Bottom contains none.
    pub fn contains(&self, element: &T) -> bool {
        match self.kind() {
            Kind::Bottom => false,
            Kind::Value => self.value().contains(element),
            Kind::Top => true,
        }
    }

    /// The number of elements held. Only meaningful for Value elements;
    /// extremal elements report zero.
    pub fn len(&self) -> usize {
        if self.is_value() {
            self.value().len()
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The elements held by a Value element; empty for Bottom and Top.
    pub fn elements(&self) -> Vec<&T> {
        if self.is_value() {
            self.value().elements().iter().collect()
        } else {
            Vec::new()
        }
    }
}

impl<T: Clone + Debug + Eq + Hash> FromIterator<T> for Scaffolding<PowersetValue<T>> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Scaffolding<PowersetValue<T>> {
        let mut value = PowersetValue::default();
        for element in iter {
            value.insert(element);
        }
        Scaffolding::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AbstractDomain;

    fn set(elements: &[u32]) -> PowersetDomain<u32> {
        elements.iter().cloned().collect()
    }

    #[test]
    fn join_is_union() {
        let mut a = set(&[1, 2]);
        a.join_with(&set(&[2, 3]));
        assert!(a.equals(&set(&[1, 2, 3])));
    }

    #[test]
    fn meet_is_intersection() {
        let mut a = set(&[1, 2, 3]);
        a.meet_with(&set(&[2, 3, 4]));
        assert!(a.equals(&set(&[2, 3])));
    }

    #[test]
    fn leq_is_subset() {
        assert!(set(&[1]).leq(&set(&[1, 2])));
        assert!(!set(&[1, 3]).leq(&set(&[1, 2])));
        assert!(set(&[]).leq(&set(&[1])));
    }

    #[test]
    fn empty_set_is_not_bottom() {
        let empty = set(&[]);
        assert!(empty.is_value());
        assert!(!empty.is_bottom());
        assert!(PowersetDomain::<u32>::bottom().leq(&empty));
        assert!(!empty.leq(&PowersetDomain::<u32>::bottom()));
    }

    #[test]
    fn saturated_value_coalesces_to_top() {
        let mut value = PowersetValue::default();
        value.insert(1u32);
        value.set_to_universe();
        let domain = Scaffolding::from_value(value);
        assert!(domain.is_top());
        assert!(domain.value().elements().is_empty());
    }

    #[test]
    fn insert_and_remove_respect_extrema() {
        let mut top = PowersetDomain::<u32>::top();
        top.insert(1);
        assert!(top.is_top());
        assert!(top.contains(&42));

        let mut bottom = PowersetDomain::<u32>::bottom();
        bottom.insert(1);
        assert!(bottom.is_bottom());
        assert!(!bottom.contains(&1));

        let mut a = set(&[1, 2]);
        a.remove(&1);
        assert!(a.equals(&set(&[2])));
    }

    #[test]
    fn elements_of_extremal_elements_are_empty() {
        assert!(PowersetDomain::<u32>::top().elements().is_empty());
        assert!(PowersetDomain::<u32>::bottom().elements().is_empty());
        let mut elements: Vec<u32> =
            set(&[2, 1]).elements().into_iter().cloned().collect();
        elements.sort_unstable();
        assert_eq!(elements, vec![1, 2]);
    }
}
