//! An interval value and domain over machine integers.

use serde::{Deserialize, Serialize};
use std::cmp;
use std::fmt;

use crate::domain::{AbstractValue, Kind, Scaffolding};

/// One end of an interval.
///
/// The derived ordering places `NegInfinity` below every finite bound and
/// `PosInfinity` above.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Bound {
    NegInfinity,
    Finite(i64),
    PosInfinity,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Bound::NegInfinity => write!(f, "-oo"),
            Bound::Finite(value) => write!(f, "{}", value),
            Bound::PosInfinity => write!(f, "+oo"),
        }
    }
}

/// An interval of `i64` values, with possibly infinite bounds.
///
/// The representation can denote every lattice element: an empty interval
/// (`low > high`) is Bottom and `[-oo, +oo]` is Top, so `kind` reports both
/// for the scaffolding to coalesce.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IntervalValue {
    low: Bound,
    high: Bound,
}

impl Default for IntervalValue {
    /// The canonical empty interval.
    fn default() -> IntervalValue {
        IntervalValue {
            low: Bound::PosInfinity,
            high: Bound::NegInfinity,
        }
    }
}

impl IntervalValue {
    pub fn new(low: Bound, high: Bound) -> IntervalValue {
        IntervalValue { low, high }
    }

    pub fn finite(low: i64, high: i64) -> IntervalValue {
        IntervalValue::new(Bound::Finite(low), Bound::Finite(high))
    }

    /// The singleton interval `[value, value]`.
    pub fn constant(value: i64) -> IntervalValue {
        IntervalValue::finite(value, value)
    }

    pub fn low(&self) -> Bound {
        self.low
    }

    pub fn high(&self) -> Bound {
        self.high
    }

    fn is_empty(&self) -> bool {
        self.low > self.high
    }
}

impl fmt::Display for IntervalValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

impl AbstractValue for IntervalValue {
    fn clear(&mut self) {
        *self = IntervalValue::default();
    }

    fn kind(&self) -> Kind {
        if self.is_empty() {
            Kind::Bottom
        } else if self.low == Bound::NegInfinity && self.high == Bound::PosInfinity {
            Kind::Top
        } else {
            Kind::Value
        }
    }

    fn leq(&self, other: &Self) -> bool {
        other.low <= self.low && self.high <= other.high
    }

    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn join_with(&mut self, other: &Self) -> Kind {
        self.low = cmp::min(self.low, other.low);
        self.high = cmp::max(self.high, other.high);
        self.kind()
    }

    fn widen_with(&mut self, other: &Self) -> Kind {
        // Any bound the other operand pushes past jumps straight to
        // infinity, which stabilizes every ascending chain after at most
        // two applications.
        if other.low < self.low {
            self.low = Bound::NegInfinity;
        }
        if other.high > self.high {
            self.high = Bound::PosInfinity;
        }
        self.kind()
    }

    fn meet_with(&mut self, other: &Self) -> Kind {
        self.low = cmp::max(self.low, other.low);
        self.high = cmp::min(self.high, other.high);
        self.kind()
    }

    fn narrow_with(&mut self, other: &Self) -> Kind {
        // Only the bounds lost to widening are refined.
        if self.low == Bound::NegInfinity {
            self.low = other.low;
        }
        if self.high == Bound::PosInfinity {
            self.high = other.high;
        }
        self.kind()
    }
}

/// An interval domain: [`Scaffolding`] over an [`IntervalValue`].
pub type IntervalDomain = Scaffolding<IntervalValue>;

impl Scaffolding<IntervalValue> {
    /// The singleton interval `[value, value]`.
    pub fn constant(value: i64) -> IntervalDomain {
        Scaffolding::from_value(IntervalValue::constant(value))
    }

    /// The interval between the two bounds; an empty interval normalizes to
    /// Bottom and `[-oo, +oo]` to Top.
    pub fn bounded(low: Bound, high: Bound) -> IntervalDomain {
        Scaffolding::from_value(IntervalValue::new(low, high))
    }

    /// The lower bound of a Value element.
    pub fn low(&self) -> Option<Bound> {
        if self.is_value() {
            Some(self.value().low())
        } else {
            None
        }
    }

    /// The upper bound of a Value element.
    pub fn high(&self) -> Option<Bound> {
        if self.is_value() {
            Some(self.value().high())
        } else {
            None
        }
    }
}
