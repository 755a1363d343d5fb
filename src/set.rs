//! Sets: the arity-1 view of typed relations.
//!
//! A [`Set`] is a [`Relation`] with exactly one component. Values are
//! non-negative integers in the binary encoding of the component
//! domain; insertion grows the domain on demand, so a set built with
//! [`Set::empty`] needs no up-front size.

use std::fmt;
use std::hash::{Hash, Hasher};

use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::domain::{Domain, Domains};
use crate::relation::Relation;
use crate::space::{ProductOp, SpaceRef};

#[derive(Clone, PartialEq, Eq)]
pub struct Set {
    rel: Relation,
}

impl Set {
    /// A set from its domain and its BDD.
    pub fn new(domain: Domain, bdd: Bdd) -> Self {
        Self {
            rel: Relation::new(Domains::from(domain), bdd),
        }
    }

    /// Views an arity-1 relation as a set.
    pub fn from_relation(rel: Relation) -> Self {
        assert_eq!(rel.arity(), 1, "a set is an arity-1 relation");
        Self { rel }
    }

    /// The empty set over an empty domain; the domain grows with
    /// [`insert`][Set::insert].
    pub fn empty(space: &SpaceRef) -> Self {
        Self::new(Domain::empty(), Bdd::constant(space, false))
    }

    /// The singleton `{v}`, over a domain just large enough.
    pub fn singleton(space: &SpaceRef, v: u32) -> Self {
        let mut s = Self::empty(space);
        s.insert(v);
        s
    }

    /// The interval `{from_v..=to_v}`, over a domain just large enough.
    pub fn interval(space: &SpaceRef, from_v: u32, to_v: u32) -> Self {
        let vs = Domain::new(0, Bdd::n_vars_needed(to_v + 1), 1);
        let bdd = Bdd::value_range(space, &vs, from_v, to_v);
        Self::new(vs, bdd)
    }

    /// The singleton `{v}` over the domain of `set`.
    pub fn with_value(set: &Set, v: u32) -> Self {
        Self::new(set.domain().clone(), Bdd::value(set.bdd().space(), set.domain(), v))
    }

    /// The interval `{from_v..=to_v}` over the domain of `set`.
    pub fn with_interval(set: &Set, from_v: u32, to_v: u32) -> Self {
        Self::new(
            set.domain().clone(),
            Bdd::value_range(set.bdd().space(), set.domain(), from_v, to_v),
        )
    }

    /// The empty set over the domain of `set`.
    pub fn empty_like(set: &Set) -> Self {
        Self::new(set.domain().clone(), Bdd::constant(set.bdd().space(), false))
    }

    /// The universal set over the domain of `set`.
    pub fn universal_like(set: &Set) -> Self {
        Self::new(set.domain().clone(), Bdd::constant(set.bdd().space(), true))
    }

    pub fn domain(&self) -> &Domain {
        self.rel.domain(0)
    }

    pub fn bdd(&self) -> &Bdd {
        self.rel.bdd()
    }

    pub fn as_relation(&self) -> &Relation {
        &self.rel
    }

    pub fn into_relation(self) -> Relation {
        self.rel
    }

    /// Retypes this set at `d` with automatic renaming.
    pub fn with_domain(&self, d: &Domain) -> Set {
        Self {
            rel: self.rel.with_domains(&Domains::from(d.clone())),
        }
    }

    /// Extends the domain to `to`, constraining new variables to
    /// `new_vars_value`.
    pub fn extend_domain(&self, to: &Domain, new_vars_value: bool) -> Set {
        Self {
            rel: self.rel.extend_domain(0, to, new_vars_value),
        }
    }

    /// Reduces the domain to `to`, projecting the dropped variables.
    pub fn reduce_domain(&self, to: &Domain) -> Set {
        Self {
            rel: self.rel.reduce_domain(0, to),
        }
    }

    /// The image of this set under a binary relation.
    pub fn compose(&self, rel: &Relation) -> Set {
        Self::from_relation(self.rel.compose(0, rel))
    }

    /// General product at the sup type.
    pub fn product(&self, s2: &Set, op: ProductOp) -> Set {
        Self {
            rel: self.rel.product(&s2.rel, op),
        }
    }

    /// Inserts `v`, extending the domain with fresh high variables when
    /// it is too small. Returns whether the value was new.
    pub fn insert(&mut self, v: u32) -> bool {
        let n_vars = Bdd::n_vars_needed(v + 1) as usize;

        if self.domain().size() < n_vars {
            let mut pool = crate::pool::VarPool::new();
            // New variables must sit above the current domain.
            pool.alloc_domain(&(self.domain() | &Domain::new(0, self.domain().higher(), 1)));
            let extra = pool.alloc(n_vars - self.domain().size());

            *self = self.extend_domain(&(self.domain() | &extra), false);
        } else if self.member(v) {
            return false;
        }

        let space = self.bdd().space().clone();
        let value = Bdd::value(&space, self.domain(), v);
        self.rel = Relation::new(Domains::from(self.domain().clone()), self.bdd() | &value);

        true
    }

    /// Membership test.
    pub fn member(&self, v: u32) -> bool {
        if Bdd::n_vars_needed(v + 1) as usize > self.domain().size() {
            return false;
        }

        self.bdd().value_member(self.domain(), v)
    }

    pub fn is_empty(&self) -> bool {
        self.rel.is_false()
    }

    /// Number of elements (satisfying assignments over the domain).
    pub fn size(&self) -> BigUint {
        self.bdd().n_assignments(&self.finite_domain())
    }

    /// The elements in ascending order.
    ///
    /// An infinite domain is truncated to the prefix reaching the BDD's
    /// highest variable.
    pub fn values(&self) -> Vec<u32> {
        self.bdd().assignments_value(&self.finite_domain()).into_iter().collect()
    }

    /// Iterates the elements in ascending order.
    ///
    /// The value set is materialized once up front.
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.values().into_iter()
    }

    fn finite_domain(&self) -> Domain {
        if self.domain().is_finite() {
            self.domain().clone()
        } else {
            self.domain() & &Domain::new(0, self.bdd().highest_var() + 1, 1)
        }
    }

    /// An injection from the elements of this set onto `[0, |set|)`,
    /// as the enumeration relation of its singletons.
    pub fn compress(&self) -> Relation {
        let singletons: Vec<Set> = self.iter().map(|v| Set::with_value(self, v)).collect();

        Relation::enumeration(&singletons)
    }

    /// Colors a family of sets: each domain is extended by
    /// `color_domain`, constrained to the set's index in the family.
    pub fn color(color_domain: &Domain, sets: Vec<Set>) -> Vec<Set> {
        let rels = sets.into_iter().map(Set::into_relation).collect();

        Relation::color(0, color_domain, rels).into_iter().map(Set::from_relation).collect()
    }
}

macro_rules! set_binop {
    ($trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait for &Set {
            type Output = Set;

            fn $method(self, rhs: &Set) -> Set {
                self.product(rhs, $op)
            }
        }

        impl std::ops::$trait for Set {
            type Output = Set;

            fn $method(self, rhs: Set) -> Set {
                self.product(&rhs, $op)
            }
        }

        impl std::ops::$trait<&Set> for Set {
            type Output = Set;

            fn $method(self, rhs: &Set) -> Set {
                self.product(rhs, $op)
            }
        }

        impl std::ops::$trait<Set> for &Set {
            type Output = Set;

            fn $method(self, rhs: Set) -> Set {
                self.product(&rhs, $op)
            }
        }
    };
}

set_binop!(BitAnd, bitand, ProductOp::AND);
set_binop!(BitOr, bitor, ProductOp::OR);
set_binop!(Sub, sub, ProductOp::MINUS);

// Negation: the universe is {0..2^n-1} for the domain.
impl std::ops::Not for &Set {
    type Output = Set;

    fn not(self) -> Set {
        Set {
            rel: !self.as_relation(),
        }
    }
}

impl std::ops::Not for Set {
    type Output = Set;

    fn not(self) -> Set {
        !&self
    }
}

impl Hash for Set {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bdd().hash(state);
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.rel, f)
    }
}

impl fmt::Debug for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Set{{")?;
        for (i, v) in self.values().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "}}")
    }
}
