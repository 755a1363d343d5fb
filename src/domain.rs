//! Domains: the variable sets that type one component of a relation.
//!
//! A [`Domain`] is a semantic set of variables, either finite (an
//! ordered set) or infinite-periodic (`{from + i*step | i >= 0}`).
//! Interleaved infinite domains are the usual way to type the state
//! components of a transition relation:
//!
//! ```
//! use bddrel::domain::Domain;
//!
//! let d1 = Domain::new(0, 5, 1); // {0,1,2,3,4}
//! let d2 = Domain::new(5, 5, 1); // {5,6,7,8,9}
//! let d3 = Domain::new(0, 5, 2); // {0,2,4,6,8}
//! let d4 = Domain::new(1, 5, 2); // {1,3,5,7,9}
//! # assert_eq!(d3.size(), 5);
//! # assert!(d3.is_disjoint(&d4));
//! # assert!(d1.is_disjoint(&d2));
//! ```
//!
//! A [`Domains`] is an ordered vector of domains: the type of a
//! relation, one domain per component.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, Div, Index, IndexMut, Mul, Sub};

use crate::types::{Var, VarMap};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Repr {
    Finite(BTreeSet<Var>),
    Infinite { from: Var, step: Var },
}

/// A set of BDD variables representing one component of a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    repr: Repr,
}

impl Default for Domain {
    fn default() -> Self {
        Self::empty()
    }
}

impl Domain {
    /// The empty (finite) domain.
    pub fn empty() -> Self {
        Self {
            repr: Repr::Finite(BTreeSet::new()),
        }
    }

    /// The finite domain `{from + i*step | 0 <= i < n_vars}`.
    pub fn new(from: Var, n_vars: u32, step: u32) -> Self {
        assert!(step >= 1, "step must be at least 1");

        let mut vars = BTreeSet::new();
        let mut v = from;
        for _ in 0..n_vars {
            vars.insert(v);
            v += step;
        }
        Self { repr: Repr::Finite(vars) }
    }

    /// A finite domain from an explicit variable set.
    pub fn from_set(vars: BTreeSet<Var>) -> Self {
        Self { repr: Repr::Finite(vars) }
    }

    /// The infinite domain `{from + i*step | i >= 0}`.
    pub fn infinite(from: Var, step: Var) -> Self {
        assert!(step >= 1, "step must be at least 1");
        Self {
            repr: Repr::Infinite { from, step },
        }
    }

    /// Lays a finite domain onto an infinite base: the i-th variable of
    /// `from` becomes the i-th variable of `base`.
    pub fn on_base(base: &Domain, from: &Domain) -> Self {
        assert!(base.is_infinite(), "base must be infinite");
        assert!(from.is_finite(), "laid-out domain must be finite");

        let Repr::Infinite { from: b_from, step: b_step } = &base.repr else {
            unreachable!()
        };
        &(from * *b_step) + *b_from
    }

    pub fn is_finite(&self) -> bool {
        matches!(self.repr, Repr::Finite(_))
    }

    pub fn is_infinite(&self) -> bool {
        !self.is_finite()
    }

    pub fn is_empty(&self) -> bool {
        match &self.repr {
            Repr::Finite(vars) => vars.is_empty(),
            Repr::Infinite { .. } => false,
        }
    }

    /// Two domains are compatible iff both are infinite or both are
    /// finite with the same number of variables.
    pub fn is_compatible(&self, d2: &Domain) -> bool {
        (self.is_infinite() && d2.is_infinite()) || (self.is_finite() && d2.is_finite() && self.size() == d2.size())
    }

    /// Whether the two domains share no variable.
    pub fn is_disjoint(&self, d2: &Domain) -> bool {
        match (&self.repr, &d2.repr) {
            (Repr::Infinite { .. }, Repr::Infinite { from, step }) => {
                // Crude approximation over a prefix covering d2's start.
                self.first_n((*from + *step) as usize).is_disjoint(d2)
            }
            (Repr::Infinite { .. }, Repr::Finite(_)) => d2.is_disjoint(self),
            (Repr::Finite(vars), _) => vars.iter().all(|&v| !d2.contains(v)),
        }
    }

    /// Number of variables; the domain must be finite.
    pub fn size(&self) -> usize {
        match &self.repr {
            Repr::Finite(vars) => vars.len(),
            Repr::Infinite { .. } => panic!("size of infinite domain"),
        }
    }

    /// The lowest variable; the domain must be non-empty.
    pub fn lowest(&self) -> Var {
        assert!(!self.is_empty(), "lowest of empty domain");
        match &self.repr {
            Repr::Finite(vars) => *vars.iter().next().unwrap(),
            Repr::Infinite { from, .. } => *from,
        }
    }

    /// The highest variable; the domain must be finite and non-empty.
    pub fn highest(&self) -> Var {
        match &self.repr {
            Repr::Finite(vars) => *vars.iter().next_back().expect("highest of empty domain"),
            Repr::Infinite { .. } => panic!("highest of infinite domain"),
        }
    }

    /// A variable higher than every variable in this finite domain.
    pub fn higher(&self) -> Var {
        assert!(self.is_finite(), "higher of infinite domain");
        if self.is_empty() {
            0
        } else {
            self.highest() + 1
        }
    }

    /// Membership test.
    pub fn contains(&self, v: Var) -> bool {
        match &self.repr {
            Repr::Finite(vars) => vars.contains(&v),
            Repr::Infinite { from, step } => v >= *from && (v - from) % step == 0,
        }
    }

    /// The larger of the two domains; an infinite domain beats any finite
    /// one.
    pub fn sup(d1: &Domain, d2: &Domain) -> Domain {
        if d1.is_infinite() {
            return d1.clone();
        }
        if d2.is_infinite() {
            return d2.clone();
        }
        if d1.size() < d2.size() {
            d2.clone()
        } else {
            d1.clone()
        }
    }

    /// Applies `op` to every variable; the domain must be finite.
    pub fn transform(&self, op: impl Fn(Var) -> Var) -> Domain {
        match &self.repr {
            Repr::Finite(vars) => Domain::from_set(vars.iter().map(|&v| op(v)).collect()),
            Repr::Infinite { .. } => panic!("transform of infinite domain"),
        }
    }

    /// Renames every variable through `map`; the domain must be finite.
    pub fn transform_map(&self, map: &VarMap) -> Domain {
        self.transform(|v| map.map(v))
    }

    /// The `n` lowest variables, as a finite domain.
    pub fn first_n(&self, n: usize) -> Domain {
        Domain::from_set(self.iter().take(n).collect())
    }

    /// The `n` highest variables; the domain must be finite.
    pub fn last_n(&self, n: usize) -> Domain {
        match &self.repr {
            Repr::Finite(vars) => Domain::from_set(vars.iter().rev().take(n).copied().collect()),
            Repr::Infinite { .. } => panic!("last_n of infinite domain"),
        }
    }

    /// Keeps the lowest variables, as many as `d` has.
    pub fn cut_to_same_size(&self, d: &Domain) -> Domain {
        self.first_n(d.size())
    }

    /// Builds the renaming pairing the i-th variable of `vs1` with the
    /// i-th variable of `vs2`. Both domains must be finite and equally
    /// sized.
    pub fn map_vars(vs1: &Domain, vs2: &Domain) -> VarMap {
        assert!(vs1.is_finite() && vs2.is_finite(), "map_vars needs finite domains");
        assert_eq!(vs1.size(), vs2.size(), "map_vars needs equally sized domains");

        let mut map = VarMap::new();
        for (v1, v2) in vs1.iter().zip(vs2.iter()) {
            map.insert(v1, v2);
        }
        map
    }

    /// Iterates the variables in ascending order; endless for infinite
    /// domains.
    pub fn iter(&self) -> DomainIter<'_> {
        match &self.repr {
            Repr::Finite(vars) => DomainIter::Finite(vars.iter()),
            Repr::Infinite { from, step } => DomainIter::Infinite { next: *from, step: *step },
        }
    }
}

impl FromIterator<Var> for Domain {
    fn from_iter<T: IntoIterator<Item = Var>>(iter: T) -> Self {
        Domain::from_set(iter.into_iter().collect())
    }
}

pub enum DomainIter<'a> {
    Finite(std::collections::btree_set::Iter<'a, Var>),
    Infinite { next: Var, step: Var },
}

impl Iterator for DomainIter<'_> {
    type Item = Var;

    fn next(&mut self) -> Option<Var> {
        match self {
            DomainIter::Finite(i) => i.next().copied(),
            DomainIter::Infinite { next, step } => {
                let v = *next;
                *next += *step;
                Some(v)
            }
        }
    }
}

impl<'a> IntoIterator for &'a Domain {
    type Item = Var;
    type IntoIter = DomainIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Union: both domains must be finite.
impl BitOr for &Domain {
    type Output = Domain;

    fn bitor(self, rhs: &Domain) -> Domain {
        match (&self.repr, &rhs.repr) {
            (Repr::Finite(a), Repr::Finite(b)) => Domain::from_set(a.union(b).copied().collect()),
            _ => panic!("union of infinite domains"),
        }
    }
}

// Intersection: an infinite side is approximated by a finite prefix
// covering the other side.
impl BitAnd for &Domain {
    type Output = Domain;

    fn bitand(self, rhs: &Domain) -> Domain {
        match (&self.repr, &rhs.repr) {
            (Repr::Finite(a), _) => Domain::from_set(a.iter().copied().filter(|&v| rhs.contains(v)).collect()),
            (Repr::Infinite { .. }, Repr::Finite(_)) => rhs & self,
            (Repr::Infinite { .. }, Repr::Infinite { from, step }) => &self.first_n((*from + *step) as usize) & rhs,
        }
    }
}

// Difference: both domains must be finite.
impl Sub for &Domain {
    type Output = Domain;

    fn sub(self, rhs: &Domain) -> Domain {
        match (&self.repr, &rhs.repr) {
            (Repr::Finite(a), Repr::Finite(b)) => Domain::from_set(a.difference(b).copied().collect()),
            _ => panic!("difference of infinite domains"),
        }
    }
}

macro_rules! domain_setop_owned {
    ($trait:ident, $method:ident) => {
        impl $trait for Domain {
            type Output = Domain;

            fn $method(self, rhs: Domain) -> Domain {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&Domain> for Domain {
            type Output = Domain;

            fn $method(self, rhs: &Domain) -> Domain {
                (&self).$method(rhs)
            }
        }
    };
}

domain_setop_owned!(BitOr, bitor);
domain_setop_owned!(BitAnd, bitand);
domain_setop_owned!(Sub, sub);

impl Mul<u32> for &Domain {
    type Output = Domain;

    fn mul(self, k: u32) -> Domain {
        match &self.repr {
            Repr::Finite(_) => self.transform(|v| v * k),
            Repr::Infinite { from, step } => Domain::infinite(from * k, step * k),
        }
    }
}

impl Div<u32> for &Domain {
    type Output = Domain;

    fn div(self, k: u32) -> Domain {
        // Undefined on infinite domains (the step would not divide evenly).
        self.transform(|v| v / k)
    }
}

impl Add<u32> for &Domain {
    type Output = Domain;

    fn add(self, k: u32) -> Domain {
        match &self.repr {
            Repr::Finite(_) => self.transform(|v| v + k),
            Repr::Infinite { from, step } => Domain::infinite(from + k, *step),
        }
    }
}

impl Sub<u32> for &Domain {
    type Output = Domain;

    fn sub(self, k: u32) -> Domain {
        match &self.repr {
            Repr::Finite(_) => self.transform(|v| v - k),
            Repr::Infinite { from, step } => Domain::infinite(from - k, *step),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        match &self.repr {
            Repr::Finite(vars) => {
                for (i, v) in vars.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", v)?;
                }
            }
            Repr::Infinite { from, step } => {
                write!(f, "{},{},{},...", from, from + step, from + 2 * step)?;
            }
        }
        write!(f, "}}")
    }
}

/// A vector of domains: the type of a relation, one domain per component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Domains {
    doms: Vec<Domain>,
}

impl Domains {
    /// A sequence of `n` empty domains.
    pub fn new(n: usize) -> Self {
        Self {
            doms: vec![Domain::empty(); n],
        }
    }

    pub fn len(&self) -> usize {
        self.doms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Domain> {
        self.doms.iter()
    }

    pub fn is_some_infinite(&self) -> bool {
        self.doms.iter().any(|d| d.is_infinite())
    }

    /// Componentwise larger domains; the vectors must have equal length.
    pub fn sup(ds1: &Domains, ds2: &Domains) -> Domains {
        assert_eq!(ds1.len(), ds2.len(), "sup of domain vectors with different arity");

        ds1.iter().zip(ds2.iter()).map(|(d1, d2)| Domain::sup(d1, d2)).collect()
    }

    /// Union of all component domains.
    pub fn union_all(&self) -> Domain {
        let mut all = Domain::empty();
        for d in &self.doms {
            all = &all | d;
        }
        all
    }

    /// Whether no variable is shared between this vector and `ds2`.
    pub fn is_disjoint(&self, ds2: &Domains) -> bool {
        self.iter().all(|d| ds2.iter().all(|d2| d.is_disjoint(d2)))
    }

    /// Whether no variable of `d` occurs in any component.
    pub fn is_disjoint_dom(&self, d: &Domain) -> bool {
        self.iter().all(|c| c.is_disjoint(d))
    }

    /// Intersects every component with `d`.
    pub fn intersect_with(&self, d: &Domain) -> Domains {
        self.iter().map(|c| c & d).collect()
    }

    /// Cuts every component to the size of the corresponding component
    /// of `ds`.
    pub fn cut_to_same_sizes(&self, ds: &Domains) -> Domains {
        assert_eq!(self.len(), ds.len(), "cut_to_same_sizes with different arity");

        self.iter().zip(ds.iter()).map(|(d, other)| d.cut_to_same_size(other)).collect()
    }

    /// Applies `op` to every variable of every component.
    pub fn transform(&self, op: impl Fn(Var) -> Var) -> Domains {
        self.iter().map(|d| d.transform(&op)).collect()
    }
}

impl From<Domain> for Domains {
    fn from(d: Domain) -> Self {
        Self { doms: vec![d] }
    }
}

impl From<Vec<Domain>> for Domains {
    fn from(doms: Vec<Domain>) -> Self {
        Self { doms }
    }
}

impl FromIterator<Domain> for Domains {
    fn from_iter<T: IntoIterator<Item = Domain>>(iter: T) -> Self {
        Self {
            doms: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for Domains {
    type Output = Domain;

    fn index(&self, idx: usize) -> &Domain {
        &self.doms[idx]
    }
}

impl IndexMut<usize> for Domains {
    fn index_mut(&mut self, idx: usize) -> &mut Domain {
        &mut self.doms[idx]
    }
}

// ds1 * ds2: concatenation (the cross product of the types).
impl Mul for Domains {
    type Output = Domains;

    fn mul(mut self, rhs: Domains) -> Domains {
        self.doms.extend(rhs.doms);
        self
    }
}

impl Mul<Domain> for Domains {
    type Output = Domains;

    fn mul(mut self, rhs: Domain) -> Domains {
        self.doms.push(rhs);
        self
    }
}

impl Mul for Domain {
    type Output = Domains;

    fn mul(self, rhs: Domain) -> Domains {
        Domains { doms: vec![self, rhs] }
    }
}

impl Mul<Domains> for Domain {
    type Output = Domains;

    fn mul(self, rhs: Domains) -> Domains {
        let mut doms = vec![self];
        doms.extend(rhs.doms);
        Domains { doms }
    }
}
