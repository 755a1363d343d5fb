//! Typed relations: a BDD together with the domains interpreting it.
//!
//! A [`Relation`] is a [`Bdd`] paired with a [`Domains`] vector stating
//! which variables encode which component; the arity of the relation is
//! the number of domains. All operations rewrite both the domains and
//! the BDD, renaming automatically so the caller never manages variable
//! identifiers by hand.
//!
//! The following builds the relation `{(0,10),(2,10),(5,10)}` and the
//! mapper `{(0,0),(2,1),(5,2)}` on disjoint variables, composes them in
//! the first component, and compares against the expected result —
//! the renaming between the two variable layouts is automatic:
//!
//! ```
//! use bddrel::bdd::Bdd;
//! use bddrel::domain::Domain;
//! use bddrel::relation::Relation;
//! use bddrel::space::default_space;
//!
//! let space = default_space();
//! let ds1 = Domain::new(0, 5, 1) * Domain::new(5, 5, 1);
//! let ds2 = Domain::new(3, 5, 1) * Domain::new(9, 5, 1);
//!
//! let rel1 = Relation::new(
//!     ds1.clone(),
//!     (Bdd::value(&space, &ds1[0], 0) | Bdd::value(&space, &ds1[0], 2) | Bdd::value(&space, &ds1[0], 5))
//!         & Bdd::value(&space, &ds1[1], 10),
//! );
//! let rel2 = Relation::new(
//!     ds1.clone(),
//!     (Bdd::value(&space, &ds1[0], 0) | Bdd::value(&space, &ds1[0], 1) | Bdd::value(&space, &ds1[0], 2))
//!         & Bdd::value(&space, &ds1[1], 10),
//! );
//! let mapper = Relation::new(
//!     ds2.clone(),
//!     (Bdd::value(&space, &ds2[0], 0) & Bdd::value(&space, &ds2[1], 0))
//!         | (Bdd::value(&space, &ds2[0], 2) & Bdd::value(&space, &ds2[1], 1))
//!         | (Bdd::value(&space, &ds2[0], 5) & Bdd::value(&space, &ds2[1], 2)),
//! );
//!
//! assert_eq!(rel1.compose(0, &mapper), rel2);
//! ```

use std::fmt;

use crate::bdd::Bdd;
use crate::domain::{Domain, Domains};
use crate::pool::VarPool;
use crate::set::Set;
use crate::space::{ProductOp, SpaceRef};
use crate::types::VarMap;

#[derive(Clone)]
pub struct Relation {
    domains: Domains,
    bdd: Bdd,
}

impl Relation {
    /// A relation from its type and its BDD.
    pub fn new(domains: Domains, bdd: Bdd) -> Self {
        Self { domains, bdd }
    }

    /// The empty relation of the given arity, with empty domains that
    /// grow on [`insert`][Relation::insert].
    pub fn empty(space: &SpaceRef, arity: usize) -> Self {
        Self::new(Domains::new(arity), Bdd::constant(space, false))
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn domain(&self, idx: usize) -> &Domain {
        &self.domains[idx]
    }

    pub fn arity(&self) -> usize {
        self.domains.len()
    }

    pub fn bdd(&self) -> &Bdd {
        &self.bdd
    }

    pub fn space(&self) -> &SpaceRef {
        self.bdd.space()
    }

    pub fn is_false(&self) -> bool {
        self.bdd.is_false()
    }

    pub fn is_true(&self) -> bool {
        self.bdd.is_true()
    }

    /// Retypes this relation at `ds`, renaming the BDD so the old
    /// variable layout becomes the new one.
    ///
    /// Infinite components of the current type are first truncated to
    /// the prefix reaching the BDD's highest variable. Components of
    /// `ds` larger than their finite counterpart are filled up with new
    /// variables constrained to false; an infinite component of `ds` is
    /// adopted as-is after renaming its finite prefix.
    pub fn with_domains(&self, ds: &Domains) -> Relation {
        assert_eq!(ds.len(), self.arity(), "with_domains: arity mismatch");

        if &self.domains == ds {
            return self.clone();
        }

        let mut old_domains = self.domains.clone();

        // Make infinite components finite by looking at the BDD.
        if old_domains.is_some_infinite() {
            let high = self.bdd.highest_var();
            for i in 0..old_domains.len() {
                if old_domains[i].is_infinite() {
                    old_domains[i] = &old_domains[i] & &Domain::new(0, high + 1, 1);
                }
            }
        }

        let new_domains = ds.cut_to_same_sizes(&old_domains);

        let old_vars = old_domains.union_all();
        let new_vars = new_domains.union_all();

        // Rename through a temporary layout disjoint from both.
        let mut pool = VarPool::new();
        pool.alloc_domain(&(&old_vars | &new_vars));
        let temp_vars = pool.alloc(old_vars.size());
        let old_to_temp = Domain::map_vars(&old_vars, &temp_vars);

        let mut temp_to_new = VarMap::new();
        for (od, nd) in old_domains.iter().zip(new_domains.iter()) {
            temp_to_new = temp_to_new | Domain::map_vars(&od.transform_map(&old_to_temp), nd);
        }

        let bdd = self.bdd.rename(&old_to_temp).rename(&temp_to_new);
        let mut res = Relation::new(new_domains.clone(), bdd);

        // Components that were cut get extended or adopted.
        for i in 0..ds.len() {
            if new_domains[i] != ds[i] {
                if ds[i].is_finite() {
                    res = res.extend_domain(i, &ds[i], false);
                } else {
                    res.domains[i] = ds[i].clone();
                }
            }
        }

        res
    }

    /// Extends component `idx` to `to`, constraining every new variable
    /// to `default_bit`. The current domain must be a prefix of `to`.
    pub fn extend_domain(&self, idx: usize, to: &Domain, default_bit: bool) -> Relation {
        let from = self.domain(idx);

        let mut to_iter = to.iter();
        for fv in from.iter() {
            let tv = to_iter.next().expect("extend_domain: target smaller than source");
            assert_eq!(fv, tv, "extend_domain: current domain is not a prefix of the target");
        }

        let mut bdd = self.bdd.clone();
        for tv in to_iter {
            bdd = bdd.constrain_var(tv, default_bit);
        }

        let mut new_domains = self.domains.clone();
        new_domains[idx] = to.clone();

        Relation::new(new_domains, bdd)
    }

    /// Reduces component `idx` to `to`, projecting the dropped trailing
    /// variables away. `to` must be a prefix of the current domain.
    pub fn reduce_domain(&self, idx: usize, to: &Domain) -> Relation {
        let from = self.domain(idx);

        let mut from_iter = from.iter();
        for tv in to.iter() {
            let fv = from_iter.next().expect("reduce_domain: target larger than source");
            assert_eq!(fv, tv, "reduce_domain: target is not a prefix of the current domain");
        }
        let remaining: Domain = from_iter.collect();

        let bdd = self.bdd.project_vars(&remaining);

        let mut new_domains = self.domains.clone();
        new_domains[idx] = to.clone();

        Relation::new(new_domains, bdd)
    }

    /// General product: retypes both relations at the componentwise sup
    /// and combines the BDDs with `op`.
    pub fn product(&self, r2: &Relation, op: ProductOp) -> Relation {
        let res_domains = Domains::sup(&self.domains, &r2.domains);

        let p1 = self.with_domains(&res_domains);
        let p2 = r2.with_domains(&res_domains);

        Relation::new(res_domains, p1.bdd.product(&p2.bdd, op))
    }

    /// IFF product.
    pub fn iff(rel1: &Relation, rel2: &Relation) -> Relation {
        rel1.product(rel2, ProductOp::IFF)
    }

    /// IMPLIES product.
    pub fn implies(rel1: &Relation, rel2: &Relation) -> Relation {
        rel1.product(rel2, ProductOp::IMPLIES)
    }

    /// The relation whose components are drawn independently from the
    /// given sets, retyped at `domains`.
    pub fn cross_product(domains: &Domains, sets: &[Set]) -> Relation {
        assert!(!sets.is_empty(), "cross_product of no sets");
        assert_eq!(domains.len(), sets.len(), "cross_product: arity mismatch");

        let mut bdd = sets[0].with_domain(&domains[0]).bdd().clone();
        for (i, s) in sets.iter().enumerate().skip(1) {
            bdd = &bdd & s.with_domain(&domains[i]).bdd();
        }

        Relation::new(domains.clone(), bdd)
    }

    /// Projects onto component `idx`: all other components are
    /// existentially projected away.
    ///
    /// For an infinite component, only its prefix up to the BDD's
    /// highest variable is projected.
    pub fn project_on(&self, idx: usize) -> Set {
        let mut dom_project = Domain::empty();
        for (j, d) in self.domains.iter().enumerate() {
            if j != idx {
                if d.is_finite() {
                    dom_project = &dom_project | d;
                } else {
                    dom_project = &dom_project | &(d & &Domain::new(0, self.bdd.highest_var() + 1, 1));
                }
            }
        }

        Set::new(self.domain(idx).clone(), self.bdd.project_vars(&dom_project))
    }

    /// Projects component `idx` away, keeping the arity: the result no
    /// longer constrains that component.
    pub fn project(&self, idx: usize) -> Relation {
        let d = self.domain(idx);
        let bdd = if d.is_finite() {
            self.bdd.project_vars(d)
        } else {
            self.bdd.project_vars(&(d & &Domain::new(0, self.bdd.highest_var() + 1, 1)))
        };

        Relation::new(self.domains.clone(), bdd)
    }

    /// Restricts component `idx` to the set `to` (cast into the
    /// component's domain).
    pub fn restrict(&self, idx: usize, to: &Set) -> Relation {
        let adapted = to.with_domain(self.domain(idx));

        Relation::new(self.domains.clone(), adapted.bdd() & &self.bdd)
    }

    /// Applies the binary relation `rel` in component `idx`: relates
    /// `x` to `y` whenever this relation holds with `z` in component
    /// `idx` and `rel` maps `z` to `y`.
    ///
    /// `rel.domain(0)` must be compatible with the component's domain;
    /// `rel.domain(1)` is escaped onto fresh variables when it overlaps
    /// this relation's support.
    pub fn compose(&self, idx: usize, rel: &Relation) -> Relation {
        assert_eq!(rel.arity(), 2, "compose needs a binary relation");
        assert!(
            self.domain(idx).is_compatible(rel.domain(0)),
            "compose: component domain incompatible with the relation's range"
        );

        let (escaped, dom_im) = escape_from_domain(self, rel.domain(1));
        let dom_range = escaped.domain(idx).clone();

        let escaped_rel = rel.with_domains(&(dom_range.clone() * dom_im.clone()));

        let mut doms_result = escaped.domains.clone();
        doms_result[idx] = dom_im;

        let combined = &escaped.bdd & &escaped_rel.bdd;
        let projected = if dom_range.is_finite() {
            combined.project_vars(&dom_range)
        } else {
            combined.project_vars(&(&dom_range & &Domain::new(0, combined.highest_var() + 1, 1)))
        };

        Relation::new(doms_result, projected)
    }

    /// Inserts a tuple, extending component domains as needed.
    pub fn insert(&mut self, vals: &[u32]) {
        assert_eq!(vals.len(), self.arity(), "insert: tuple arity mismatch");

        let space = self.space().clone();
        let mut new_v = Bdd::constant(&space, true);

        for (i, &v) in vals.iter().enumerate() {
            let n_vars = Bdd::n_vars_needed(v + 1) as usize;

            if self.domain(i).size() < n_vars {
                // New variables must sit above the component's current ones.
                let mut pool = VarPool::new();
                pool.alloc_domain(&(&self.domains.union_all() | &Domain::new(0, self.domain(i).higher(), 1)));
                let extra = pool.alloc(n_vars - self.domain(i).size());

                *self = self.extend_domain(i, &(self.domain(i) | &extra), false);
            }

            new_v = new_v & Bdd::value(&space, self.domain(i), v);
        }

        self.bdd = &self.bdd | &new_v;
    }

    /// Inserts a pair into a binary relation.
    pub fn insert2(&mut self, v1: u32, v2: u32) {
        self.insert(&[v1, v2]);
    }

    /// The membership relation of a family of sets over a common
    /// domain: `R(x, i)` iff `x` is in `sets[i]`. The enumeration
    /// component gets fresh variables above the sets' domain.
    pub fn enumeration(sets: &[Set]) -> Relation {
        assert!(!sets.is_empty(), "enumeration of no sets");

        let set_domain = sets[0].domain().clone();
        assert!(set_domain.is_finite(), "enumeration needs a finite set domain");

        let mut pool = VarPool::new();
        pool.alloc_domain(&set_domain);
        let dom_enum = pool.alloc(Bdd::n_vars_needed(sets.len() as u32) as usize);

        Self::enumeration_in(sets, dom_enum)
    }

    /// The membership relation with an explicit enumeration domain.
    pub fn enumeration_in(sets: &[Set], dom_enum: Domain) -> Relation {
        assert!(!sets.is_empty(), "enumeration of no sets");

        let space = sets[0].bdd().space().clone();
        let mut new_rel = Bdd::constant(&space, false);
        for (i, s) in sets.iter().enumerate() {
            new_rel = new_rel | (s.bdd() & Bdd::value(&space, &dom_enum, i as u32));
        }

        Relation::new(sets[0].domain().clone() * dom_enum, new_rel)
    }

    /// Colors a family of relations: component `idx` of each is
    /// extended by `color_domain`, constrained to the relation's index
    /// in the family.
    pub fn color(idx: usize, color_domain: &Domain, rels: Vec<Relation>) -> Vec<Relation> {
        let mut res = Vec::new();

        for (color, r) in rels.into_iter().enumerate() {
            let space = r.space().clone();
            let colored = r.bdd() & Bdd::value(&space, color_domain, color as u32);

            let mut doms = r.domains.clone();
            doms[idx] = &doms[idx] | color_domain;

            res.push(Relation::new(doms, colored));
        }

        res
    }
}

/// Retypes `r` so that its domains are disjoint from `d`.
///
/// Finite case: overlapping components move to fresh variables and `d`
/// stays put. Infinite case: `r`'s components double onto the even
/// positions and `d` moves to the odd ones. Returns the escaped relation
/// and the domain to use in place of `d`.
fn escape_from_domain(r: &Relation, d: &Domain) -> (Relation, Domain) {
    if r.domains().is_disjoint_dom(d) {
        return (r.clone(), d.clone());
    }

    if d.is_infinite() || r.domains().is_some_infinite() {
        let doms: Domains = r.domains().iter().map(|c| c * 2).collect();
        let d_new = &(d * 2) + 1;

        return (r.with_domains(&doms), d_new);
    }

    // All domains finite: overlapping components escape to variables
    // outside both d and the relation's support.
    let mut pool = VarPool::new();
    pool.alloc_domain(&(d | &r.domains().union_all()));

    let mut new_doms = r.domains().clone();
    for i in 0..new_doms.len() {
        if !new_doms[i].is_disjoint(d) {
            new_doms[i] = pool.alloc(new_doms[i].size());
        }
    }

    (r.with_domains(&new_doms), d.clone())
}

impl PartialEq for Relation {
    fn eq(&self, other: &Self) -> bool {
        if self.arity() != other.arity() {
            return false;
        }

        let res_domains = Domains::sup(&self.domains, &other.domains);

        self.with_domains(&res_domains).bdd == other.with_domains(&res_domains).bdd
    }
}

impl Eq for Relation {}

macro_rules! relation_binop {
    ($trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait for &Relation {
            type Output = Relation;

            fn $method(self, rhs: &Relation) -> Relation {
                self.product(rhs, $op)
            }
        }

        impl std::ops::$trait for Relation {
            type Output = Relation;

            fn $method(self, rhs: Relation) -> Relation {
                self.product(&rhs, $op)
            }
        }

        impl std::ops::$trait<&Relation> for Relation {
            type Output = Relation;

            fn $method(self, rhs: &Relation) -> Relation {
                self.product(rhs, $op)
            }
        }

        impl std::ops::$trait<Relation> for &Relation {
            type Output = Relation;

            fn $method(self, rhs: Relation) -> Relation {
                self.product(&rhs, $op)
            }
        }
    };
}

relation_binop!(BitAnd, bitand, ProductOp::AND);
relation_binop!(BitOr, bitor, ProductOp::OR);
relation_binop!(Sub, sub, ProductOp::MINUS);

// Negation: the universe is {0..2^n-1} for each component.
impl std::ops::Not for &Relation {
    type Output = Relation;

    fn not(self) -> Relation {
        Relation::new(self.domains.clone(), !&self.bdd)
    }
}

impl std::ops::Not for Relation {
    type Output = Relation;

    fn not(self) -> Relation {
        !&self
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("arity", &self.arity())
            .field("bdd", &self.bdd)
            .finish()
    }
}

impl fmt::Display for Relation {
    /// Prints the tuples of the relation.
    ///
    /// Each component is projected to a set; the Cartesian product of
    /// those sets is walked in ascending order and a tuple is emitted
    /// when its singleton encoding intersects the relation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;

        let arity = self.arity();
        if arity == 0 {
            return write!(f, "}}");
        }

        let projected: Vec<Set> = (0..arity).map(|i| self.project_on(i)).collect();
        let value_lists: Vec<Vec<u32>> = projected.iter().map(|s| s.values()).collect();

        if value_lists.iter().any(|l| l.is_empty()) {
            return write!(f, "}}");
        }

        let mut idx = vec![0usize; arity];
        loop {
            let element: Vec<Set> = (0..arity)
                .map(|i| Set::with_value(&projected[i], value_lists[i][idx[i]]))
                .collect();
            let prod = Relation::cross_product(&self.domains, &element);

            if !(&prod & self).is_false() {
                write!(f, "({}", value_lists[0][idx[0]])?;
                for i in 1..arity {
                    write!(f, ",{}", value_lists[i][idx[i]])?;
                }
                write!(f, ")")?;
            }

            // Advance to the next tuple.
            let mut i = arity - 1;
            loop {
                idx[i] += 1;
                if idx[i] < value_lists[i].len() {
                    break;
                }
                idx[i] = 0;
                if i == 0 {
                    return write!(f, "}}");
                }
                i -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::default_space;

    fn value_rel(space: &SpaceRef, ds: &Domains, vals: &[u32]) -> Relation {
        let mut bdd = Bdd::constant(space, true);
        for (i, &v) in vals.iter().enumerate() {
            bdd = bdd & Bdd::value(space, &ds[i], v);
        }
        Relation::new(ds.clone(), bdd)
    }

    #[test]
    fn test_with_domains_identity() {
        let space = default_space();
        let ds = Domain::new(0, 3, 1) * Domain::new(3, 3, 1);
        let r = value_rel(&space, &ds, &[1, 2]);

        assert_eq!(r.with_domains(&ds), r);
    }

    #[test]
    fn test_with_domains_renames() {
        let space = default_space();
        let ds1 = Domain::new(0, 3, 1) * Domain::new(3, 3, 1);
        let ds2 = Domain::new(10, 3, 1) * Domain::new(20, 3, 1);

        let r = value_rel(&space, &ds1, &[1, 2]);
        let moved = r.with_domains(&ds2);

        assert_eq!(moved.domains(), &ds2);
        assert_eq!(moved, value_rel(&space, &ds2, &[1, 2]));
        // Retyping at equal component sizes is semantic identity.
        assert_eq!(moved, r);
    }

    #[test]
    fn test_with_domains_overlapping_layouts() {
        let space = default_space();
        // The target layout overlaps the source layout.
        let ds1 = Domain::new(0, 3, 1) * Domain::new(3, 3, 1);
        let ds2 = Domain::new(2, 3, 1) * Domain::new(5, 3, 1);

        let r = value_rel(&space, &ds1, &[4, 3]);
        let moved = r.with_domains(&ds2);

        assert_eq!(moved, value_rel(&space, &ds2, &[4, 3]));
    }

    #[test]
    fn test_with_domains_extends_larger_target() {
        let space = default_space();
        let ds1 = Domains::from(Domain::new(0, 2, 1));
        let ds2 = Domains::from(Domain::new(0, 4, 1));

        let r = value_rel(&space, &ds1, &[2]);
        let extended = r.with_domains(&ds2);

        assert_eq!(extended.domains(), &ds2);
        // New high-order variables are constrained to false.
        assert_eq!(extended, value_rel(&space, &ds2, &[2]));
    }

    #[test]
    fn test_extend_and_reduce_domain() {
        let space = default_space();
        let ds = Domains::from(Domain::new(0, 2, 1));
        let r = value_rel(&space, &ds, &[3]);

        let big = Domain::new(0, 4, 1);
        let extended = r.extend_domain(0, &big, false);
        assert_eq!(extended.domain(0), &big);
        assert!(extended.bdd().value_member(&big, 3));
        assert!(!extended.bdd().value_member(&big, 11));

        let reduced = extended.reduce_domain(0, &Domain::new(0, 2, 1));
        assert_eq!(reduced, r);
    }

    #[test]
    #[should_panic(expected = "prefix")]
    fn test_extend_domain_needs_prefix() {
        let space = default_space();
        let ds = Domains::from(Domain::new(1, 2, 1));
        let r = value_rel(&space, &ds, &[0]);

        r.extend_domain(0, &Domain::new(0, 4, 1), false);
    }

    #[test]
    fn test_products_unify_types() {
        let space = default_space();
        let ds1 = Domain::new(0, 5, 1) * Domain::new(5, 5, 1);
        let ds2 = Domain::new(3, 5, 1) * Domain::new(9, 5, 1);

        let a = value_rel(&space, &ds1, &[1, 2]) | value_rel(&space, &ds1, &[1, 3]);
        let b = value_rel(&space, &ds1, &[1, 2]);
        let c = value_rel(&space, &ds2, &[1, 2]);

        assert!(!(&a & &b).is_false());
        assert_eq!(&a & &b, &a & &c);
        assert_eq!(&a - &b, value_rel(&space, &ds1, &[1, 3]));
    }

    #[test]
    fn test_negation() {
        let space = default_space();
        let ds = Domains::from(Domain::new(0, 2, 1));
        let r = value_rel(&space, &ds, &[1]);

        let complement = !&r;
        assert!((&r & &complement).is_false());
        assert!((&r | &complement).is_true());
        assert_eq!(!&complement, r);
    }

    #[test]
    fn test_project_on_and_restrict() {
        let space = default_space();
        let ds = Domain::new(0, 3, 1) * Domain::new(3, 3, 1);

        let mut r = Relation::new(ds.clone(), Bdd::constant(&space, false));
        for (a, b) in [(1, 4), (2, 4), (2, 5)] {
            let t = value_rel(&space, &ds, &[a, b]);
            r = &r | &t;
        }

        let left = r.project_on(0);
        assert_eq!(left.values(), vec![1, 2]);
        let right = r.project_on(1);
        assert_eq!(right.values(), vec![4, 5]);

        let only2 = Set::new(ds[0].clone(), Bdd::value(&space, &ds[0], 2));
        let restricted = r.restrict(0, &only2);
        assert_eq!(restricted.project_on(1).values(), vec![4, 5]);
        assert_eq!(restricted.project_on(0).values(), vec![2]);
    }

    #[test]
    fn test_project_keeps_arity() {
        let space = default_space();
        let ds = Domain::new(0, 2, 1) * Domain::new(2, 2, 1);
        let r = value_rel(&space, &ds, &[1, 2]);

        let projected = r.project(1);
        assert_eq!(projected.arity(), 2);
        // The second component no longer constrains.
        for b in 0..4 {
            assert_eq!(&projected & &value_rel(&space, &ds, &[1, b]), value_rel(&space, &ds, &[1, b]));
        }
    }

    #[test]
    fn test_insert_extends_domains() {
        let space = default_space();
        let mut r = Relation::empty(&space, 2);

        r.insert2(1, 5);
        r.insert2(2, 6);

        let ds = Domain::new(0, 2, 1) * Domain::new(2, 3, 1);
        let expected = &value_rel(&space, &ds, &[1, 5]) | &value_rel(&space, &ds, &[2, 6]);

        assert_eq!(r, expected);
    }

    #[test]
    fn test_display_tuples() {
        let space = default_space();
        let ds = Domain::new(0, 2, 1) * Domain::new(2, 2, 1);

        let r = &value_rel(&space, &ds, &[1, 2]) | &value_rel(&space, &ds, &[3, 0]);
        assert_eq!(r.to_string(), "{(1,2)(3,0)}");

        let empty = Relation::new(ds.clone(), Bdd::constant(&space, false));
        assert_eq!(empty.to_string(), "{}");
    }

    #[test]
    fn test_enumeration() {
        let space = default_space();
        let d = Domain::new(0, 3, 1);

        let sets: Vec<Set> = (0..3)
            .map(|i| Set::new(d.clone(), Bdd::value(&space, &d, i) | Bdd::value(&space, &d, i + 4)))
            .collect();

        let e = Relation::enumeration(&sets);
        assert_eq!(e.arity(), 2);

        for (i, s) in sets.iter().enumerate() {
            let im = e.restrict(1, &Set::new(e.domain(1).clone(), Bdd::value(&space, e.domain(1), i as u32)));
            assert_eq!(im.project_on(0), *s);
        }
    }

    #[test]
    fn test_cross_product() {
        let space = default_space();
        let ds = Domain::new(0, 2, 1) * Domain::new(2, 2, 1);

        let s1 = Set::new(ds[0].clone(), Bdd::value(&space, &ds[0], 1) | Bdd::value(&space, &ds[0], 2));
        let s2 = Set::new(ds[1].clone(), Bdd::value(&space, &ds[1], 3));

        let r = Relation::cross_product(&ds, &[s1, s2]);
        let expected = &value_rel(&space, &ds, &[1, 3]) | &value_rel(&space, &ds, &[2, 3]);
        assert_eq!(r, expected);
    }
}
