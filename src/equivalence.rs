//! Equivalence relations and quotienting.
//!
//! An [`EquivalenceRelation`] is a binary relation required to be
//! reflexive, symmetric and transitive; the requirement is a documented
//! precondition and is not checked at construction. Its partition of a
//! set is computed by [`quotient`][EquivalenceRelation::quotient].

use std::fmt;

use crate::bdd::Bdd;
use crate::binary::BinaryRelation;
use crate::domain::Domain;
use crate::relation::Relation;
use crate::set::Set;
use crate::space::{ProductOp, SpaceRef};

/// A binary relation that partitions the values it relates.
///
/// Two values are related iff they lie in the same class of the
/// partition.
#[derive(Clone, PartialEq, Eq)]
pub struct EquivalenceRelation {
    rel: BinaryRelation,
}

impl EquivalenceRelation {
    /// An equivalence relation from its two domains and its BDD.
    ///
    /// The BDD must denote a reflexive, symmetric and transitive
    /// relation over the two (compatible) domains.
    pub fn new(domain1: Domain, domain2: Domain, bdd: Bdd) -> Self {
        Self {
            rel: BinaryRelation::new(domain1, domain2, bdd),
        }
    }

    /// Retypes `r` at the two domains, renaming automatically.
    pub fn adapt(domain1: Domain, domain2: Domain, r: &EquivalenceRelation) -> Self {
        Self {
            rel: BinaryRelation::adapt(domain1, domain2, &r.rel),
        }
    }

    /// Views a binary relation as an equivalence.
    pub fn from_binary(rel: BinaryRelation) -> Self {
        Self { rel }
    }

    pub fn as_binary(&self) -> &BinaryRelation {
        &self.rel
    }

    pub fn as_relation(&self) -> &Relation {
        self.rel.as_relation()
    }

    pub fn bdd(&self) -> &Bdd {
        self.rel.bdd()
    }

    /// The identity relation between two domains: `x ~ y` iff the
    /// encodings agree variable by variable.
    pub fn identity(space: &SpaceRef, domain1: &Domain, domain2: &Domain) -> Self {
        Self::new(domain1.clone(), domain2.clone(), Bdd::vars_equal(space, domain1, domain2))
    }

    /// Restricts both components to `s`.
    pub fn restrict(&self, s: &Set) -> EquivalenceRelation {
        Self {
            rel: self.rel.restrict_range(s).restrict_image(s),
        }
    }

    /// The image of `s` under the relation.
    pub fn image_under(&self, s: &Set) -> Set {
        self.rel.image_under(s)
    }

    /// The preimage of `s` under the relation.
    pub fn range_under(&self, s: &Set) -> Set {
        self.rel.range_under(s)
    }

    /// Partitions `s` into its equivalence classes.
    ///
    /// Each returned set is one class of `s ∩ range(self)`, expressed
    /// over the relation's image variables; classes disjoint from `s`
    /// contribute nothing. The classes come in the canonical (node id)
    /// order of their representing subtrees.
    pub fn quotient(&self, s: &Set) -> Vec<Set> {
        let orig_dom1 = self.as_relation().domain(1).clone();
        let mut dom0 = self.as_relation().domain(0).clone();
        let mut dom1 = orig_dom1.clone();
        let bdd = self.bdd();

        if dom0.is_infinite() {
            // Both domains must then be infinite, i.e. interleaved;
            // truncate to the prefix reaching the BDD's highest variable.
            let sz = (bdd.highest_var() + 1) as usize;
            dom0 = dom0.first_n(sz);
            dom1 = dom1.first_n(sz);
        } else if dom0.is_empty() {
            // Nothing distinguishes any two values: one class.
            return vec![s.clone()];
        }

        // Move the relation onto [n, 2n) and [2n, 2n + |dom1|).
        let n = dom0.size() as u32;
        let new_dom = Domain::new(n, n, 1);
        let new_im = Domain::new(2 * n, dom1.size() as u32, 1);

        let renamed = bdd.rename(&(Domain::map_vars(&dom0, &new_dom) | Domain::map_vars(&dom1, &new_im)));

        // One subtree per class: the image of the relation restricted to
        // a single range value.
        let threshold = new_im.lowest();
        let found_sets = renamed.subtrees_geq(threshold);

        // The image variables are contiguous from 2n.
        let dom_found = Domain::infinite(threshold, 1);
        let bdd_s = s.with_domain(&orig_dom1).bdd().rename(&Domain::map_vars(&dom1, &new_im));

        let mut res = Vec::new();
        for subtree in found_sets {
            let class_bdd = &subtree & &bdd_s;
            if !class_bdd.is_false() {
                res.push(Set::new(dom_found.clone(), class_bdd));
            }
        }

        res
    }
}

impl std::ops::BitAnd for &EquivalenceRelation {
    type Output = EquivalenceRelation;

    fn bitand(self, rhs: &EquivalenceRelation) -> EquivalenceRelation {
        EquivalenceRelation {
            rel: self.rel.product(&rhs.rel, ProductOp::AND),
        }
    }
}

impl std::ops::BitAnd for EquivalenceRelation {
    type Output = EquivalenceRelation;

    fn bitand(self, rhs: EquivalenceRelation) -> EquivalenceRelation {
        &self & &rhs
    }
}

impl std::ops::BitOr for &EquivalenceRelation {
    type Output = EquivalenceRelation;

    fn bitor(self, rhs: &EquivalenceRelation) -> EquivalenceRelation {
        EquivalenceRelation {
            rel: self.rel.product(&rhs.rel, ProductOp::OR),
        }
    }
}

impl std::ops::BitOr for EquivalenceRelation {
    type Output = EquivalenceRelation;

    fn bitor(self, rhs: EquivalenceRelation) -> EquivalenceRelation {
        &self | &rhs
    }
}

impl std::ops::Not for &EquivalenceRelation {
    type Output = EquivalenceRelation;

    fn not(self) -> EquivalenceRelation {
        EquivalenceRelation { rel: !&self.rel }
    }
}

impl fmt::Display for EquivalenceRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.rel, f)
    }
}

impl fmt::Debug for EquivalenceRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EquivalenceRelation({})", self.rel)
    }
}
