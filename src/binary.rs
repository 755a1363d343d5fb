//! Binary relations: the arity-2 view of typed relations.

use std::fmt;

use crate::bdd::Bdd;
use crate::domain::Domain;
use crate::relation::Relation;
use crate::set::Set;
use crate::space::ProductOp;

/// A typed relation with exactly two components: a range (component 0)
/// and an image (component 1).
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryRelation {
    rel: Relation,
}

impl BinaryRelation {
    /// A binary relation from its two domains and its BDD.
    pub fn new(domain1: Domain, domain2: Domain, bdd: Bdd) -> Self {
        Self {
            rel: Relation::new(domain1 * domain2, bdd),
        }
    }

    /// Retypes `r` at the two domains, renaming automatically.
    pub fn adapt(domain1: Domain, domain2: Domain, r: &BinaryRelation) -> Self {
        Self {
            rel: r.rel.with_domains(&(domain1 * domain2)),
        }
    }

    /// Views an arity-2 relation as a binary relation.
    pub fn from_relation(rel: Relation) -> Self {
        assert_eq!(rel.arity(), 2, "a binary relation has arity 2");
        Self { rel }
    }

    pub fn as_relation(&self) -> &Relation {
        &self.rel
    }

    pub fn into_relation(self) -> Relation {
        self.rel
    }

    pub fn bdd(&self) -> &Bdd {
        self.rel.bdd()
    }

    pub fn range_domain(&self) -> &Domain {
        self.rel.domain(0)
    }

    pub fn image_domain(&self) -> &Domain {
        self.rel.domain(1)
    }

    /// Keeps only the pairs whose first component is in `s`.
    pub fn restrict_range(&self, s: &Set) -> BinaryRelation {
        Self {
            rel: self.rel.restrict(0, s),
        }
    }

    /// Keeps only the pairs whose second component is in `s`.
    pub fn restrict_image(&self, s: &Set) -> BinaryRelation {
        Self {
            rel: self.rel.restrict(1, s),
        }
    }

    /// Swaps the two components.
    pub fn inverse(&self) -> BinaryRelation {
        Self::new(self.image_domain().clone(), self.range_domain().clone(), self.bdd().clone())
    }

    /// The set of first components.
    pub fn range(&self) -> Set {
        self.rel.project_on(0)
    }

    /// The set of second components.
    pub fn image(&self) -> Set {
        self.rel.project_on(1)
    }

    /// The image of `s` under this relation.
    pub fn image_under(&self, s: &Set) -> Set {
        self.restrict_range(s).image()
    }

    /// The preimage of `s` under this relation.
    pub fn range_under(&self, s: &Set) -> Set {
        self.restrict_image(s).range()
    }

    /// Composes with another binary relation in the image component.
    pub fn compose(&self, rel: &BinaryRelation) -> BinaryRelation {
        Self::from_relation(self.rel.compose(1, rel.as_relation()))
    }

    /// The product set `set1 × set2`, typed at the two domains.
    pub fn cross_product(domain1: Domain, domain2: Domain, set1: &Set, set2: &Set) -> BinaryRelation {
        let domains = domain1 * domain2;

        Self {
            rel: Relation::cross_product(&domains, &[set1.clone(), set2.clone()]),
        }
    }

    pub fn product(&self, r2: &BinaryRelation, op: ProductOp) -> BinaryRelation {
        Self {
            rel: self.rel.product(&r2.rel, op),
        }
    }

    pub fn is_false(&self) -> bool {
        self.rel.is_false()
    }

    pub fn is_true(&self) -> bool {
        self.rel.is_true()
    }
}

macro_rules! binary_binop {
    ($trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait for &BinaryRelation {
            type Output = BinaryRelation;

            fn $method(self, rhs: &BinaryRelation) -> BinaryRelation {
                self.product(rhs, $op)
            }
        }

        impl std::ops::$trait for BinaryRelation {
            type Output = BinaryRelation;

            fn $method(self, rhs: BinaryRelation) -> BinaryRelation {
                self.product(&rhs, $op)
            }
        }
    };
}

binary_binop!(BitAnd, bitand, ProductOp::AND);
binary_binop!(BitOr, bitor, ProductOp::OR);
binary_binop!(Sub, sub, ProductOp::MINUS);

impl std::ops::Not for &BinaryRelation {
    type Output = BinaryRelation;

    fn not(self) -> BinaryRelation {
        BinaryRelation {
            rel: !self.as_relation(),
        }
    }
}

impl std::ops::Not for BinaryRelation {
    type Output = BinaryRelation;

    fn not(self) -> BinaryRelation {
        !&self
    }
}

impl fmt::Display for BinaryRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.rel, f)
    }
}

impl fmt::Debug for BinaryRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryRelation({})", self.rel)
    }
}
