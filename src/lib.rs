//! # bddrel: typed relations over binary decision diagrams
//!
//! **`bddrel`** is a library for manipulating finite and infinite
//! relations symbolically, as reduced ordered **Binary Decision
//! Diagrams (BDDs)** together with a typing discipline that tracks
//! which Boolean variables encode which relational component.
//!
//! ## Why typed relations?
//!
//! A BDD represents a Boolean function canonically --- for a fixed
//! variable order, every function has exactly one shape, so equality is
//! a pointer comparison. Encoding a relation as a BDD means choosing
//! concrete variables for each component, and every binary operation
//! then requires both operands to agree on that choice. `bddrel` makes
//! the choice part of the value: a [`Relation`] is a BDD paired with a
//! [`Domains`] vector, and intersection, union, difference,
//! composition, projection, restriction and quotienting all rename
//! variables automatically instead of making the caller manage
//! identifiers by hand.
//!
//! ## Quick Start
//!
//! ```rust
//! use bddrel::prelude::*;
//!
//! let space = default_space();
//!
//! // The set {2,3} and the set {3,4}, encoded over variables 0..4.
//! let vs = Domain::new(0, 4, 1);
//! let p = Bdd::value(&space, &vs, 2) | Bdd::value(&space, &vs, 3);
//! let q = Bdd::value(&space, &vs, 3) | Bdd::value(&space, &vs, 4);
//!
//! // Canonicity makes semantic equality a handle comparison.
//! assert_eq!(&p & &q, Bdd::value(&space, &vs, 3));
//!
//! // The typed layer frees you from variable management entirely:
//! let mut evens = Set::empty(&space);
//! evens.insert(0);
//! evens.insert(2);
//! assert!(evens.member(2));
//! assert!(!evens.member(1));
//! ```
//!
//! ## Layers
//!
//! - **Engine** ([`engine`], [`space`]): a hash-consed node store with
//!   reference counting, an operation cache and a garbage collector,
//!   behind the [`Space`] backend contract.
//! - **Domains** ([`domain`], [`pool`]): finite and infinite-periodic
//!   variable sets, with the algebra needed to lay out, split and
//!   interleave encodings, and a [`VarPool`] allocator for fresh
//!   variables.
//! - **Typed relations** ([`relation`], [`set`], [`binary`],
//!   [`equivalence`]): n-ary relations typed by domain vectors, with
//!   arity-1 and arity-2 views and equivalence-relation quotienting.
//! - **Integer encoding** ([`enc`]): binary encodings of integers over
//!   finite domains, value-range construction, membership and
//!   enumeration.
//!
//! [`Relation`]: crate::relation::Relation
//! [`Domains`]: crate::domain::Domains
//! [`Space`]: crate::space::Space
//! [`VarPool`]: crate::pool::VarPool

pub mod bdd;
pub mod binary;
pub mod cache;
pub mod debug;
pub mod domain;
pub mod enc;
pub mod engine;
pub mod equivalence;
pub mod node;
pub mod pool;
pub mod relation;
pub mod set;
pub mod space;
pub mod subtable;
pub mod types;
pub mod utils;

/// The common imports.
pub mod prelude {
    pub use crate::bdd::Bdd;
    pub use crate::binary::BinaryRelation;
    pub use crate::domain::{Domain, Domains};
    pub use crate::equivalence::EquivalenceRelation;
    pub use crate::pool::VarPool;
    pub use crate::relation::Relation;
    pub use crate::set::Set;
    pub use crate::space::{default_space, ProductOp, Space, SpaceRef, UnaryOp};
    pub use crate::types::{Var, VarMap};
}
