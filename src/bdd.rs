//! The `Bdd` handle: a reference-counted BDD in some space.
//!
//! A [`Bdd`] pairs a [`SpaceRef`] with a node identity and keeps a
//! strong reference count on the node for as long as the value lives.
//! Cloning a handle is cheap; dropping the last handle makes the node
//! collectable.
//!
//! ```
//! use bddrel::bdd::Bdd;
//! use bddrel::domain::Domain;
//! use bddrel::space::default_space;
//!
//! let space = default_space();
//! let vs = Domain::new(0, 4, 1);
//!
//! let p = Bdd::value(&space, &vs, 2) | Bdd::value(&space, &vs, 3);
//! let q = Bdd::value(&space, &vs, 3) | Bdd::value(&space, &vs, 4);
//!
//! assert_eq!(p & q, Bdd::value(&space, &vs, 3));
//! ```
//!
//! Equality of handles is equality of node identities, which by
//! canonicity is semantic equality of the denoted functions.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::domain::Domain;
use crate::node::NodeId;
use crate::space::{ProductOp, SpaceRef, UnaryOp};
use crate::types::{Var, VarMap};

pub struct Bdd {
    space: SpaceRef,
    node: NodeId,
}

impl Bdd {
    /// Wraps a raw node, taking a reference on it.
    pub(crate) fn from_raw(space: &SpaceRef, node: NodeId) -> Self {
        space.node_ref(node);
        Self {
            space: Rc::clone(space),
            node,
        }
    }

    /// The leaf BDD with value `v`.
    pub fn constant(space: &SpaceRef, v: bool) -> Self {
        space.lock_gc();
        let res = Self::from_raw(space, space.leaf(v));
        space.unlock_gc();
        res
    }

    /// The BDD testing that `v` is true.
    pub fn var_true(space: &SpaceRef, v: Var) -> Self {
        space.lock_gc();
        let res = Self::from_raw(space, space.var_true(v));
        space.unlock_gc();
        res
    }

    /// The BDD testing that `v` is false.
    pub fn var_false(space: &SpaceRef, v: Var) -> Self {
        space.lock_gc();
        let res = Self::from_raw(space, space.var_false(v));
        space.unlock_gc();
        res
    }

    /// The BDD `if v then p_then else p_else`.
    pub fn var_then_else(space: &SpaceRef, v: Var, p_then: &Bdd, p_else: &Bdd) -> Self {
        space.lock_gc();
        let res = Self::from_raw(space, space.var_then_else(v, p_then.node, p_else.node));
        space.unlock_gc();
        res
    }

    /// Product of two variables: the BDD for `fn(v1, v2)`.
    pub fn var_product(space: &SpaceRef, v1: Var, v2: Var, op: ProductOp) -> Self {
        Self::bdd_product(&Self::var_true(space, v1), &Self::var_true(space, v2), op)
    }

    /// Equality of two variables: the BDD for `v1 == v2`.
    pub fn var_equal(space: &SpaceRef, v1: Var, v2: Var) -> Self {
        Self::var_product(space, v1, v2, ProductOp::IFF)
    }

    /// Pairwise product of two equally sized finite variable sets.
    ///
    /// The i-th variable of `vs1` is related by `op` to the i-th
    /// variable of `vs2`, and the results are conjoined.
    pub fn vars_product(space: &SpaceRef, vs1: &Domain, vs2: &Domain, op: ProductOp) -> Self {
        assert!(vs1.is_finite() && vs2.is_finite(), "vars_product needs finite domains");
        assert_eq!(vs1.size(), vs2.size(), "vars_product needs equal domain sizes");

        let mut p = Self::constant(space, true);
        for (v1, v2) in vs1.iter().zip(vs2.iter()) {
            p = p & Self::var_product(space, v1, v2, op);
        }
        p
    }

    /// Pairwise equality between two variable sets.
    pub fn vars_equal(space: &SpaceRef, vs1: &Domain, vs2: &Domain) -> Self {
        Self::vars_product(space, vs1, vs2, ProductOp::IFF)
    }

    /// The space this BDD lives in.
    pub fn space(&self) -> &SpaceRef {
        &self.space
    }

    /// The node identity inside its space.
    pub fn id(&self) -> NodeId {
        self.node
    }

    pub fn is_leaf(&self) -> bool {
        self.space.is_leaf(self.node)
    }

    pub fn leaf_value(&self) -> bool {
        self.space.leaf_value(self.node)
    }

    pub fn then_bdd(&self) -> Bdd {
        Self::from_raw(&self.space, self.space.then_of(self.node))
    }

    pub fn else_bdd(&self) -> Bdd {
        Self::from_raw(&self.space, self.space.else_of(self.node))
    }

    pub fn var(&self) -> Var {
        self.space.var_of(self.node)
    }

    pub fn is_false(&self) -> bool {
        self.node == self.space.leaf(false)
    }

    pub fn is_true(&self) -> bool {
        self.node == self.space.leaf(true)
    }

    /// Binary product with respect to `op`.
    pub fn bdd_product(p1: &Bdd, p2: &Bdd, op: ProductOp) -> Bdd {
        assert!(Rc::ptr_eq(&p1.space, &p2.space), "product of BDDs from different spaces");

        p1.space.lock_gc();
        let res = Bdd::from_raw(&p1.space, p1.space.apply(p1.node, p2.node, op));
        p1.space.unlock_gc();
        res
    }

    /// Product with another BDD.
    pub fn product(&self, p2: &Bdd, op: ProductOp) -> Bdd {
        Self::bdd_product(self, p2, op)
    }

    /// Unary product with respect to `op`.
    pub fn unary(&self, op: UnaryOp) -> Bdd {
        self.space.lock_gc();
        let res = Bdd::from_raw(&self.space, self.space.unary_apply(self.node, op));
        self.space.unlock_gc();
        res
    }

    /// Projection of the variables selected by `pred`, combining the
    /// branches of each projected node with `op`.
    pub fn project(&self, pred: impl Fn(Var) -> bool, op: ProductOp) -> Bdd {
        self.space.lock_gc();
        let res = Bdd::from_raw(&self.space, self.space.project(self.node, &pred, op));
        self.space.unlock_gc();
        res
    }

    /// Existential projection (OR) of the variables selected by `pred`.
    pub fn exists(&self, pred: impl Fn(Var) -> bool) -> Bdd {
        self.project(pred, ProductOp::OR)
    }

    /// Universal projection: `!((!p).exists(pred))`.
    pub fn forall(&self, pred: impl Fn(Var) -> bool) -> Bdd {
        !(!self).exists(pred)
    }

    /// Existential projection of all variables in `vs`.
    pub fn project_vars(&self, vs: &Domain) -> Bdd {
        let vs = vs.clone();
        self.exists(move |v| vs.contains(v))
    }

    /// Renames variables according to `map`.
    pub fn rename(&self, map: &VarMap) -> Bdd {
        self.space.lock_gc();
        let res = Bdd::from_raw(&self.space, self.space.rename(self.node, map));
        self.space.unlock_gc();
        res
    }

    /// Renames `vs1[i]` to `vs2[i]`.
    pub fn rename_doms(&self, vs1: &Domain, vs2: &Domain) -> Bdd {
        self.rename(&Domain::map_vars(vs1, vs2))
    }

    /// Conjoins the constraint `v == value`.
    pub fn constrain_var(&self, v: Var, value: bool) -> Bdd {
        let lit = if value {
            Self::var_true(&self.space, v)
        } else {
            Self::var_false(&self.space, v)
        };
        self & lit
    }

    /// The highest variable in this BDD, or 0 for leaves.
    pub fn highest_var(&self) -> Var {
        self.space.highest_var(self.node)
    }

    /// The lowest variable in this BDD, or 0 for leaves.
    pub fn lowest_var(&self) -> Var {
        if self.is_leaf() {
            0
        } else {
            self.var()
        }
    }

    /// The support: every variable occurring in some node.
    pub fn vars(&self) -> Domain {
        let mut seen = HashSet::new();
        let mut vars = std::collections::BTreeSet::new();
        let mut stack = vec![self.node];
        while let Some(p) = stack.pop() {
            if !seen.insert(p) || self.space.is_leaf(p) {
                continue;
            }
            vars.insert(self.space.var_of(p));
            stack.push(self.space.then_of(p));
            stack.push(self.space.else_of(p));
        }
        Domain::from_set(vars)
    }

    /// Every reachable node identity, without taking references.
    ///
    /// The traversal works on raw ids so it does not churn the reference
    /// counts of transient handles.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut res = Vec::new();
        let mut stack = vec![self.node];
        while let Some(p) = stack.pop() {
            if !seen.insert(p) {
                continue;
            }
            res.push(p);
            if !self.space.is_leaf(p) {
                stack.push(self.space.then_of(p));
                stack.push(self.space.else_of(p));
            }
        }
        res
    }

    /// Every distinct subtree whose root is a leaf or has a variable
    /// ≥ `v`, in canonical (node id) order.
    pub fn subtrees_geq(&self, v: Var) -> Vec<Bdd> {
        let mut found = HashSet::new();
        let mut seen = HashSet::new();
        let mut stack = vec![self.node];
        while let Some(p) = stack.pop() {
            if !seen.insert(p) {
                continue;
            }
            if self.space.is_leaf(p) || self.space.var_of(p) >= v {
                found.insert(p);
            } else {
                stack.push(self.space.then_of(p));
                stack.push(self.space.else_of(p));
            }
        }

        // Hash iteration order is not deterministic; expose sorted ids.
        let mut ids: Vec<NodeId> = found.into_iter().collect();
        ids.sort();
        ids.into_iter().map(|p| Bdd::from_raw(&self.space, p)).collect()
    }

    /// The set of assignments over variables < `v` leading to the
    /// subtree `im`.
    pub fn follow_image_geq(&self, im: &Bdd, v: Var) -> Bdd {
        assert!(Rc::ptr_eq(&self.space, &im.space), "image from a different space");
        self.space.lock_gc();
        let res = Bdd::from_raw(&self.space, follow_rec(&self.space, self.node, im.node, v));
        self.space.unlock_gc();
        res
    }

    /// Garbage collects a space.
    pub fn gc(space: &SpaceRef) {
        space.gc();
    }
}

fn follow_rec(space: &SpaceRef, p: NodeId, im: NodeId, v: Var) -> NodeId {
    if !space.is_leaf(p) && space.var_of(p) < v {
        let then = follow_rec(space, space.then_of(p), im, v);
        let els = follow_rec(space, space.else_of(p), im, v);
        space.var_then_else(space.var_of(p), then, els)
    } else {
        space.leaf(p == im)
    }
}

impl Clone for Bdd {
    fn clone(&self) -> Self {
        Self::from_raw(&self.space, self.node)
    }
}

impl Drop for Bdd {
    fn drop(&mut self) {
        self.space.node_unref(self.node);
    }
}

impl PartialEq for Bdd {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.space, &other.space) && self.node == other.node
    }
}

impl Eq for Bdd {}

impl Hash for Bdd {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl fmt::Display for Bdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.space.write_bdd(f, self.node)
    }
}

impl fmt::Debug for Bdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bdd({})", self.node)
    }
}

macro_rules! bdd_binop {
    ($trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait for &Bdd {
            type Output = Bdd;

            fn $method(self, rhs: &Bdd) -> Bdd {
                Bdd::bdd_product(self, rhs, $op)
            }
        }

        impl std::ops::$trait for Bdd {
            type Output = Bdd;

            fn $method(self, rhs: Bdd) -> Bdd {
                Bdd::bdd_product(&self, &rhs, $op)
            }
        }

        impl std::ops::$trait<Bdd> for &Bdd {
            type Output = Bdd;

            fn $method(self, rhs: Bdd) -> Bdd {
                Bdd::bdd_product(self, &rhs, $op)
            }
        }

        impl std::ops::$trait<&Bdd> for Bdd {
            type Output = Bdd;

            fn $method(self, rhs: &Bdd) -> Bdd {
                Bdd::bdd_product(&self, rhs, $op)
            }
        }
    };
}

bdd_binop!(BitAnd, bitand, ProductOp::AND);
bdd_binop!(BitOr, bitor, ProductOp::OR);
bdd_binop!(Sub, sub, ProductOp::MINUS);

impl std::ops::Not for &Bdd {
    type Output = Bdd;

    fn not(self) -> Bdd {
        self.unary(UnaryOp::NOT)
    }
}

impl std::ops::Not for Bdd {
    type Output = Bdd;

    fn not(self) -> Bdd {
        self.unary(UnaryOp::NOT)
    }
}
