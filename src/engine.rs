//! The default BDD engine: a hash-consed node store with reference
//! counting, an operation cache, and a mark-and-sweep garbage collector.
//!
//! # Design
//!
//! All operations go through the engine, which maintains:
//!
//! - Node storage (a `Vec` of [`Node`], slots 0 and 1 are the terminals)
//! - Per-variable [`Subtable`]s for unique-table lookup
//! - An [`OpCache`] memoizing [`apply`][Engine::apply] on `(p, q, fn-code)`
//! - External reference counts and a free list
//!
//! Hash consing keeps the structure canonical: two BDDs denote the same
//! function iff they have the same [`NodeId`]. The collector frees every
//! node that has no external reference and is unreachable from one;
//! while the reentrant GC lock is held, collection is deferred to the
//! final unlock. The engine itself takes no locks: callers creating
//! intermediate nodes hold the lock across the construction (the
//! [`Bdd`][crate::bdd::Bdd] handle does this in every constructor).
//!
//! Exhaustion is fatal: the engine panics when allocation fails, and a
//! backend error has no recovery path here.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::cache::OpCache;
use crate::node::{Node, NodeId, NO_VAR};
use crate::space::{ProductOp, Space, UnaryOp};
use crate::subtable::Subtable;
use crate::types::{Var, VarMap};

/// Node count that arms the first deferred collection.
const GC_THRESHOLD: usize = 1 << 16;

pub struct Engine {
    nodes: RefCell<Vec<Node>>,
    refs: RefCell<Vec<u32>>,
    free: RefCell<Vec<u32>>,
    subtables: RefCell<Vec<Subtable>>,
    apply_cache: RefCell<OpCache<(NodeId, NodeId, u8), NodeId>>,
    gc_lock: Cell<usize>,
    gc_pending: Cell<bool>,
    gc_threshold: Cell<usize>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("nodes", &self.nodes.borrow().len())
            .field("live", &self.node_count())
            .field("gc_lock", &self.gc_lock.get())
            .finish()
    }
}

impl Engine {
    pub fn new() -> Self {
        // Slots 0 and 1 are the false and true leaves.
        let nodes = vec![Node::leaf(), Node::leaf()];
        let refs = vec![0, 0];

        Self {
            nodes: RefCell::new(nodes),
            refs: RefCell::new(refs),
            free: RefCell::new(Vec::new()),
            subtables: RefCell::new(Vec::new()),
            apply_cache: RefCell::new(OpCache::new(16)),
            gc_lock: Cell::new(0),
            gc_pending: Cell::new(false),
            gc_threshold: Cell::new(GC_THRESHOLD),
        }
    }

    fn node(&self, p: NodeId) -> Node {
        self.nodes.borrow()[p.index()]
    }

    fn alloc_node(&self, node: Node) -> NodeId {
        let index = match self.free.borrow_mut().pop() {
            Some(i) => {
                self.nodes.borrow_mut()[i as usize] = node;
                i
            }
            None => {
                let mut nodes = self.nodes.borrow_mut();
                let i = nodes.len();
                assert!(i <= u32::MAX as usize, "node table is full");
                nodes.push(node);
                self.refs.borrow_mut().push(0);
                i as u32
            }
        };

        if self.node_count() >= self.gc_threshold.get() {
            debug!("alloc: {} live nodes, requesting gc", self.node_count());
            self.gc_pending.set(true);
        }

        NodeId::new(index)
    }

    fn collect(&self) {
        let mut nodes = self.nodes.borrow_mut();
        let refs = self.refs.borrow();
        let mut subtables = self.subtables.borrow_mut();
        let mut free = self.free.borrow_mut();

        // Mark phase: everything reachable from an externally referenced node.
        let mut marked = vec![false; nodes.len()];
        marked[NodeId::FALSE.index()] = true;
        marked[NodeId::TRUE.index()] = true;

        let mut stack: Vec<usize> = (0..nodes.len())
            .filter(|&i| refs[i] > 0 && (i <= 1 || nodes[i].var != NO_VAR))
            .collect();
        while let Some(i) = stack.pop() {
            if marked[i] {
                continue;
            }
            marked[i] = true;
            if !nodes[i].is_leaf() {
                stack.push(nodes[i].then.index());
                stack.push(nodes[i].els.index());
            }
        }

        // Sweep phase: unlink dead nodes from their unique tables.
        let mut freed = 0;
        for i in 2..nodes.len() {
            if nodes[i].var != NO_VAR && !marked[i] {
                let Node { var, then, els, .. } = nodes[i];
                let removed = subtables[var as usize].remove(then, els, &mut nodes);
                debug_assert!(removed, "dead node {} missing from its subtable", i);
                nodes[i] = Node::leaf();
                free.push(i as u32);
                freed += 1;
            }
        }

        drop(nodes);
        drop(refs);
        drop(subtables);
        drop(free);

        // Cached results may name freed nodes.
        self.apply_cache.borrow_mut().clear();

        let live = self.node_count();
        self.gc_threshold.set(GC_THRESHOLD.max(live * 2));
        debug!("gc: freed {} nodes, {} live", freed, live);
    }

    fn mk_node(&self, v: Var, p_then: NodeId, p_else: NodeId) -> NodeId {
        debug_assert!(v != NO_VAR, "variable index out of range");
        debug_assert!(
            self.is_leaf(p_then) || self.var_of(p_then) > v,
            "then-child of v{} breaks the variable order",
            v
        );
        debug_assert!(
            self.is_leaf(p_else) || self.var_of(p_else) > v,
            "else-child of v{} breaks the variable order",
            v
        );

        // Reduction: no redundant test.
        if p_then == p_else {
            return p_then;
        }

        {
            let mut subtables = self.subtables.borrow_mut();
            while subtables.len() <= v as usize {
                let var = subtables.len() as Var;
                subtables.push(Subtable::new(var));
            }
        }

        if let Some(existing) = self.subtables.borrow()[v as usize].find(p_then, p_else, &self.nodes.borrow()) {
            return existing;
        }

        let id = self.alloc_node(Node::new(v, p_then, p_else));
        self.subtables.borrow_mut()[v as usize].insert(p_then, p_else, id.get(), &mut self.nodes.borrow_mut());
        debug!("mk_node(v{}, {}, {}) -> {}", v, p_then, p_else, id);
        id
    }

    fn apply_rec(&self, p: NodeId, q: NodeId, op: ProductOp) -> NodeId {
        let p_leaf = self.is_leaf(p);
        let q_leaf = self.is_leaf(q);

        if p_leaf && q_leaf {
            return self.leaf(op.eval(self.leaf_value(p), self.leaf_value(q)));
        }

        let key = (p, q, op.code());
        if let Some(res) = self.apply_cache.borrow().get(&key) {
            return res;
        }

        // Descend on the smaller-indexed variable, on both sides when they agree.
        let (v, p0, p1, q0, q1) = if p_leaf {
            let qn = self.node(q);
            (qn.var, p, p, qn.els, qn.then)
        } else if q_leaf {
            let pn = self.node(p);
            (pn.var, pn.els, pn.then, q, q)
        } else {
            let pn = self.node(p);
            let qn = self.node(q);
            if pn.var == qn.var {
                (pn.var, pn.els, pn.then, qn.els, qn.then)
            } else if pn.var < qn.var {
                (pn.var, pn.els, pn.then, q, q)
            } else {
                (qn.var, p, p, qn.els, qn.then)
            }
        };

        let els = self.apply_rec(p0, q0, op);
        let then = self.apply_rec(p1, q1, op);
        let res = self.mk_node(v, then, els);

        self.apply_cache.borrow_mut().insert(key, res);
        res
    }

    fn unary_rec(&self, p: NodeId, op: UnaryOp, cache: &mut HashMap<NodeId, NodeId>) -> NodeId {
        if self.is_leaf(p) {
            return self.leaf(op.eval(self.leaf_value(p)));
        }
        if let Some(&res) = cache.get(&p) {
            return res;
        }

        let n = self.node(p);
        let then = self.unary_rec(n.then, op, cache);
        let els = self.unary_rec(n.els, op, cache);
        let res = self.mk_node(n.var, then, els);

        cache.insert(p, res);
        res
    }

    fn project_rec(
        &self,
        p: NodeId,
        pred: &dyn Fn(Var) -> bool,
        op: ProductOp,
        cache: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        if self.is_leaf(p) {
            return p;
        }
        if let Some(&res) = cache.get(&p) {
            return res;
        }

        let n = self.node(p);
        let then = self.project_rec(n.then, pred, op, cache);
        let els = self.project_rec(n.els, pred, op, cache);
        let res = if pred(n.var) {
            self.apply_rec(then, els, op)
        } else {
            self.mk_node(n.var, then, els)
        };

        cache.insert(p, res);
        res
    }

    /// Relabels every node `v` to `f(v)`. `f` must preserve the variable
    /// order on the support of `p`.
    fn rename_monotone(&self, p: NodeId, f: &dyn Fn(Var) -> Var, cache: &mut HashMap<NodeId, NodeId>) -> NodeId {
        if self.is_leaf(p) {
            return p;
        }
        if let Some(&res) = cache.get(&p) {
            return res;
        }

        let n = self.node(p);
        let then = self.rename_monotone(n.then, f, cache);
        let els = self.rename_monotone(n.els, f, cache);
        let res = self.mk_node(f(n.var), then, els);

        cache.insert(p, res);
        res
    }

    /// The support of `p`, ascending.
    fn support(&self, p: NodeId) -> Vec<Var> {
        let mut seen = std::collections::HashSet::new();
        let mut vars = std::collections::BTreeSet::new();
        let mut stack = vec![p];
        while let Some(q) = stack.pop() {
            if !seen.insert(q) || self.is_leaf(q) {
                continue;
            }
            let n = self.node(q);
            vars.insert(n.var);
            stack.push(n.then);
            stack.push(n.els);
        }
        vars.into_iter().collect()
    }
}

impl Space for Engine {
    fn gc(&self) {
        if self.gc_lock.get() > 0 {
            debug!("gc: locked, deferring");
            self.gc_pending.set(true);
            return;
        }
        self.gc_pending.set(false);
        self.collect();
    }

    fn lock_gc(&self) {
        self.gc_lock.set(self.gc_lock.get() + 1);
    }

    fn unlock_gc(&self) {
        let lock = self.gc_lock.get();
        assert!(lock > 0, "unlock_gc without a matching lock_gc");
        self.gc_lock.set(lock - 1);
        if lock == 1 && self.gc_pending.get() {
            self.gc_pending.set(false);
            self.collect();
        }
    }

    fn node_ref(&self, p: NodeId) {
        self.refs.borrow_mut()[p.index()] += 1;
    }

    fn node_unref(&self, p: NodeId) {
        let mut refs = self.refs.borrow_mut();
        assert!(refs[p.index()] > 0, "unref of node {} with no references", p);
        refs[p.index()] -= 1;
    }

    fn is_leaf(&self, p: NodeId) -> bool {
        p.is_leaf()
    }

    fn leaf_value(&self, p: NodeId) -> bool {
        assert!(p.is_leaf(), "leaf_value of internal node {}", p);
        p == NodeId::TRUE
    }

    fn then_of(&self, p: NodeId) -> NodeId {
        assert!(!p.is_leaf(), "then_of leaf {}", p);
        self.node(p).then
    }

    fn else_of(&self, p: NodeId) -> NodeId {
        assert!(!p.is_leaf(), "else_of leaf {}", p);
        self.node(p).els
    }

    fn var_of(&self, p: NodeId) -> Var {
        assert!(!p.is_leaf(), "var_of leaf {}", p);
        self.node(p).var
    }

    fn leaf(&self, v: bool) -> NodeId {
        if v {
            NodeId::TRUE
        } else {
            NodeId::FALSE
        }
    }

    fn var_then_else(&self, v: Var, p_then: NodeId, p_else: NodeId) -> NodeId {
        self.mk_node(v, p_then, p_else)
    }

    fn project(&self, p: NodeId, pred: &dyn Fn(Var) -> bool, op: ProductOp) -> NodeId {
        let mut cache = HashMap::new();
        self.project_rec(p, pred, op, &mut cache)
    }

    fn rename(&self, p: NodeId, map: &VarMap) -> NodeId {
        let support = self.support(p);

        // An order-preserving map admits a direct relabeling.
        let images: Vec<Var> = support.iter().map(|&v| map.map(v)).collect();
        if images.windows(2).all(|w| w[0] < w[1]) {
            debug!("rename({}): order-preserving, relabeling directly", p);
            let mut cache = HashMap::new();
            return self.rename_monotone(p, &|v| map.map(v), &mut cache);
        }

        debug!("rename({}): general construction over {} entries", p, map.len());

        // General case: move every variable v to the even position 2v,
        // tie each mapped source 2u to its target at the odd position
        // 2w+1, project the sources away, and contract back with v/2.
        let expanded = {
            let mut cache = HashMap::new();
            self.rename_monotone(p, &|v| 2 * v, &mut cache)
        };

        let mut mapping = self.leaf(true);
        let mut to_project = std::collections::HashSet::new();
        for (from, to) in map.iter() {
            let source = self.var_true(2 * from);
            let target = self.var_true(2 * to + 1);
            let tie = self.apply_rec(source, target, ProductOp::IFF);
            mapping = self.apply_rec(mapping, tie, ProductOp::AND);
            to_project.insert(2 * from);
        }

        let product = self.apply_rec(expanded, mapping, ProductOp::AND);
        let projected = self.project(product, &|v| to_project.contains(&v), ProductOp::OR);

        let mut cache = HashMap::new();
        self.rename_monotone(projected, &|v| v / 2, &mut cache)
    }

    fn apply(&self, p: NodeId, q: NodeId, op: ProductOp) -> NodeId {
        debug!("apply({}, {}, {:04b})", p, q, op.code());
        self.apply_rec(p, q, op)
    }

    fn unary_apply(&self, p: NodeId, op: UnaryOp) -> NodeId {
        let mut cache = HashMap::new();
        self.unary_rec(p, op, &mut cache)
    }

    fn node_count(&self) -> usize {
        self.nodes.borrow().len() - self.free.borrow().len()
    }
}
