//! Diagnostics: a plain-text dump of a BDD's node graph.
//!
//! The dump lists internal nodes grouped by variable rank, one line per
//! variable, with each node's identity and children, terminals last.
//! Useful when a printed `(v<i>: then|else)` expression gets too deep
//! to read.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::bdd::Bdd;
use crate::node::NodeId;
use crate::types::Var;

/// Renders the node graph of `p`, variables grouped by rank.
pub fn dump_bdd(p: &Bdd) -> String {
    let space = p.space();

    let mut by_var: BTreeMap<Var, Vec<NodeId>> = BTreeMap::new();
    let mut leaves: Vec<NodeId> = Vec::new();
    for id in p.nodes() {
        if space.is_leaf(id) {
            leaves.push(id);
        } else {
            by_var.entry(space.var_of(id)).or_default().push(id);
        }
    }

    let mut out = String::new();
    writeln!(out, "bdd {} ({} nodes)", p.id(), p.nodes().len()).unwrap();

    for (v, mut ids) in by_var {
        ids.sort();
        write!(out, "  v{}:", v).unwrap();
        for id in ids {
            write!(out, " {} = ({}, {})", id, space.then_of(id), space.else_of(id)).unwrap();
        }
        writeln!(out).unwrap();
    }

    leaves.sort();
    write!(out, "  leaves:").unwrap();
    for id in leaves {
        write!(out, " {} = {}", id, space.leaf_value(id)).unwrap();
    }
    writeln!(out).unwrap();

    out
}
