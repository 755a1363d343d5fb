//! Engine-level end-to-end tests: encodings, counting, allocation,
//! renaming, products and projection.

use std::collections::BTreeSet;

use bddrel::prelude::*;
use num_bigint::BigUint;

// ─── Value membership ──────────────────────────────────────────────────────────

#[test]
fn value_membership() {
    let space = default_space();
    let vs = Domain::new(0, 8, 1);

    let p = Bdd::value(&space, &vs, 2) | Bdd::value(&space, &vs, 3);

    assert!(p.value_member(&vs, 2));
    assert!(p.value_member(&vs, 3));
    assert!(!p.value_member(&vs, 5));
    assert!(!p.value_member(&vs, 0));
    assert!(!p.value_member(&vs, 1));
    assert!(!p.value_member(&vs, 6));
    assert!(!p.value_member(&vs, 7));
}

// ─── Assignment counting ───────────────────────────────────────────────────────

#[test]
fn assignments() {
    let space = default_space();
    let vs = Domain::new(0, 8, 1);
    let vs_3 = Domain::new(2, 3, 1);

    let p = Bdd::var_true(&space, 2) | Bdd::var_true(&space, 3);
    let q = Bdd::var_true(&space, 2) & Bdd::var_true(&space, 3);

    assert_eq!(p.n_assignments(&vs), BigUint::from(3u32 * 64));
    assert_eq!(q.n_assignments(&vs), BigUint::from(64u32));

    let expected: BTreeSet<u32> = [1, 2, 3, 5, 6, 7].into_iter().collect();
    assert_eq!(p.assignments_value(&vs_3), expected);
}

// ─── Variable allocation ───────────────────────────────────────────────────────

#[test]
fn variable_allocation() {
    let mut pool = VarPool::new();

    let vs1 = pool.alloc(5);
    let v_vs = pool.alloc_interleaved(3, 2);
    let vs2 = pool.alloc(5);

    assert_eq!(vs1, Domain::new(0, 5, 1));
    assert_eq!(v_vs[0], Domain::new(5, 3, 2));
    assert_eq!(v_vs[1], Domain::new(6, 3, 2));
    assert_eq!(vs2, Domain::new(11, 5, 1));
}

// ─── Renaming ──────────────────────────────────────────────────────────────────

#[test]
fn rename_between_interleaved_domains() {
    let space = default_space();
    let mut pool = VarPool::new();

    let chunks = pool.alloc_interleaved(10, 2);

    let encode_0 = Bdd::value(&space, &chunks[0], 73);
    let encode_1 = Bdd::value(&space, &chunks[1], 73);

    let map = Domain::map_vars(&chunks[0], &chunks[1]);
    assert_eq!(encode_0.rename(&map), encode_1);
}

#[test]
fn rename_is_order_free() {
    let space = default_space();
    let d1 = Domain::new(0, 4, 1);
    let d2 = Domain::new(4, 4, 1);

    let p = Bdd::value(&space, &d1, 9) & Bdd::value(&space, &d2, 4);

    // Swap the blocks: the map breaks the variable order.
    let mut swap = VarMap::new();
    for v in 0..4 {
        swap.insert(v, v + 4);
        swap.insert(v + 4, v);
    }

    let q = p.rename(&swap);
    assert_eq!(q, Bdd::value(&space, &d1, 4) & Bdd::value(&space, &d2, 9));
    // The map is an involution, so renaming twice is the identity.
    assert_eq!(q.rename(&swap), p);
}

// ─── Products ──────────────────────────────────────────────────────────────────

#[test]
fn product_intersects_encodings() {
    let space = default_space();
    let vs = Domain::new(0, 4, 1);

    let p = Bdd::value(&space, &vs, 2) | Bdd::value(&space, &vs, 3);
    let q = Bdd::value(&space, &vs, 3) | Bdd::value(&space, &vs, 4);

    assert_eq!(&p & &q, Bdd::value(&space, &vs, 3));
}

#[test]
fn product_laws() {
    let space = default_space();
    let vs = Domain::new(0, 4, 1);

    let p = Bdd::value_range(&space, &vs, 2, 9);
    let q = Bdd::value_range(&space, &vs, 7, 12);
    let t = Bdd::constant(&space, true);
    let f = Bdd::constant(&space, false);

    assert_eq!(!!&p.clone(), p);
    assert_eq!(&p & &p, p);
    assert_eq!(&p & &f, f);
    assert_eq!(&p | &t, t);
    assert_eq!(&p - &q, &p & !&q);

    // Commutativity and associativity of AND/OR/IFF.
    assert_eq!(&p & &q, &q & &p);
    assert_eq!(&p | &q, &q | &p);
    assert_eq!(p.product(&q, ProductOp::IFF), q.product(&p, ProductOp::IFF));
}

// ─── Projection ────────────────────────────────────────────────────────────────

#[test]
fn projection() {
    let space = default_space();

    let p = Bdd::var_true(&space, 2) & Bdd::var_true(&space, 3);
    let q = Bdd::var_true(&space, 2);

    assert_eq!(p.project_vars(&Domain::new(3, 1, 1)), q);
}

#[test]
fn forall_dualizes_exists() {
    let space = default_space();

    let p = Bdd::var_true(&space, 1) | Bdd::var_true(&space, 2);
    assert_eq!(p.forall(|v| v == 2), Bdd::var_true(&space, 1));
    assert_eq!(p.exists(|v| v == 2), Bdd::constant(&space, true));
}

// ─── Garbage collection ────────────────────────────────────────────────────────

#[test]
fn gc_preserves_live_handles() {
    let space = default_space();
    let vs = Domain::new(0, 6, 1);

    let keep = Bdd::value_range(&space, &vs, 10, 50);
    {
        let _scratch = Bdd::value_range(&space, &vs, 0, 63);
        let _more = Bdd::value(&space, &vs, 17) | Bdd::value(&space, &vs, 23);
    }

    let before = space.node_count();
    Bdd::gc(&space);
    assert!(space.node_count() <= before);

    // The kept handle still decodes correctly after collection.
    assert!(keep.value_member(&vs, 10));
    assert!(keep.value_member(&vs, 50));
    assert!(!keep.value_member(&vs, 9));
    assert_eq!(keep, Bdd::value_range(&space, &vs, 10, 50));
}
