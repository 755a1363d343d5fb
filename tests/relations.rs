//! Typed-layer end-to-end tests: composition, products over differing
//! layouts, sets, insertion, identity and equivalence quotients, and
//! infinite domains.

use bddrel::prelude::*;

fn value_rel(space: &SpaceRef, ds: &Domains, vals: &[u32]) -> Relation {
    let mut bdd = Bdd::constant(space, true);
    for (i, &v) in vals.iter().enumerate() {
        bdd = bdd & Bdd::value(space, &ds[i], v);
    }
    Relation::new(ds.clone(), bdd)
}

fn tuples(space: &SpaceRef, ds: &Domains, rows: &[&[u32]]) -> Relation {
    let mut bdd = Bdd::constant(space, false);
    for row in rows {
        bdd = bdd | value_rel(space, ds, row).bdd().clone();
    }
    Relation::new(ds.clone(), bdd)
}

// ─── Composition ───────────────────────────────────────────────────────────────

#[test]
fn composition() {
    let space = default_space();
    let y = Domain::new(0, 5, 1) * Domain::new(5, 5, 1);
    let z = Domain::new(3, 5, 1) * Domain::new(9, 5, 1);

    let rel1 = tuples(&space, &y, &[&[0, 10], &[2, 10], &[5, 10]]);
    let rel2 = tuples(&space, &y, &[&[0, 10], &[1, 10], &[2, 10]]);

    // The mapper lives on other variables; compose renames for us.
    let mapper = tuples(&space, &z, &[&[0, 0], &[2, 1], &[5, 2]]);

    assert_eq!(rel1.compose(0, &mapper), rel2);
}

#[test]
fn composition_with_identity_is_identity() {
    let space = default_space();
    let y = Domain::new(0, 4, 1) * Domain::new(4, 4, 1);
    let z = Domain::new(8, 4, 1) * Domain::new(12, 4, 1);

    let rel = tuples(&space, &y, &[&[1, 2], &[3, 4], &[5, 6]]);
    let id = EquivalenceRelation::identity(&space, &z[0], &z[1]);

    assert_eq!(rel.compose(0, id.as_relation()), rel);
    assert_eq!(rel.compose(1, id.as_relation()), rel);
}

// ─── Intersection across layouts ───────────────────────────────────────────────

#[test]
fn intersection() {
    let space = default_space();
    let y = Domain::new(0, 5, 1) * Domain::new(5, 5, 1);
    let z = Domain::new(3, 5, 1) * Domain::new(9, 5, 1);

    let rel1 = tuples(&space, &y, &[&[1, 2], &[1, 3]]);
    let rel2 = tuples(&space, &y, &[&[1, 2]]);
    let rel3 = tuples(&space, &z, &[&[1, 2]]);

    assert!(!(&rel1 & &rel2).is_false());
    assert_eq!(&rel1 & &rel2, &rel1 & &rel3);
}

// ─── Sets ──────────────────────────────────────────────────────────────────────

#[test]
fn sets_iterate_in_order() {
    let space = default_space();
    let s = Set::new(Domain::new(2, 3, 1), Bdd::constant(&space, true));

    let values: Vec<u32> = s.iter().collect();
    assert_eq!(values, (0..8).collect::<Vec<u32>>());
}

#[test]
fn sets_ops() {
    let space = default_space();
    let empty = Set::new(Domain::new(2, 3, 1), Bdd::constant(&space, false));

    let mut s = empty.clone();
    s = &s | &Set::with_value(&empty, 3);
    s = &s | &Set::with_value(&empty, 5);

    assert_eq!(s.values(), vec![3, 5]);
}

#[test]
fn sets_insert() {
    let space = default_space();

    let mut s1 = Set::empty(&space);
    s1.insert(6);
    s1.insert(15);

    let d = Domain::new(0, 4, 1);
    let empty = Set::new(d.clone(), Bdd::constant(&space, false));
    let s2 = &Set::with_value(&empty, 6) | &Set::with_value(&empty, 15);

    let s3 = Set::singleton(&space, 6);
    let s4 = Set::singleton(&space, 15);

    let mut s5 = Set::empty(&space);
    for v in 5..=8 {
        s5.insert(v);
    }
    let s6 = Set::interval(&space, 5, 8);

    assert_eq!(s1, s2);
    assert_eq!(&s3 | &s4, s1);
    assert_eq!(s5, s6);
}

// ─── Relation insertion ────────────────────────────────────────────────────────

#[test]
fn relations_insert() {
    let space = default_space();

    let mut r1 = Relation::empty(&space, 2);
    r1.insert2(1, 5);
    r1.insert2(2, 6);

    let ds = Domain::new(0, 2, 1) * Domain::new(2, 3, 1);
    let r2 = tuples(&space, &ds, &[&[1, 5], &[2, 6]]);

    assert_eq!(r1, r2);
}

// ─── Identity relation ─────────────────────────────────────────────────────────

#[test]
fn identity_relation() {
    let space = default_space();
    let d1 = Domain::new(0, 2, 1);
    let d2 = Domain::new(2, 2, 1);

    let id = EquivalenceRelation::identity(&space, &d1, &d2);

    let all = Set::new(d1.clone(), Bdd::constant(&space, true));
    let s0 = Set::with_value(&all, 0);
    let s1 = Set::with_value(&all, 1);
    let s2 = Set::with_value(&all, 2);
    let s3 = Set::with_value(&all, 3);

    assert_eq!(id.image_under(&s0), s0);
    assert_eq!(id.image_under(&s1), s1);
    assert_eq!(id.image_under(&s2), s2);
    assert_eq!(id.image_under(&s3), s3);
    assert_eq!(id.image_under(&(&s1 | &s2)), &s1 | &s2);
    assert_eq!(id.range_under(&s0), s0);
    assert_eq!(id.range_under(&s1), s1);
    assert_eq!(id.range_under(&s2), s2);
    assert_eq!(id.range_under(&s3), s3);
    assert_eq!(id.range_under(&(&s1 | &s2)), &s1 | &s2);
}

// ─── Equivalence quotients ─────────────────────────────────────────────────────

#[test]
fn equivalence_quotients() {
    let space = default_space();
    let d1 = Domain::new(0, 2, 1);
    let d2 = Domain::new(2, 2, 1);

    let id = EquivalenceRelation::identity(&space, &d1, &d2);

    let all = Set::new(d1.clone(), Bdd::constant(&space, true));
    let even = &Set::with_value(&all, 0) | &Set::with_value(&all, 2);
    let odd = &Set::with_value(&all, 1) | &Set::with_value(&all, 3);

    let side = |d: &Domain, s: &Set| s.with_domain(d).bdd().clone();

    // x ~ y iff both are even or both are odd.
    let is_even = EquivalenceRelation::new(d1.clone(), d2.clone(), side(&d1, &even) & side(&d2, &even));
    let is_odd = EquivalenceRelation::new(d1.clone(), d2.clone(), side(&d1, &odd) & side(&d2, &odd));
    let evenodd = &is_even | &is_odd;

    let quotient_id = id.quotient(&all);
    assert_eq!(quotient_id.len(), 4);

    let quotient_evenodd = evenodd.quotient(&all);
    assert_eq!(quotient_evenodd.len(), 2);
    assert!(
        (quotient_evenodd[0] == even && quotient_evenodd[1] == odd)
            || (quotient_evenodd[0] == odd && quotient_evenodd[1] == even)
    );
}

#[test]
fn quotient_classes_cover_disjointly() {
    let space = default_space();
    let d1 = Domain::new(0, 2, 1);
    let d2 = Domain::new(2, 2, 1);

    let all = Set::new(d1.clone(), Bdd::constant(&space, true));
    let even = &Set::with_value(&all, 0) | &Set::with_value(&all, 2);
    let odd = &Set::with_value(&all, 1) | &Set::with_value(&all, 3);

    let side = |d: &Domain, s: &Set| s.with_domain(d).bdd().clone();
    let is_even = EquivalenceRelation::new(d1.clone(), d2.clone(), side(&d1, &even) & side(&d2, &even));
    let is_odd = EquivalenceRelation::new(d1.clone(), d2.clone(), side(&d1, &odd) & side(&d2, &odd));
    let evenodd = &is_even | &is_odd;

    let classes = evenodd.quotient(&all);

    // The classes are mutually disjoint and their union is the set.
    let mut union = Set::empty_like(&classes[0]);
    for (i, a) in classes.iter().enumerate() {
        union = &union | a;
        for b in classes.iter().skip(i + 1) {
            assert!((a & b).is_empty());
        }
    }
    assert_eq!(union, all);
}

// ─── Infinite domains ──────────────────────────────────────────────────────────

#[test]
fn infinite_domains() {
    let space = default_space();
    let z = Domain::new(0, 10, 2) * Domain::new(1, 10, 2);

    let domain1 = Domain::infinite(0, 2);
    let domain2 = Domain::infinite(1, 2);

    let encode_1 = Bdd::value(&space, &z[0], 0);
    let encode_2 = Bdd::value(&space, &z[1], 0);

    let r1 = Relation::new(Domains::from(domain1.clone()), encode_1.clone());
    let r2 = Relation::new(Domains::from(domain2.clone()), encode_2.clone());
    assert_eq!(r1, r2);

    let both = Relation::new(domain1.clone() * domain2.clone(), encode_1.clone() & encode_2);
    let projected = both.project_on(0);
    assert_eq!(projected.bdd(), &encode_1);
}

#[test]
fn infinite_quotient() {
    let space = default_space();
    // Interleaved infinite domains, two bits used per side.
    let d0 = Domain::infinite(0, 2);
    let d1 = Domain::infinite(1, 2);

    let id = EquivalenceRelation::identity(&space, &d0.first_n(2), &d1.first_n(2));
    let id = EquivalenceRelation::new(d0, d1, id.bdd().clone());

    let mut s = Set::empty(&space);
    for v in 0..4 {
        s.insert(v);
    }

    let classes = id.quotient(&s);
    assert_eq!(classes.len(), 4);
    for class in &classes {
        assert_eq!(class.values().len(), 1);
    }
}
