//! Binary encoding of integers over finite domains.
//!
//! A value `v` is encoded over a finite [`Domain`] in iteration order:
//! bit `i` of `v` decides the polarity of the i-th variable, so the
//! encoding is little-endian with respect to the variable order.
//!
//! Decoding walks the encoded path through the BDD; variables of the
//! domain that a BDD does not test are transparent, which is what makes
//! assignment counting a product structure (each absent variable doubles
//! the count).

use std::collections::BTreeSet;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::bdd::Bdd;
use crate::domain::Domain;
use crate::space::SpaceRef;
use crate::types::Var;

impl Bdd {
    /// Least `n` such that `2^n >= n_values`.
    pub fn n_vars_needed(n_values: u32) -> u32 {
        let mut n_vars = 0;
        while (1u64 << n_vars) < n_values as u64 {
            n_vars += 1;
        }
        n_vars
    }

    /// Encodes `v` over the finite domain `vs`.
    pub fn value(space: &SpaceRef, vs: &Domain, v: u32) -> Bdd {
        assert!(vs.is_finite(), "value needs a finite domain");

        let mut p = Bdd::constant(space, true);
        for (i, var) in vs.iter().enumerate() {
            p = p & if (v as u64) & (1u64 << i) != 0 {
                Bdd::var_true(space, var)
            } else {
                Bdd::var_false(space, var)
            };
        }
        p
    }

    /// Encodes the interval `[from_v, to_v]` over the finite domain `vs`.
    pub fn value_range(space: &SpaceRef, vs: &Domain, from_v: u32, to_v: u32) -> Bdd {
        assert!(vs.is_finite(), "value_range needs a finite domain");

        let size = 1u64 << vs.size();

        if size == 1 {
            return Bdd::constant(space, from_v == 0 && to_v == 0);
        }
        if from_v == 0 && (to_v as u64 + 1) == size {
            return Bdd::constant(space, true);
        }
        if from_v > to_v {
            return Bdd::constant(space, false);
        }

        // Split at the value of the most significant bit.
        let split_v = (size / 2) as u32;

        let highest_var = vs.highest();
        let vs_rec = vs.clone() - &Domain::new(highest_var, 1, 1);

        let low = Self::value_range(space, &vs_rec, from_v, to_v.min(split_v - 1));
        let high = if to_v >= split_v {
            Self::value_range(space, &vs_rec, from_v.max(split_v) - split_v, to_v - split_v)
        } else {
            Bdd::constant(space, false)
        };

        (Bdd::var_true(space, highest_var) & high) | (Bdd::var_false(space, highest_var) & low)
    }

    /// Follows the path encoding `v` over `vs`.
    ///
    /// The variables of `vs` must sit at the top of this BDD; variables
    /// of `vs` that the BDD does not test are skipped.
    pub fn value_follow(&self, vs: &Domain, v: u32) -> Bdd {
        assert!(vs.is_finite(), "value_follow needs a finite domain");

        let mut cur = self.clone();
        let mut v = v;
        for var in vs.iter() {
            if cur.is_leaf() {
                return cur;
            }
            let cur_var = cur.var();
            assert!(cur_var >= var, "BDD tests v{} outside the domain suffix", cur_var);

            if cur_var == var {
                cur = if v & 1 != 0 { cur.then_bdd() } else { cur.else_bdd() };
            }
            v /= 2;
        }
        cur
    }

    /// Whether the assignment encoding `v` over `vs` satisfies this BDD.
    pub fn value_member(&self, vs: &Domain, v: u32) -> bool {
        let p = self.value_follow(vs, v);

        assert!(p.is_leaf(), "BDD tests variables outside the domain");
        p.leaf_value()
    }

    /// Number of assignments to `vs` satisfying this BDD.
    ///
    /// Every variable of the BDD must be in `vs`; each variable of `vs`
    /// the BDD does not test doubles the count.
    pub fn n_assignments(&self, vs: &Domain) -> BigUint {
        assert!(vs.is_finite(), "n_assignments needs a finite domain");

        let vars: Vec<Var> = vs.iter().collect();
        count_rec(self, &vars, 0)
    }

    /// Decodes every satisfying assignment of `vs` to its value.
    ///
    /// Every variable of the BDD must be in `vs`.
    pub fn assignments_value(&self, vs: &Domain) -> BTreeSet<u32> {
        assert!(vs.is_finite(), "assignments_value needs a finite domain");

        let vars: Vec<Var> = vs.iter().collect();
        let mut res = BTreeSet::new();
        assignments_rec(self, &vars, 0, 1, 0, &mut res);
        res
    }
}

fn count_rec(p: &Bdd, vars: &[Var], i: usize) -> BigUint {
    if p.is_leaf() {
        if !p.leaf_value() {
            return BigUint::zero();
        }
        if i == vars.len() {
            return BigUint::one();
        }
        return count_rec(p, vars, i + 1) * 2u32;
    }

    let v = p.var();
    assert!(i < vars.len() && v >= vars[i], "BDD tests v{} outside the domain", v);

    if v == vars[i] {
        count_rec(&p.then_bdd(), vars, i + 1) + count_rec(&p.else_bdd(), vars, i + 1)
    } else {
        count_rec(p, vars, i + 1) * 2u32
    }
}

fn assignments_rec(p: &Bdd, vars: &[Var], i: usize, base: u32, current: u32, res: &mut BTreeSet<u32>) {
    if p.is_leaf() {
        if !p.leaf_value() {
            return;
        }
        if i == vars.len() {
            res.insert(current);
        } else {
            assignments_rec(p, vars, i + 1, base << 1, current | base, res);
            assignments_rec(p, vars, i + 1, base << 1, current, res);
        }
        return;
    }

    let v = p.var();
    assert!(i < vars.len() && v >= vars[i], "BDD tests v{} outside the domain", v);

    if v == vars[i] {
        assignments_rec(&p.then_bdd(), vars, i + 1, base << 1, current | base, res);
        assignments_rec(&p.else_bdd(), vars, i + 1, base << 1, current, res);
    } else {
        assignments_rec(p, vars, i + 1, base << 1, current | base, res);
        assignments_rec(p, vars, i + 1, base << 1, current, res);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::default_space;

    #[test]
    fn test_n_vars_needed() {
        assert_eq!(Bdd::n_vars_needed(0), 0);
        assert_eq!(Bdd::n_vars_needed(1), 0);
        assert_eq!(Bdd::n_vars_needed(2), 1);
        assert_eq!(Bdd::n_vars_needed(3), 2);
        assert_eq!(Bdd::n_vars_needed(4), 2);
        assert_eq!(Bdd::n_vars_needed(5), 3);
        assert_eq!(Bdd::n_vars_needed(256), 8);
        assert_eq!(Bdd::n_vars_needed(257), 9);
    }

    #[test]
    fn test_value_member() {
        let space = default_space();
        let vs = Domain::new(0, 8, 1);

        let p = Bdd::value(&space, &vs, 2) | Bdd::value(&space, &vs, 3);

        assert!(p.value_member(&vs, 2));
        assert!(p.value_member(&vs, 3));
        for w in [0, 1, 5, 6, 7] {
            assert!(!p.value_member(&vs, w), "value {} should not be a member", w);
        }
    }

    #[test]
    fn test_value_distinct() {
        let space = default_space();
        let vs = Domain::new(0, 4, 1);

        for v in 0..16 {
            let p = Bdd::value(&space, &vs, v);
            for w in 0..16 {
                assert_eq!(p.value_member(&vs, w), v == w);
            }
        }
    }

    #[test]
    fn test_value_range_matches_members() {
        let space = default_space();
        let vs = Domain::new(0, 4, 1);

        let p = Bdd::value_range(&space, &vs, 5, 11);
        for v in 0..16 {
            assert_eq!(p.value_member(&vs, v), (5..=11).contains(&v), "value {}", v);
        }

        // Full coverage and emptiness.
        assert!(Bdd::value_range(&space, &vs, 0, 15).is_true());
        assert!(Bdd::value_range(&space, &vs, 9, 5).is_false());
    }

    #[test]
    fn test_n_assignments_terminals() {
        let space = default_space();
        let vs = Domain::new(0, 8, 1);

        let t = Bdd::constant(&space, true);
        let f = Bdd::constant(&space, false);

        assert_eq!(t.n_assignments(&vs), BigUint::from(256u32));
        assert_eq!(f.n_assignments(&vs), BigUint::zero());
    }

    #[test]
    fn test_n_assignments_product_structure() {
        let space = default_space();
        let vs = Domain::new(0, 8, 1);

        let x2 = Bdd::var_true(&space, 2);
        let x3 = Bdd::var_true(&space, 3);

        // 3 of 4 combinations of (v2, v3), free choice of the other 6 vars.
        assert_eq!((&x2 | &x3).n_assignments(&vs), BigUint::from(192u32));
        assert_eq!((&x2 & &x3).n_assignments(&vs), BigUint::from(64u32));
    }

    #[test]
    fn test_assignments_value() {
        let space = default_space();
        let vs_3 = Domain::new(2, 3, 1);

        let x2 = Bdd::var_true(&space, 2);
        let x3 = Bdd::var_true(&space, 3);
        let p = &x2 | &x3;

        let values = p.assignments_value(&vs_3);
        assert_eq!(values, BTreeSet::from([1, 2, 3, 5, 6, 7]));
    }

    #[test]
    fn test_value_follow_transparent_vars() {
        let space = default_space();
        let vs = Domain::new(0, 3, 1);

        // Only tests v1; v0 and v2 are transparent.
        let p = Bdd::var_true(&space, 1);
        assert!(p.value_member(&vs, 2));
        assert!(p.value_member(&vs, 3));
        assert!(!p.value_member(&vs, 4));
        assert!(p.value_member(&vs, 7));
    }
}
