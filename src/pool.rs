//! Fresh-variable allocation.
//!
//! A [`VarPool`] tracks the variables already in use within one
//! top-level operation and hands out variables guaranteed not to collide
//! with them. Pools are ephemeral: create one per operation that needs
//! fresh variables, seed it with everything the operation can see, and
//! drop it when the operation returns.

use crate::domain::{Domain, Domains};

/// A pool of variables that can be allocated in different ways.
#[derive(Debug, Clone, Default)]
pub struct VarPool {
    allocated: Domain,
}

impl VarPool {
    /// A pool with every variable available.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tries to reserve exactly the variables of `vs`.
    ///
    /// Returns true and marks them allocated if `vs` is disjoint from
    /// everything already allocated; otherwise leaves the pool unchanged.
    pub fn alloc_domain(&mut self, vs: &Domain) -> bool {
        assert!(vs.is_finite(), "pool allocation needs a finite domain");

        if (&self.allocated & vs).is_empty() {
            self.allocated = &self.allocated | vs;
            true
        } else {
            false
        }
    }

    /// Allocates `n` consecutive variables from the first hole
    /// (numerically) large enough; `[0, n)` when the pool is empty.
    pub fn alloc(&mut self, n: usize) -> Domain {
        let mut hole_start = 0;
        for v in self.allocated.iter() {
            if v >= hole_start && (v - hole_start) as usize >= n {
                break;
            }
            hole_start = v + 1;
        }

        let hole = Domain::new(hole_start, n as u32, 1);
        let ok = self.alloc_domain(&hole);
        debug_assert!(ok);

        hole
    }

    /// Allocates `per_chunk * chunks` consecutive variables and lays
    /// them out as `chunks` domains interleaved at period `chunks`:
    /// chunk `j` gets positions `j, j+chunks, j+2*chunks, ...`.
    pub fn alloc_interleaved(&mut self, per_chunk: usize, chunks: usize) -> Domains {
        let vs = self.alloc(per_chunk * chunks);

        let mut res = Domains::new(chunks);
        let mut next = vs.iter();
        for _ in 0..per_chunk {
            for j in 0..chunks {
                let v = next.next().expect("allocated block too small");
                res[j] = &res[j] | &Domain::new(v, 1, 1);
            }
        }

        res
    }
}
