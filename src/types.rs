//! Variables and variable renamings.

use std::collections::HashMap;
use std::fmt;
use std::ops::BitOr;

/// A Boolean variable of a BDD, 0-indexed.
///
/// The engine orders variables numerically: a node's variable is strictly
/// smaller than the variables of its descendants.
pub type Var = u32;

/// A renaming of variables.
///
/// A `VarMap` is the identity everywhere except for its explicit entries.
/// It is built either entry by entry or with [`Domain::map_vars`], which
/// pairs up two equally sized domains.
///
/// [`Domain::map_vars`]: crate::domain::Domain::map_vars
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarMap {
    map: HashMap<Var, Var>,
}

impl VarMap {
    /// Creates an empty (identity) renaming.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the entry `from -> to`, replacing any previous entry for `from`.
    pub fn insert(&mut self, from: Var, to: Var) {
        self.map.insert(from, to);
    }

    /// Maps a variable, returning it unchanged if there is no entry.
    pub fn map(&self, v: Var) -> Var {
        match self.map.get(&v) {
            Some(&w) => w,
            None => v,
        }
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over the explicit entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Var, Var)> + '_ {
        self.map.iter().map(|(&from, &to)| (from, to))
    }
}

// map1 | map2: union of entries; entries of map1 win on common keys.
impl BitOr for VarMap {
    type Output = VarMap;

    fn bitor(self, rhs: VarMap) -> VarMap {
        let mut res = rhs;
        for (from, to) in self.map {
            res.map.insert(from, to);
        }
        res
    }
}

impl fmt::Display for VarMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort();
        write!(f, "{{")?;
        for (i, (from, to)) in entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}->{}", from, to)?;
        }
        write!(f, "}}")
    }
}
