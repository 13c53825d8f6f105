//! Enumeration of object orderings under must-precede constraints
//!
//! Orderings are built position by position, trying objects in index
//! order and only placing an object once all of its predecessors are
//! placed. The result is the list of all permutations that satisfy every
//! constraint, in lexicographic index order, without visiting the invalid
//! ones.

/// Valid orderings as index permutations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Orderings {
    /// Each ordering lists indexes into the object slice
    pub orderings: Vec<Vec<usize>>,
    /// True when enumeration stopped at the limit
    pub truncated: bool,
}

/// Enumerate orderings of `count` objects respecting `constraints`
///
/// A constraint `(a, b)` requires index `a` before index `b`. Constraints
/// naming indexes out of range are ignored. A `limit` of zero means no
/// limit.
#[must_use]
pub fn valid_orderings(count: usize, constraints: &[(usize, usize)], limit: usize) -> Orderings {
    let mut predecessors = vec![Vec::new(); count];
    for &(before, after) in constraints {
        if before < count && after < count {
            predecessors[after].push(before);
        }
    }

    let mut search = Search {
        predecessors,
        placed: vec![false; count],
        current: Vec::with_capacity(count),
        limit,
        result: Orderings::default(),
    };
    search.extend();
    search.result
}

struct Search {
    predecessors: Vec<Vec<usize>>,
    placed: Vec<bool>,
    current: Vec<usize>,
    limit: usize,
    result: Orderings,
}

impl Search {
    fn extend(&mut self) {
        if self.result.truncated {
            return;
        }
        if self.current.len() == self.placed.len() {
            if self.limit != 0 && self.result.orderings.len() >= self.limit {
                self.result.truncated = true;
                return;
            }
            self.result.orderings.push(self.current.clone());
            return;
        }

        for candidate in 0..self.placed.len() {
            if self.placed[candidate] || !self.ready(candidate) {
                continue;
            }
            self.placed[candidate] = true;
            self.current.push(candidate);
            self.extend();
            self.current.pop();
            self.placed[candidate] = false;
            if self.result.truncated {
                return;
            }
        }
    }

    fn ready(&self, candidate: usize) -> bool {
        self.predecessors[candidate]
            .iter()
            .all(|&before| self.placed[before])
    }
}

/// True if `ordering` places every constraint's first index before its second
#[must_use]
pub fn respects(ordering: &[usize], constraints: &[(usize, usize)]) -> bool {
    let position = |index: usize| ordering.iter().position(|&i| i == index);
    constraints
        .iter()
        .all(|&(before, after)| match (position(before), position(after)) {
            (Some(b), Some(a)) => b < a,
            _ => true,
        })
}
