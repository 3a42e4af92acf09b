//! Random k-SAT instances, for benchmarking and cross-checking the solver.

use crate::error::Result;
use crate::formula::Formula;

/// `num_clauses` clauses of `min(k, num_vars)` distinct variables each, every
/// variable negated with probability 1/2. The same seed always gives the same
/// formula.
pub fn random_ksat(num_vars: usize, num_clauses: usize, k: usize, seed: u64) -> Result<Formula> {
    let rng = fastrand::Rng::with_seed(seed);
    let width = k.min(num_vars);
    let mut vars: Vec<i32> = (1..=num_vars as i32).collect();
    let mut clauses: Vec<Vec<i32>> = Vec::with_capacity(num_clauses);

    for _ in 0..num_clauses {
        // partial Fisher-Yates: the first `width` slots end up a uniform sample
        for i in 0..width {
            let j = rng.usize(i..num_vars);
            vars.swap(i, j);
        }
        let clause: Vec<i32> = vars[..width]
            .iter()
            .map(|&v| if rng.bool() { v } else { -v })
            .collect();
        clauses.push(clause);
    }

    Formula::from_dimacs(num_vars, clauses)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dimacs::to_dimacs;
    use std::collections::HashSet;

    #[test]
    fn test_shape() {
        let f = random_ksat(10, 42, 3, 7).unwrap();
        assert_eq!(f.num_vars(), 10);
        assert_eq!(f.num_clauses(), 42);
        for c in f.clauses() {
            assert_eq!(c.len(), 3);
            let vars: HashSet<_> = c.lits().iter().map(|l| l.var()).collect();
            assert_eq!(vars.len(), 3);
        }
    }

    #[test]
    fn test_same_seed_same_formula() {
        let a = random_ksat(8, 30, 3, 99).unwrap();
        let b = random_ksat(8, 30, 3, 99).unwrap();
        assert_eq!(to_dimacs(&a), to_dimacs(&b));
    }

    #[test]
    fn test_width_capped_by_num_vars() {
        let f = random_ksat(2, 5, 3, 1).unwrap();
        assert!(f.clauses().iter().all(|c| c.len() == 2));
    }
}
