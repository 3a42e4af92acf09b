//! CNF formula: a fixed set of clauses over variables `1..=N`.
//!
//! A `Formula` is built once, validated on construction and never mutated
//! afterwards. Besides the clause list it keeps an occurrence list per literal,
//! so the propagator can find every clause a new assignment may have touched.

use std::fmt;

use crate::error::{Error, Result};
use crate::types::{Lit, Sign, Var};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    lits: Box<[Lit]>,
}

impl Clause {
    /// Builds a clause, collapsing repeated literals. Order of first
    /// appearance is kept.
    pub fn from_lits(lits: Vec<Lit>) -> Clause {
        let mut unique: Vec<Lit> = Vec::with_capacity(lits.len());
        for l in lits {
            if !unique.contains(&l) {
                unique.push(l);
            }
        }
        Clause { lits: unique.into_boxed_slice() }
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// A clause holding both `x` and `¬x` is satisfied by every assignment.
    pub fn is_tautology(&self) -> bool {
        self.lits.iter().any(|l| self.lits.contains(&l.neg()))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, l) in self.lits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", l)?;
        }
        write!(f, "]")
    }
}

/// Position of a clause in its formula, in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClauseRef(usize);

impl ClauseRef {
    pub fn index(&self) -> usize {
        self.0
    }
}

// 1-based, matching the numbering of clauses in the input file
impl fmt::Display for ClauseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0 + 1)
    }
}

#[derive(Debug, Clone)]
pub struct Formula {
    num_vars: usize,
    clauses: Vec<Clause>,
    // occurs[lit_index(l)] = clauses containing l
    occurs: Vec<Vec<ClauseRef>>,
}

/// Largest variable count a formula accepts, so that every variable is
/// addressable by an `i32` literal.
pub const MAX_VARS: usize = i32::MAX as usize;

fn lit_index(lit: Lit) -> usize {
    let v = lit.var().index();
    match lit.sign() {
        Sign::Pos => 2 * v,
        Sign::Neg => 2 * v + 1,
    }
}

impl Formula {
    /// Validates every literal against `num_vars` and indexes occurrences.
    ///
    /// The occurrence table only grows to the largest variable actually
    /// used, so a generous variable count costs nothing here.
    pub fn new(num_vars: usize, clauses: Vec<Vec<Lit>>) -> Result<Formula> {
        if num_vars > MAX_VARS {
            return Err(Error::TooManyVariables { num_vars, max: MAX_VARS });
        }

        let mut max_var = 0;
        for lits in clauses.iter() {
            for l in lits.iter() {
                let v = l.var().index();
                if v > num_vars {
                    return Err(Error::LiteralOutOfRange {
                        lit: i64::from(l.to_i32()),
                        num_vars,
                    });
                }
                max_var = max_var.max(v);
            }
        }

        let slots = max_var
            .checked_add(1)
            .and_then(|n| n.checked_mul(2))
            .ok_or(Error::TooManyVariables { num_vars, max: MAX_VARS })?;
        let clauses: Vec<Clause> = clauses.into_iter().map(Clause::from_lits).collect();
        let mut occurs: Vec<Vec<ClauseRef>> = vec![Vec::new(); slots];
        for (i, clause) in clauses.iter().enumerate() {
            for l in clause.lits() {
                occurs[lit_index(*l)].push(ClauseRef(i));
            }
        }

        Ok(Formula { num_vars, clauses, occurs })
    }

    /// Same as `new`, from DIMACS-style signed integers.
    pub fn from_dimacs(num_vars: usize, clauses: Vec<Vec<i32>>) -> Result<Formula> {
        let lits = clauses
            .into_iter()
            .map(|clause| clause.into_iter().map(Lit::try_from).collect::<Result<Vec<Lit>>>())
            .collect::<Result<Vec<Vec<Lit>>>>()?;
        Formula::new(num_vars, lits)
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn clause(&self, cref: ClauseRef) -> &Clause {
        &self.clauses[cref.0]
    }

    pub fn clause_refs(&self) -> impl Iterator<Item = ClauseRef> {
        (0..self.clauses.len()).map(ClauseRef)
    }

    /// Every clause containing `lit`, in input order.
    pub fn clauses_with(&self, lit: Lit) -> &[ClauseRef] {
        self.occurs
            .get(lit_index(lit))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn variables(&self) -> impl Iterator<Item = Var> {
        (1..=self.num_vars as u32).map(Var::from_u32)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn make_clause(lits: Vec<i32>) -> Vec<Lit> {
        lits.into_iter().map(Lit::from_i32).collect()
    }

    #[test]
    fn test_new_formula() {
        let f = Formula::new(3, vec![make_clause(vec![1, -2]), make_clause(vec![2, 3])]).unwrap();
        assert_eq!(f.num_vars(), 3);
        assert_eq!(f.num_clauses(), 2);
        assert_eq!(f.clause(ClauseRef(1)).lits(), make_clause(vec![2, 3]).as_slice());
    }

    #[test]
    fn test_out_of_range_literal() {
        let out = Formula::new(2, vec![make_clause(vec![1, -3])]);
        assert!(matches!(out, Err(Error::LiteralOutOfRange { lit: -3, num_vars: 2 })));
    }

    #[test]
    fn test_zero_literal() {
        let out = Formula::from_dimacs(2, vec![vec![1, 0, 2]]);
        assert!(matches!(out, Err(Error::ZeroLiteral)));
        assert!(out.unwrap_err().is_malformed_input());
    }

    #[test]
    fn test_variable_count_limit() {
        let out = Formula::new(usize::MAX, vec![]);
        assert!(matches!(out, Err(Error::TooManyVariables { num_vars: usize::MAX, .. })));
        assert!(out.unwrap_err().is_malformed_input());
        assert!(Formula::new(MAX_VARS + 1, vec![make_clause(vec![1])]).is_err());
    }

    #[test]
    fn test_large_variable_count_small_table() {
        let f = Formula::new(MAX_VARS, vec![make_clause(vec![1, -2])]).unwrap();
        assert_eq!(f.num_vars(), MAX_VARS);
        assert_eq!(f.clauses_with(Lit::from_i32(-2)), &[ClauseRef(0)]);
        assert!(f.clauses_with(Lit::from_i32(i32::MAX)).is_empty());
    }

    #[test]
    fn test_clauses_with() {
        let f = Formula::from_dimacs(2, vec![vec![1, 2], vec![-1, 2], vec![1, -2]]).unwrap();
        assert_eq!(f.clauses_with(Lit::from_i32(1)), &[ClauseRef(0), ClauseRef(2)]);
        assert_eq!(f.clauses_with(Lit::from_i32(-1)), &[ClauseRef(1)]);
        assert_eq!(f.clauses_with(Lit::from_i32(-2)), &[ClauseRef(2)]);
    }

    #[test]
    fn test_duplicate_literals_collapse() {
        let f = Formula::from_dimacs(2, vec![vec![1, 2, 1]]).unwrap();
        assert_eq!(f.clause(ClauseRef(0)).len(), 2);
        assert_eq!(f.clauses_with(Lit::from_i32(1)), &[ClauseRef(0)]);
    }

    #[test]
    fn test_tautology_and_empty_clause() {
        let f = Formula::from_dimacs(1, vec![vec![1, -1], vec![]]).unwrap();
        assert!(f.clause(ClauseRef(0)).is_tautology());
        assert!(f.clause(ClauseRef(1)).is_empty());
    }

    #[test]
    fn test_empty_formula() {
        let f = Formula::new(0, vec![]).unwrap();
        assert_eq!(f.num_clauses(), 0);
        assert_eq!(f.variables().count(), 0);
        assert_eq!(ClauseRef(0).to_string(), "C1");
    }
}
