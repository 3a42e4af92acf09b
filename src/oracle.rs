//! Branching: which unassigned variable to decide next, and which polarity
//! to try first.
//!
//! Completeness does not depend on the oracle. The search controller flips
//! every decision it backtracks over, so any policy that only ever returns an
//! unassigned variable explores the whole tree.

use crate::assignment::Assignment;
use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::types::{Lit, Sign, Value};

pub trait DecisionOracle {
    /// Picks an unassigned variable; the literal's sign is the polarity to try
    /// first. Fails with `NoUnassignedVariable` when every variable has a value.
    fn decide(&mut self, formula: &Formula, assignment: &Assignment<'_>) -> Result<Lit>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SignPolicy { Pos, Neg, Rnd { seed: u64 } }

impl Default for SignPolicy {
    fn default() -> SignPolicy {
        SignPolicy::Pos
    }
}

/// Which oracle a solver should be built with.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum OracleKind {
    #[default]
    LowestIndex,
    Mom,
}

impl OracleKind {
    /// `Mom` chooses the polarity together with the variable and ignores
    /// `sign`.
    pub fn build(&self, sign: SignPolicy) -> Box<dyn DecisionOracle> {
        match self {
            OracleKind::LowestIndex => Box::new(LowestIndex::new(sign)),
            OracleKind::Mom => Box::new(Mom::new()),
        }
    }
}

/// Lowest-numbered unassigned variable, polarity from a `SignPolicy`.
///
/// With `SignPolicy::Pos` this is the reference policy: smallest variable,
/// True first.
pub struct LowestIndex {
    policy  : SignPolicy,
    rng     : fastrand::Rng,
}

impl LowestIndex {
    pub fn new(policy: SignPolicy) -> LowestIndex {
        let seed = match policy {
            SignPolicy::Rnd { seed } => seed,
            _ => 0,
        };
        LowestIndex { policy, rng: fastrand::Rng::with_seed(seed) }
    }

    fn pick_sign(&mut self) -> Sign {
        match self.policy {
            SignPolicy::Pos => Sign::Pos,
            SignPolicy::Neg => Sign::Neg,
            SignPolicy::Rnd { .. } => {
                match self.rng.bool() {
                    true => Sign::Pos,
                    false => Sign::Neg,
                }
            }
        }
    }
}

impl Default for LowestIndex {
    fn default() -> LowestIndex {
        LowestIndex::new(SignPolicy::Pos)
    }
}

impl DecisionOracle for LowestIndex {
    fn decide(&mut self, _formula: &Formula, assignment: &Assignment<'_>) -> Result<Lit> {
        let var = assignment.unassigned().next().ok_or(Error::NoUnassignedVariable)?;
        Ok(var.to_lit(self.pick_sign()))
    }

    fn name(&self) -> &'static str {
        "lowest-index"
    }
}

/// Maximum Occurrences in clauses of Minimum size.
///
/// Looks only at clauses that are not yet satisfied and have the fewest
/// unassigned literals, counts every unassigned literal in them (each
/// polarity separately) and returns the most frequent one. Ties go to the
/// smaller variable, then to the literal met first in clause order.
#[derive(Debug, Default)]
pub struct Mom {}

impl Mom {
    pub fn new() -> Mom {
        Mom {}
    }

    fn best_literal(formula: &Formula, assignment: &Assignment<'_>) -> Option<Lit> {
        let mut min_size = usize::MAX;
        // (literal, occurrences), in order of first appearance
        let mut counts: Vec<(Lit, usize)> = Vec::new();

        for clause in formula.clauses() {
            let mut open: Vec<Lit> = Vec::new();
            let mut satisfied = false;
            for &l in clause.lits() {
                match assignment.lit_value(l) {
                    Value::True => {
                        satisfied = true;
                        break;
                    }
                    Value::Unassigned => open.push(l),
                    Value::False => {}
                }
            }
            if satisfied || open.is_empty() {
                continue;
            }

            if open.len() < min_size {
                min_size = open.len();
                counts.clear();
            }
            if open.len() == min_size {
                for l in open {
                    match counts.iter_mut().find(|(c, _)| *c == l) {
                        Some((_, n)) => *n += 1,
                        None => counts.push((l, 1)),
                    }
                }
            }
        }

        let mut best: Option<(Lit, usize)> = None;
        for (l, n) in counts {
            best = match best {
                Some((b, bn)) if n < bn || (n == bn && l.var() >= b.var()) => Some((b, bn)),
                _ => Some((l, n)),
            };
        }
        best.map(|(l, _)| l)
    }
}

impl DecisionOracle for Mom {
    fn decide(&mut self, formula: &Formula, assignment: &Assignment<'_>) -> Result<Lit> {
        match Mom::best_literal(formula, assignment) {
            Some(l) => Ok(l),
            None => assignment
                .unassigned()
                .next()
                .map(|v| v.to_lit(Sign::Pos))
                .ok_or(Error::NoUnassignedVariable),
        }
    }

    fn name(&self) -> &'static str {
        "mom"
    }
}
