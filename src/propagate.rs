//! Boolean constraint propagation.
//!
//! Every call starts with a full pass over the formula. After that only the
//! clauses containing the negation of a freshly forced literal are looked at
//! again, since those are the only ones whose state can have changed.

use std::collections::VecDeque;

use log::debug;

use crate::assignment::{Assignment, Reason};
use crate::formula::{Clause, ClauseRef, Formula};
use crate::types::{Lit, Value};

/// State of a single clause under a partial assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseState {
    /// At least one literal is true.
    Satisfied,
    /// Every literal is false.
    Conflicting,
    /// Exactly one literal unassigned, the rest false.
    Unit(Lit),
    /// Two or more unassigned literals, none true.
    Unresolved,
}

pub fn clause_state(clause: &Clause, assignment: &Assignment<'_>) -> ClauseState {
    let mut unassigned: Option<Lit> = None;
    let mut n_unassigned = 0;
    for &l in clause.lits() {
        match assignment.lit_value(l) {
            Value::True => return ClauseState::Satisfied,
            Value::False => {}
            Value::Unassigned => {
                n_unassigned += 1;
                unassigned = Some(l);
            }
        }
    }
    match (n_unassigned, unassigned) {
        (0, _) => ClauseState::Conflicting,
        (1, Some(l)) => ClauseState::Unit(l),
        _ => ClauseState::Unresolved,
    }
}

/// Terminal outcome of one propagation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Some clause has every literal false.
    Conflict(ClauseRef),
    /// Fixed point reached with at least one clause still unresolved.
    NoProgress,
    /// Every clause is satisfied.
    AllSatisfied,
}

pub struct Propagator {
    queue       : VecDeque<ClauseRef>,
    queued      : Vec<bool>,
    propagations: u64,
}

impl Propagator {
    pub fn new(formula: &Formula) -> Propagator {
        Propagator {
            queue: VecDeque::with_capacity(formula.num_clauses()),
            queued: vec![false; formula.num_clauses()],
            propagations: 0,
        }
    }

    /// Number of literals forced so far, over every call.
    pub fn propagations(&self) -> u64 {
        self.propagations
    }

    fn push(&mut self, cref: ClauseRef) {
        if !self.queued[cref.index()] {
            self.queued[cref.index()] = true;
            self.queue.push_back(cref);
        }
    }

    fn clear(&mut self) {
        while let Some(c) = self.queue.pop_front() {
            self.queued[c.index()] = false;
        }
    }

    /// Saturates the forced consequences of `assignment`.
    ///
    /// Only ever adds assignments, each with `Reason::Propagated`. Stops at
    /// the first conflicting clause found.
    pub fn propagate(&mut self, formula: &Formula, assignment: &mut Assignment<'_>) -> Propagation {
        for cref in formula.clause_refs() {
            self.push(cref);
        }

        while let Some(cref) = self.queue.pop_front() {
            self.queued[cref.index()] = false;

            match clause_state(formula.clause(cref), assignment) {
                ClauseState::Conflicting => {
                    let level = assignment.current_decision_level();
                    debug!("conflict in {} {} at level {}", cref, formula.clause(cref), level);
                    assignment.tracer_mut().on_conflict(cref, level);
                    self.clear();
                    return Propagation::Conflict(cref);
                }
                ClauseState::Unit(lit) => {
                    assignment.assign(lit.var(), lit.satisfying_value(), Reason::Propagated(cref));
                    self.propagations += 1;
                    for &other in formula.clauses_with(lit.neg()) {
                        self.push(other);
                    }
                }
                ClauseState::Satisfied | ClauseState::Unresolved => {}
            }
        }

        let all_satisfied = formula
            .clauses()
            .iter()
            .all(|c| clause_state(c, assignment) == ClauseState::Satisfied);

        if all_satisfied {
            Propagation::AllSatisfied
        } else {
            Propagation::NoProgress
        }
    }
}
