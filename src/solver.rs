use std::fmt;

use log::{debug, info};

use crate::assignment::{Assignment, Reason};
use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::oracle::{DecisionOracle, OracleKind, SignPolicy};
use crate::propagate::{Propagation, Propagator};
use crate::trace::Tracer;
use crate::types::{Lit, Sign, Value, Var};

/// A total assignment proving satisfiability.
///
/// Variables the search never had to assign are reported as false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    values: Vec<bool>, // values[i] is the value of variable i + 1
}

impl Witness {
    fn from_assignment(assignment: &Assignment<'_>) -> Witness {
        Witness {
            values: assignment
                .values()
                .iter()
                .map(|v| v.to_bool().unwrap_or(false))
                .collect(),
        }
    }

    pub fn from_bools(values: Vec<bool>) -> Witness {
        Witness { values }
    }

    pub fn num_vars(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, var: Var) -> bool {
        var.index()
            .checked_sub(1)
            .and_then(|i| self.values.get(i))
            .copied()
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Var, bool)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &b)| (Var::from_u32(i as u32 + 1), b))
    }

    /// One literal per variable, true under this witness.
    pub fn lits(&self) -> Vec<Lit> {
        self.iter()
            .map(|(v, b)| v.to_lit(if b { Sign::Pos } else { Sign::Neg }))
            .collect()
    }

    /// Checks every clause independently of the search.
    pub fn satisfies(&self, formula: &Formula) -> bool {
        formula.clauses().iter().all(|c| {
            c.lits()
                .iter()
                .any(|l| l.eval(Value::from_bool(self.value(l.var()))) == Value::True)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Satisfiable(Witness),
    Unsatisfiable,
}

impl SolveResult {
    pub fn is_sat(&self) -> bool {
        matches!(self, SolveResult::Satisfiable(_))
    }

    pub fn witness(&self) -> Option<&Witness> {
        match self {
            SolveResult::Satisfiable(w) => Some(w),
            SolveResult::Unsatisfiable => None,
        }
    }
}

impl fmt::Display for SolveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveResult::Satisfiable(_) => write!(f, "SATISFIABLE"),
            SolveResult::Unsatisfiable => write!(f, "UNSATISFIABLE"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub decisions   : u64,
    pub propagations: u64,
    pub conflicts   : u64,
    pub backtracks  : u64,
}

impl fmt::Display for SolverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "decisions: {}, propagations: {}, conflicts: {}, backtracks: {}",
            self.decisions, self.propagations, self.conflicts, self.backtracks
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub oracle          : OracleKind,
    pub sign            : SignPolicy,
    /// Checked between decisions; `None` searches until a verdict.
    pub max_decisions   : Option<u64>,
}

/// The DPLL search controller.
///
/// Propagates, and on a conflict flips the most recent decision that has not
/// been flipped yet, dropping every decision above it. When no such decision
/// is left the formula is unsatisfiable. When propagation stalls the oracle
/// adds a new decision level.
pub struct Solver<'a> {
    formula     : &'a Formula,
    assignment  : Assignment<'a>,
    propagator  : Propagator,
    oracle      : Box<dyn DecisionOracle + 'a>,
    flipped     : Vec<bool>,    // flipped[l - 1]: level l already on its second polarity
    assumptions : Vec<Lit>,
    max_decisions: Option<u64>,
    stats       : SolverStats,
}

impl<'a> Solver<'a> {
    pub fn new(formula: &'a Formula) -> Solver<'a> {
        Solver::with_config(formula, &SolverConfig::default())
    }

    pub fn with_config(formula: &'a Formula, config: &SolverConfig) -> Solver<'a> {
        Solver {
            formula,
            assignment: Assignment::new(formula.num_vars()),
            propagator: Propagator::new(formula),
            oracle: config.oracle.build(config.sign),
            flipped: Vec::new(),
            assumptions: Vec::new(),
            max_decisions: config.max_decisions,
            stats: SolverStats::default(),
        }
    }

    pub fn with_oracle<O: DecisionOracle + 'a>(mut self, oracle: O) -> Solver<'a> {
        self.oracle = Box::new(oracle);
        self
    }

    /// Reports every assignment, conflict and backtrack to `tracer`.
    /// Resets the search state, so call it before `run`.
    pub fn with_tracer<T: Tracer + 'a>(mut self, tracer: T) -> Solver<'a> {
        self.assignment = Assignment::with_tracer(self.formula.num_vars(), tracer);
        self.flipped.clear();
        self
    }

    /// Fixes `lits` at level 0 before the search, as values given by the
    /// input. Backtracking never undoes them.
    pub fn with_assumptions(mut self, lits: Vec<Lit>) -> Result<Solver<'a>> {
        let num_vars = self.formula.num_vars();
        if let Some(l) = lits.iter().find(|l| l.var().index() > num_vars) {
            return Err(Error::LiteralOutOfRange { lit: i64::from(l.to_i32()), num_vars });
        }
        self.assumptions = lits;
        Ok(self)
    }

    pub fn stats(&self) -> SolverStats {
        SolverStats { propagations: self.propagator.propagations(), ..self.stats }
    }

    pub fn assignment(&self) -> &Assignment<'a> {
        &self.assignment
    }

    pub fn decision_level(&self) -> usize {
        self.assignment.current_decision_level()
    }

    // Puts the assumptions on an empty trail. False when two of them
    // contradict each other.
    fn assume(&mut self) -> bool {
        if self.assignment.num_assigned() > 0 {
            return true;
        }
        for &lit in self.assumptions.iter() {
            match self.assignment.lit_value(lit) {
                Value::True => {}
                Value::False => return false,
                Value::Unassigned => {
                    debug!("assume {}", lit);
                    self.assignment.assign(lit.var(), lit.satisfying_value(), Reason::Assumed);
                }
            }
        }
        true
    }

    fn decide(&mut self, lit: Lit) {
        debug!("decide {} at level {}", lit, self.decision_level() + 1);
        self.stats.decisions += 1;
        self.assignment.assign(lit.var(), lit.satisfying_value(), Reason::Decision);
        self.flipped.push(false);
    }

    // Undoes the deepest decision and, unless it was already flipped, retries
    // it with the opposite value. Already flipped levels are dropped and the
    // rule repeats one level up. Returns false once no decision is left.
    fn backtrack(&mut self) -> bool {
        loop {
            let level = self.assignment.current_decision_level();
            let pos = match self.assignment.last_decision() {
                Some(pos) => pos,
                None => return false,
            };
            let decision = self.assignment.trail()[pos];
            let already_flipped = self.flipped.pop().unwrap_or(false);

            self.assignment.undo_to(pos);
            self.stats.backtracks += 1;
            debug!("backtrack from level {} to {}", level, level - 1);
            self.assignment.tracer_mut().on_backtrack(level, level - 1);

            if !already_flipped {
                let value = !decision.value;
                debug!("flip {} to {} at level {}", decision.var, value, level);
                self.assignment.assign(decision.var, value, Reason::Decision);
                self.flipped.push(true);
                return true;
            }
        }
    }

    /// Runs the search to a verdict.
    ///
    /// Conflicts drive backtracking and are never errors. Fails only when the
    /// decision budget runs out or the oracle breaks its contract.
    pub fn run(&mut self) -> Result<SolveResult> {
        if !self.assume() {
            info!("UNSATISFIABLE (contradictory assumptions)");
            return Ok(SolveResult::Unsatisfiable);
        }
        loop {
            match self.propagator.propagate(self.formula, &mut self.assignment) {
                Propagation::Conflict(_) => {
                    self.stats.conflicts += 1;
                    if !self.backtrack() {
                        info!("UNSATISFIABLE ({})", self.stats());
                        return Ok(SolveResult::Unsatisfiable);
                    }
                }
                Propagation::AllSatisfied => {
                    info!("SATISFIABLE ({})", self.stats());
                    return Ok(SolveResult::Satisfiable(Witness::from_assignment(&self.assignment)));
                }
                Propagation::NoProgress => {
                    if let Some(limit) = self.max_decisions {
                        if self.stats.decisions >= limit {
                            return Err(Error::DecisionLimit { decisions: self.stats.decisions });
                        }
                    }
                    let lit = self.oracle.decide(self.formula, &self.assignment)?;
                    self.decide(lit);
                }
            }
        }
    }
}

/// Decides `formula` with the default configuration: lowest-numbered
/// variable first, True before False.
pub fn solve(formula: &Formula) -> Result<SolveResult> {
    Solver::new(formula).run()
}
