//! Partial valuation plus the trail that records how it was built.
//!
//! The trail is the single source of truth: every value change goes through
//! `assign`, which appends a record, and `undo_to` pops records back off,
//! resetting their variables. Truncating the trail to length `k` therefore
//! restores exactly the valuation it had when it was `k` long.

use log::trace;

use crate::formula::ClauseRef;
use crate::trace::{NoTrace, Tracer};
use crate::types::{Lit, Sign, Value, Var};

/// Why a variable holds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    Decision,
    Propagated(ClauseRef),
    /// Fixed by the input before the search started, at level 0.
    Assumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailEntry {
    pub var: Var,
    pub value: Value,
    pub reason: Reason,
}

impl TrailEntry {
    /// The literal this entry made true.
    pub fn lit(&self) -> Lit {
        match self.value {
            Value::False => self.var.to_lit(Sign::Neg),
            _ => self.var.to_lit(Sign::Pos),
        }
    }

    pub fn is_decision(&self) -> bool {
        self.reason == Reason::Decision
    }
}

pub struct Assignment<'t> {
    values  : Vec<Value>,       // indexed by variable, slot 0 unused
    trail   : Vec<TrailEntry>,
    lim     : Vec<usize>,       // trail positions of decision entries
    tracer  : Box<dyn Tracer + 't>,
}

impl Assignment<'static> {
    /// Every variable in `1..=num_vars` starts unassigned.
    pub fn new(num_vars: usize) -> Assignment<'static> {
        Assignment::with_tracer(num_vars, NoTrace)
    }
}

impl<'t> Assignment<'t> {
    pub fn with_tracer<T: Tracer + 't>(num_vars: usize, tracer: T) -> Assignment<'t> {
        Assignment {
            values: vec![Value::Unassigned; num_vars + 1],
            trail: Vec::new(),
            lim: Vec::new(),
            tracer: Box::new(tracer),
        }
    }

    pub fn num_vars(&self) -> usize {
        self.values.len() - 1
    }

    pub fn value_of(&self, var: Var) -> Value {
        self.values[var.index()]
    }

    /// Truth value of a literal under the current valuation.
    pub fn lit_value(&self, lit: Lit) -> Value {
        lit.eval(self.value_of(lit.var()))
    }

    /// Sets an unassigned variable and records it on the trail.
    ///
    /// Assigning a variable that already holds a value is a bug in the caller:
    /// conflicts are found by evaluating clauses, never by double assignment.
    pub fn assign(&mut self, var: Var, value: Value, reason: Reason) {
        debug_assert!(value.is_assigned(), "cannot assign Unassigned to {var}");
        debug_assert_eq!(
            self.value_of(var),
            Value::Unassigned,
            "{var} assigned twice without undo"
        );

        debug_assert!(
            reason != Reason::Assumed || self.lim.is_empty(),
            "{var} assumed above level 0"
        );

        if reason == Reason::Decision {
            self.lim.push(self.trail.len());
        }
        self.values[var.index()] = value;
        let entry = TrailEntry { var, value, reason };
        self.trail.push(entry);

        trace!("assign {} = {} ({:?}) at level {}", var, value, reason, self.lim.len());
        self.tracer.on_assign(&entry, self.lim.len());
    }

    /// Pops the trail back to `len` records, unassigning each popped variable.
    /// A no-op when the trail is already that short.
    pub fn undo_to(&mut self, len: usize) {
        while self.trail.len() > len {
            if let Some(entry) = self.trail.pop() {
                trace!("undo {}", entry.var);
                self.values[entry.var.index()] = Value::Unassigned;
            }
        }
        while self.lim.last().map_or(false, |&pos| pos >= len) {
            self.lim.pop();
        }
    }

    /// Number of decision records on the trail.
    pub fn current_decision_level(&self) -> usize {
        self.lim.len()
    }

    /// Trail position of the most recent decision, if any.
    pub fn last_decision(&self) -> Option<usize> {
        self.lim.last().copied()
    }

    pub fn trail(&self) -> &[TrailEntry] {
        &self.trail
    }

    pub fn num_assigned(&self) -> usize {
        self.trail.len()
    }

    pub fn is_complete(&self) -> bool {
        self.trail.len() == self.num_vars()
    }

    pub fn unassigned(&self) -> impl Iterator<Item = Var> + '_ {
        self.values
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, v)| !v.is_assigned())
            .map(|(i, _)| Var::from_u32(i as u32))
    }

    /// Current values of variables `1..=num_vars`, in order.
    pub fn values(&self) -> &[Value] {
        &self.values[1..]
    }

    pub fn tracer_mut(&mut self) -> &mut (dyn Tracer + 't) {
        self.tracer.as_mut()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::trace::{TraceEvent, TraceLog};

    fn var(v: u32) -> Var {
        Var::from_u32(v)
    }

    #[test]
    fn test_new_all_unassigned() {
        let a = Assignment::new(3);
        assert_eq!(a.num_vars(), 3);
        assert!(a.values().iter().all(|v| *v == Value::Unassigned));
        assert_eq!(a.current_decision_level(), 0);
        assert_eq!(a.unassigned().count(), 3);
    }

    #[test]
    fn test_assign_and_levels() {
        let mut a = Assignment::new(4);
        a.assign(var(1), Value::True, Reason::Decision);
        assert_eq!(a.current_decision_level(), 1);
        a.assign(var(2), Value::False, Reason::Decision);
        a.assign(var(3), Value::True, Reason::Decision);
        a.assign(var(4), Value::True, Reason::Decision);
        assert_eq!(a.current_decision_level(), 4);
        assert!(a.is_complete());
        assert_eq!(a.lit_value(Lit::from_i32(-2)), Value::True);
        assert_eq!(a.last_decision(), Some(3));
    }

    #[test]
    fn test_undo_to_restores_state() {
        let f = crate::formula::Formula::from_dimacs(4, vec![vec![3, 4]]).unwrap();
        let c1 = f.clause_refs().next().unwrap();
        let mut a = Assignment::new(4);
        a.assign(var(1), Value::True, Reason::Decision);
        a.assign(var(2), Value::False, Reason::Decision);
        let before: Vec<Value> = a.values().to_vec();
        a.assign(var(3), Value::False, Reason::Decision);
        a.assign(var(4), Value::True, Reason::Propagated(c1));

        a.undo_to(2);
        assert_eq!(a.values(), before.as_slice());
        assert_eq!(a.current_decision_level(), 2);
        assert_eq!(a.trail().len(), 2);

        a.undo_to(0);
        assert_eq!(a.current_decision_level(), 0);
        assert_eq!(a.unassigned().count(), 4);
    }

    #[test]
    fn test_undo_to_current_length_is_noop() {
        let mut a = Assignment::new(2);
        a.assign(var(2), Value::True, Reason::Decision);
        let trail = a.trail().to_vec();
        a.undo_to(a.trail().len());
        assert_eq!(a.trail(), trail.as_slice());
        assert_eq!(a.current_decision_level(), 1);
    }

    #[test]
    fn test_replay_after_undo() {
        let f = crate::formula::Formula::from_dimacs(3, vec![vec![-1, 2]]).unwrap();
        let c1 = f.clause_refs().next().unwrap();
        let mut a = Assignment::new(3);
        a.assign(var(1), Value::True, Reason::Decision);
        a.assign(var(2), Value::True, Reason::Propagated(c1));
        a.assign(var(3), Value::False, Reason::Decision);
        let snapshot = a.values().to_vec();
        let trail = a.trail().to_vec();

        a.undo_to(1);
        for e in trail[1..].iter() {
            a.assign(e.var, e.value, e.reason);
        }
        assert_eq!(a.values(), snapshot.as_slice());
        assert_eq!(a.trail(), trail.as_slice());
        assert_eq!(a.current_decision_level(), 2);
    }

    #[test]
    fn test_tracer_called_once_per_assign() {
        let mut log = TraceLog::new();
        {
            let mut a = Assignment::with_tracer(2, &mut log);
            a.assign(var(1), Value::False, Reason::Decision);
            a.assign(var(2), Value::True, Reason::Decision);
            a.undo_to(0);
        }
        assert_eq!(
            log.events(),
            &[
                TraceEvent::Assign { var: var(1), value: Value::False, reason: Reason::Decision, level: 1 },
                TraceEvent::Assign { var: var(2), value: Value::True, reason: Reason::Decision, level: 2 },
            ]
        );
    }

    #[test]
    fn test_assumed_entries_stay_at_level_zero() {
        let mut a = Assignment::new(3);
        a.assign(var(3), Value::False, Reason::Assumed);
        a.assign(var(1), Value::True, Reason::Decision);
        assert_eq!(a.current_decision_level(), 1);
        a.undo_to(a.last_decision().unwrap());
        assert_eq!(a.current_decision_level(), 0);
        assert_eq!(a.value_of(var(3)), Value::False);
        assert!(!a.trail()[0].is_decision());
    }

    #[test]
    fn test_trail_entry_lit() {
        let e = TrailEntry { var: var(5), value: Value::False, reason: Reason::Decision };
        assert_eq!(e.lit(), Lit::from_i32(-5));
        assert!(e.is_decision());
    }
}
