//! Step-by-step record of a search, for harnesses that want to inspect
//! what propagation and backtracking did.

use std::fmt;
use std::io::{self, Write};

use crate::assignment::{Reason, TrailEntry};
use crate::formula::ClauseRef;
use crate::types::{Value, Var};

/// Receives search events as they happen.
///
/// `on_assign` is called exactly once per `Assignment::assign`, with the
/// decision level the assignment was made at.
pub trait Tracer {
    fn on_assign(&mut self, entry: &TrailEntry, level: usize);

    fn on_conflict(&mut self, _clause: ClauseRef, _level: usize) {}

    fn on_backtrack(&mut self, _from: usize, _to: usize) {}
}

impl<T: Tracer + ?Sized> Tracer for &mut T {
    fn on_assign(&mut self, entry: &TrailEntry, level: usize) {
        (**self).on_assign(entry, level)
    }

    fn on_conflict(&mut self, clause: ClauseRef, level: usize) {
        (**self).on_conflict(clause, level)
    }

    fn on_backtrack(&mut self, from: usize, to: usize) {
        (**self).on_backtrack(from, to)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl Tracer for NoTrace {
    fn on_assign(&mut self, _entry: &TrailEntry, _level: usize) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Assign { var: Var, value: Value, reason: Reason, level: usize },
    Conflict { clause: ClauseRef, level: usize },
    Backtrack { from: usize, to: usize },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Assign { var, value, reason, level } => {
                let lit = TrailEntry { var: *var, value: *value, reason: *reason }.lit();
                match reason {
                    Reason::Decision => write!(f, "[DL{}] DECIDE L={}", level, lit),
                    Reason::Propagated(c) => write!(f, "[DL{}] UNIT L={} {}", level, lit, c),
                    Reason::Assumed => write!(f, "[DL{}] ASSUME L={}", level, lit),
                }
            }
            TraceEvent::Conflict { clause, level } => write!(f, "[DL{}] CONFLICT {}", level, clause),
            TraceEvent::Backtrack { from, to } => write!(f, "[DL{}] BACKTRACK -> DL{}", from, to),
        }
    }
}

/// Collects events in memory; renders them one per line.
#[derive(Debug, Default, Clone)]
pub struct TraceLog {
    events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn new() -> TraceLog {
        TraceLog { events: Vec::new() }
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for e in self.events.iter() {
            out.push_str(&e.to_string());
            out.push('\n');
        }
        out
    }

    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        for e in self.events.iter() {
            writeln!(w, "{}", e)?;
        }
        w.flush()
    }
}

impl Tracer for TraceLog {
    fn on_assign(&mut self, entry: &TrailEntry, level: usize) {
        self.events.push(TraceEvent::Assign {
            var: entry.var,
            value: entry.value,
            reason: entry.reason,
            level,
        });
    }

    fn on_conflict(&mut self, clause: ClauseRef, level: usize) {
        self.events.push(TraceEvent::Conflict { clause, level });
    }

    fn on_backtrack(&mut self, from: usize, to: usize) {
        self.events.push(TraceEvent::Backtrack { from, to });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::formula::Formula;

    #[test]
    fn test_render_events() {
        let f = Formula::from_dimacs(3, vec![vec![1], vec![2], vec![-2, -3]]).unwrap();
        let c3 = f.clause_refs().nth(2).unwrap();
        let mut log = TraceLog::new();
        log.on_assign(
            &TrailEntry { var: Var::from_u32(2), value: Value::True, reason: Reason::Decision },
            1,
        );
        log.on_assign(
            &TrailEntry { var: Var::from_u32(3), value: Value::False, reason: Reason::Propagated(c3) },
            1,
        );
        log.on_conflict(c3, 1);
        log.on_backtrack(1, 0);
        assert_eq!(
            log.render(),
            "[DL1] DECIDE L=2\n[DL1] UNIT L=-3 C3\n[DL1] CONFLICT C3\n[DL1] BACKTRACK -> DL0\n"
        );
    }

    #[test]
    fn test_write_to_matches_render() {
        let mut log = TraceLog::new();
        log.on_backtrack(2, 1);
        let mut buf: Vec<u8> = Vec::new();
        log.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), log.render());
    }

    #[test]
    fn test_tracer_through_mut_ref() {
        fn feed<T: Tracer>(mut t: T) {
            t.on_backtrack(3, 2);
        }
        let mut log = TraceLog::new();
        feed(&mut log);
        assert_eq!(log.events(), &[TraceEvent::Backtrack { from: 3, to: 2 }]);
    }
}
