//! A DPLL satisfiability solver for CNF formulas.
//!
//! ```no_run
//! use dpll_lib::{dimacs, solve};
//!
//! let formula = dimacs::parse_str("p cnf 2 2\n1 2 0\n-1 0\n")?;
//! let result = solve(&formula)?;
//! assert!(result.is_sat());
//! # Ok::<(), dpll_lib::Error>(())
//! ```

pub mod types;
pub mod error;
pub mod formula;
pub mod assignment;
pub mod propagate;
pub mod oracle;
pub mod solver;
pub mod trace;
pub mod dimacs;
pub mod snapshot;
pub mod report;
pub mod generator;

pub use error::{Error, Result};
pub use formula::{Clause, ClauseRef, Formula};
pub use snapshot::Snapshot;
pub use oracle::{DecisionOracle, OracleKind, SignPolicy};
pub use solver::{solve, SolveResult, Solver, SolverConfig, SolverStats, Witness};
pub use types::{Lit, Sign, Value, Var};
