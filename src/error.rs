//! Error type shared by the solver, the parser and the binaries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The input text is not a well-formed DIMACS CNF description.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// A clause mentions a variable outside `1..=num_vars`.
    #[error("literal {lit} out of range for {num_vars} variables")]
    LiteralOutOfRange { lit: i64, num_vars: usize },

    /// More variables than a literal can address.
    #[error("{num_vars} variables exceeds the limit of {max}")]
    TooManyVariables { num_vars: usize, max: usize },

    /// A clause contains the literal 0.
    #[error("0 is not a literal")]
    ZeroLiteral,

    /// The decision oracle was asked to branch with every variable assigned.
    #[error("no unassigned variable left to decide on")]
    NoUnassignedVariable,

    /// The cooperative decision budget ran out before a verdict was reached.
    #[error("decision limit reached after {decisions} decisions")]
    DecisionLimit { decisions: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for every way an input can fail to describe a formula.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Error::MalformedInput { .. }
                | Error::LiteralOutOfRange { .. }
                | Error::TooManyVariables { .. }
                | Error::ZeroLiteral
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
