//! DIMACS CNF reading and writing.
//!
//! Accepted input: `c` and `#` comment lines, one `p cnf <vars> <clauses>` header
//! before any clause, then 0-terminated clauses that may span lines. A `%`
//! line ends the input early (as in the SATLIB benchmark files) and a last
//! clause missing its terminating 0 is still taken.

use std::io::{BufRead, BufReader, Read};

use crate::error::{Error, Result};
use crate::formula::{Formula, MAX_VARS};

fn malformed(line: usize, reason: impl Into<String>) -> Error {
    Error::MalformedInput { line, reason: reason.into() }
}

struct Header {
    num_vars    : usize,
    num_clauses : usize,
}

fn parse_header(line: &str, lineno: usize) -> Result<Header> {
    let elems: Vec<&str> = line.split_whitespace().collect();
    match elems.as_slice() {
        ["p", "cnf", vars, clauses] => {
            let num_vars: usize = vars
                .parse()
                .map_err(|_| malformed(lineno, format!("invalid variable count `{vars}`")))?;
            if num_vars > MAX_VARS {
                return Err(malformed(
                    lineno,
                    format!("variable count {num_vars} exceeds the limit of {MAX_VARS}"),
                ));
            }
            let num_clauses = clauses
                .parse()
                .map_err(|_| malformed(lineno, format!("invalid clause count `{clauses}`")))?;
            Ok(Header { num_vars, num_clauses })
        }
        _ => Err(malformed(lineno, "expected `p cnf <variables> <clauses>`")),
    }
}

pub fn parse_reader<R: BufRead>(reader: R) -> Result<Formula> {
    let mut header: Option<Header> = None;
    let mut clauses: Vec<Vec<i32>> = Vec::new();
    let mut current: Vec<i32> = Vec::new();
    let mut lineno = 0;

    for lineres in reader.lines() {
        let line = lineres?;
        lineno += 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('c') || line.starts_with('#') {
            continue;
        } else if line.starts_with('%') {
            break;
        } else if line.starts_with('p') {
            if header.is_some() {
                return Err(malformed(lineno, "duplicate `p cnf` header"));
            }
            header = Some(parse_header(line, lineno)?);
            continue;
        }

        let num_vars = match &header {
            Some(h) => h.num_vars,
            None => return Err(malformed(lineno, "clause before `p cnf` header")),
        };

        for tok in line.split_whitespace() {
            let lit: i64 = tok
                .parse()
                .map_err(|_| malformed(lineno, format!("invalid literal `{tok}`")))?;
            if lit == 0 {
                clauses.push(std::mem::take(&mut current));
                continue;
            }
            if lit.unsigned_abs() > num_vars as u64 {
                return Err(malformed(
                    lineno,
                    format!("literal {lit} exceeds declared variable count {num_vars}"),
                ));
            }
            // |lit| <= num_vars <= i32::MAX
            current.push(lit as i32);
        }
    }

    if !current.is_empty() {
        clauses.push(current);
    }

    let header = header.ok_or_else(|| malformed(lineno, "missing `p cnf` header"))?;
    if clauses.len() != header.num_clauses {
        return Err(malformed(
            lineno,
            format!("header declares {} clauses, found {}", header.num_clauses, clauses.len()),
        ));
    }

    Formula::from_dimacs(header.num_vars, clauses)
}

pub fn parse_str(input: &str) -> Result<Formula> {
    parse_reader(input.as_bytes())
}

pub fn parse<R: Read>(input: R) -> Result<Formula> {
    parse_reader(BufReader::new(input))
}

/// Renders `formula` as DIMACS text, one clause per line.
pub fn to_dimacs(formula: &Formula) -> String {
    let mut out = format!("p cnf {} {}\n", formula.num_vars(), formula.num_clauses());
    for clause in formula.clauses() {
        for l in clause.lits() {
            out.push_str(&l.to_string());
            out.push(' ');
        }
        out.push_str("0\n");
    }
    out
}
