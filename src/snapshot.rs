//! Line-based state files: a formula plus values fixed before the search.
//!
//! ```text
//! --- HEADER AND METADATA ---
//! V: 3
//! C: 2
//!
//! --- VARIABLE ASSIGNMENTS ---
//! 1    | TRUE
//! 2    | UNASSIGNED
//! 3    | UNASSIGNED
//!
//! --- CLAUSE LIST ---
//! C1    | [-1, 2, 3]    | [0, 1]
//! C2    | [-2]          | [0]
//! ```
//!
//! Sections are recognised by their `---` banner. The third column of a
//! clause row (watched positions) and any other section, such as a
//! `2-WATCHED` listing, are read past. Clauses must be numbered `C1, C2, ...`
//! in order, so clause ids in traces match the file.

use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};

use crate::error::{Error, Result};
use crate::formula::{Formula, MAX_VARS};
use crate::types::Lit;

/// A formula and the literals the input fixed at level 0.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub formula     : Formula,
    pub assumptions : Vec<Lit>,
}

impl From<Formula> for Snapshot {
    fn from(formula: Formula) -> Snapshot {
        Snapshot { formula, assumptions: Vec::new() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section { Header, Vars, Clauses, Other }

fn section_of(banner: &str) -> Section {
    if banner.contains("HEADER") || banner.contains("METADATA") {
        Section::Header
    } else if banner.contains("VARIABLE ASSIGNMENTS") {
        Section::Vars
    } else if banner.contains("CLAUSE LIST") {
        Section::Clauses
    } else {
        Section::Other
    }
}

fn malformed(line: usize, reason: impl Into<String>) -> Error {
    Error::MalformedInput { line, reason: reason.into() }
}

fn parse_count(value: &str, what: &str, lineno: usize) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| malformed(lineno, format!("invalid {what} `{}`", value.trim())))
}

// `V:` must be known before any row that names a variable
fn declared_vars(num_vars: Option<usize>, lineno: usize) -> Result<usize> {
    num_vars.ok_or_else(|| malformed(lineno, "`V:` must come before variables and clauses"))
}

fn parse_var_row(line: &str, lineno: usize, num_vars: usize) -> Result<(usize, Option<bool>)> {
    let (id, value) = line
        .split_once('|')
        .ok_or_else(|| malformed(lineno, "expected `<var> | TRUE|FALSE|UNASSIGNED`"))?;
    let id = parse_count(id, "variable", lineno)?;
    if id == 0 || id > num_vars {
        return Err(malformed(lineno, format!("variable {id} outside 1..={num_vars}")));
    }
    let value = match value.trim() {
        "TRUE" => Some(true),
        "FALSE" => Some(false),
        "UNASSIGNED" => None,
        other => return Err(malformed(lineno, format!("invalid value `{other}`"))),
    };
    Ok((id, value))
}

fn parse_clause_row(line: &str, lineno: usize, num_vars: usize) -> Result<(usize, Vec<i32>)> {
    let mut cols = line.split('|');
    let id = cols.next().unwrap_or("").trim();
    let lits = cols
        .next()
        .ok_or_else(|| malformed(lineno, "expected `C<n> | [<literals>]`"))?
        .trim();

    let id = id
        .strip_prefix('C')
        .and_then(|n| n.parse::<usize>().ok())
        .ok_or_else(|| malformed(lineno, format!("invalid clause id `{id}`")))?;
    let inner = lits
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or_else(|| malformed(lineno, format!("expected a bracketed literal list, got `{lits}`")))?
        .trim();

    let mut clause = Vec::new();
    if inner.is_empty() {
        return Ok((id, clause));
    }
    for tok in inner.split(',') {
        let tok = tok.trim();
        let lit: i64 = tok
            .parse()
            .map_err(|_| malformed(lineno, format!("invalid literal `{tok}`")))?;
        if lit == 0 || lit.unsigned_abs() > num_vars as u64 {
            return Err(malformed(lineno, format!("literal {lit} outside ±1..={num_vars}")));
        }
        // |lit| <= num_vars <= i32::MAX
        clause.push(lit as i32);
    }
    Ok((id, clause))
}

pub fn parse_reader<R: BufRead>(reader: R) -> Result<Snapshot> {
    let mut section: Option<Section> = None;
    let mut num_vars: Option<usize> = None;
    let mut num_clauses: Option<usize> = None;
    let mut assumptions: Vec<Lit> = Vec::new();
    let mut seen: HashSet<usize> = HashSet::new();
    let mut clauses: Vec<Vec<i32>> = Vec::new();
    let mut lineno = 0;

    for lineres in reader.lines() {
        let line = lineres?;
        lineno += 1;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line.starts_with("---") {
            section = Some(section_of(line));
            continue;
        }

        match section {
            None => return Err(malformed(lineno, "content before the first `---` section")),
            Some(Section::Other) => {}
            Some(Section::Header) => {
                if let Some(v) = line.strip_prefix("V:") {
                    let n = parse_count(v, "variable count", lineno)?;
                    if n > MAX_VARS {
                        return Err(malformed(
                            lineno,
                            format!("variable count {n} exceeds the limit of {MAX_VARS}"),
                        ));
                    }
                    num_vars = Some(n);
                } else if let Some(c) = line.strip_prefix("C:") {
                    num_clauses = Some(parse_count(c, "clause count", lineno)?);
                }
            }
            Some(Section::Vars) => {
                let n = declared_vars(num_vars, lineno)?;
                let (id, value) = parse_var_row(line, lineno, n)?;
                if !seen.insert(id) {
                    return Err(malformed(lineno, format!("variable {id} listed twice")));
                }
                if let Some(b) = value {
                    // id <= num_vars <= i32::MAX
                    let v = id as i32;
                    assumptions.push(Lit::from_i32(if b { v } else { -v }));
                }
            }
            Some(Section::Clauses) => {
                let n = declared_vars(num_vars, lineno)?;
                let (id, clause) = parse_clause_row(line, lineno, n)?;
                if id != clauses.len() + 1 {
                    return Err(malformed(
                        lineno,
                        format!("clause C{id} out of order, expected C{}", clauses.len() + 1),
                    ));
                }
                clauses.push(clause);
            }
        }
    }

    let num_vars = num_vars.ok_or_else(|| malformed(lineno, "missing `V:` header"))?;
    if let Some(expected) = num_clauses {
        if expected != clauses.len() {
            return Err(malformed(
                lineno,
                format!("header declares {} clauses, found {}", expected, clauses.len()),
            ));
        }
    }

    let formula = Formula::from_dimacs(num_vars, clauses)?;
    Ok(Snapshot { formula, assumptions })
}

pub fn parse_str(input: &str) -> Result<Snapshot> {
    parse_reader(input.as_bytes())
}

pub fn parse<R: Read>(input: R) -> Result<Snapshot> {
    parse_reader(BufReader::new(input))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solver::{SolveResult, Solver, Witness};

    const STATE: &str = "\
--- HEADER AND METADATA ---
V: 3
C: 2

--- VARIABLE ASSIGNMENTS ---
1    | FALSE
2    | UNASSIGNED
3    | UNASSIGNED

--- CLAUSE LIST ---
C1    | [1, 2, 3]    | [0, 1]
C2    | [-2, 3]      | [0, 1]

--- 2-WATCHED LITERAL MAP ---
L1 -> [C1]
";

    fn lits(clause: &[i32]) -> Vec<Lit> {
        clause.iter().map(|&l| Lit::from_i32(l)).collect()
    }

    #[test]
    fn test_parse_state() {
        let s = parse_str(STATE).unwrap();
        assert_eq!(s.formula.num_vars(), 3);
        assert_eq!(s.formula.num_clauses(), 2);
        assert_eq!(s.formula.clauses()[0].lits(), lits(&[1, 2, 3]).as_slice());
        assert_eq!(s.formula.clauses()[1].lits(), lits(&[-2, 3]).as_slice());
        assert_eq!(s.assumptions, lits(&[-1]));
    }

    #[test]
    fn test_solve_from_state() {
        let s = parse_str(STATE).unwrap();
        let out = Solver::new(&s.formula).with_assumptions(s.assumptions).unwrap().run().unwrap();
        assert_eq!(out, SolveResult::Satisfiable(Witness::from_bools(vec![false, true, true])));
    }

    #[test]
    fn test_empty_clause_and_missing_watch_column() {
        let s = parse_str("--- HEADER ---\nV: 1\n--- CLAUSE LIST ---\nC1 | []\nC2 | [1]\n").unwrap();
        assert!(s.formula.clauses()[0].is_empty());
        assert_eq!(s.formula.num_clauses(), 2);
        assert!(s.assumptions.is_empty());
    }

    #[test]
    fn test_bad_rows() {
        let head = "--- HEADER ---\nV: 2\n";
        let cases = [
            ("--- VARIABLE ASSIGNMENTS ---\n1 | MAYBE\n", 4),
            ("--- VARIABLE ASSIGNMENTS ---\n3 | TRUE\n", 4),
            ("--- VARIABLE ASSIGNMENTS ---\n1 | TRUE\n1 | FALSE\n", 5),
            ("--- CLAUSE LIST ---\nC2 | [1]\n", 4),
            ("--- CLAUSE LIST ---\nC1 | [1, x]\n", 4),
            ("--- CLAUSE LIST ---\nC1 | [1, -3]\n", 4),
            ("--- CLAUSE LIST ---\nC1 | [0]\n", 4),
            ("--- CLAUSE LIST ---\nC1 | 1, 2\n", 4),
        ];
        for (body, line) in cases {
            let text = format!("{head}{body}");
            let err = parse_str(&text).unwrap_err();
            assert!(matches!(err, Error::MalformedInput { line: l, .. } if l == line), "{text}");
        }
    }

    #[test]
    fn test_bad_structure() {
        assert!(matches!(parse_str("V: 2\n"), Err(Error::MalformedInput { line: 1, .. })));
        assert!(matches!(
            parse_str("--- CLAUSE LIST ---\nC1 | [1]\n"),
            Err(Error::MalformedInput { line: 2, .. })
        ));
        assert!(matches!(
            parse_str("--- HEADER ---\nC: 1\n"),
            Err(Error::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_str("--- HEADER ---\nV: 1\nC: 2\n--- CLAUSE LIST ---\nC1 | [1]\n"),
            Err(Error::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_str("--- HEADER ---\nV: 3000000000\n"),
            Err(Error::MalformedInput { line: 2, .. })
        ));
    }
}
