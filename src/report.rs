//! Rendering of a verdict for people and for test harnesses.

use std::io::{self, Write};

use crate::solver::SolveResult;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Format {
    /// `s SATISFIABLE` followed by `v <lits> 0`, as in SAT competitions.
    #[default]
    Competition,
    /// `STATUS:` line and a `FINAL VARIABLE STATE` section, with one
    /// `<var> | TRUE/FALSE` row per variable when satisfiable.
    Table,
}

pub fn write_result<W: Write>(mut w: W, result: &SolveResult, format: Format) -> io::Result<()> {
    match (format, result) {
        (Format::Competition, SolveResult::Unsatisfiable) => writeln!(w, "s UNSATISFIABLE"),
        (Format::Competition, SolveResult::Satisfiable(witness)) => {
            writeln!(w, "s SATISFIABLE")?;
            write!(w, "v")?;
            for l in witness.lits() {
                write!(w, " {}", l)?;
            }
            writeln!(w, " 0")
        }
        (Format::Table, _) => {
            writeln!(w, "STATUS: {}", if result.is_sat() { "SAT" } else { "UNSAT" })?;
            writeln!(w)?;
            writeln!(w, "--- FINAL VARIABLE STATE ---")?;
            // no rows for UNSAT
            if let Some(witness) = result.witness() {
                for (var, b) in witness.iter() {
                    writeln!(w, "{}    | {}", var.index(), if b { "TRUE" } else { "FALSE" })?;
                }
            }
            Ok(())
        }
    }
}

pub fn render(result: &SolveResult, format: Format) -> String {
    let mut buf: Vec<u8> = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_result(&mut buf, result, format);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solver::Witness;

    #[test]
    fn test_competition_format() {
        let sat = SolveResult::Satisfiable(Witness::from_bools(vec![true, false, true]));
        assert_eq!(render(&sat, Format::Competition), "s SATISFIABLE\nv 1 -2 3 0\n");
        assert_eq!(render(&SolveResult::Unsatisfiable, Format::Competition), "s UNSATISFIABLE\n");
    }

    #[test]
    fn test_competition_empty_witness() {
        let sat = SolveResult::Satisfiable(Witness::from_bools(vec![]));
        assert_eq!(render(&sat, Format::Competition), "s SATISFIABLE\nv 0\n");
    }

    #[test]
    fn test_table_format() {
        let sat = SolveResult::Satisfiable(Witness::from_bools(vec![false, true]));
        assert_eq!(
            render(&sat, Format::Table),
            "STATUS: SAT\n\n--- FINAL VARIABLE STATE ---\n1    | FALSE\n2    | TRUE\n"
        );
        assert_eq!(
            render(&SolveResult::Unsatisfiable, Format::Table),
            "STATUS: UNSAT\n\n--- FINAL VARIABLE STATE ---\n"
        );
    }
}
