use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dpll_lib::dimacs::to_dimacs;
use dpll_lib::generator::random_ksat;

/// Write a random k-SAT formula in DIMACS CNF.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Number of variables
    vars: usize,

    /// Number of clauses
    clauses: usize,

    /// Literals per clause, capped at the number of variables
    #[arg(short, default_value_t = 3)]
    k: usize,

    /// Random seed; a fresh one is drawn when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Output file; stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn run(args: &Args) -> dpll_lib::Result<()> {
    let seed = args.seed.unwrap_or_else(|| fastrand::u64(..));
    let formula = random_ksat(args.vars, args.clauses, args.k, seed)?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    writeln!(out, "c random {}-SAT, seed {}", args.k.min(args.vars), seed)?;
    out.write_all(to_dimacs(&formula).as_bytes())?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::builder()
        .format_timestamp(None)
        .format_level(false)
        .format_module_path(false)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error. {}", e);
            ExitCode::FAILURE
        }
    }
}
