use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use cpu_time::ProcessTime;
use log::{info, LevelFilter};

use dpll_lib::report::{self, Format};
use dpll_lib::trace::TraceLog;
use dpll_lib::{dimacs, snapshot};
use dpll_lib::{OracleKind, Result, SignPolicy, Snapshot, SolveResult, Solver, SolverConfig};

const EXIT_SAT: u8 = 10;
const EXIT_UNSAT: u8 = 20;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Heuristic { Lowest, Mom }

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Polarity { Pos, Neg, Rnd }

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Competition, Table }

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat { Auto, Dimacs, State }

/// Decide satisfiability of a DIMACS CNF formula.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// DIMACS or state file to read; stdin when omitted
    input: Option<PathBuf>,

    /// `auto` reads `.cnf` files and stdin as DIMACS, any other file as a
    /// state file
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    input_format: InputFormat,

    /// Branching heuristic
    #[arg(long, value_enum, default_value_t = Heuristic::Lowest)]
    heuristic: Heuristic,

    /// Polarity tried first by the lowest-index heuristic [default: pos]
    #[arg(long, value_enum)]
    sign: Option<Polarity>,

    /// Seed for `--sign rnd`
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Give up after this many decisions
    #[arg(long)]
    max_decisions: Option<u64>,

    /// Write the decision/propagation trace to FILE
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Write the verdict to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Competition)]
    format: OutputFormat,

    /// Re-check the model against every clause before reporting it
    #[arg(long)]
    verify: bool,

    /// Print search statistics and resource usage to stderr
    #[arg(long)]
    stats: bool,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> std::result::Result<SolverConfig, clap::Error> {
        let oracle = match self.heuristic {
            Heuristic::Lowest => OracleKind::LowestIndex,
            Heuristic::Mom => OracleKind::Mom,
        };
        if oracle == OracleKind::Mom && self.sign.is_some() {
            return Err(Args::command().error(
                ErrorKind::ArgumentConflict,
                "--sign only applies to --heuristic lowest, mom picks its own polarity",
            ));
        }
        let sign = match self.sign.unwrap_or(Polarity::Pos) {
            Polarity::Pos => SignPolicy::Pos,
            Polarity::Neg => SignPolicy::Neg,
            Polarity::Rnd => SignPolicy::Rnd { seed: self.seed },
        };
        Ok(SolverConfig { oracle, sign, max_decisions: self.max_decisions })
    }

    fn input_format(&self) -> InputFormat {
        match (self.input_format, &self.input) {
            (InputFormat::Auto, Some(path)) if path.extension().map_or(false, |e| e != "cnf") => {
                InputFormat::State
            }
            (InputFormat::Auto, _) => InputFormat::Dimacs,
            (format, _) => format,
        }
    }

    fn format(&self) -> Format {
        match self.format {
            OutputFormat::Competition => Format::Competition,
            OutputFormat::Table => Format::Table,
        }
    }
}

// peak resident set size, in kB
#[cfg(target_os = "linux")]
fn peak_memory() -> Option<u64> {
    procfs::process::Process::myself().ok()?.status().ok()?.vmhwm
}

#[cfg(not(target_os = "linux"))]
fn peak_memory() -> Option<u64> {
    None
}

fn read_input(args: &Args) -> Result<Snapshot> {
    let reader: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    };
    match args.input_format() {
        InputFormat::State => snapshot::parse(reader),
        _ => Ok(Snapshot::from(dimacs::parse(reader)?)),
    }
}

fn run(args: &Args, config: &SolverConfig) -> Result<ExitCode> {
    let start = ProcessTime::now();

    let Snapshot { formula, assumptions } = read_input(args)?;
    info!(
        "parsed {} variables, {} clauses, {} fixed values",
        formula.num_vars(),
        formula.num_clauses(),
        assumptions.len()
    );

    let mut trace = TraceLog::new();
    let (result, stats) = {
        let mut solver = Solver::with_config(&formula, config);
        if args.trace.is_some() {
            solver = solver.with_tracer(&mut trace);
        }
        let mut solver = solver.with_assumptions(assumptions)?;
        let result = solver.run()?;
        (result, solver.stats())
    };

    if let Some(path) = &args.trace {
        trace.write_to(BufWriter::new(File::create(path)?))?;
    }

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    report::write_result(&mut out, &result, args.format())?;
    out.flush()?;

    if args.stats {
        eprintln!("c {}", stats);
        eprintln!("c cpu time: {:.3}s", start.elapsed().as_secs_f64());
        if let Some(kb) = peak_memory() {
            eprintln!("c peak memory: {} kB", kb);
        }
    }

    match &result {
        SolveResult::Satisfiable(witness) => {
            if args.verify && !witness.satisfies(&formula) {
                eprintln!("Error. model does not satisfy the formula");
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::from(EXIT_SAT))
        }
        SolveResult::Unsatisfiable => Ok(ExitCode::from(EXIT_UNSAT)),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn })
        .parse_default_env()
        .format_timestamp(None)
        .format_level(false)
        .format_module_path(false)
        .init();

    let config = args.config().unwrap_or_else(|e| e.exit());

    match run(&args, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error. {}", e);
            ExitCode::FAILURE
        }
    }
}
