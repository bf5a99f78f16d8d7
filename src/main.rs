//! CLI entry point.
//!
//! Usage:
//!   rush-hour-solver <BOARD_FILE> [options]
//!
//! Options:
//!   -a, --algorithm <ALGORITHM>   ucs, greedy, astar or backtracking (default: astar)
//!   -H, --heuristic <HEURISTIC>   manhattan or euclidean, for greedy and astar (default: manhattan)
//!   -o, --output <FILE>           also write the report to this file
//!       --max-depth <N>           stop backtracking below this many moves
//!   -q, --quiet                   print only the summary line
//!
//! Set `RUST_LOG=debug` to see search progress.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::{info, warn};

use rush_hour_solver::{parse_board, search, write_report, Heuristic, Report, Strategy};

#[derive(Parser, Debug)]
#[command(name = "rush-hour-solver")]
#[command(about = "Solve Rush Hour sliding-block puzzles")]
#[command(version)]
struct Cli {
    /// Path to the board file
    #[arg(value_name = "BOARD_FILE")]
    board: PathBuf,

    /// Search algorithm
    #[arg(short, long, value_enum, default_value_t = Algorithm::Astar)]
    algorithm: Algorithm,

    /// Heuristic for greedy and A* search
    #[arg(short = 'H', long, value_enum, default_value_t = HeuristicArg::Manhattan)]
    heuristic: HeuristicArg,

    /// Also write the report to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum number of moves explored by backtracking
    #[arg(long)]
    max_depth: Option<u32>,

    /// Print only the summary line
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algorithm {
    Ucs,
    Greedy,
    Astar,
    Backtracking,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeuristicArg {
    Manhattan,
    Euclidean,
}

impl From<HeuristicArg> for Heuristic {
    fn from(h: HeuristicArg) -> Self {
        match h {
            HeuristicArg::Manhattan => Heuristic::Manhattan,
            HeuristicArg::Euclidean => Heuristic::Euclidean,
        }
    }
}

impl Cli {
    fn strategy(&self) -> Strategy {
        let h = self.heuristic.into();
        match self.algorithm {
            Algorithm::Ucs => Strategy::UniformCost,
            Algorithm::Greedy => Strategy::Greedy(h),
            Algorithm::Astar => Strategy::AStar(h),
            Algorithm::Backtracking => Strategy::Backtracking {
                max_depth: self.max_depth,
            },
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let text = fs::read_to_string(&cli.board)
        .with_context(|| format!("failed to read board file {}", cli.board.display()))?;
    let puzzle = parse_board(&text)
        .with_context(|| format!("invalid board file {}", cli.board.display()))?;
    info!(
        "loaded {}x{} board with {} pieces, exit at {:?}",
        puzzle.board.rows(),
        puzzle.board.cols(),
        puzzle.orientations.pieces().count(),
        puzzle.exit
    );

    let strategy = cli.strategy();
    if cli.max_depth.is_some() && !matches!(strategy, Strategy::Backtracking { .. }) {
        warn!("--max-depth only applies to backtracking; ignoring it");
    }

    let start = Instant::now();
    let outcome = search(&puzzle, strategy);
    let report = Report {
        strategy,
        outcome: &outcome,
        elapsed: start.elapsed(),
    };

    if cli.quiet {
        match &outcome.goal {
            Some(goal) => println!("{strategy}: {} moves", goal.cost()),
            None => println!("{strategy}: no solution"),
        }
    } else {
        write_report(io::stdout().lock(), &report).context("failed to write report")?;
    }

    if let Some(path) = &cli.output {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        write_report(BufWriter::new(file), &report)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("report written to {}", path.display());
    }

    Ok(outcome.goal.is_some())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
