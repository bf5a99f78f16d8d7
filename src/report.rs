use std::io::{self, Write};
use std::time::Duration;

use crate::search::{reconstruct_path, SearchOutcome, Strategy};

/// Everything needed to describe one finished search.
pub struct Report<'a> {
    pub strategy: Strategy,
    pub outcome: &'a SearchOutcome,
    pub elapsed: Duration,
}

/// Writes the solution as alternating move headers and boards, followed by
/// the search statistics.
pub fn write_report<W: Write>(mut out: W, report: &Report) -> io::Result<()> {
    match &report.outcome.goal {
        Some(goal) => {
            writeln!(out, "Solution found! ({})", report.strategy)?;

            for (i, step) in reconstruct_path(goal).iter().enumerate() {
                match step.mv {
                    None => writeln!(out, "Initial board:")?,
                    Some(mv) => writeln!(out, "\nMove {i}: {mv}")?,
                }
                writeln!(out, "{}", step.board)?;
            }

            writeln!(out, "\nMoves: {}", goal.cost())?;
        }
        None => writeln!(out, "No solution. ({})", report.strategy)?,
    }

    writeln!(out, "{}", report.outcome.stats)?;
    writeln!(
        out,
        "Execution time: {:.2} ms",
        report.elapsed.as_secs_f64() * 1000.0
    )?;
    out.flush()
}
