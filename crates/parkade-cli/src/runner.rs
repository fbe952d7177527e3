//! Drives a facility from a command stream.
//!
//! Reads the capacity line, builds the facility, then dispatches each command in
//! order and writes one line per visible outcome. Malformed command lines are
//! logged and skipped; a malformed capacity line aborts before anything runs.

use std::io::{BufRead, Write};

use parkade::{Facility, FeeSchedule, Occupancy};

use crate::command::{Command, parse_capacities};
use crate::error::{CliError, Result};
use crate::outcome::{Outcome, OutputFormat};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub format: OutputFormat,
    pub fees: FeeSchedule,
}

/// Counters and final state of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Commands dispatched to the facility.
    pub commands: usize,
    /// Non-blank lines that were not valid commands.
    pub skipped: usize,
    pub occupancy: Vec<Occupancy>,
}

/// Read one raw line into `buf`, newline included. Returns 0 at end of input.
fn read_raw_line<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> Result<usize> {
    buf.clear();
    input.read_until(b'\n', buf).map_err(CliError::Read)
}

pub fn run<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    options: &RunOptions,
) -> Result<RunSummary> {
    let mut buf = Vec::new();

    if read_raw_line(&mut input, &mut buf)? == 0 {
        return Err(CliError::MissingCapacities);
    }
    let capacities = parse_capacities(&String::from_utf8_lossy(&buf))?;

    tracing::info!(
        car = capacities.car,
        motorcycle = capacities.motorcycle,
        "Facility opened"
    );

    let mut facility = Facility::new(capacities).with_fees(options.fees);
    let mut summary = RunSummary {
        commands: 0,
        skipped: 0,
        occupancy: Vec::new(),
    };

    // 1-based; the header was line 1.
    let mut line_no = 1;
    while read_raw_line(&mut input, &mut buf)? > 0 {
        line_no += 1;

        let Ok(line) = std::str::from_utf8(&buf) else {
            tracing::warn!(line = line_no, "Skipping command that is not valid UTF-8");
            summary.skipped += 1;
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping malformed command");
                summary.skipped += 1;
                continue;
            }
        };
        summary.commands += 1;

        let outcome = match command {
            Command::Enter {
                category,
                vehicle_id,
                timestamp,
            } => Some(Outcome::from_entry(facility.entry(
                &category,
                &vehicle_id,
                timestamp,
            ))),
            Command::Exit {
                vehicle_id,
                timestamp,
            } => Outcome::from_exit(facility.exit(&vehicle_id, timestamp)),
        };

        if let Some(outcome) = outcome {
            writeln!(output, "{}", outcome.render(options.format)?).map_err(CliError::Write)?;
        }
    }

    output.flush().map_err(CliError::Write)?;

    summary.occupancy = facility.occupancy();
    for occupancy in &summary.occupancy {
        tracing::info!(
            category = %occupancy.category,
            occupied = occupancy.occupied,
            capacity = occupancy.capacity,
            "Final occupancy"
        );
    }
    tracing::info!(
        commands = summary.commands,
        skipped = summary.skipped,
        "Run complete"
    );

    Ok(summary)
}
