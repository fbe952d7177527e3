//! Line format of a command file.
//!
//! The first line carries the car and motorcycle capacities. Every later line is one
//! command:
//! - `Enter <Category> <VehicleId> <Timestamp>`
//! - `Exit <VehicleId> <Timestamp>`

use std::str::FromStr;

use parkade::{Capacities, Timestamp};

use crate::error::{CliError, CommandError};

/// Parse the capacity line: two unsigned integers separated by any non-digit text.
pub fn parse_capacities(line: &str) -> Result<Capacities, CliError> {
    let malformed = || CliError::MalformedCapacities(line.trim().to_string());

    let mut numbers = line
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .map(str::parse::<u32>);

    let (Some(Ok(car)), Some(Ok(motorcycle)), None) =
        (numbers.next(), numbers.next(), numbers.next())
    else {
        return Err(malformed());
    };

    Ok(Capacities::new(car, motorcycle))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Enter {
        category: String,
        vehicle_id: String,
        timestamp: Timestamp,
    },
    Exit {
        vehicle_id: String,
        timestamp: Timestamp,
    },
}

fn parse_timestamp(s: &str) -> Result<Timestamp, CommandError> {
    s.parse()
        .map_err(|_| CommandError::InvalidTimestamp(s.to_string()))
}

fn expect_args(command: &'static str, args: &[&str], expected: usize) -> Result<(), CommandError> {
    if args.len() != expected {
        return Err(CommandError::Arity {
            command,
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let keyword = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        if keyword.eq_ignore_ascii_case("enter") {
            expect_args("Enter", &args, 3)?;
            Ok(Command::Enter {
                category: args[0].to_string(),
                vehicle_id: args[1].to_string(),
                timestamp: parse_timestamp(args[2])?,
            })
        } else if keyword.eq_ignore_ascii_case("exit") {
            expect_args("Exit", &args, 2)?;
            Ok(Command::Exit {
                vehicle_id: args[0].to_string(),
                timestamp: parse_timestamp(args[1])?,
            })
        } else {
            Err(CommandError::UnknownCommand(keyword.to_string()))
        }
    }
}
