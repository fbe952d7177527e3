//! Rendering of facility results as output lines.

use std::fmt;

use parkade::{Admission, Category, Departure, EntryError, ExitError, Slot};
use serde::Serialize;

/// How outcome lines are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `Accept CarLot1`, `Reject`, `CarLot1 2`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Visible result of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    Accepted {
        category: Category,
        slot: Slot,
    },
    Rejected {
        reason: String,
    },
    Released {
        category: Category,
        slot: Slot,
        hours: u64,
        fee: u64,
    },
}

impl Outcome {
    pub fn from_entry(result: Result<Admission, EntryError>) -> Self {
        match result {
            Ok(Admission { category, slot }) => Outcome::Accepted { category, slot },
            Err(e) => Outcome::Rejected {
                reason: e.to_string(),
            },
        }
    }

    /// Exits that fail produce no line.
    pub fn from_exit(result: Result<Departure, ExitError>) -> Option<Self> {
        let Departure {
            category,
            slot,
            hours,
            fee,
        } = result.ok()?;
        Some(Outcome::Released {
            category,
            slot,
            hours,
            fee,
        })
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => serde_json::to_string(self),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted { category, slot } => write!(f, "Accept {category}Lot{slot}"),
            Outcome::Rejected { .. } => f.write_str("Reject"),
            Outcome::Released {
                category,
                slot,
                fee,
                ..
            } => write!(f, "{category}Lot{slot} {fee}"),
        }
    }
}
