use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("input is empty, expected a capacity line")]
    MissingCapacities,

    #[error("malformed capacity line '{0}', expected two unsigned integers")]
    MalformedCapacities(String),

    #[error("failed to read input")]
    Read(#[source] std::io::Error),

    #[error("failed to write output")]
    Write(#[source] std::io::Error),

    #[error("failed to encode outcome")]
    Encode(#[from] serde_json::Error),
}

/// A command line that could not be understood. Reported and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("{command} expects {expected} arguments, got {got}")]
    Arity {
        command: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
