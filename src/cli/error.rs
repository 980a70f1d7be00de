use std::path::PathBuf;

use thiserror::Error;

use crate::chart::ChartError;
use crate::core::SimulationError;
use crate::report::ReportError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("{flag} {reason}")]
    InvalidArgument {
        flag: &'static str,
        reason: &'static str,
    },
    #[error("{0} is required when prompting is disabled")]
    MissingParameter(&'static str),
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("input ended before a value for {0} was entered")]
    UnexpectedEof(&'static str),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
