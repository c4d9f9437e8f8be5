use std::path::PathBuf;
use thiserror::Error;

use super::module_id::ModuleID;

fn format_modules(modules: &[ModuleID]) -> String {
    modules
        .iter()
        .map(|m| format!("({m})"))
        .collect::<Vec<String>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum MappingTableError {
    #[error("MappingTable failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Could not open MappingTable because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("MappingTable file {path:?} has {found} columns at line {line}; expected {expected}")]
    BadFileFormat {
        path: PathBuf,
        line: usize,
        found: usize,
        expected: usize,
    },
    #[error("MappingTable failed to parse an integer in file {path:?} at line {line}: {source}")]
    ParsingError {
        path: PathBuf,
        line: usize,
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, Error)]
pub enum LoadTableError {
    #[error("LoadTable failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Could not open LoadTable because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("LoadTable file {path:?} has {found} columns at line {line}; expected {expected}")]
    BadFileFormat {
        path: PathBuf,
        line: usize,
        found: usize,
        expected: usize,
    },
    #[error("LoadTable failed to parse an integer in file {path:?} at line {line}: {source}")]
    ParsingIntError {
        path: PathBuf,
        line: usize,
        source: std::num::ParseIntError,
    },
    #[error("LoadTable failed to parse a float in file {path:?} at line {line}: {source}")]
    ParsingFloatError {
        path: PathBuf,
        line: usize,
        source: std::num::ParseFloatError,
    },
}

#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("Aggregator found {} module(s) in the mapping with no entry in the load table (layer u v): {}", .0.len(), format_modules(.0))]
    MissingJoinKeys(Vec<ModuleID>),
}

#[derive(Debug, Error)]
pub enum HistogramError {
    #[error("Histogram was given no values to bin")]
    EmptyInput,
    #[error("Histogram was given an invalid bin width {0}; bin widths must be finite and positive")]
    InvalidBinWidth(f64),
    #[error("Histogram2D was given axes of different lengths -- x: {0} y: {1}")]
    MismatchedLengths(usize, usize),
    #[error("Histogram was given a non-finite value {0}")]
    NonFiniteValue(f64),
    #[error("Histogram would need {requested} bins, more than the limit of {max}; check the bin widths")]
    TooManyBins { requested: f64, max: usize },
    #[error("Failed to render histogram to {path:?}: {message}")]
    Render { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Config has an invalid maximum lpGBT ID {0}; it must be at least 1")]
    InvalidMaxLinkId(i32),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to MappingTable error: {0}")]
    MappingError(#[from] MappingTableError),
    #[error("Processor failed due to LoadTable error: {0}")]
    LoadError(#[from] LoadTableError),
    #[error("Processor failed due to Aggregator error: {0}")]
    AggregatorError(#[from] AggregatorError),
    #[error("Processor failed due to Histogram error: {0}")]
    HistogramError(#[from] HistogramError),
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to IO error: {0}")]
    IoError(#[from] std::io::Error),
}
