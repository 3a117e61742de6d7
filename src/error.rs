//! Errors of the loader and report layers.
//!
//! The selection and packing engine itself never fails; only reading catalogs, traces,
//! quotas and configs or writing reports can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("can't access file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse JSON from file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("can't parse YAML from file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("CSV error in file {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("trace {path} has no {columns} columns (header: {header:?})")]
    MissingColumns {
        path: String,
        columns: &'static str,
        header: Vec<String>,
    },

    #[error("value {value} of {field} in {path} doesn't fit into a core count")]
    OutOfRange {
        path: String,
        field: &'static str,
        value: f64,
    },

    #[error("invalid {field} value {value} in {path}")]
    InvalidValue {
        path: String,
        field: &'static str,
        value: f64,
    },

    #[error("unknown trace source: {0}")]
    UnknownTraceSource(String),

    #[error("unknown selection strategy: {0}")]
    UnknownStrategy(String),

    #[error("unknown report format: {0}")]
    UnknownReportFormat(String),
}

pub type SimulationResult<T> = Result<T, SimulationError>;
