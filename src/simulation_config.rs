//! Simulation configuration.

use serde::{Deserialize, Serialize};
use crate::dataset_reader::TraceSource;
use crate::error::{SimulationError, SimulationResult};
use crate::simulation_metrics::ReportFormat;
use crate::strategy::SelectionStrategy;

pub const DEFAULT_SKU_PATH: &str = "azure_skus.json";
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_WORKLOAD_COUNT: usize = 1000;
pub const DEFAULT_MAX_ROWS: usize = 1000;

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

/// Where machine types come from.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogSource {
    /// SKU catalog JSON.
    File { path: String },
    Synthetic { count: usize, seed: u64 },
}

/// Where workloads come from.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkloadSource {
    Synthetic { count: usize, seed: u64 },
    /// JSON array of workloads.
    Custom { path: String },
    /// Preprocessed VM table JSON, `limit` 0 reads all entries.
    Preprocessed {
        path: String,
        #[serde(default)]
        limit: usize,
    },
    /// CSV cluster trace.
    Trace {
        source: TraceSource,
        path: String,
        #[serde(default = "default_max_rows")]
        max_rows: usize,
    },
}

/// Holds raw simulation config parsed from YAML file.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
struct RawSimulationConfig {
    pub catalog: Option<CatalogSource>,
    pub quota_path: Option<String>,
    pub workloads: Option<WorkloadSource>,
    pub strategies: Option<Vec<SelectionStrategy>>,
    pub skip_unplaceable: Option<bool>,
    pub report_path: Option<String>,
    pub report_format: Option<ReportFormat>,
    pub report_machines: Option<bool>,
}

/// Represents simulation configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub catalog: CatalogSource,
    /// No quota is enforced without a quota file.
    pub quota_path: Option<String>,
    pub workloads: WorkloadSource,
    /// Every strategy gets its own packing run.
    pub strategies: Vec<SelectionStrategy>,
    /// Skip a workload without a feasible machine instead of stopping the packing run.
    pub skip_unplaceable: bool,
    /// Where the report is saved, if anywhere.
    pub report_path: Option<String>,
    pub report_format: ReportFormat,
    /// Also report every packed machine of the planner runs.
    pub report_machines: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogSource::File { path: DEFAULT_SKU_PATH.to_string() },
            quota_path: None,
            workloads: WorkloadSource::Synthetic { count: DEFAULT_WORKLOAD_COUNT, seed: DEFAULT_SEED },
            strategies: vec![SelectionStrategy::General],
            skip_unplaceable: false,
            report_path: None,
            report_format: ReportFormat::Table,
            report_machines: false,
        }
    }
}

impl SimulationConfig {
    pub fn from_file(file_name: &str) -> SimulationResult<Self> {
        let yaml = std::fs::read_to_string(file_name)
            .map_err(|source| SimulationError::Io { path: file_name.to_string(), source })?;
        Self::from_yaml(&yaml, file_name)
    }

    /// Parses YAML, `origin` names the input in errors.
    pub fn from_yaml(yaml: &str, origin: &str) -> SimulationResult<Self> {
        let raw: RawSimulationConfig = serde_yaml::from_str(yaml)
            .map_err(|source| SimulationError::Yaml { path: origin.to_string(), source })?;
        let defaults = Self::default();

        Ok(Self {
            catalog: raw.catalog.unwrap_or(defaults.catalog),
            quota_path: raw.quota_path,
            workloads: raw.workloads.unwrap_or(defaults.workloads),
            strategies: raw.strategies.filter(|strategies| !strategies.is_empty()).unwrap_or(defaults.strategies),
            skip_unplaceable: raw.skip_unplaceable.unwrap_or(defaults.skip_unplaceable),
            report_path: raw.report_path,
            report_format: raw.report_format.unwrap_or(defaults.report_format),
            report_machines: raw.report_machines.unwrap_or(defaults.report_machines),
        })
    }
}
