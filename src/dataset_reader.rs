//! Loaders turning catalog, quota and workload files into in-memory inputs.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufReader, Read};
use std::str::FromStr;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use crate::error::{SimulationError, SimulationResult};
use crate::machine::MachineSpec;
use crate::packing::QuotaMap;
use crate::workload::{CapabilityRequirements, WorkloadProfile};

const WORKLOAD_TYPE_LABEL: &str = "workload_type";

/// Public cluster trace schemas understood by the CSV reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceSource {
    /// Millicores and MiB in `requested_cpu`/`cpu_request` and `requested_memory`/`memory_request`.
    Google,
    /// vCPUs and GiB in columns containing `vcpu` and `memory`.
    Azure,
    /// Cores and GiB in `cpu` and `mem`.
    Alibaba,
}

impl TraceSource {
    /// Indices of the CPU and memory columns. The last matching column wins.
    fn columns(&self, header: &[String]) -> Option<(usize, usize)> {
        let mut cpu_index = None;
        let mut memory_index = None;
        for (index, column) in header.iter().enumerate() {
            let column = column.trim().to_ascii_lowercase();
            let (is_cpu, is_memory) = match self {
                TraceSource::Google => (
                    column == "requested_cpu" || column == "cpu_request",
                    column == "requested_memory" || column == "memory_request",
                ),
                TraceSource::Azure => (column.contains("vcpu"), column.contains("memory")),
                TraceSource::Alibaba => (column == "cpu", column == "mem"),
            };
            if is_cpu {
                cpu_index = Some(index);
            }
            if is_memory {
                memory_index = Some(index);
            }
        }
        Some((cpu_index?, memory_index?))
    }

    fn missing_columns(&self) -> &'static str {
        match self {
            TraceSource::Google => "requested_cpu/requested_memory or cpu_request/memory_request",
            TraceSource::Azure => "vCPU/memory",
            TraceSource::Alibaba => "cpu/mem",
        }
    }

    /// Google reports fractional millicores, the other schemas whole cores. A CPU cell that isn't
    /// an integer reads as 0 there.
    fn parse_cpu(&self, cell: &str) -> f64 {
        match self {
            TraceSource::Google => parse_cell(cell),
            TraceSource::Azure | TraceSource::Alibaba => cell.trim().parse::<i64>().map_or(0.0, |cores| cores as f64),
        }
    }

    /// Converts raw cell values into whole cores and GiB.
    fn normalize(&self, cpu: f64, memory: f64) -> (f64, f64) {
        match self {
            TraceSource::Google => (cpu / 1000.0, memory / 1024.0),
            TraceSource::Azure | TraceSource::Alibaba => (cpu, memory),
        }
    }
}

impl Display for TraceSource {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            TraceSource::Google => write!(f, "google"),
            TraceSource::Azure => write!(f, "azure"),
            TraceSource::Alibaba => write!(f, "alibaba"),
        }
    }
}

impl FromStr for TraceSource {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(TraceSource::Google),
            "azure" => Ok(TraceSource::Azure),
            "alibaba" => Ok(TraceSource::Alibaba),
            _ => Err(SimulationError::UnknownTraceSource(s.to_string())),
        }
    }
}

fn open(path: &str) -> SimulationResult<File> {
    File::open(path).map_err(|source| SimulationError::Io { path: path.to_string(), source })
}

fn read_json<T: DeserializeOwned>(path: &str) -> SimulationResult<T> {
    serde_json::from_reader(BufReader::new(open(path)?))
        .map_err(|source| SimulationError::Json { path: path.to_string(), source })
}

fn check_non_negative(path: &str, field: &'static str, value: f64) -> SimulationResult<()> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(SimulationError::InvalidValue { path: path.to_string(), field, value })
}

fn check_positive(path: &str, field: &'static str, value: f64) -> SimulationResult<()> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(SimulationError::InvalidValue { path: path.to_string(), field, value })
}

/// Capacities must be positive, storage and price non-negative.
fn validate_machine(path: &str, machine: &MachineSpec) -> SimulationResult<()> {
    check_positive(path, "VCpus", machine.vcpus as f64)?;
    check_positive(path, "MemoryGiB", machine.memory_gib)?;
    check_non_negative(path, "StorageGiB", machine.storage_gib)?;
    check_non_negative(path, "PricePerHour", machine.price_per_hour)
}

/// Loads the machine catalog, preserving its order.
pub fn load_catalog(path: &str) -> SimulationResult<Vec<MachineSpec>> {
    let catalog: Vec<MachineSpec> = read_json(path)?;
    for machine in &catalog {
        validate_machine(path, machine)?;
    }
    Ok(catalog)
}

/// Loads a `{family: vcpu_ceiling}` quota file.
pub fn load_quota(path: &str) -> SimulationResult<QuotaMap> {
    read_json(path)
}

/// Workload entry of a custom workload file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWorkload {
    #[serde(rename = "cpuRequirements", alias = "CPURequirements")]
    cpu_requirements: u32,
    #[serde(rename = "memoryRequirements", alias = "MemoryRequirements")]
    memory_requirements: f64,
    #[serde(rename = "ioRequirements", alias = "IORequirements")]
    io_requirements: f64,
    #[serde(rename = "gpuRequirements", alias = "GPURequirements")]
    gpu_requirements: u32,
    #[serde(rename = "gpuType", alias = "GPUType")]
    gpu_type: String,
    #[serde(alias = "Zone")]
    zone: String,
    #[serde(rename = "requireEphemeralOS", alias = "RequireEphemeralOS")]
    require_ephemeral_os: bool,
    #[serde(rename = "requireNestedVirt", alias = "RequireNestedVirt")]
    require_nested_virt: bool,
    #[serde(rename = "requireSpot", alias = "RequireSpot")]
    require_spot: bool,
    #[serde(rename = "requireConfidential", alias = "RequireConfidential")]
    require_confidential: bool,
    #[serde(alias = "Capabilities")]
    capabilities: BTreeMap<String, String>,
}

impl RawWorkload {
    fn validate(&self, path: &str) -> SimulationResult<()> {
        check_non_negative(path, "memoryRequirements", self.memory_requirements)?;
        check_non_negative(path, "ioRequirements", self.io_requirements)
    }

    fn into_profile(self, id: u64) -> WorkloadProfile {
        WorkloadProfile {
            id,
            cpu_requirement: self.cpu_requirements,
            memory_requirement: self.memory_requirements,
            io_requirement: self.io_requirements,
            gpu_requirement: self.gpu_requirements,
            gpu_type: self.gpu_type,
            zone: self.zone,
            require_ephemeral_os: self.require_ephemeral_os,
            require_nested_virt: self.require_nested_virt,
            require_spot: self.require_spot,
            require_confidential: self.require_confidential,
            capabilities: CapabilityRequirements::from_map(self.capabilities),
        }
    }
}

/// Loads a JSON array of workloads (`cpuRequirements`, `memoryRequirements`, ...).
pub fn load_custom_workloads(path: &str) -> SimulationResult<Vec<WorkloadProfile>> {
    let raw: Vec<RawWorkload> = read_json(path)?;
    for workload in &raw {
        workload.validate(path)?;
    }
    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(id, workload)| workload.into_profile(id as u64))
        .collect())
}

/// Entry of a preprocessed trace (pod-like workloads derived from a VM table).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PreprocessedWorkload {
    cpu_request: u32,
    memory_request_gib: f64,
    labels: BTreeMap<String, String>,
}

/// Loads a preprocessed trace, at most `limit` workloads (0 = all).
pub fn load_preprocessed_workloads(path: &str, limit: usize) -> SimulationResult<Vec<WorkloadProfile>> {
    let raw: Vec<PreprocessedWorkload> = read_json(path)?;
    for entry in &raw {
        check_non_negative(path, "memory_request_gib", entry.memory_request_gib)?;
    }
    let limit = if limit == 0 { raw.len() } else { limit };
    Ok(raw
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(id, mut entry)| {
            let mut workload = WorkloadProfile::new(id as u64, entry.cpu_request, entry.memory_request_gib);
            if let Some(workload_type) = entry.labels.remove(WORKLOAD_TYPE_LABEL) {
                workload.capabilities.additional.insert(WORKLOAD_TYPE_LABEL.to_string(), workload_type);
            }
            workload
        })
        .collect())
}

/// Loads at most `max_rows` rows of a CSV trace.
pub fn load_trace_workloads(path: &str, source: TraceSource, max_rows: usize) -> SimulationResult<Vec<WorkloadProfile>> {
    read_trace_workloads(open(path)?, source, max_rows, path)
}

/// Parses a CSV trace with a header row. Rows where both values are 0 are skipped, unparsable
/// cells count as 0 and a short or broken row ends the trace. `origin` names the input in errors.
pub fn read_trace_workloads<R: Read>(
    reader: R,
    source: TraceSource,
    max_rows: usize,
    origin: &str,
) -> SimulationResult<Vec<WorkloadProfile>> {
    let csv_error = |source| SimulationError::Csv { path: origin.to_string(), source };
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let header: Vec<String> = csv_reader.headers().map_err(csv_error)?.iter().map(str::to_string).collect();
    let (cpu_index, memory_index) = source.columns(&header).ok_or_else(|| SimulationError::MissingColumns {
        path: origin.to_string(),
        columns: source.missing_columns(),
        header: header.clone(),
    })?;

    let mut workloads = Vec::default();
    for record in csv_reader.records().take(max_rows) {
        let Ok(record) = record else {
            break;
        };
        let (Some(cpu_cell), Some(memory_cell)) = (record.get(cpu_index), record.get(memory_index)) else {
            break;
        };
        let raw_cpu = source.parse_cpu(cpu_cell);
        let raw_memory = parse_cell(memory_cell);
        if raw_cpu == 0.0 && raw_memory == 0.0 {
            continue;
        }
        let (cpu, memory) = source.normalize(raw_cpu, raw_memory);
        let cores = cast::u32(cpu.max(0.0).trunc()).map_err(|_| SimulationError::OutOfRange {
            path: origin.to_string(),
            field: "cpu",
            value: cpu,
        })?;
        workloads.push(WorkloadProfile::new(workloads.len() as u64, cores, memory.max(0.0)));
    }
    Ok(workloads)
}

fn parse_cell(cell: &str) -> f64 {
    cell.trim().parse::<f64>().ok().filter(|value| value.is_finite()).unwrap_or(0.0)
}
