use std::fs::File;
use std::io::{BufWriter, Write};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::{SimulationError, SimulationResult};
use crate::metrics::{MachineReport, SimulationSummary};

pub trait ReportLogger {
    fn log_summary(&mut self, summary: &SimulationSummary);
    /// Per-machine breakdown of the run `summary` describes.
    fn log_machines(&mut self, summary: &SimulationSummary, machines: &[MachineReport]);
    fn save_log(&mut self, path: &str) -> SimulationResult<()>;
}

pub struct EmptyReportLogger {}

impl ReportLogger for EmptyReportLogger {
    fn log_summary(&mut self, _summary: &SimulationSummary) {}

    fn log_machines(&mut self, _summary: &SimulationSummary, _machines: &[MachineReport]) {}

    fn save_log(&mut self, _path: &str) -> SimulationResult<()> {
        Ok(())
    }
}

pub fn summary_header() -> String {
    format!("{:<34} {:>8} {:>12} {:>10} {:>10} {:>10} {:>10}",
            "Strategy", "VMs", "Cost/hr", "$/VM", "CPU %", "Mem %", "Unplaced")
}

pub fn summary_row(summary: &SimulationSummary) -> String {
    format!("{:<34} {:>8} {:>12.2} {:>10.2} {:>10.1} {:>10.1} {:>10}",
            summary.algorithm, summary.machines_used, summary.total_cost, summary.avg_cost_per_machine,
            summary.avg_cpu_utilization,
            summary.avg_memory_utilization, summary.unplaced_workloads)
}

pub fn machine_header() -> String {
    format!("{:<20} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "VM Type", "vCPU Used", "vCPU Cap", "Mem Used", "Mem Cap", "CPU %", "Mem %", "Cost/hr")
}

pub fn machine_row(report: &MachineReport) -> String {
    format!("{:<20} {:>10} {:>10} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.2}",
            report.machine_type, report.cpu_used, report.cpu_capacity, report.memory_used,
            report.memory_capacity, report.cpu_utilization, report.memory_utilization, report.price_per_hour)
}

/// Totals printed under a machine table.
pub fn machine_totals(summary: &SimulationSummary) -> Vec<String> {
    vec![
        format!("Total used: {} vCPU / {:.1} GiB", summary.total_cpu_used, summary.total_memory_used),
        format!("Total capacity: {} vCPU / {:.1} GiB", summary.total_cpu_capacity, summary.total_memory_capacity),
        format!("Total hourly cost: ${:.2}", summary.total_cost),
        format!("Average cost per VM: ${:.2}/hr", summary.avg_cost_per_machine),
        format!("Average cost per workload: ${:.4}/hr", summary.avg_cost_per_workload),
    ]
}

/// Prints a table row per summary as soon as it is logged.
#[derive(Default)]
pub struct StdoutReportLogger {
    header_printed: bool,
}

impl StdoutReportLogger {
    pub fn new() -> Self {
        Default::default()
    }
}

impl ReportLogger for StdoutReportLogger {
    fn log_summary(&mut self, summary: &SimulationSummary) {
        if !self.header_printed {
            println!("{}", summary_header());
            self.header_printed = true;
        }
        println!("{}", summary_row(summary))
    }

    fn log_machines(&mut self, summary: &SimulationSummary, machines: &[MachineReport]) {
        println!();
        println!("{}: {} machines", summary.algorithm, machines.len());
        println!("{}", machine_header());
        for report in machines {
            println!("{}", machine_row(report));
        }
        for line in machine_totals(summary) {
            println!("{}", line);
        }
    }

    fn save_log(&mut self, _path: &str) -> SimulationResult<()> {
        Ok(())
    }
}

/// Machine rows of one packing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineBreakdown {
    pub algorithm: String,
    pub machines: Vec<MachineReport>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summaries: &'a [SimulationSummary],
    machines: &'a [MachineBreakdown],
}

/// Keeps summaries and machine breakdowns and saves them as one JSON object.
#[derive(Default)]
pub struct FileReportLogger {
    summaries: Vec<SimulationSummary>,
    machines: Vec<MachineBreakdown>,
}

impl FileReportLogger {
    pub fn new() -> Self {
        Default::default()
    }
}

impl ReportLogger for FileReportLogger {
    fn log_summary(&mut self, summary: &SimulationSummary) {
        self.summaries.push(summary.clone());
    }

    fn log_machines(&mut self, summary: &SimulationSummary, machines: &[MachineReport]) {
        self.machines.push(MachineBreakdown {
            algorithm: summary.algorithm.clone(),
            machines: machines.to_vec(),
        });
    }

    fn save_log(&mut self, path: &str) -> SimulationResult<()> {
        let io_error = |source| SimulationError::Io { path: path.to_string(), source };
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        let report = JsonReport {
            summaries: &self.summaries,
            machines: &self.machines,
        };
        serde_json::to_writer_pretty(&mut writer, &report)
            .map_err(|source| SimulationError::Json { path: path.to_string(), source })?;
        writer.flush().map_err(io_error)
    }
}

/// Keeps summaries and saves them as CSV with a header row. Machine breakdowns don't fit the flat
/// row layout and are not kept.
#[derive(Default)]
pub struct CsvReportLogger {
    summaries: Vec<SimulationSummary>,
}

impl CsvReportLogger {
    pub fn new() -> Self {
        Default::default()
    }
}

impl ReportLogger for CsvReportLogger {
    fn log_summary(&mut self, summary: &SimulationSummary) {
        self.summaries.push(summary.clone());
    }

    fn log_machines(&mut self, _summary: &SimulationSummary, _machines: &[MachineReport]) {}

    fn save_log(&mut self, path: &str) -> SimulationResult<()> {
        let csv_error = |source| SimulationError::Csv { path: path.to_string(), source };
        let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
        for summary in &self.summaries {
            writer.serialize(summary).map_err(csv_error)?;
        }
        writer.flush().map_err(|source| SimulationError::Io { path: path.to_string(), source })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn logger(&self) -> Box<dyn ReportLogger> {
        match self {
            ReportFormat::Table => Box::new(StdoutReportLogger::new()),
            ReportFormat::Json => Box::new(FileReportLogger::new()),
            ReportFormat::Csv => Box::new(CsvReportLogger::new()),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(SimulationError::UnknownReportFormat(s.to_string())),
        }
    }
}
