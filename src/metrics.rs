//! Cost and utilization of a packing result.

use serde::Serialize;
use crate::packing::{PackedMachine, PackingResult};

/// Hourly price of all machines, each counted once however many workloads it holds.
pub fn total_cost(result: &PackingResult) -> f64 {
    result.machines.iter().map(|packed| packed.machine.price_per_hour).sum()
}

/// Used and total capacity summed across machines.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CapacityTotals {
    cpu_used: u64,
    cpu_capacity: u64,
    memory_used: f64,
    memory_capacity: f64,
}

impl CapacityTotals {
    fn of(result: &PackingResult) -> Self {
        let mut totals = Self::default();
        for packed in &result.machines {
            totals.cpu_used += packed.cpu_allocated();
            totals.cpu_capacity += packed.machine.vcpus as u64;
            totals.memory_used += packed.memory_allocated();
            totals.memory_capacity += packed.machine.memory_gib;
        }
        totals
    }
}

/// Overall (CPU %, memory %): used over capacity summed across machines. A dimension without
/// capacity reports 0.
pub fn average_utilization(result: &PackingResult) -> (f64, f64) {
    let totals = CapacityTotals::of(result);
    (
        percent(totals.cpu_used as f64, totals.cpu_capacity as f64),
        percent(totals.memory_used, totals.memory_capacity),
    )
}

/// Median of per-machine CPU utilization in percent, 0 for an empty result. With an even machine
/// count it is the mean of the two middle values.
pub fn median_machine_cpu_utilization(result: &PackingResult) -> f64 {
    let mut utilizations: Vec<f64> = result.machines.iter().map(|packed| packed.cpu_utilization()).collect();
    if utilizations.is_empty() {
        return 0.0;
    }
    let middle = utilizations.len() / 2;
    let upper = *order_stat::kth_by(&mut utilizations, middle, |a, b| a.total_cmp(b));
    if utilizations.len() % 2 == 1 {
        return upper;
    }
    let lower = *order_stat::kth_by(&mut utilizations, middle - 1, |a, b| a.total_cmp(b));
    (lower + upper) / 2.0
}

fn percent(used: f64, total: f64) -> f64 {
    if total > 0.0 {
        used / total * 100.0
    } else {
        0.0
    }
}

fn average(total: f64, count: usize) -> f64 {
    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}

/// Capacity use and price of one packed machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineReport {
    pub machine_type: String,
    pub cpu_used: u64,
    pub cpu_capacity: u32,
    pub memory_used: f64,
    pub memory_capacity: f64,
    pub cpu_utilization: f64,
    pub memory_utilization: f64,
    pub price_per_hour: f64,
}

impl From<&PackedMachine> for MachineReport {
    fn from(packed: &PackedMachine) -> Self {
        Self {
            machine_type: packed.machine.name.clone(),
            cpu_used: packed.cpu_allocated(),
            cpu_capacity: packed.machine.vcpus,
            memory_used: packed.memory_allocated(),
            memory_capacity: packed.machine.memory_gib,
            cpu_utilization: packed.cpu_utilization(),
            memory_utilization: packed.memory_utilization(),
            price_per_hour: packed.machine.price_per_hour,
        }
    }
}

/// One row per packed machine, in commit order.
pub fn machine_reports(result: &PackingResult) -> Vec<MachineReport> {
    result.machines.iter().map(MachineReport::from).collect()
}

/// One row of a simulation report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub algorithm: String,
    pub machines_used: usize,
    pub total_cost: f64,
    pub avg_cpu_utilization: f64,
    pub avg_memory_utilization: f64,
    pub median_machine_cpu_utilization: f64,
    pub total_cpu_used: u64,
    pub total_cpu_capacity: u64,
    pub total_memory_used: f64,
    pub total_memory_capacity: f64,
    /// 0 without machines.
    pub avg_cost_per_machine: f64,
    /// Over every input workload, placed or not. 0 without workloads.
    pub avg_cost_per_workload: f64,
    pub placed_workloads: usize,
    pub unplaced_workloads: usize,
}

impl SimulationSummary {
    pub fn from_result(algorithm: &str, result: &PackingResult) -> Self {
        let (avg_cpu_utilization, avg_memory_utilization) = average_utilization(result);
        let totals = CapacityTotals::of(result);
        let cost = total_cost(result);
        let workload_count = result.placed_count() + result.unplaced.len();
        Self {
            algorithm: algorithm.to_string(),
            machines_used: result.machine_count(),
            total_cost: cost,
            avg_cpu_utilization,
            avg_memory_utilization,
            median_machine_cpu_utilization: median_machine_cpu_utilization(result),
            total_cpu_used: totals.cpu_used,
            total_cpu_capacity: totals.cpu_capacity,
            total_memory_used: totals.memory_used,
            total_memory_capacity: totals.memory_capacity,
            avg_cost_per_machine: average(cost, result.machine_count()),
            avg_cost_per_workload: average(cost, workload_count),
            placed_workloads: result.placed_count(),
            unplaced_workloads: result.unplaced.len(),
        }
    }
}

/// A packing run next to the baseline it is measured against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub packed: SimulationSummary,
    pub baseline: SimulationSummary,
}

impl Comparison {
    /// Machines saved relative to the baseline, in percent. Negative when packing used more.
    pub fn machines_saved_percent(&self) -> f64 {
        saved_percent(self.packed.machines_used as f64, self.baseline.machines_used as f64)
    }

    pub fn cost_saved_percent(&self) -> f64 {
        saved_percent(self.packed.total_cost, self.baseline.total_cost)
    }
}

fn saved_percent(value: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        (baseline - value) / baseline * 100.0
    } else {
        0.0
    }
}
