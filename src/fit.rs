//! Fit and score computations for a (machine, workload) pair.
//!
//! Everything here is a pure function. A requirement of 0 means "don't care" and yields a fit
//! of exactly 1.0 for that dimension, so no division by zero can happen.

use crate::machine::MachineSpec;
use crate::strategy::{SelectionStrategy, StrategyWeights};
use crate::workload::WorkloadProfile;

/// Added to the hourly price before inverting it.
pub const PRICE_EPSILON: f64 = 0.01;

fn ratio(capacity: f64, requirement: f64) -> f64 {
    if requirement <= 0.0 {
        return 1.0;
    }
    (capacity / requirement).clamp(0.0, 1.0)
}

pub fn cpu_fit(machine: &MachineSpec, workload: &WorkloadProfile) -> f64 {
    ratio(machine.vcpus as f64, workload.cpu_requirement as f64)
}

pub fn memory_fit(machine: &MachineSpec, workload: &WorkloadProfile) -> f64 {
    ratio(machine.memory_gib, workload.memory_requirement)
}

pub fn io_fit(machine: &MachineSpec, workload: &WorkloadProfile) -> f64 {
    ratio(machine.storage_gib, workload.io_requirement)
}

/// Fit of the weakest dimension, in [0, 1]. An abundant dimension can't compensate a short one.
pub fn compute_fit(machine: &MachineSpec, workload: &WorkloadProfile) -> f64 {
    cpu_fit(machine, workload)
        .min(memory_fit(machine, workload))
        .min(io_fit(machine, workload))
}

pub fn cost_efficiency(machine: &MachineSpec) -> f64 {
    1.0 / (machine.price_per_hour.max(0.0) + PRICE_EPSILON)
}

pub fn zone_score(machine: &MachineSpec, zone: &str) -> f64 {
    indicator(zone.is_empty() || machine.serves_zone(zone))
}

pub fn gpu_score(machine: &MachineSpec, workload: &WorkloadProfile) -> f64 {
    indicator(workload.gpu_requirement == 0 || machine.has_gpus(workload.gpu_requirement, &workload.gpu_type))
}

fn requirement_score(machine_has: bool, required: bool) -> f64 {
    indicator(!required || machine_has)
}

fn indicator(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

/// Every score component before weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub cpu_fit: f64,
    pub memory_fit: f64,
    pub io_fit: f64,
    pub cost_efficiency: f64,
    pub fit: f64,
    pub zone: f64,
    pub gpu: f64,
    pub ephemeral_os: f64,
    pub nested_virt: f64,
    pub spot: f64,
    pub confidential: f64,
}

impl ScoreBreakdown {
    pub fn compute(machine: &MachineSpec, workload: &WorkloadProfile) -> Self {
        Self {
            cpu_fit: cpu_fit(machine, workload),
            memory_fit: memory_fit(machine, workload),
            io_fit: io_fit(machine, workload),
            cost_efficiency: cost_efficiency(machine),
            fit: compute_fit(machine, workload),
            zone: zone_score(machine, &workload.zone),
            gpu: gpu_score(machine, workload),
            ephemeral_os: requirement_score(machine.ephemeral_os_disk, workload.require_ephemeral_os),
            nested_virt: requirement_score(machine.nested_virtualization, workload.require_nested_virt),
            spot: requirement_score(machine.spot_supported, workload.require_spot),
            confidential: requirement_score(machine.confidential_computing, workload.require_confidential),
        }
    }

    pub fn weighted(&self, weights: &StrategyWeights) -> f64 {
        weights.cpu_fit * self.cpu_fit
            + weights.memory_fit * self.memory_fit
            + weights.io_fit * self.io_fit
            + weights.cost_efficiency * self.cost_efficiency
            + weights.fit * self.fit
            + weights.zone * self.zone
            + weights.gpu * self.gpu
            + weights.ephemeral_os * self.ephemeral_os
            + weights.nested_virt * self.nested_virt
            + weights.spot * self.spot
            + weights.confidential * self.confidential
    }
}

pub fn score(machine: &MachineSpec, workload: &WorkloadProfile, strategy: SelectionStrategy) -> f64 {
    ScoreBreakdown::compute(machine, workload).weighted(strategy.weights())
}
