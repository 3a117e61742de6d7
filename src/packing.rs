//! Packing results and the packing entry points.

use std::collections::BTreeMap;
use serde::Serialize;
use crate::default_packing_algorithms::first_fit_decreasing::FirstFitDecreasing;
use crate::default_packing_algorithms::smallest_fit::SmallestFit;
use crate::machine::MachineSpec;
use crate::packing_algorithm::PackingAlgorithm;
use crate::strategy::SelectionStrategy;
use crate::workload::WorkloadProfile;

/// Machine family -> maximum vCPUs that may be committed to it during one packing run.
pub type QuotaMap = BTreeMap<String, u32>;

/// One provisioned machine and the workloads assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackedMachine {
    pub machine: MachineSpec,
    workloads: Vec<WorkloadProfile>,
    cpu_allocated: u64,
    memory_allocated: f64,
}

impl PackedMachine {
    pub fn new(machine: MachineSpec) -> Self {
        Self {
            machine,
            workloads: Vec::default(),
            cpu_allocated: 0,
            memory_allocated: 0.0,
        }
    }

    /// Builds a record from an existing assignment without checking capacity.
    pub fn from_parts(machine: MachineSpec, workloads: Vec<WorkloadProfile>) -> Self {
        let mut packed = Self::new(machine);
        for workload in workloads {
            packed.cpu_allocated += workload.cpu_requirement as u64;
            packed.memory_allocated += workload.memory_requirement;
            packed.workloads.push(workload);
        }
        packed
    }

    pub fn can_fit(&self, workload: &WorkloadProfile) -> bool {
        self.cpu_allocated + workload.cpu_requirement as u64 <= self.machine.vcpus as u64
            && self.memory_allocated + workload.memory_requirement <= self.machine.memory_gib
    }

    /// Adds the workload if it fits into the remaining capacity.
    pub fn try_add(&mut self, workload: &WorkloadProfile) -> bool {
        if !self.can_fit(workload) {
            return false;
        }
        self.cpu_allocated += workload.cpu_requirement as u64;
        self.memory_allocated += workload.memory_requirement;
        self.workloads.push(workload.clone());
        true
    }

    /// Assigned workloads in assignment order.
    pub fn workloads(&self) -> &[WorkloadProfile] {
        &self.workloads
    }

    pub fn cpu_allocated(&self) -> u64 {
        self.cpu_allocated
    }

    pub fn memory_allocated(&self) -> f64 {
        self.memory_allocated
    }

    /// Share of vCPUs in use, in percent. 0 for a machine without vCPUs.
    pub fn cpu_utilization(&self) -> f64 {
        if self.machine.vcpus == 0 {
            return 0.0;
        }
        self.cpu_allocated as f64 / self.machine.vcpus as f64 * 100.0
    }

    /// Share of memory in use, in percent. 0 for a machine without memory.
    pub fn memory_utilization(&self) -> f64 {
        if self.machine.memory_gib <= 0.0 {
            return 0.0;
        }
        self.memory_allocated / self.machine.memory_gib * 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PackingResult {
    pub machines: Vec<PackedMachine>,
    /// Workloads that ended up on no machine.
    pub unplaced: Vec<WorkloadProfile>,
}

impl PackingResult {
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    pub fn placed_count(&self) -> usize {
        self.machines.iter().map(|packed| packed.workloads().len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

/// First-fit-decreasing packing with per-machine greedy co-location, optionally under a
/// per-family vCPU quota. Stops at the first workload no machine type can take.
pub fn pack(
    workloads: &[WorkloadProfile],
    candidates: &[MachineSpec],
    strategy: SelectionStrategy,
    quota: Option<&QuotaMap>,
) -> PackingResult {
    FirstFitDecreasing::new(strategy)
        .with_quota(quota.cloned())
        .pack(workloads, candidates)
}

/// Baseline: every workload alone on the smallest machine type holding it.
pub fn pack_naive(workloads: &[WorkloadProfile], candidates: &[MachineSpec]) -> PackingResult {
    SmallestFit::new().pack(workloads, candidates)
}
