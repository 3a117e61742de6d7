use log::info;
use crate::machine::MachineSpec;
use crate::packing::{PackedMachine, PackingResult};
use crate::packing_algorithm::PackingAlgorithm;
use crate::workload::WorkloadProfile;

/// Baseline: each workload alone on the smallest machine type (by vCPUs, then memory) with
/// enough raw CPU and memory. No filters, no scoring, no co-location.
#[derive(Debug, Clone, Default)]
pub struct SmallestFit;

impl SmallestFit {
    pub fn new() -> Self {
        Default::default()
    }
}

impl PackingAlgorithm for SmallestFit {
    fn name(&self) -> String {
        "smallest-fit".to_string()
    }

    fn pack(&self, workloads: &[WorkloadProfile], candidates: &[MachineSpec]) -> PackingResult {
        let mut result = PackingResult::default();
        for workload in workloads {
            let smallest = candidates
                .iter()
                .filter(|machine| machine.can_hold(workload.cpu_requirement, workload.memory_requirement))
                .min_by(|a, b| a.vcpus.cmp(&b.vcpus).then(a.memory_gib.total_cmp(&b.memory_gib)));
            match smallest {
                Some(machine) => result
                    .machines
                    .push(PackedMachine::from_parts(machine.clone(), vec![workload.clone()])),
                None => result.unplaced.push(workload.clone()),
            }
        }
        info!("{} placed {} of {} workloads", self.name(), result.placed_count(), workloads.len());
        result
    }
}
