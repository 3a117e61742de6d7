use log::info;
use crate::machine::MachineSpec;
use crate::packing::{PackedMachine, PackingResult};
use crate::packing_algorithm::PackingAlgorithm;
use crate::selector::select;
use crate::strategy::SelectionStrategy;
use crate::workload::WorkloadProfile;

/// Baseline: each workload alone on the machine type the instance selector picks for it.
#[derive(Debug, Clone, Default)]
pub struct OnePerMachine {
    strategy: SelectionStrategy,
}

impl OnePerMachine {
    pub fn new(strategy: SelectionStrategy) -> Self {
        Self { strategy }
    }
}

impl PackingAlgorithm for OnePerMachine {
    fn name(&self) -> String {
        format!("one-per-machine/{}", self.strategy)
    }

    fn pack(&self, workloads: &[WorkloadProfile], candidates: &[MachineSpec]) -> PackingResult {
        let mut result = PackingResult::default();
        for workload in workloads {
            match select(candidates, workload, self.strategy).machine {
                Some(machine) => result
                    .machines
                    .push(PackedMachine::from_parts(machine, vec![workload.clone()])),
                None => result.unplaced.push(workload.clone()),
            }
        }
        info!("{} placed {} of {} workloads", self.name(), result.placed_count(), workloads.len());
        result
    }
}
