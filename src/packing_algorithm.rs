use crate::machine::MachineSpec;
use crate::packing::PackingResult;
use crate::workload::WorkloadProfile;

pub trait PackingAlgorithm {
    /// Label of the algorithm in reports.
    fn name(&self) -> String;

    /// Packs workloads onto machine types from candidates. Never fails: workloads that can't be
    /// placed are reported in `PackingResult::unplaced`.
    fn pack(&self, workloads: &[WorkloadProfile], candidates: &[MachineSpec]) -> PackingResult;
}
