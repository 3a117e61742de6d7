use std::cmp::Reverse;
use std::collections::HashMap;
use log::{debug, info, warn};
use crate::machine::MachineSpec;
use crate::packing::{PackedMachine, PackingResult, QuotaMap};
use crate::packing_algorithm::PackingAlgorithm;
use crate::selector::select;
use crate::strategy::SelectionStrategy;
use crate::workload::WorkloadProfile;

/// Seeds a new machine with the largest unplaced workload, lets the instance selector choose its
/// type, then fills the machine greedily with the other unplaced workloads in decreasing order.
///
/// With a quota, a family whose committed vCPUs would exceed its ceiling is removed from this
/// run's candidate snapshot and selection is retried for the same seed. Families without a
/// quota entry, or with a ceiling of 0, are unlimited.
#[derive(Debug, Clone, Default)]
pub struct FirstFitDecreasing {
    strategy: SelectionStrategy,
    quota: Option<QuotaMap>,
    skip_unplaceable: bool,
}

impl FirstFitDecreasing {
    pub fn new(strategy: SelectionStrategy) -> Self {
        Self {
            strategy,
            quota: None,
            skip_unplaceable: false,
        }
    }

    pub fn with_quota(mut self, quota: Option<QuotaMap>) -> Self {
        self.quota = quota;
        self
    }

    /// By default the run stops at the first seed without a feasible machine and every workload
    /// still unplaced is dropped. When set, only that seed is dropped and packing goes on.
    pub fn skip_unplaceable(mut self, skip: bool) -> Self {
        self.skip_unplaceable = skip;
        self
    }

    fn exceeds_quota(&self, committed: &HashMap<String, u64>, machine: &MachineSpec) -> bool {
        let Some(quota) = &self.quota else {
            return false;
        };
        match quota.get(&machine.family) {
            Some(&limit) if limit > 0 => {
                let used = committed.get(&machine.family).copied().unwrap_or(0);
                used + machine.vcpus as u64 > limit as u64
            }
            _ => false,
        }
    }
}

impl PackingAlgorithm for FirstFitDecreasing {
    fn name(&self) -> String {
        format!("first-fit-decreasing/{}", self.strategy)
    }

    fn pack(&self, workloads: &[WorkloadProfile], candidates: &[MachineSpec]) -> PackingResult {
        let mut sorted: Vec<&WorkloadProfile> = workloads.iter().collect();
        sorted.sort_by_key(|workload| Reverse(workload.demand()));

        let mut done = vec![false; sorted.len()];
        let mut snapshot = candidates.to_vec();
        let mut committed_vcpus = HashMap::<String, u64>::default();
        let mut result = PackingResult::default();

        while let Some(seed_index) = done.iter().position(|is_done| !is_done) {
            let seed = sorted[seed_index];
            let Some(machine) = select(&snapshot, seed, self.strategy).machine else {
                if self.skip_unplaceable {
                    warn!("No machine type for {}, skipping it", seed);
                    done[seed_index] = true;
                    result.unplaced.push(seed.clone());
                    continue;
                }
                let remaining: Vec<WorkloadProfile> = sorted
                    .iter()
                    .zip(&done)
                    .filter(|(_, is_done)| !**is_done)
                    .map(|(workload, _)| (*workload).clone())
                    .collect();
                warn!("No machine type for {}, stopping with {} workloads unplaced", seed, remaining.len());
                result.unplaced.extend(remaining);
                break;
            };

            if self.exceeds_quota(&committed_vcpus, &machine) {
                warn!("vCPU quota of family '{}' exhausted, removing it from candidates", machine.family);
                snapshot.retain(|candidate| candidate.family != machine.family);
                continue;
            }

            let mut packed = PackedMachine::new(machine);
            for (index, workload) in sorted.iter().enumerate() {
                if !done[index] && packed.try_add(workload) {
                    done[index] = true;
                }
            }
            *committed_vcpus.entry(packed.machine.family.clone()).or_default() += packed.machine.vcpus as u64;
            debug!("Committed {} with {} workloads", packed.machine, packed.workloads().len());
            result.machines.push(packed);
        }

        info!("{} packed {} of {} workloads onto {} machines", self.name(), result.placed_count(),
              workloads.len(), result.machine_count());
        result
    }
}
