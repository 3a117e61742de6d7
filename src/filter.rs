//! Feasibility predicates pruning machine types before scoring.

use std::fmt::{Display, Formatter};
use crate::machine::MachineSpec;
use crate::workload::WorkloadProfile;

/// A boolean feasibility check. Every predicate passes when the workload doesn't state the
/// corresponding requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// vCPUs and memory are enough to hold the workload on an empty machine.
    Capacity,
    Zone,
    /// GPU count is enough and the type matches ignoring case.
    Gpu,
    EphemeralOsDisk,
    TrustedLaunch,
    AcceleratedNetworking,
    /// Machine max pods reaches the workload's floor. A machine max pods of 0 is unconstrained.
    MaxPods,
}

impl Predicate {
    pub const STANDARD: [Predicate; 7] = [
        Predicate::Capacity,
        Predicate::Zone,
        Predicate::Gpu,
        Predicate::EphemeralOsDisk,
        Predicate::TrustedLaunch,
        Predicate::AcceleratedNetworking,
        Predicate::MaxPods,
    ];

    pub fn admits(&self, machine: &MachineSpec, workload: &WorkloadProfile) -> bool {
        match self {
            Predicate::Capacity => machine.can_hold(workload.cpu_requirement, workload.memory_requirement),
            Predicate::Zone => workload.zone.is_empty() || machine.serves_zone(&workload.zone),
            Predicate::Gpu => {
                workload.gpu_requirement == 0 || machine.has_gpus(workload.gpu_requirement, &workload.gpu_type)
            }
            Predicate::EphemeralOsDisk => !workload.require_ephemeral_os || machine.ephemeral_os_disk,
            Predicate::TrustedLaunch => !workload.capabilities.trusted_launch || machine.trusted_launch,
            Predicate::AcceleratedNetworking => {
                !workload.capabilities.accelerated_networking || machine.accelerated_networking
            }
            Predicate::MaxPods => match workload.capabilities.max_pods {
                Some(floor) => machine.max_pods == 0 || machine.max_pods >= floor,
                None => true,
            },
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Predicate::Capacity => write!(f, "capacity"),
            Predicate::Zone => write!(f, "zone"),
            Predicate::Gpu => write!(f, "gpu"),
            Predicate::EphemeralOsDisk => write!(f, "ephemeral-os-disk"),
            Predicate::TrustedLaunch => write!(f, "trusted-launch"),
            Predicate::AcceleratedNetworking => write!(f, "accelerated-networking"),
            Predicate::MaxPods => write!(f, "max-pods"),
        }
    }
}

/// Keeps candidates passing all `predicates`, in catalog order.
pub fn filter<'a>(
    candidates: &'a [MachineSpec],
    workload: &WorkloadProfile,
    predicates: &[Predicate],
) -> Vec<&'a MachineSpec> {
    candidates
        .iter()
        .filter(|machine| predicates.iter().all(|predicate| predicate.admits(machine, workload)))
        .collect()
}

/// First of `predicates` rejecting the machine, if any.
pub fn first_rejection(machine: &MachineSpec, workload: &WorkloadProfile, predicates: &[Predicate]) -> Option<Predicate> {
    predicates.iter().copied().find(|predicate| !predicate.admits(machine, workload))
}
