//! Representation of a workload to be placed onto a machine.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use serde::Serialize;

pub const TRUSTED_LAUNCH_KEY: &str = "TrustedLaunch";
pub const ACCELERATED_NETWORKING_KEY: &str = "AcceleratedNetworking";
pub const MAX_PODS_KEY: &str = "MaxPods";

/// Platform capabilities a workload asks for. The well-known keys are typed, anything else is
/// carried in `additional` and ignored by the standard filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CapabilityRequirements {
    pub trusted_launch: bool,
    pub accelerated_networking: bool,
    /// Lower bound for the machine's max pods.
    pub max_pods: Option<u32>,
    pub additional: BTreeMap<String, String>,
}

impl CapabilityRequirements {
    /// Builds requirements from a free-form capability map as found in workload files.
    /// Flags are required when their value is "true" (any case); an unparsable max pods
    /// value is treated as absent.
    pub fn from_map(map: BTreeMap<String, String>) -> Self {
        let mut requirements = Self::default();
        for (key, value) in map {
            match key.as_str() {
                TRUSTED_LAUNCH_KEY => requirements.trusted_launch = value.trim().eq_ignore_ascii_case("true"),
                ACCELERATED_NETWORKING_KEY => {
                    requirements.accelerated_networking = value.trim().eq_ignore_ascii_case("true")
                }
                MAX_PODS_KEY => requirements.max_pods = value.trim().parse().ok(),
                _ => {
                    requirements.additional.insert(key, value);
                }
            }
        }
        requirements
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkloadProfile {
    /// Position of the workload in its input set.
    pub id: u64,

    pub cpu_requirement: u32,
    /// In GiB.
    pub memory_requirement: f64,
    /// In GiB of storage, 0 when not relevant.
    pub io_requirement: f64,
    pub gpu_requirement: u32,
    /// Empty means any GPU type.
    pub gpu_type: String,
    /// Empty means any zone.
    pub zone: String,

    pub require_ephemeral_os: bool,
    pub require_nested_virt: bool,
    pub require_spot: bool,
    pub require_confidential: bool,

    pub capabilities: CapabilityRequirements,
}

impl WorkloadProfile {
    pub fn new(id: u64, cpu_requirement: u32, memory_requirement: f64) -> Self {
        Self {
            id,
            cpu_requirement,
            memory_requirement,
            ..Default::default()
        }
    }

    /// Integer size used to order workloads before packing. Memory is truncated to whole GiB.
    pub fn demand(&self) -> u64 {
        self.cpu_requirement as u64 + self.memory_requirement as u64
    }
}

impl Display for WorkloadProfile {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "workload #{} ({} vCPU, {:.1} GiB", self.id, self.cpu_requirement, self.memory_requirement)?;
        if self.gpu_requirement > 0 {
            write!(f, ", {} GPU", self.gpu_requirement)?;
        }
        write!(f, ")")
    }
}
