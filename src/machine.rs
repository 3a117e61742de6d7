//! Representation of a provisionable VM type (catalog entry).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

/// Keys follow the SKU catalog JSON (`Name`, `VCpus`, `MemoryGiB`, ...). Every key is optional and
/// falls back to its zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSpec {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "VCpus")]
    pub vcpus: u32,
    #[serde(rename = "MemoryGiB")]
    pub memory_gib: f64,
    /// 0 means the machine doesn't advertise local storage.
    #[serde(rename = "StorageGiB")]
    pub storage_gib: f64,
    #[serde(rename = "PricePerHour")]
    pub price_per_hour: f64,
    /// Grouping key for quota enforcement.
    #[serde(rename = "Family")]
    pub family: String,
    #[serde(rename = "Capabilities")]
    pub capabilities: BTreeMap<String, String>,
    #[serde(rename = "GPUCount")]
    pub gpu_count: u32,
    /// Empty when the machine has no GPU.
    #[serde(rename = "GPUType")]
    pub gpu_type: String,
    #[serde(rename = "AvailabilityZones")]
    pub availability_zones: BTreeSet<String>,
    #[serde(rename = "EphemeralOSDisk")]
    pub ephemeral_os_disk: bool,
    #[serde(rename = "NestedVirtualization")]
    pub nested_virtualization: bool,
    #[serde(rename = "SpotSupported")]
    pub spot_supported: bool,
    #[serde(rename = "ConfidentialComputing")]
    pub confidential_computing: bool,
    #[serde(rename = "TrustedLaunch")]
    pub trusted_launch: bool,
    #[serde(rename = "AcceleratedNetworking")]
    pub accelerated_networking: bool,
    /// 0 means unconstrained.
    #[serde(rename = "MaxPods")]
    pub max_pods: u32,
    #[serde(rename = "UltraSSDEnabled")]
    pub ultra_ssd_enabled: bool,
    #[serde(rename = "ProximityPlacement")]
    pub proximity_placement: bool,
}

impl MachineSpec {
    pub fn new(name: &str, vcpus: u32, memory_gib: f64, price_per_hour: f64) -> Self {
        Self {
            name: name.to_string(),
            vcpus,
            memory_gib,
            price_per_hour,
            ..Default::default()
        }
    }

    /// Checks raw CPU and memory capacity only.
    pub fn can_hold(&self, cpu: u32, memory_gib: f64) -> bool {
        self.vcpus >= cpu && self.memory_gib >= memory_gib
    }

    pub fn serves_zone(&self, zone: &str) -> bool {
        self.availability_zones.contains(zone)
    }

    /// GPU type comparison ignores ASCII case; an empty `gpu_type` accepts any type.
    pub fn has_gpus(&self, count: u32, gpu_type: &str) -> bool {
        if self.gpu_count < count {
            return false;
        }
        gpu_type.is_empty() || self.gpu_type.eq_ignore_ascii_case(gpu_type)
    }
}

impl Display for MachineSpec {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} ({} vCPU, {:.1} GiB", self.name, self.vcpus, self.memory_gib)?;
        if self.gpu_count > 0 {
            write!(f, ", {}x {}", self.gpu_count, self.gpu_type)?;
        }
        write!(f, ", ${:.2}/hr)", self.price_per_hour)
    }
}
