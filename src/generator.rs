//! Seeded synthetic catalogs and workloads for runs without trace files.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::machine::MachineSpec;
use crate::workload::{CapabilityRequirements, WorkloadProfile};

const ZONES: [&str; 3] = ["1", "2", "3"];

pub struct WorkloadGenerator {
    rng: StdRng,
    next_id: u64,
}

impl WorkloadGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_id: 0,
        }
    }

    fn take_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id - 1
    }

    /// 1-16 vCPU, 1-64 GiB, no other requirement.
    pub fn generate_workload(&mut self) -> WorkloadProfile {
        let id = self.take_id();
        let cpu = self.rng.gen_range(1..=16);
        let memory = self.rng.gen_range(1..=64) as f64;
        WorkloadProfile::new(id, cpu, memory)
    }

    /// Like `generate_workload` plus IO, zone, GPU and platform requirements.
    pub fn generate_constrained_workload(&mut self) -> WorkloadProfile {
        let mut workload = self.generate_workload();
        workload.io_requirement = self.rng.gen_range(1..=100) as f64;
        workload.gpu_requirement = self.rng.gen_range(0..=1);
        workload.zone = ZONES[self.rng.gen_range(0..ZONES.len())].to_string();
        workload.require_ephemeral_os = self.rng.gen_bool(0.5);
        workload.require_nested_virt = self.rng.gen_bool(0.5);
        workload.require_spot = self.rng.gen_bool(0.5);
        workload.require_confidential = self.rng.gen_bool(0.5);
        workload.capabilities = CapabilityRequirements {
            accelerated_networking: true,
            ..Default::default()
        };
        workload
    }

    pub fn generate_workloads(&mut self, count: usize) -> Vec<WorkloadProfile> {
        (0..count).map(|_| self.generate_workload()).collect()
    }

    /// A catalog of `count` machine types of one family, available in all zones.
    pub fn generate_catalog(&mut self, count: usize) -> Vec<MachineSpec> {
        (0..count).map(|index| self.generate_machine(index)).collect()
    }

    fn generate_machine(&mut self, index: usize) -> MachineSpec {
        let gpu_count = self.rng.gen_range(0..=1);
        MachineSpec {
            name: format!("Standard_D{}_v4", index),
            vcpus: self.rng.gen_range(2..=65),
            memory_gib: self.rng.gen_range(4..=259) as f64,
            storage_gib: self.rng.gen_range(32..=2031) as f64,
            price_per_hour: self.rng.gen::<f64>() * 10.0 + 0.05,
            family: "Dsv4".to_string(),
            gpu_count,
            gpu_type: if gpu_count > 0 { "NVIDIA".to_string() } else { String::new() },
            availability_zones: ZONES.iter().map(|zone| zone.to_string()).collect(),
            ephemeral_os_disk: self.rng.gen_bool(0.5),
            nested_virtualization: self.rng.gen_bool(0.5),
            spot_supported: self.rng.gen_bool(0.5),
            confidential_computing: self.rng.gen_bool(0.5),
            trusted_launch: self.rng.gen_bool(0.5),
            accelerated_networking: self.rng.gen_bool(0.5),
            max_pods: self.rng.gen_range(30..=279),
            ultra_ssd_enabled: self.rng.gen_bool(0.5),
            proximity_placement: self.rng.gen_bool(0.5),
            ..Default::default()
        }
    }
}
