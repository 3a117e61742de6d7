//! Resource-aware instance selection and multi-workload bin-packing for cluster autoscaling
//! simulations.
//!
//! Given a catalog of machine types and a set of workloads, the crate picks the best machine type
//! for a single workload under an optimization strategy ([`selector::select`]) and packs whole
//! workload sets onto as few and as cheap machines as it can ([`packing::pack`]), with naive
//! baselines to compare against ([`packing::pack_naive`]).

pub mod dataset_reader;
pub mod default_packing_algorithms;
pub mod error;
pub mod filter;
pub mod fit;
pub mod generator;
pub mod machine;
pub mod metrics;
pub mod packing;
pub mod packing_algorithm;
pub mod selector;
pub mod simulation;
pub mod simulation_config;
pub mod simulation_metrics;
pub mod strategy;
pub mod workload;

pub use error::{SimulationError, SimulationResult};
pub use machine::MachineSpec;
pub use metrics::{average_utilization, total_cost};
pub use packing::{pack, pack_naive, PackedMachine, PackingResult, QuotaMap};
pub use selector::{select, Selection};
pub use strategy::SelectionStrategy;
pub use workload::WorkloadProfile;
