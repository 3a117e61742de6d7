use log::info;
use crate::dataset_reader::{load_catalog, load_custom_workloads, load_preprocessed_workloads, load_quota,
                            load_trace_workloads};
use crate::default_packing_algorithms::first_fit_decreasing::FirstFitDecreasing;
use crate::default_packing_algorithms::one_per_machine::OnePerMachine;
use crate::default_packing_algorithms::smallest_fit::SmallestFit;
use crate::error::SimulationResult;
use crate::generator::WorkloadGenerator;
use crate::machine::MachineSpec;
use crate::metrics::{machine_reports, Comparison, MachineReport, SimulationSummary};
use crate::packing::{PackingResult, QuotaMap};
use crate::packing_algorithm::PackingAlgorithm;
use crate::simulation_config::{CatalogSource, SimulationConfig, WorkloadSource};
use crate::simulation_metrics::ReportLogger;
use crate::strategy::SelectionStrategy;
use crate::workload::WorkloadProfile;

/// Packs one workload set onto one catalog with several algorithms and reports how they compare.
pub struct InstanceSelectionSimulation {
    catalog: Vec<MachineSpec>,
    workloads: Vec<WorkloadProfile>,
    quota: Option<QuotaMap>,
    sim_config: SimulationConfig,
}

impl InstanceSelectionSimulation {
    /// Loads the catalog, quota and workloads named by the config.
    pub fn new(sim_config: SimulationConfig) -> SimulationResult<Self> {
        let catalog = match &sim_config.catalog {
            CatalogSource::File { path } => {
                info!("Loading instance specs from {}", path);
                load_catalog(path)?
            }
            CatalogSource::Synthetic { count, seed } => WorkloadGenerator::new(*seed).generate_catalog(*count),
        };
        let quota = match &sim_config.quota_path {
            Some(path) => Some(load_quota(path)?),
            None => None,
        };
        let workloads = match &sim_config.workloads {
            WorkloadSource::Synthetic { count, seed } => WorkloadGenerator::new(*seed).generate_workloads(*count),
            WorkloadSource::Custom { path } => load_custom_workloads(path)?,
            WorkloadSource::Preprocessed { path, limit } => load_preprocessed_workloads(path, *limit)?,
            WorkloadSource::Trace { source, path, max_rows } => {
                info!("Parsing {} trace from {}", source, path);
                load_trace_workloads(path, *source, *max_rows)?
            }
        };
        info!("Loaded {} machine types and {} workloads", catalog.len(), workloads.len());
        Ok(Self::from_parts(catalog, workloads, quota, sim_config))
    }

    pub fn from_parts(catalog: Vec<MachineSpec>, workloads: Vec<WorkloadProfile>, quota: Option<QuotaMap>,
                      sim_config: SimulationConfig) -> Self {
        Self {
            catalog,
            workloads,
            quota,
            sim_config,
        }
    }

    pub fn catalog(&self) -> &[MachineSpec] {
        &self.catalog
    }

    pub fn workloads(&self) -> &[WorkloadProfile] {
        &self.workloads
    }

    pub fn quota(&self) -> Option<&QuotaMap> {
        self.quota.as_ref()
    }

    /// The bin-packing planner configured for this simulation.
    pub fn planner(&self, strategy: SelectionStrategy) -> FirstFitDecreasing {
        FirstFitDecreasing::new(strategy)
            .with_quota(self.quota.clone())
            .skip_unplaceable(self.sim_config.skip_unplaceable)
    }

    pub fn run(&self, algorithm: &dyn PackingAlgorithm) -> (PackingResult, SimulationSummary) {
        let result = algorithm.pack(&self.workloads, &self.catalog);
        let summary = SimulationSummary::from_result(&algorithm.name(), &result);
        (result, summary)
    }

    /// Planner under `strategy` against the smallest-fit baseline.
    pub fn compare(&self, strategy: SelectionStrategy) -> Comparison {
        let (_, packed) = self.run(&self.planner(strategy));
        let (_, baseline) = self.run(&SmallestFit::new());
        Comparison { packed, baseline }
    }

    /// Runs the planner and the one-per-machine baseline for every configured strategy, then the
    /// smallest-fit baseline, logging every summary. Machine breakdowns of the planner runs follow
    /// when the config asks for them. Returns planner vs smallest-fit per strategy.
    pub fn run_all(&self, logger: &mut dyn ReportLogger) -> Vec<Comparison> {
        let (_, baseline) = self.run(&SmallestFit::new());
        let mut comparisons = Vec::default();
        let mut breakdowns: Vec<(SimulationSummary, Vec<MachineReport>)> = Vec::default();
        for strategy in &self.sim_config.strategies {
            let (result, packed) = self.run(&self.planner(*strategy));
            if self.sim_config.report_machines {
                breakdowns.push((packed.clone(), machine_reports(&result)));
            }
            let (_, one_per_machine) = self.run(&OnePerMachine::new(*strategy));
            logger.log_summary(&packed);
            logger.log_summary(&one_per_machine);

            let comparison = Comparison { packed, baseline: baseline.clone() };
            info!("{}: {:.1}% fewer machines, {:.1}% lower cost than {}", comparison.packed.algorithm,
                  comparison.machines_saved_percent(), comparison.cost_saved_percent(), baseline.algorithm);
            comparisons.push(comparison);
        }
        logger.log_summary(&baseline);
        for (summary, machines) in &breakdowns {
            logger.log_machines(summary, machines);
        }
        comparisons
    }

    /// Runs everything and saves the report where the config asks to.
    pub fn finish_simulation(&self, logger: &mut dyn ReportLogger) -> SimulationResult<Vec<Comparison>> {
        let comparisons = self.run_all(logger);
        if let Some(path) = &self.sim_config.report_path {
            logger.save_log(path)?;
            info!("Report saved to {}", path);
        }
        Ok(comparisons)
    }
}
