use anyhow::bail;
use clap::Parser;
use instance_selection_simulator::dataset_reader::TraceSource;
use instance_selection_simulator::simulation::InstanceSelectionSimulation;
use instance_selection_simulator::simulation_config::{CatalogSource, SimulationConfig, WorkloadSource,
                                                      DEFAULT_MAX_ROWS, DEFAULT_SEED};
use instance_selection_simulator::simulation_metrics::ReportFormat;
use instance_selection_simulator::strategy::SelectionStrategy;

#[derive(Parser)]
#[command(
    name = "instance-selection-sim",
    about = "Simulates instance selection and bin-packing of workloads onto VM types",
    version
)]
struct Cli {
    /// YAML simulation config. Flags below override its values.
    #[arg(short, long)]
    config: Option<String>,
    /// SKU catalog JSON
    #[arg(long)]
    sku: Option<String>,
    /// Use a synthetic catalog of this many machine types instead of a SKU file
    #[arg(long)]
    synthetic_catalog: Option<usize>,
    /// Quota JSON mapping machine family to max vCPUs
    #[arg(long)]
    quota: Option<String>,
    /// Custom workloads JSON
    #[arg(long)]
    workloads: Option<String>,
    /// Trace schema: google, azure or alibaba
    #[arg(long)]
    trace: Option<String>,
    /// Local CSV file of the trace
    #[arg(long)]
    trace_path: Option<String>,
    /// Max trace rows to read
    #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
    max: usize,
    /// Generate this many synthetic workloads
    #[arg(long)]
    synthetic: Option<usize>,
    /// Seed of synthetic catalogs and workloads
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Strategy to simulate: general, cpu, memory or io. Repeatable.
    #[arg(long = "strategy")]
    strategies: Vec<String>,
    /// Skip workloads without a feasible machine instead of stopping
    #[arg(long)]
    skip_unplaceable: bool,
    /// Where to save the report
    #[arg(long)]
    report: Option<String>,
    /// Report format: table, json or csv
    #[arg(long)]
    format: Option<String>,
    /// Also report every packed machine of the planner runs
    #[arg(long)]
    machines: bool,
}

fn build_config(cli: Cli) -> anyhow::Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(path) = cli.sku {
        config.catalog = CatalogSource::File { path };
    }
    if let Some(count) = cli.synthetic_catalog {
        config.catalog = CatalogSource::Synthetic { count, seed: cli.seed };
    }
    if cli.quota.is_some() {
        config.quota_path = cli.quota;
    }

    if let Some(path) = cli.workloads {
        config.workloads = WorkloadSource::Custom { path };
    } else if let Some(trace) = cli.trace {
        let source: TraceSource = trace.parse()?;
        let Some(path) = cli.trace_path else {
            bail!("--trace {} needs --trace-path", source);
        };
        config.workloads = WorkloadSource::Trace { source, path, max_rows: cli.max };
    } else if let Some(count) = cli.synthetic {
        config.workloads = WorkloadSource::Synthetic { count, seed: cli.seed };
    }

    if !cli.strategies.is_empty() {
        config.strategies = cli
            .strategies
            .iter()
            .map(|strategy| strategy.parse::<SelectionStrategy>())
            .collect::<Result<_, _>>()?;
    }
    if cli.skip_unplaceable {
        config.skip_unplaceable = true;
    }
    if cli.report.is_some() {
        config.report_path = cli.report;
    }
    if cli.machines {
        config.report_machines = true;
    }
    if let Some(format) = cli.format {
        config.report_format = format.parse::<ReportFormat>()?;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = build_config(Cli::parse())?;
    let mut logger = config.report_format.logger();
    let simulation = InstanceSelectionSimulation::new(config)?;
    let comparisons = simulation.finish_simulation(logger.as_mut())?;

    for comparison in comparisons {
        println!("{} vs {}: {:.1}% fewer machines, {:.1}% lower hourly cost",
                 comparison.packed.algorithm, comparison.baseline.algorithm,
                 comparison.machines_saved_percent(), comparison.cost_saved_percent());
    }
    Ok(())
}
