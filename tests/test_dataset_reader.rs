use instance_selection_simulator::dataset_reader::{load_catalog, load_custom_workloads, load_preprocessed_workloads,
                                                  load_quota, load_trace_workloads, read_trace_workloads, TraceSource};
use instance_selection_simulator::simulation_config::{CatalogSource, SimulationConfig, WorkloadSource,
                                                      DEFAULT_MAX_ROWS, DEFAULT_SKU_PATH};
use instance_selection_simulator::simulation_metrics::ReportFormat;
use instance_selection_simulator::{SelectionStrategy, SimulationError, WorkloadProfile};

fn name_wrapper(file_name: &str) -> String {
    format!("test-configs/{}", file_name)
}

fn requirements(workloads: &[WorkloadProfile]) -> Vec<(u32, f64)> {
    workloads.iter().map(|workload| (workload.cpu_requirement, workload.memory_requirement)).collect()
}

#[test]
fn test_load_catalog() {
    let catalog = load_catalog(&name_wrapper("skus.json")).unwrap();
    let names: Vec<&str> = catalog.iter().map(|machine| machine.name.as_str()).collect();
    assert_eq!(names, vec!["Standard_D2_v4", "Standard_D4_v4", "Standard_E4_v4", "Standard_NC6", "Standard_B1s"]);

    let d4 = &catalog[1];
    assert_eq!(d4.vcpus, 4);
    assert_eq!(d4.memory_gib, 16.0);
    assert_eq!(d4.family, "Standard_D");
    assert!(d4.trusted_launch);
    assert!(d4.serves_zone("3"));
    assert_eq!(d4.max_pods, 110);
    assert_eq!(d4.capabilities.get("AcceleratedNetworking").map(String::as_str), Some("true"));

    let nc6 = &catalog[3];
    assert!(nc6.has_gpus(1, "nvidia"));
    assert!(!nc6.has_gpus(2, ""));
    assert!(nc6.spot_supported);

    let b1s = &catalog[4];
    assert_eq!(b1s.family, "");
    assert_eq!(b1s.storage_gib, 0.0);
    assert!(b1s.availability_zones.is_empty());
    assert!(!b1s.ephemeral_os_disk);
}

#[test]
fn test_load_catalog_errors() {
    assert!(matches!(load_catalog(&name_wrapper("missing.json")), Err(SimulationError::Io { .. })));
    assert!(matches!(load_catalog(&name_wrapper("malformed.json")), Err(SimulationError::Json { .. })));
}

#[test]
fn test_load_catalog_rejects_invalid_capacities() {
    match load_catalog(&name_wrapper("zero_memory_skus.json")) {
        Err(SimulationError::InvalidValue { path, field, value }) => {
            assert_eq!(path, name_wrapper("zero_memory_skus.json"));
            assert_eq!(field, "MemoryGiB");
            assert_eq!(value, 0.0);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(load_catalog(&name_wrapper("missing_vcpus_skus.json")),
                     Err(SimulationError::InvalidValue { field: "VCpus", .. })));
    assert!(matches!(load_catalog(&name_wrapper("negative_price_skus.json")),
                     Err(SimulationError::InvalidValue { field: "PricePerHour", .. })));
}

#[test]
fn test_load_catalog_accepts_free_machines() {
    let catalog = load_catalog(&name_wrapper("free_skus.json")).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].price_per_hour, 0.0);
}

#[test]
fn test_load_quota() {
    let quota = load_quota(&name_wrapper("quota.json")).unwrap();
    assert_eq!(quota.len(), 2);
    assert_eq!(quota["Standard_D"], 8);
    assert_eq!(quota["Standard_NC"], 0);
}

#[test]
fn test_load_custom_workloads() {
    let workloads = load_custom_workloads(&name_wrapper("workloads.json")).unwrap();
    assert_eq!(workloads.len(), 5);
    let ids: Vec<u64> = workloads.iter().map(|workload| workload.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    assert_eq!(requirements(&workloads), vec![(2, 4.0), (1, 2.0), (4, 16.0), (2, 6.0), (1, 1.0)]);

    assert_eq!(workloads[1].zone, "3");
    assert_eq!(workloads[2].gpu_requirement, 1);
    assert_eq!(workloads[2].gpu_type, "nvidia");

    let capabilities = &workloads[3].capabilities;
    assert!(capabilities.trusted_launch);
    assert!(capabilities.accelerated_networking);
    assert_eq!(capabilities.max_pods, Some(100));
    assert_eq!(capabilities.additional.get("workload_type").map(String::as_str), Some("web"));

    assert_eq!(workloads[4].io_requirement, 20.0);
    assert!(workloads[4].require_ephemeral_os);
    assert!(!workloads[0].require_ephemeral_os);
}

#[test]
fn test_load_custom_workloads_rejects_negative_requirements() {
    match load_custom_workloads(&name_wrapper("negative_memory_workloads.json")) {
        Err(SimulationError::InvalidValue { field, value, .. }) => {
            assert_eq!(field, "memoryRequirements");
            assert_eq!(value, -40.0);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(load_custom_workloads(&name_wrapper("negative_io_workloads.json")),
                     Err(SimulationError::InvalidValue { field: "ioRequirements", .. })));
}

#[test]
fn test_load_preprocessed_workloads() {
    let workloads = load_preprocessed_workloads(&name_wrapper("preprocessed.json"), 0).unwrap();
    assert_eq!(requirements(&workloads), vec![(2, 3.5), (4, 8.0), (1, 0.75)]);
    assert_eq!(workloads[0].capabilities.additional.get("workload_type").map(String::as_str), Some("Interactive"));
    assert!(workloads[2].capabilities.additional.is_empty());

    let limited = load_preprocessed_workloads(&name_wrapper("preprocessed.json"), 2).unwrap();
    assert_eq!(limited.len(), 2);
}

#[test]
fn test_load_preprocessed_rejects_negative_memory() {
    assert!(matches!(load_preprocessed_workloads(&name_wrapper("negative_memory_preprocessed.json"), 0),
                     Err(SimulationError::InvalidValue { field: "memory_request_gib", .. })));
}

#[test]
fn test_google_trace() {
    let workloads = load_trace_workloads(&name_wrapper("google_trace.csv"), TraceSource::Google, 1000).unwrap();
    assert_eq!(requirements(&workloads), vec![(2, 4.0), (0, 1.0), (8, 32.0)]);
    let ids: Vec<u64> = workloads.iter().map(|workload| workload.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn test_max_rows_counts_skipped_rows() {
    let workloads = load_trace_workloads(&name_wrapper("google_trace.csv"), TraceSource::Google, 2).unwrap();
    assert_eq!(requirements(&workloads), vec![(2, 4.0)]);
}

#[test]
fn test_google_trace_alternative_columns() {
    let trace = "cpu_request,memory_request\n1500,2048\n";
    let workloads = read_trace_workloads(trace.as_bytes(), TraceSource::Google, 10, "inline").unwrap();
    assert_eq!(requirements(&workloads), vec![(1, 2.0)]);
}

#[test]
fn test_azure_trace() {
    let trace = "vm_id,vCPUs,memoryGB\nvm-0,4,16\nvm-1,0,0\nvm-2,8,64.5\n";
    let workloads = read_trace_workloads(trace.as_bytes(), TraceSource::Azure, 10, "inline").unwrap();
    assert_eq!(requirements(&workloads), vec![(4, 16.0), (8, 64.5)]);
}

#[test]
fn test_azure_trace_last_matching_column_wins() {
    let trace = "vcpu_min,vcpu_max,memory\n1,4,8\n";
    let workloads = read_trace_workloads(trace.as_bytes(), TraceSource::Azure, 10, "inline").unwrap();
    assert_eq!(requirements(&workloads), vec![(4, 8.0)]);
}

#[test]
fn test_azure_trace_fractional_cpu_reads_as_zero() {
    let trace = "vm_id,vCPUs,memoryGB\nvm-0,2.5,8\nvm-1,0.5,0\nvm-2, 4 ,4\n";
    let workloads = read_trace_workloads(trace.as_bytes(), TraceSource::Azure, 10, "inline").unwrap();
    assert_eq!(requirements(&workloads), vec![(0, 8.0), (4, 4.0)]);
}

#[test]
fn test_alibaba_trace() {
    let trace = "machine_id,cpu,mem,cpu_util\nm1,4,8.5,30\nm2,2.7,3,10\nm3,abc,4,1\nm4,5\nm5,6,6,6\n";
    let workloads = read_trace_workloads(trace.as_bytes(), TraceSource::Alibaba, 10, "inline").unwrap();
    assert_eq!(requirements(&workloads), vec![(4, 8.5), (0, 3.0), (0, 4.0)]);
}

#[test]
fn test_trace_missing_columns() {
    let trace = "a,b\n1,2\n";
    let result = read_trace_workloads(trace.as_bytes(), TraceSource::Google, 10, "inline");
    match result {
        Err(SimulationError::MissingColumns { path, header, .. }) => {
            assert_eq!(path, "inline");
            assert_eq!(header, vec!["a".to_string(), "b".to_string()]);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    let alibaba_with_google_columns = "requested_cpu,requested_memory\n1,1\n";
    assert!(read_trace_workloads(alibaba_with_google_columns.as_bytes(), TraceSource::Alibaba, 10, "inline").is_err());
}

#[test]
fn test_trace_value_out_of_range() {
    let trace = "cpu,mem\n99999999999,1\n";
    let result = read_trace_workloads(trace.as_bytes(), TraceSource::Alibaba, 10, "inline");
    assert!(matches!(result, Err(SimulationError::OutOfRange { field: "cpu", .. })));
}

#[test]
fn test_trace_source_parsing() {
    assert_eq!("Google".parse::<TraceSource>().unwrap(), TraceSource::Google);
    assert_eq!("alibaba".parse::<TraceSource>().unwrap(), TraceSource::Alibaba);
    assert!(matches!("borg".parse::<TraceSource>(), Err(SimulationError::UnknownTraceSource(_))));
}

#[test]
fn test_config_from_file() {
    let config = SimulationConfig::from_file(&name_wrapper("config.yaml")).unwrap();
    assert_eq!(config.catalog, CatalogSource::File { path: name_wrapper("skus.json") });
    assert_eq!(config.quota_path, Some(name_wrapper("quota.json")));
    assert_eq!(config.workloads, WorkloadSource::Custom { path: name_wrapper("workloads.json") });
    assert_eq!(config.strategies, vec![SelectionStrategy::General, SelectionStrategy::Cpu]);
    assert!(config.skip_unplaceable);
    assert_eq!(config.report_path, None);
    assert_eq!(config.report_format, ReportFormat::Json);
    assert!(!config.report_machines);
}

#[test]
fn test_config_trace_defaults() {
    let config = SimulationConfig::from_file(&name_wrapper("trace_config.yaml")).unwrap();
    assert_eq!(config.catalog, CatalogSource::Synthetic { count: 20, seed: 7 });
    assert_eq!(config.workloads, WorkloadSource::Trace {
        source: TraceSource::Google,
        path: name_wrapper("google_trace.csv"),
        max_rows: DEFAULT_MAX_ROWS,
    });
    assert_eq!(config.strategies, vec![SelectionStrategy::General]);
    assert_eq!(config.report_format, ReportFormat::Table);
}

#[test]
fn test_config_defaults() {
    let config = SimulationConfig::from_yaml("strategies: []\nreport_path: out.csv\nreport_format: csv\n", "inline")
        .unwrap();
    assert_eq!(config.catalog, CatalogSource::File { path: DEFAULT_SKU_PATH.to_string() });
    assert_eq!(config.strategies, vec![SelectionStrategy::General]);
    assert!(!config.skip_unplaceable);
    assert_eq!(config.report_path, Some("out.csv".to_string()));
    assert_eq!(config.report_format, ReportFormat::Csv);
    assert!(matches!(config.workloads, WorkloadSource::Synthetic { .. }));
    assert!(!config.report_machines);

    let with_machines = SimulationConfig::from_yaml("report_machines: true\n", "inline").unwrap();
    assert!(with_machines.report_machines);

    let preprocessed = SimulationConfig::from_yaml("workloads:\n  type: preprocessed\n  path: vms.json\n", "inline")
        .unwrap();
    assert_eq!(preprocessed.workloads, WorkloadSource::Preprocessed { path: "vms.json".to_string(), limit: 0 });
}

#[test]
fn test_config_errors() {
    assert!(matches!(SimulationConfig::from_yaml("strategies: [fastest]\n", "inline"),
                     Err(SimulationError::Yaml { .. })));
    assert!(matches!(SimulationConfig::from_file(&name_wrapper("missing.yaml")), Err(SimulationError::Io { .. })));
}
