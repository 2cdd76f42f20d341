//! End-to-end runs over a temporary input directory.

use std::fs;
use std::path::Path;

use scrub_cli::pipeline::{RunOptions, check, run, selected_kinds};
use scrub_core::{ProfileSet, TableKind};
use scrub_report::ExportFormat;
use tempfile::TempDir;

const SERVER_LOGS: &str = "\
log_id,timestamp,severity,environment,response_time_ms,ip_address,user_id,module,message
1,2024-01-15 10:00:00,P1,prod,120,192.168.1.1,USR-001,auth,Login ok
1,2024-01-15 10:00:00,P1,prod,120,192.168.1.1,USR-001,auth,Login ok
2,2024-01-15 11:00:00,P2,stg,20000,INVALID_IP,,payments,Timeout
3,2024-01-16 09:15:00,P4,dev,45,10.0.0.5,USR-002,,Cache miss
";

fn input_dir(contents: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("server_logs.csv"), contents).expect("write input");
    dir
}

fn options(input: &Path, output: &Path) -> RunOptions {
    RunOptions {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        profile: ProfileSet::Logs,
        tables: Vec::new(),
        format: ExportFormat::Both,
        dry_run: false,
        post_check: true,
        rules: None,
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read output")).expect("parse output")
}

#[test]
fn logs_run_writes_tables_and_lineage() {
    let input = input_dir(SERVER_LOGS);
    let output = TempDir::new().expect("output dir");

    let result = run(&options(input.path(), output.path())).expect("run");
    assert_eq!(result.project, "Log File Cleaner & Classifier");
    assert_eq!(result.tables.len(), 1);
    let summary = &result.tables[0];
    assert_eq!(summary.kind, TableKind::ServerLogs);
    assert_eq!(summary.cleaned.original_rows, 4);
    assert_eq!(summary.cleaned.removed_rows(), 1);
    assert_eq!(summary.cleaned.lineage.len(), 8);
    assert_eq!(summary.outputs.len(), 2);
    assert!(summary.quality.is_some());

    let records = read_json(&output.path().join("clean_server_logs.json"));
    assert_eq!(records.as_array().map(Vec::len), Some(3));
    assert_eq!(records[0]["severity"], "Critical");
    assert_eq!(records[0]["environment"], "production");
    assert!(records[1]["response_time_ms"].is_null());
    assert!(records[1]["ip_address"].is_null());
    assert_eq!(records[2]["module"], "unknown-module");

    let csv = fs::read_to_string(output.path().join("clean_server_logs.csv")).expect("csv");
    assert_eq!(csv.lines().count(), 4);

    let lineage_path = result.lineage.as_ref().expect("lineage written");
    let lineage = read_json(lineage_path);
    assert_eq!(lineage["project"], "Log File Cleaner & Classifier");
    assert_eq!(lineage["rules_fingerprint"], result.rules_fingerprint.as_str());
    assert_eq!(lineage["record_counts"]["server_logs"]["removed"], 1);
    let steps: Vec<u64> = lineage["cleaning_steps"]
        .as_array()
        .expect("steps")
        .iter()
        .filter_map(|step| step["step"].as_u64())
        .collect();
    assert_eq!(steps, (1..=8).collect::<Vec<u64>>());

    let quality_path = result.quality_report.as_ref().expect("quality report written");
    assert_eq!(read_json(quality_path)["tables"][0]["table"], "server_logs");
}

#[test]
fn rerun_overwrites_lineage() {
    let input = input_dir(SERVER_LOGS);
    let output = TempDir::new().expect("output dir");
    let opts = options(input.path(), output.path());

    run(&opts).expect("first run");
    let second = run(&opts).expect("second run");
    let lineage = read_json(second.lineage.as_ref().expect("lineage"));
    assert_eq!(lineage["cleaning_steps"].as_array().map(Vec::len), Some(8));
}

#[test]
fn dry_run_writes_nothing() {
    let input = input_dir(SERVER_LOGS);
    let output = TempDir::new().expect("output dir");
    let out_dir = output.path().join("cleaned");
    let mut opts = options(input.path(), &out_dir);
    opts.dry_run = true;

    let result = run(&opts).expect("dry run");
    assert!(result.dry_run);
    assert!(result.lineage.is_none());
    assert!(result.tables[0].outputs.is_empty());
    assert!(!out_dir.exists());
}

#[test]
fn missing_column_fails_before_cleaning() {
    let input = input_dir("log_id,timestamp,severity\n1,2024-01-15 10:00:00,P1\n");
    let output = TempDir::new().expect("output dir");
    let out_dir = output.path().join("cleaned");

    let error = run(&options(input.path(), &out_dir)).expect_err("schema mismatch");
    let message = format!("{error:#}");
    assert!(message.contains("prepare server_logs"), "{message}");
    assert!(message.contains("ip_address"), "{message}");
    assert!(!out_dir.exists());
}

#[test]
fn missing_source_is_reported() {
    let input = TempDir::new().expect("empty input");
    let output = TempDir::new().expect("output dir");
    let mut opts = options(input.path(), output.path());
    opts.profile = ProfileSet::Ecommerce;

    let error = run(&opts).expect_err("no customers file");
    let message = format!("{error:#}");
    assert!(message.contains("read customers"), "{message}");
    assert!(message.contains("source unavailable"), "{message}");
}

#[test]
fn table_filter() {
    let kinds = selected_kinds(ProfileSet::Ecommerce, &["orders".to_string()]).expect("filter");
    assert_eq!(kinds, [TableKind::Orders]);
    assert_eq!(
        selected_kinds(ProfileSet::Ecommerce, &[]).expect("all").len(),
        4
    );
    assert!(selected_kinds(ProfileSet::Logs, &["orders".to_string()]).is_err());
}

#[test]
fn check_reports_raw_quality_without_writing() {
    let input = input_dir(SERVER_LOGS);
    let before = fs::read_to_string(input.path().join("server_logs.csv")).expect("read");

    let result = check(input.path(), ProfileSet::Logs, &[], None).expect("check");
    assert_eq!(result.reports.len(), 1);
    let report = &result.reports[0];
    assert_eq!(report.total_records, 4);
    assert_eq!(report.duplicate_records, 1);
    assert!(report.violations("severity.label") > 0);

    let after = fs::read_to_string(input.path().join("server_logs.csv")).expect("read");
    assert_eq!(before, after);
    assert_eq!(
        fs::read_dir(input.path()).expect("list").count(),
        1,
        "check must not create files"
    );
}
