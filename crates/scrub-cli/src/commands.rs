use anyhow::Result;
use comfy_table::Table;

use scrub_cli::pipeline::{RunOptions, check, load_rules, run};
use scrub_cli::types::{CheckResult, RunResult};
use scrub_rules::Fallback;

use crate::cli::{CheckArgs, RulesArgs, RunArgs};
use crate::summary::apply_table_style;

pub fn run_clean(args: &RunArgs) -> Result<RunResult> {
    let source = &args.source;
    let options = RunOptions {
        input_dir: source.input_dir.clone(),
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| source.input_dir.join("cleaned_data")),
        profile: source.profile.into(),
        tables: source.tables.clone(),
        format: args.format.into(),
        dry_run: args.dry_run,
        post_check: !args.no_post_check,
        rules: source.rules.clone(),
    };
    run(&options)
}

pub fn run_check(args: &CheckArgs) -> Result<CheckResult> {
    let source = &args.source;
    check(
        &source.input_dir,
        source.profile.into(),
        &source.tables,
        source.rules.as_deref(),
    )
}

pub fn run_rules(args: &RulesArgs) -> Result<()> {
    let registry = load_rules(args.rules.as_deref())?;
    println!("Rule set: {} ({})", registry.name(), registry.origin());
    println!("Fingerprint: {}", registry.fingerprint());

    let mut table = Table::new();
    table.set_header(vec!["Table", "Field", "Labels", "Variants", "Fallback"]);
    apply_table_style(&mut table);
    for rules in registry.tables() {
        let fallback = match rules.fallback() {
            Fallback::Label(label) => label.clone(),
            Fallback::Null => "(null)".to_string(),
        };
        table.add_row(vec![
            rules.table().to_string(),
            rules.field().to_string(),
            rules.canonical_labels().join(", "),
            rules.variant_count().to_string(),
            fallback,
        ]);
    }
    println!("{table}");
    Ok(())
}
