use std::ops::ControlFlow;

use scrub_core::{
    CleaningPipeline, CleaningStage, DedupeStage, NormalizeStage, StageOutcome, TableKind,
};
use scrub_model::{Record, ScrubError, Table, TableSource, Value};
use scrub_rules::RuleRegistry;
use scrub_transform::{FieldRule, NumericRange};

fn people() -> Table {
    Table::from_records(
        "people",
        vec!["id".to_string(), "name".to_string()],
        [(1.0, "A"), (1.0, "B"), (2.0, "C")]
            .into_iter()
            .map(|(id, name)| Record::from_pairs([("id", Value::from(id)), ("name", Value::from(name))]))
            .collect(),
    )
}

fn ratings_pipeline() -> CleaningPipeline {
    CleaningPipeline::new("people")
        .add_stage(DedupeStage::new(["id"]))
        .add_stage(NormalizeStage::new(
            FieldRule::Placeholder {
                fallback: "Unknown".to_string(),
            },
            ["name"],
        ))
        .add_stage(
            NormalizeStage::new(FieldRule::Numeric(NumericRange::inclusive(0.0, 5.0)), ["id"])
                .with_name("id_range")
                .after("dedupe"),
        )
}

struct DropAll;

impl CleaningStage for DropAll {
    fn name(&self) -> &str {
        "drop_all"
    }

    fn required_fields(&self) -> Vec<&str> {
        Vec::new()
    }

    fn apply(&self, table: &mut Table) -> StageOutcome {
        let affected = table.len();
        table.records.clear();
        StageOutcome {
            description: "Dropped everything".to_string(),
            details: String::new(),
            reason: String::new(),
            affected,
        }
    }
}

struct Duplicate;

impl CleaningStage for Duplicate {
    fn name(&self) -> &str {
        "duplicate"
    }

    fn required_fields(&self) -> Vec<&str> {
        Vec::new()
    }

    fn removes_rows(&self) -> bool {
        true
    }

    fn apply(&self, table: &mut Table) -> StageOutcome {
        if let Some(first) = table.records.first().cloned() {
            table.push(first);
        }
        StageOutcome {
            description: "Duplicated a row".to_string(),
            details: String::new(),
            reason: String::new(),
            affected: 1,
        }
    }
}

struct Unreadable;

impl TableSource for Unreadable {
    fn source_id(&self) -> &str {
        "unreadable"
    }

    fn read_table(&mut self, table: &str) -> scrub_model::Result<Table> {
        Err(ScrubError::source_unavailable(table, "backing store offline"))
    }
}

#[test]
fn dedupe_keeps_first_per_identity() {
    let pipeline = CleaningPipeline::new("people").add_stage(DedupeStage::new(["id"]));
    let cleaned = pipeline.run(people()).expect("run");

    let names: Vec<_> = cleaned.table.column_values("name").map(ToString::to_string).collect();
    assert_eq!(names, ["A", "C"]);
    assert_eq!(cleaned.removed_rows(), 1);
    assert_eq!(cleaned.lineage.len(), 1);
    assert_eq!(cleaned.lineage.steps()[0].description(), "Removed duplicate rows");
}

#[test]
fn lineage_is_gapless_even_without_changes() {
    let cleaned = ratings_pipeline().run(people()).expect("run");
    let steps: Vec<u32> = cleaned.lineage.iter().map(|record| record.step()).collect();
    assert_eq!(steps, [1, 2, 3]);
    // The placeholder stage touched nothing but still recorded a step.
    assert!(cleaned.lineage.steps()[1].details().contains("0 value(s) changed"));
}

#[test]
fn schema_mismatch_fails_before_any_stage() {
    let pipeline = ratings_pipeline().add_stage(NormalizeStage::new(FieldRule::Email, ["email"]));
    let err = pipeline.start(people()).expect_err("missing email column");
    match err {
        ScrubError::SchemaMismatch { table, missing } => {
            assert_eq!(table, "people");
            assert_eq!(missing, ["email"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn step_by_step_and_early_finalize() {
    let pipeline = ratings_pipeline();
    let mut run = pipeline.start(people()).expect("start");
    assert_eq!(run.next_stage(), Some("dedupe"));

    let record = run.step().expect("step").expect("record");
    assert_eq!(record.step(), 1);
    assert_eq!(run.table().len(), 2);
    assert_eq!(run.remaining(), 2);

    let err = run.finalize().expect_err("stages remain");
    assert!(matches!(err, ScrubError::RunIncomplete { remaining: 2, .. }));
}

#[test]
fn step_after_last_stage_records_nothing() {
    let pipeline = CleaningPipeline::new("people").add_stage(DedupeStage::new(["id"]));
    let mut run = pipeline.start(people()).expect("start");
    assert!(run.step().expect("step").is_some());
    assert!(run.step().expect("step").is_none());
    assert!(run.is_complete());
    assert_eq!(run.log().len(), 1);
    assert!(run.finalize().is_ok());
}

#[test]
fn order_validation() {
    let duplicate = CleaningPipeline::new("people")
        .add_stage(DedupeStage::new(["id"]))
        .add_stage(DedupeStage::new(["name"]));
    assert!(matches!(
        duplicate.validate_order(),
        Err(ScrubError::DuplicateStage(name)) if name == "dedupe"
    ));

    let misordered = CleaningPipeline::new("people")
        .add_stage(
            NormalizeStage::new(FieldRule::Email, ["name"]).after("dedupe"),
        )
        .add_stage(DedupeStage::new(["id"]));
    assert!(matches!(
        misordered.validate_order(),
        Err(ScrubError::StageOrder { stage, dependency }) if stage == "name" && dependency == "dedupe"
    ));

    assert!(ratings_pipeline().validate_order().is_ok());
}

#[test]
fn undeclared_row_removal_is_an_error() {
    let pipeline = CleaningPipeline::new("people").add_stage(DropAll);
    let err = pipeline.run(people()).expect_err("rows removed");
    assert!(matches!(err, ScrubError::RowsRemoved { removed: 3, .. }));
}

#[test]
fn row_count_may_never_grow() {
    let pipeline = CleaningPipeline::new("people").add_stage(Duplicate);
    let err = pipeline.run(people()).expect_err("row added");
    assert!(matches!(
        err,
        ScrubError::RowCountIncreased {
            before: 3,
            after: 4,
            ..
        }
    ));
}

#[test]
fn checkpoint_can_stop_the_run() {
    let mut seen = Vec::new();
    let err = ratings_pipeline()
        .run_with_checkpoint(people(), |record, table| {
            seen.push((record.step(), table.len()));
            if record.step() == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .expect_err("stopped early");
    assert_eq!(seen, [(1, 2), (2, 2)]);
    assert!(matches!(err, ScrubError::RunIncomplete { remaining: 1, .. }));
}

#[test]
fn unavailable_source_fails_before_stages() {
    let mut source = Unreadable;
    let err = ratings_pipeline()
        .run_source(&mut source, "people")
        .expect_err("source offline");
    assert!(matches!(err, ScrubError::SourceUnavailable { .. }));
}

fn raw_customers() -> Table {
    let columns = [
        "customer_id",
        "name",
        "email",
        "phone",
        "city",
        "state",
        "country",
        "signup_date",
        "age",
        "membership",
    ];
    let rows: [[Value; 10]; 4] = [
        [
            1.0.into(),
            "JOHN SMITH".into(),
            "JOHN@Email.COM".into(),
            "(555) 123-4567".into(),
            "NY".into(),
            "New York".into(),
            "United States".into(),
            "01/15/2024".into(),
            34.0.into(),
            "gold".into(),
        ],
        [
            1.0.into(),
            "john smith".into(),
            "john@email.com".into(),
            "555-123-4567".into(),
            "New York".into(),
            "NY".into(),
            "USA".into(),
            "2024-01-15".into(),
            34.0.into(),
            "Gold".into(),
        ],
        [
            2.0.into(),
            " jane doe ".into(),
            "jane@@test.com".into(),
            "123".into(),
            "LA".into(),
            "calif".into(),
            "US".into(),
            "not a date".into(),
            150.0.into(),
            "N/A".into(),
        ],
        [
            3.0.into(),
            Value::Null,
            "john@email".into(),
            Value::Null,
            "Springfield".into(),
            Value::Null,
            "USA".into(),
            Value::Null,
            "-5".into(),
            "Silver".into(),
        ],
    ];
    Table::from_records(
        "customers",
        columns.iter().map(ToString::to_string).collect(),
        rows.into_iter()
            .map(|row| Record::from_pairs(columns.into_iter().zip(row)))
            .collect(),
    )
}

#[test]
fn customers_profile_cleans_and_verifies() {
    let registry = RuleRegistry::builtin().expect("builtin rules");
    let profile = TableKind::Customers.profile(&registry).expect("profile");
    assert_eq!(
        profile.pipeline.stage_names(),
        [
            "dedupe",
            "name",
            "email",
            "phone",
            "country",
            "city",
            "state",
            "membership",
            "signup_date",
            "age"
        ]
    );

    let before = profile.validator.validate(&raw_customers());
    assert_eq!(before.duplicate_records, 1);
    assert!(before.has_errors());

    let cleaned = profile.pipeline.run(raw_customers()).expect("run");
    let table = &cleaned.table;
    assert_eq!(table.len(), 3);
    assert_eq!(cleaned.lineage.len(), 10);

    let first = &table.records[0];
    assert_eq!(first.get("name"), &Value::from("John Smith"));
    assert_eq!(first.get("email"), &Value::from("john@email.com"));
    assert_eq!(first.get("phone"), &Value::from("555-123-4567"));
    assert_eq!(first.get("country"), &Value::from("USA"));
    assert_eq!(first.get("city"), &Value::from("New York"));
    assert_eq!(first.get("state"), &Value::from("NY"));
    assert_eq!(first.get("membership"), &Value::from("Gold"));
    assert!(first.get("signup_date").as_timestamp().is_some());

    let jane = &table.records[1];
    assert_eq!(jane.get("name"), &Value::from("Jane Doe"));
    assert!(jane.get("email").is_null());
    assert!(jane.get("phone").is_null());
    assert_eq!(jane.get("state"), &Value::from("CA"));
    assert!(jane.get("signup_date").is_null());
    assert!(jane.get("age").is_null());
    assert_eq!(jane.get("membership"), &Value::from("Unknown"));

    let third = &table.records[2];
    assert_eq!(third.get("name"), &Value::from("Unknown"));
    assert_eq!(third.get("city"), &Value::from("Unknown"));
    assert!(third.get("email").is_null());
    assert!(third.get("age").is_null());

    let after = profile.validator.validate(table);
    assert_eq!(after.duplicate_records, 0);
    assert!(!after.has_errors(), "{:?}", after.issues);
}

#[test]
fn rerunning_a_profile_changes_nothing() {
    let registry = RuleRegistry::builtin().expect("builtin rules");
    let profile = TableKind::Customers.profile(&registry).expect("profile");
    let once = profile.pipeline.run(raw_customers()).expect("first run");
    let twice = profile.pipeline.run(once.table.clone()).expect("second run");
    assert_eq!(twice.table, once.table);
    assert_eq!(twice.removed_rows(), 0);
}

#[test]
fn orders_total_depends_on_cleaned_inputs() {
    let registry = RuleRegistry::builtin().expect("builtin rules");
    let profile = TableKind::Orders.profile(&registry).expect("profile");
    let columns = [
        "order_id",
        "customer_id",
        "product_id",
        "order_date",
        "quantity",
        "unit_price",
        "total_amount",
        "status",
        "payment_method",
        "shipping_address",
    ];
    let rows: [[Value; 10]; 2] = [
        [
            10.0.into(),
            1.0.into(),
            5.0.into(),
            "2024-03-01".into(),
            2.0.into(),
            "9.99".into(),
            999.0.into(),
            "canceled".into(),
            "CC".into(),
            "".into(),
        ],
        [
            11.0.into(),
            2.0.into(),
            6.0.into(),
            "03/02/2024".into(),
            (-1.0).into(),
            5.0.into(),
            (-5.0).into(),
            "lost".into(),
            "gift card".into(),
            "1 Main St".into(),
        ],
    ];
    let table = Table::from_records(
        "orders",
        columns.iter().map(ToString::to_string).collect(),
        rows.into_iter()
            .map(|row| Record::from_pairs(columns.into_iter().zip(row)))
            .collect(),
    );

    let cleaned = profile.pipeline.run(table).expect("run");
    let first = &cleaned.table.records[0];
    assert_eq!(first.get("total_amount"), &Value::from(19.98));
    assert_eq!(first.get("status"), &Value::from("Cancelled"));
    assert_eq!(first.get("payment_method"), &Value::from("Credit Card"));
    assert_eq!(first.get("shipping_address"), &Value::from("Unknown"));

    let second = &cleaned.table.records[1];
    assert!(second.get("quantity").is_null());
    assert!(second.get("total_amount").is_null());
    assert_eq!(second.get("status"), &Value::from("Unknown"));
    assert!(second.get("payment_method").is_null());
}

#[test]
fn every_profile_builds_from_builtin_rules() {
    let registry = RuleRegistry::builtin().expect("builtin rules");
    for kind in TableKind::ALL {
        let profile = kind.profile(&registry).expect("profile");
        assert_eq!(profile.pipeline.name(), kind.name());
        assert!(profile.pipeline.validate_order().is_ok(), "{kind}");
        assert_eq!(TableKind::from_name(kind.name()), Some(kind));
    }
}

/// Two rows per column: the same entity spelled two raw ways.
fn variant_rows(name: &str, cells: &[(&str, Value, Value)]) -> Table {
    let columns = cells.iter().map(|(field, _, _)| (*field).to_string()).collect();
    let first = Record::from_pairs(cells.iter().map(|(field, a, _)| (*field, a.clone())));
    let second = Record::from_pairs(cells.iter().map(|(field, _, b)| (*field, b.clone())));
    Table::from_records(name, columns, vec![first, second])
}

fn same(field: &str, value: impl Into<Value>) -> (&str, Value, Value) {
    let value = value.into();
    (field, value.clone(), value)
}

fn raw_variants(kind: TableKind) -> Table {
    let text = |a: &str, b: &str| (Value::from(a), Value::from(b));
    let cells: Vec<(&str, Value, Value)> = match kind {
        TableKind::ServerLogs => {
            let (severity_a, severity_b) = text("P1", "CRITICAL");
            let (env_a, env_b) = text("prod", "Production");
            let (user_a, user_b) = (Value::from(1042.0), Value::from("usr_1042"));
            let (time_a, time_b) = text("2024-01-15 10:00:00", "2024-01-15T10:00:00");
            vec![
                same("log_id", 7.0),
                ("timestamp", time_a, time_b),
                ("severity", severity_a, severity_b),
                ("environment", env_a, env_b),
                ("response_time_ms", Value::from("120"), Value::from(120.0)),
                same("ip_address", "10.0.0.5"),
                ("user_id", user_a, user_b),
                ("module", Value::from("N/A"), Value::Null),
                same("message", "Login ok"),
            ]
        }
        TableKind::BugReports => vec![
            ("ticket_id", Value::from("JIRA-1"), Value::from("JIRA-2")),
            same("title", "App crashes on login"),
            same("source", "jira"),
            ("priority", Value::from("P0"), Value::from("Blocker")),
            ("status", Value::from("Fixed"), Value::from("done")),
            same("component", "Auth"),
            same("environment", "Production"),
            same("sdlc_phase", "Testing"),
            ("created_date", Value::from("2024-01-10"), Value::from("01/10/2024")),
            same("resolved_date", "2024-01-12"),
            ("time_spent_minutes", Value::from("2h"), Value::from(120.0)),
            ("reporter", Value::from("UNKNOWN"), Value::from("")),
            same("assignee", "Ana"),
            ("browser", Value::from("chrome"), Value::from("Chrome")),
            ("os", Value::from("win10"), Value::from("Windows 10")),
        ],
        TableKind::Customers => vec![
            ("customer_id", Value::from(1.0), Value::from(2.0)),
            ("name", Value::from("  JOHN SMITH "), Value::from("John Smith")),
            ("email", Value::from("John@Email.com"), Value::from("john@email.com")),
            ("phone", Value::from("(555) 123-4567"), Value::from("555.123.4567")),
            ("country", Value::from("usa"), Value::from("USA")),
            same("city", "New York"),
            same("state", "NY"),
            ("membership", Value::from("gold"), Value::from("Gold")),
            ("signup_date", Value::from("2023-05-01"), Value::from("05/01/2023")),
            ("age", Value::from("34"), Value::from(34.0)),
        ],
        TableKind::Orders => vec![
            ("order_id", Value::from(10.0), Value::from(11.0)),
            same("customer_id", 1.0),
            same("product_id", 5.0),
            ("order_date", Value::from("2024-03-01"), Value::from("03/01/2024")),
            ("quantity", Value::from("2"), Value::from(2.0)),
            ("unit_price", Value::from("9.99"), Value::from(9.99)),
            ("total_amount", Value::from(999.0), Value::Null),
            ("status", Value::from("canceled"), Value::from("Cancelled")),
            ("payment_method", Value::from("CC"), Value::from("credit card")),
            ("shipping_address", Value::from(""), Value::from("N/A")),
        ],
        TableKind::Products => vec![
            ("product_id", Value::from(100.0), Value::from(101.0)),
            ("product_name", Value::from("Lamp"), Value::from("Lamp")),
            ("category", Value::from("ELECTRONICS"), Value::from(" electronics ")),
            ("price", Value::from("19.5"), Value::from(19.5)),
            ("stock_quantity", Value::from("-3"), Value::from(-3.0)),
            ("supplier", Value::from("techcorp"), Value::from("TechCorp")),
            ("rating", Value::from("4.5"), Value::from(7.0)),
            ("created_date", Value::from("2024-02-01"), Value::from("02/01/2024")),
        ],
        TableKind::SupportTickets => vec![
            ("ticket_id", Value::from(1.0), Value::from(2.0)),
            ("issue_type", Value::from("DELIVERY"), Value::from("delivery issue")),
            ("priority", Value::from("P1"), Value::from("high")),
            ("status", Value::from("IN_PROGRESS"), Value::from("in progress")),
            ("created_date", Value::from("2024-04-01"), Value::from("04/01/2024")),
            ("resolved_date", Value::Null, Value::from("not a date")),
            ("agent", Value::from(""), Value::from("agent_smith")),
        ],
    };
    variant_rows(kind.name(), &cells)
}

#[test]
fn every_profile_is_idempotent_on_its_own_output() {
    let registry = RuleRegistry::builtin().expect("builtin rules");
    for kind in TableKind::ALL {
        let profile = kind.profile(&registry).expect("profile");
        let once = profile.pipeline.run(raw_variants(kind)).expect("first run");
        let twice = profile.pipeline.run(once.table.clone()).expect("second run");
        assert_eq!(twice.table, once.table, "{kind}");
        assert_eq!(twice.removed_rows(), 0, "{kind}");
    }
}

#[test]
fn log_variants_collapse_in_one_run() {
    let registry = RuleRegistry::builtin().expect("builtin rules");
    let profile = TableKind::ServerLogs.profile(&registry).expect("profile");
    assert_eq!(profile.pipeline.stage_names().last(), Some(&"dedupe"));

    let cleaned = profile.pipeline.run(raw_variants(TableKind::ServerLogs)).expect("run");
    assert_eq!(cleaned.removed_rows(), 1);
    let kept = &cleaned.table.records[0];
    assert_eq!(kept.get("severity"), &Value::from("Critical"));
    assert_eq!(kept.get("user_id"), &Value::from("USR-1042"));
    assert_eq!(kept.get("module"), &Value::from("unknown-module"));
}
