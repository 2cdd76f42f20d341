use proptest::prelude::*;
use scrub_core::{CleaningPipeline, DedupeStage, NormalizeStage, TableKind, dedupe};
use scrub_model::{Record, Table, Value};
use scrub_rules::RuleRegistry;
use scrub_transform::{FieldRule, NumericRange};

fn table_from(rows: &[(u8, String, f64)]) -> Table {
    Table::from_records(
        "products",
        vec!["product_id".to_string(), "category".to_string(), "rating".to_string()],
        rows.iter()
            .map(|(id, category, rating)| {
                Record::from_pairs([
                    ("product_id", Value::from(f64::from(*id))),
                    ("category", Value::from(category.as_str())),
                    ("rating", Value::from(*rating)),
                ])
            })
            .collect(),
    )
}

fn row() -> impl Strategy<Value = (u8, String, f64)> {
    (
        0u8..6,
        prop_oneof![
            Just("Electronics".to_string()),
            Just("ELECTRONICS".to_string()),
            Just(" books ".to_string()),
            Just("N/A".to_string()),
            "[a-zA-Z ]{0,8}",
        ],
        -10.0f64..10.0,
    )
}

proptest! {
    #[test]
    fn dedupe_leaves_unique_keys(rows in prop::collection::vec(row(), 0..30)) {
        let mut table = table_from(&rows);
        let before = table.len();
        let removed = dedupe(&mut table, &["product_id"]);
        prop_assert_eq!(before - removed, table.len());
        prop_assert_eq!(table.duplicate_count(&["product_id"]), 0);
        prop_assert_eq!(dedupe(&mut table, &["product_id"]), 0);
    }

    #[test]
    fn profile_is_idempotent_and_closed(rows in prop::collection::vec(row(), 0..30)) {
        let registry = RuleRegistry::builtin().expect("builtin rules");
        let category = registry.require("products", "category").expect("category").clone();
        let pipeline = CleaningPipeline::new("products")
            .add_stage(DedupeStage::new(["product_id"]))
            .add_stage(NormalizeStage::new(FieldRule::Categorical(category.clone()), ["category"]))
            .add_stage(NormalizeStage::new(
                FieldRule::Numeric(NumericRange::inclusive(0.0, 5.0)),
                ["rating"],
            ));

        let input = table_from(&rows);
        let original = input.len();
        let once = pipeline.run(input).expect("first run");
        prop_assert!(once.table.len() <= original);
        prop_assert!(once.table.column_values("category").all(|value| category.admits(value)));

        let twice = pipeline.run(once.table.clone()).expect("second run");
        prop_assert_eq!(&twice.table, &once.table);
        prop_assert_eq!(twice.lineage.len(), pipeline.len());
    }
}

#[test]
fn profile_tables_exist_for_every_set() {
    use scrub_core::ProfileSet;
    let all: Vec<TableKind> = [ProfileSet::Logs, ProfileSet::Bugs, ProfileSet::Ecommerce]
        .into_iter()
        .flat_map(|set| set.tables().iter().copied())
        .collect();
    assert_eq!(all, TableKind::ALL);
}
