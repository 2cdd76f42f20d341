use std::collections::BTreeSet;

use scrub_model::Table;

/// Drop records whose identity key was already seen, keeping the first
/// occurrence in original order.
///
/// The key is the type-tagged tuple of the identity fields, so `Null` is a
/// value of its own and `"1"` differs from `1`. An empty field list keys on
/// the whole record. Returns the number of records removed.
pub fn dedupe<S: AsRef<str>>(table: &mut Table, identity: &[S]) -> usize {
    let before = table.len();
    let mut seen = BTreeSet::new();
    let mut keep = Vec::with_capacity(before);
    for record in &table.records {
        let composite = table.identity_key(record, identity);
        keep.push(seen.insert(composite));
    }
    let mut flags = keep.into_iter();
    table.records.retain(|_| flags.next().unwrap_or(true));
    before - table.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_model::{Record, Value};

    fn people(rows: &[(Value, &str)]) -> Table {
        Table::from_records(
            "people",
            vec!["id".to_string(), "name".to_string()],
            rows.iter()
                .map(|(id, name)| Record::from_pairs([("id", id.clone()), ("name", Value::from(*name))]))
                .collect(),
        )
    }

    #[test]
    fn keeps_first_by_identity() {
        let mut table = people(&[(1.0.into(), "A"), (1.0.into(), "B"), (2.0.into(), "C")]);
        assert_eq!(dedupe(&mut table, &["id"]), 1);
        let names: Vec<_> = table.column_values("name").map(ToString::to_string).collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[test]
    fn empty_identity_removes_exact_copies() {
        let mut table = people(&[(1.0.into(), "A"), (1.0.into(), "B"), (1.0.into(), "A")]);
        assert_eq!(dedupe::<&str>(&mut table, &[]), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn null_is_a_key_and_types_differ() {
        let mut table = people(&[
            (Value::Null, "A"),
            (Value::Null, "B"),
            ("1".into(), "C"),
            (1.0.into(), "D"),
        ]);
        assert_eq!(dedupe(&mut table, &["id"]), 1);
        assert_eq!(table.len(), 3);
    }
}
