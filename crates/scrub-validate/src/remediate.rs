use scrub_model::{Table, Value};

use crate::rule::{Check, Remediation, ValidationRule};

/// Apply a rule's remediation to every violating value of its field.
///
/// Returns the number of values changed, or for [`Remediation::Flag`] the
/// number of values flagged. Remediated values no longer violate the rule,
/// so applying the same rule twice changes nothing the second time.
pub fn remediate(rule: &ValidationRule, table: &mut Table) -> usize {
    let mut affected = 0;
    for record in &mut table.records {
        let current = record.get(&rule.field);
        if !rule.is_violation(current) {
            continue;
        }
        let replacement = match rule.remediation {
            Remediation::Flag => {
                affected += 1;
                continue;
            }
            Remediation::NullOut => Value::Null,
            Remediation::Clamp => clamp_value(&rule.check, current),
        };
        if replacement != *current {
            record.set(rule.field.clone(), replacement);
            affected += 1;
        }
    }
    affected
}

fn clamp_value(check: &Check, value: &Value) -> Value {
    match (check, value.to_number()) {
        (Check::InRange(range), Some(number)) => range.clamp(number).map_or(Value::Null, Value::from),
        _ => Value::Null,
    }
}
