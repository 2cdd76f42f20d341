use scrub_model::Severity;
use scrub_rules::{RuleRegistry, RulesError};
use scrub_transform::{FieldRule, IdentifierFormat, NumericRange};
use scrub_validate::{Check, ValidationRule, Validator};

use super::categorical;
use crate::pipeline::CleaningPipeline;
use crate::stage::{DedupeStage, NormalizeStage};

const TABLE: &str = "server_logs";

/// Valid response times in milliseconds; beyond 10s is a timeout.
const RESPONSE_TIME_MS: (f64, f64) = (1.0, 10_000.0);

/// Entries are compared whole, so every normalized field is settled before
/// dedupe; raw variants of one entry must collapse in a single run.
const NORMALIZED: [&str; 7] = [
    "severity",
    "environment",
    "timestamp",
    "response_time_ms",
    "ip_address",
    "user_id",
    "module",
];

pub(super) fn server_logs(
    registry: &RuleRegistry,
) -> Result<(CleaningPipeline, Validator), RulesError> {
    let (severity, severity_check) = categorical(registry, TABLE, "severity")?;
    let (environment, environment_check) = categorical(registry, TABLE, "environment")?;
    let response_range = NumericRange::inclusive(RESPONSE_TIME_MS.0, RESPONSE_TIME_MS.1);
    let user_ids = IdentifierFormat::new("USR");

    let pipeline = CleaningPipeline::new(TABLE)
        .add_stage(severity.with_reason(
            "P1, CRITICAL and Critical mean the same thing; inconsistent labels prevent \
             priority analysis.",
        ))
        .add_stage(environment.with_reason(
            "Environment filtering isolates production issues from dev and staging.",
        ))
        .add_stage(
            NormalizeStage::new(FieldRule::Timestamp, ["timestamp"])
                .with_reason("Mixed timestamp formats prevent sorting and trend detection."),
        )
        .add_stage(
            NormalizeStage::new(FieldRule::Numeric(response_range), ["response_time_ms"])
                .with_reason(
                    "Negative and zero values are logging errors; values above 10000ms are \
                     timeouts, not response times.",
                ),
        )
        .add_stage(NormalizeStage::new(FieldRule::Ipv4, ["ip_address"]).with_reason(
            "INVALID_IP is a placeholder and 0.0.0.0 is non-routable; both would corrupt \
             network analysis.",
        ))
        .add_stage(
            NormalizeStage::new(FieldRule::Identifier(user_ids.clone()), ["user_id"])
                .with_reason("Mixed id formats prevent user-level analysis."),
        )
        .add_stage(
            NormalizeStage::new(
                FieldRule::Placeholder {
                    fallback: "unknown-module".to_string(),
                },
                ["module"],
            )
            .with_reason("Filling keeps timing and error data that dropping rows would lose."),
        )
        .add_stage(NORMALIZED.into_iter().fold(
            DedupeStage::new(Vec::<String>::new()).with_reason(
                "Duplicate log entries inflate error counts and skew statistical analysis; \
                 the first occurrence is kept.",
            ),
            DedupeStage::after,
        ));

    let validator = Validator::new()
        .with_rule(severity_check)
        .with_rule(environment_check)
        .with_rule(ValidationRule::new("timestamp", Check::Timestamp))
        .with_rule(ValidationRule::new(
            "response_time_ms",
            Check::InRange(response_range),
        ))
        .with_rule(ValidationRule::new("ip_address", Check::Ipv4).with_severity(Severity::Warning))
        .with_rule(ValidationRule::new(
            "user_id",
            Check::IdentifierFormat(user_ids),
        ));

    Ok((pipeline, validator))
}
