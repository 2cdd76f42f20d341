use scrub_model::Severity;
use scrub_rules::{RuleRegistry, RulesError};
use scrub_transform::{Derivation, FieldRule, NumericRange};
use scrub_validate::{Check, ValidationRule, Validator};

use super::categorical;
use crate::pipeline::CleaningPipeline;
use crate::stage::{DedupeStage, DeriveStage, NormalizeStage};

const TABLE: &str = "bug_reports";

/// Same ticket exported twice by the same tracker.
const IDENTITY: [&str; 3] = ["ticket_id", "title", "source"];

pub(super) fn bug_reports(
    registry: &RuleRegistry,
) -> Result<(CleaningPipeline, Validator), RulesError> {
    let mut pipeline = CleaningPipeline::new(TABLE).add_stage(
        DedupeStage::new(IDENTITY).with_reason(
            "The same ticket exported twice would be counted twice in every breakdown.",
        ),
    );
    let mut validator = Validator::new()
        .with_identity(IDENTITY)
        .with_rule(ValidationRule::new("ticket_id", Check::NotMissing));

    let reasons = [
        ("priority", "Many priority spellings (P0, Blocker, Hi, ...) collapse to four levels."),
        ("status", "Tracker-specific states are merged into one workflow."),
        ("component", "Module names differ between trackers."),
        ("environment", "Environment names differ between trackers."),
        ("sdlc_phase", "Phase abbreviations are expanded for phase analysis."),
    ];
    for (field, reason) in reasons {
        let (stage, check) = categorical(registry, TABLE, field)?;
        pipeline = pipeline.add_stage(stage.with_reason(reason));
        validator = validator.with_rule(check);
    }

    pipeline = pipeline
        .add_stage(
            NormalizeStage::new(FieldRule::Timestamp, ["created_date", "resolved_date"])
                .with_name("dates")
                .with_reason("Multiple date formats are unified for time-series analysis."),
        )
        .add_stage(
            NormalizeStage::new(FieldRule::DurationMinutes, ["time_spent_minutes"]).with_reason(
                "Text durations are converted to minutes; zero and negative values are \
                 logging errors.",
            ),
        )
        .add_stage(
            NormalizeStage::new(
                FieldRule::Placeholder {
                    fallback: "Unknown".to_string(),
                },
                ["reporter", "assignee"],
            )
            .with_name("people")
            .with_reason("UNKNOWN, empty strings and None all mean nobody."),
        );

    for field in ["browser", "os"] {
        let (stage, check) = categorical(registry, TABLE, field)?;
        pipeline = pipeline.add_stage(stage.with_reason(
            "Inconsistent casing and abbreviations prevent accurate platform analysis.",
        ));
        validator = validator.with_rule(check);
    }

    pipeline = pipeline
        .add_stage(
            DeriveStage::new(Derivation::DayDifference {
                target: "resolution_days".to_string(),
                start: "created_date".to_string(),
                end: "resolved_date".to_string(),
            })
            .after("dates")
            .with_reason("Resolution time is only meaningful between two valid dates."),
        )
        .add_stage(
            DeriveStage::new(Derivation::BugType {
                target: "bug_type".to_string(),
                source: "title".to_string(),
            })
            .with_reason("Bug type classification separates crash, UI and performance issues."),
        );

    validator = validator
        .with_rule(ValidationRule::new("created_date", Check::Timestamp))
        .with_rule(
            ValidationRule::new("time_spent_minutes", Check::InRange(NumericRange::positive()))
                .with_severity(Severity::Warning),
        );

    Ok((pipeline, validator))
}
