//! Customers, orders, products and support tickets.

use scrub_model::Severity;
use scrub_rules::{RuleRegistry, RulesError};
use scrub_transform::{Derivation, FieldRule, NumericRange};
use scrub_validate::{Check, ValidationRule, Validator};

use super::categorical;
use crate::pipeline::CleaningPipeline;
use crate::stage::{DedupeStage, DeriveStage, NormalizeStage};

type Profile = Result<(CleaningPipeline, Validator), RulesError>;

fn unknown() -> FieldRule {
    FieldRule::Placeholder {
        fallback: "Unknown".to_string(),
    }
}

fn keyed(table: &str, key: &str) -> (CleaningPipeline, Validator) {
    let pipeline = CleaningPipeline::new(table).add_stage(
        DedupeStage::new([key])
            .with_reason(format!("Repeated {key} values describe the same entity; the first is kept.")),
    );
    let validator = Validator::new()
        .with_identity([key])
        .with_rule(ValidationRule::new(key, Check::NotMissing));
    (pipeline, validator)
}

pub(super) fn customers(registry: &RuleRegistry) -> Profile {
    const TABLE: &str = "customers";
    let age = NumericRange::inclusive(0.0, 120.0);
    let (mut pipeline, mut validator) = keyed(TABLE, "customer_id");

    pipeline = pipeline
        .add_stage(
            NormalizeStage::new(
                FieldRule::PersonName {
                    fallback: "Unknown".to_string(),
                },
                ["name"],
            )
            .with_reason("Upper-case and padded names split one customer into several spellings."),
        )
        .add_stage(
            NormalizeStage::new(FieldRule::Email, ["email"])
                .with_reason("Emails are case-insensitive; malformed addresses cannot be contacted."),
        )
        .add_stage(
            NormalizeStage::new(FieldRule::Phone, ["phone"])
                .with_reason("Phone numbers arrive with mixed punctuation."),
        );
    for field in ["country", "city", "state", "membership"] {
        let (stage, check) = categorical(registry, TABLE, field)?;
        pipeline = pipeline.add_stage(stage);
        validator = validator.with_rule(check);
    }
    pipeline = pipeline
        .add_stage(
            NormalizeStage::new(FieldRule::Timestamp, ["signup_date"])
                .with_reason("Signup dates use several formats."),
        )
        .add_stage(
            NormalizeStage::new(FieldRule::Numeric(age), ["age"])
                .with_reason("Negative ages and ages above 120 are entry errors."),
        );

    validator = validator
        .with_rule(ValidationRule::new("email", Check::EmailFormat))
        .with_rule(ValidationRule::new("signup_date", Check::Timestamp).with_severity(Severity::Warning))
        .with_rule(ValidationRule::new("age", Check::InRange(age)));
    Ok((pipeline, validator))
}

pub(super) fn orders(registry: &RuleRegistry) -> Profile {
    const TABLE: &str = "orders";
    let (mut pipeline, mut validator) = keyed(TABLE, "order_id");
    pipeline = pipeline
        .add_stage(
            NormalizeStage::new(FieldRule::Timestamp, ["order_date"])
                .with_reason("Order dates use several formats."),
        )
        .add_stage(
            NormalizeStage::new(FieldRule::Numeric(NumericRange::positive()), ["quantity"])
                .with_reason("Zero and negative quantities are not real orders."),
        )
        .add_stage(
            NormalizeStage::new(FieldRule::Numeric(NumericRange::positive()), ["unit_price"])
                .with_reason("Zero and negative prices are entry errors."),
        )
        .add_stage(
            DeriveStage::new(Derivation::Product {
                target: "total_amount".to_string(),
                inputs: vec!["quantity".to_string(), "unit_price".to_string()],
                decimals: 2,
            })
            .after("quantity")
            .after("unit_price")
            .with_reason("Stored totals disagree with quantity x unit_price."),
        );
    for field in ["status", "payment_method"] {
        let (stage, check) = categorical(registry, TABLE, field)?;
        pipeline = pipeline.add_stage(stage);
        validator = validator.with_rule(check);
    }
    pipeline = pipeline.add_stage(
        NormalizeStage::new(unknown(), ["shipping_address"])
            .with_reason("Blank addresses are marked rather than dropped."),
    );

    validator = validator
        .with_rule(ValidationRule::new("order_date", Check::Timestamp).with_severity(Severity::Warning))
        .with_rule(ValidationRule::new("quantity", Check::InRange(NumericRange::positive())))
        .with_rule(ValidationRule::new("unit_price", Check::InRange(NumericRange::positive())));
    Ok((pipeline, validator))
}

pub(super) fn products(registry: &RuleRegistry) -> Profile {
    const TABLE: &str = "products";
    let rating = NumericRange::inclusive(0.0, 5.0);
    let (mut pipeline, mut validator) = keyed(TABLE, "product_id");
    pipeline = pipeline.add_stage(
        NormalizeStage::new(unknown(), ["product_name"])
            .with_reason("Blank product names are marked rather than dropped."),
    );
    let (category, category_check) = categorical(registry, TABLE, "category")?;
    pipeline = pipeline
        .add_stage(category.with_reason("ELECTRONICS, electronics and Electronics are one category."))
        .add_stage(
            NormalizeStage::new(FieldRule::Numeric(NumericRange::positive()), ["price"])
                .with_reason("Zero and negative prices are entry errors."),
        )
        .add_stage(
            NormalizeStage::new(FieldRule::Numeric(NumericRange::non_negative()), ["stock_quantity"])
                .with_reason("Negative stock is impossible."),
        );
    let (supplier, supplier_check) = categorical(registry, TABLE, "supplier")?;
    pipeline = pipeline
        .add_stage(supplier)
        .add_stage(
            NormalizeStage::new(FieldRule::Numeric(rating), ["rating"])
                .with_reason("Ratings are on a 0-5 scale; anything else is invalid."),
        )
        .add_stage(
            NormalizeStage::new(FieldRule::Timestamp, ["created_date"])
                .with_reason("Creation dates use several formats."),
        );

    validator = validator
        .with_rule(category_check)
        .with_rule(supplier_check)
        .with_rule(ValidationRule::new("price", Check::InRange(NumericRange::positive())))
        .with_rule(ValidationRule::new("rating", Check::InRange(rating)));
    Ok((pipeline, validator))
}

pub(super) fn support_tickets(registry: &RuleRegistry) -> Profile {
    const TABLE: &str = "support_tickets";
    let (mut pipeline, mut validator) = keyed(TABLE, "ticket_id");
    for field in ["issue_type", "priority", "status"] {
        let (stage, check) = categorical(registry, TABLE, field)?;
        pipeline = pipeline.add_stage(stage);
        validator = validator.with_rule(check);
    }
    pipeline = pipeline
        .add_stage(
            NormalizeStage::new(FieldRule::Timestamp, ["created_date", "resolved_date"])
                .with_name("dates")
                .with_reason("Ticket dates use several formats."),
        )
        .add_stage(
            DeriveStage::new(Derivation::DayDifference {
                target: "resolution_days".to_string(),
                start: "created_date".to_string(),
                end: "resolved_date".to_string(),
            })
            .after("dates")
            .with_reason("Resolution time is only meaningful between two valid dates."),
        );
    let (agent, agent_check) = categorical(registry, TABLE, "agent")?;
    pipeline = pipeline.add_stage(agent.with_reason("Tickets without an agent are marked Unassigned."));

    validator = validator
        .with_rule(agent_check)
        .with_rule(ValidationRule::new("created_date", Check::Timestamp).with_severity(Severity::Warning));
    Ok((pipeline, validator))
}
