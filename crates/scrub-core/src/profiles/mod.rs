//! Predefined cleaning profiles for the known table kinds.
//!
//! A profile pairs the cleaning pipeline of one table kind with the
//! validator used for its diagnostic and post-clean reports. Categorical
//! stages take their rule tables from a [`RuleRegistry`], so a missing
//! table in a custom rule set surfaces as a [`RulesError`] when the profile
//! is built, before any data is read.

mod bugs;
mod ecommerce;
mod logs;

use std::fmt;

use scrub_model::Severity;
use scrub_rules::{RuleRegistry, RulesError};
use scrub_transform::FieldRule;
use scrub_validate::{Check, ValidationRule, Validator};

use crate::pipeline::CleaningPipeline;
use crate::stage::NormalizeStage;

/// The table kinds with a predefined profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableKind {
    ServerLogs,
    BugReports,
    Customers,
    Orders,
    Products,
    SupportTickets,
}

impl TableKind {
    pub const ALL: [TableKind; 6] = [
        TableKind::ServerLogs,
        TableKind::BugReports,
        TableKind::Customers,
        TableKind::Orders,
        TableKind::Products,
        TableKind::SupportTickets,
    ];

    /// Table name as used in sources, rule sets and exports.
    pub fn name(self) -> &'static str {
        match self {
            TableKind::ServerLogs => "server_logs",
            TableKind::BugReports => "bug_reports",
            TableKind::Customers => "customers",
            TableKind::Orders => "orders",
            TableKind::Products => "products",
            TableKind::SupportTickets => "support_tickets",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Build the pipeline and validator for this table kind.
    pub fn profile(self, registry: &RuleRegistry) -> Result<TableProfile, RulesError> {
        let (pipeline, validator) = match self {
            TableKind::ServerLogs => logs::server_logs(registry)?,
            TableKind::BugReports => bugs::bug_reports(registry)?,
            TableKind::Customers => ecommerce::customers(registry)?,
            TableKind::Orders => ecommerce::orders(registry)?,
            TableKind::Products => ecommerce::products(registry)?,
            TableKind::SupportTickets => ecommerce::support_tickets(registry)?,
        };
        Ok(TableProfile {
            kind: self,
            pipeline,
            validator,
        })
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Groups of tables that are cleaned together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSet {
    Logs,
    Bugs,
    Ecommerce,
}

impl ProfileSet {
    pub fn tables(self) -> &'static [TableKind] {
        match self {
            ProfileSet::Logs => &[TableKind::ServerLogs],
            ProfileSet::Bugs => &[TableKind::BugReports],
            ProfileSet::Ecommerce => &[
                TableKind::Customers,
                TableKind::Orders,
                TableKind::Products,
                TableKind::SupportTickets,
            ],
        }
    }

    /// Project title written into lineage documents.
    pub fn project(self) -> &'static str {
        match self {
            ProfileSet::Logs => "Log File Cleaner & Classifier",
            ProfileSet::Bugs => "Bug Report ETL Pipeline",
            ProfileSet::Ecommerce => "E-commerce Data Cleaning",
        }
    }
}

/// Pipeline and validator for one table kind.
#[derive(Debug)]
pub struct TableProfile {
    pub kind: TableKind,
    pub pipeline: CleaningPipeline,
    pub validator: Validator,
}

/// Categorical stage and its canonical-label check for `table.field`.
fn categorical(
    registry: &RuleRegistry,
    table: &str,
    field: &str,
) -> Result<(NormalizeStage, ValidationRule), RulesError> {
    let rules = registry.require(table, field)?.clone();
    let check = ValidationRule::new(field, Check::CanonicalLabel(rules.clone()))
        .with_severity(Severity::Warning);
    Ok((NormalizeStage::new(FieldRule::Categorical(rules), [field]), check))
}
