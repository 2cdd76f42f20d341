//! Source mappings for the bug tracker exports.

use crate::unify::SourceMapping;

/// Unified bug report schema.
pub const BUG_REPORT_COLUMNS: &[&str] = &[
    "source",
    "ticket_id",
    "title",
    "description",
    "priority",
    "status",
    "component",
    "reporter",
    "assignee",
    "environment",
    "sdlc_phase",
    "created_date",
    "resolved_date",
    "time_spent_minutes",
    "browser",
    "os",
];

/// Priority from GitHub labels.
const LABEL_PRIORITY: &[(&str, &[&str])] = &[
    ("Critical", &["critical"]),
    ("High", &["high"]),
    ("Low", &["low"]),
    ("Medium", &["bug"]),
];

/// Component from GitHub issue titles.
const TITLE_COMPONENT: &[(&str, &[&str])] = &[
    ("Authentication", &["login", "auth"]),
    ("Payment", &["payment"]),
    ("Dashboard", &["dashboard", "ui", "button"]),
    ("API", &["api", "backend"]),
    ("Database", &["database", "db"]),
    ("Notifications", &["email", "notification"]),
    ("Security", &["security", "xss"]),
    ("Performance", &["performance", "slow", "timeout"]),
];

/// JIRA CSV export, GitHub issues JSON and the manual tracker sheet.
pub fn bug_tracker_mappings() -> Vec<SourceMapping> {
    let jira = [
        "ticket_id",
        "title",
        "description",
        "priority",
        "status",
        "component",
        "reporter",
        "assignee",
        "environment",
        "sdlc_phase",
        "created_date",
        "resolved_date",
        "time_spent_minutes",
        "browser",
        "os",
    ]
    .into_iter()
    .fold(
        SourceMapping::new("jira", "jira_bugs_export").constant("source", "JIRA"),
        SourceMapping::same,
    );

    let github = SourceMapping::new("github", "github_issues")
        .constant("source", "GitHub")
        .prefixed("ticket_id", "GH-", "issue_number")
        .same("title")
        .rename("description", "body")
        .keywords("priority", "labels", LABEL_PRIORITY)
        .rename("status", "state")
        .keywords("component", "title", TITLE_COMPONENT)
        .rename("reporter", "user")
        .same("assignee")
        .rename("created_date", "created_at")
        .rename("resolved_date", "closed_at");

    let excel = SourceMapping::new("excel", "manual_bug_tracker")
        .constant("source", "Excel")
        .prefixed("ticket_id", "XL-", "Bug #")
        .rename("title", "Bug Title")
        .rename("description", "Notes")
        .rename("priority", "Severity")
        .rename("status", "Status Notes")
        .rename("component", "Module")
        .rename("reporter", "Found By")
        .rename("created_date", "Date Found");

    vec![jira, github, excel]
}
