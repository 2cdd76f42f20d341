//! Rule file path resolution.

use std::path::{Path, PathBuf};

/// Environment variable naming a rule file that replaces the embedded set.
pub const RULES_ENV_VAR: &str = "SCRUB_RULES";

/// Pick the rule file to load.
///
/// Resolution order:
/// 1. an explicit path (e.g. `--rules`)
/// 2. `SCRUB_RULES` environment variable
/// 3. `None`: use the embedded default rule set
pub fn resolve_rules_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    match std::env::var(RULES_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}

/// On-disk location of the embedded default rule set, for display.
pub fn default_rules_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("rules/default.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = Path::new("/tmp/custom.toml");
        assert_eq!(resolve_rules_path(Some(path)), Some(path.to_path_buf()));
    }

    #[test]
    fn default_path_points_at_rules_dir() {
        assert!(default_rules_path().ends_with("rules/default.toml"));
    }
}
