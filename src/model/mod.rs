mod issue;
mod package;
mod rules;

pub use issue::{Issue, IssueKind, IssueSeverity, Location};
pub use package::{ImportRef, ModulePath, Package, SourceFile};
pub use rules::{ForbiddenImport, Layer, PathMatcher, RuleSet};

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub struct AnalysisResult {
    pub project_name: String,
    pub root: PathBuf,
    pub module_path: String,
    pub packages: Vec<Package>,
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub issues: Vec<Issue>,
    /// Package path -> sorted internal dependencies.
    pub dependencies: BTreeMap<String, Vec<String>>,
}

impl AnalysisResult {
    pub fn error_count(&self) -> usize {
        self.count_severity(IssueSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_severity(IssueSeverity::Warn)
    }

    fn count_severity(&self, severity: IssueSeverity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }
}

/// Outcome of a run once findings are weighed against the configured budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No errors and no warnings.
    Clean,
    /// Findings exist but stay within the budgets.
    WithinBudget,
    /// Errors exceed the error budget.
    ErrorBudgetExceeded,
    /// Warnings exceed the warning budget.
    WarningBudgetExceeded,
}

impl Verdict {
    pub fn passed(self) -> bool {
        matches!(self, Verdict::Clean | Verdict::WithinBudget)
    }

    pub fn exit_code(self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_exit_codes() {
        assert_eq!(Verdict::Clean.exit_code(), 0);
        assert_eq!(Verdict::WithinBudget.exit_code(), 0);
        assert_eq!(Verdict::ErrorBudgetExceeded.exit_code(), 1);
        assert_eq!(Verdict::WarningBudgetExceeded.exit_code(), 1);
    }
}
