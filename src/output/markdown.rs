use crate::config::Budget;
use crate::model::{AnalysisResult, Issue, IssueKind, IssueSeverity, Location, Verdict};
use crate::output::{OutputFormatter, relative_path};
use std::collections::BTreeMap;
use std::io::Write;

pub struct MarkdownOutput {
    pub min_severity: IssueSeverity,
    pub budget: Budget,
}

impl MarkdownOutput {
    pub fn new(min_severity: IssueSeverity, budget: Budget) -> Self {
        Self {
            min_severity,
            budget,
        }
    }

    fn location(&self, loc: &Location, result: &AnalysisResult) -> String {
        let path = relative_path(&loc.path, &result.root);
        match loc.line {
            Some(line) => format!("{}:{}", path, line),
            None => path,
        }
    }

    /// Findings grouped under one heading per rule, each location on its own line.
    fn write_rule_groups<W: Write>(
        &self,
        writer: &mut W,
        heading: &str,
        issues: &[&Issue],
        result: &AnalysisResult,
    ) -> std::io::Result<()> {
        if issues.is_empty() {
            return Ok(());
        }

        let mut by_rule: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
        for issue in issues {
            by_rule.entry(issue.kind.rule_name()).or_default().push(issue);
        }

        writeln!(writer, "### {}\n", heading)?;
        for (rule, group) in by_rule {
            let detail = match group[0].kind {
                IssueKind::DeepImport { max_depth, .. } => format!(" (max {})", max_depth),
                _ => String::new(),
            };
            writeln!(
                writer,
                "**{}**{} violated in {} location{}:",
                rule,
                detail,
                group.len(),
                if group.len() == 1 { "" } else { "s" }
            )?;

            for issue in &group {
                for loc in &issue.locations {
                    let context = loc
                        .context
                        .as_ref()
                        .map(|c| format!(" - `{}`", c))
                        .unwrap_or_default();
                    writeln!(writer, "- `{}`{}", self.location(loc, result), context)?;
                }
            }

            if let Some(ref suggestion) = group[0].suggestion {
                writeln!(writer, "\n→ {}\n", suggestion)?;
            } else {
                writeln!(writer)?;
            }
        }

        Ok(())
    }

    fn write_summary<W: Write>(&self, writer: &mut W, result: &AnalysisResult) -> std::io::Result<()> {
        let errors = result.error_count();
        let warnings = result.warning_count();
        let verdict = self.budget.evaluate(errors, warnings);

        let warning_budget = self
            .budget
            .warnings
            .map(|w| w.to_string())
            .unwrap_or_else(|| "unlimited".to_string());

        writeln!(writer, "---\n")?;
        writeln!(
            writer,
            "**{}**: {} error{}, {} warning{} (error budget {}, warning budget {})",
            if verdict.passed() { "PASS" } else { "FAIL" },
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
            self.budget.errors,
            warning_budget
        )?;

        match verdict {
            Verdict::ErrorBudgetExceeded => {
                writeln!(writer, "\nFix the errors above or raise the error budget.")
            }
            Verdict::WarningBudgetExceeded => {
                writeln!(writer, "\nFix the warnings above or raise the warning budget.")
            }
            Verdict::WithinBudget | Verdict::Clean => Ok(()),
        }
    }
}

impl OutputFormatter for MarkdownOutput {
    fn format<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# Import Graph Analysis: {}\n", result.project_name)?;
        writeln!(
            writer,
            "Module `{}`: {} packages, {} files scanned, {} skipped\n",
            result.module_path,
            result.packages.len(),
            result.files_scanned,
            result.files_skipped
        )?;

        let filtered_issues: Vec<&Issue> = result
            .issues
            .iter()
            .filter(|i| i.severity >= self.min_severity)
            .collect();

        if filtered_issues.is_empty() {
            writeln!(writer, "## No Issues Found\n")?;
            writeln!(writer, "No import graph violations detected.\n")?;
            return self.write_summary(writer, result);
        }

        writeln!(writer, "## Issues Found\n")?;

        let circular: Vec<_> = filtered_issues
            .iter()
            .filter(|i| matches!(i.kind, IssueKind::CircularDependency { .. }))
            .collect();

        if !circular.is_empty() {
            writeln!(writer, "### 🔴 Dependency Cycles\n")?;
            for issue in &circular {
                if let IssueKind::CircularDependency { ref cycle } = issue.kind {
                    let mut closed = cycle.clone();
                    if let Some(first) = cycle.first() {
                        closed.push(first.clone());
                    }
                    writeln!(writer, "- `{}`", closed.join(" -> "))?;
                }
            }
            if let Some(suggestion) = circular.first().and_then(|i| i.suggestion.as_ref()) {
                writeln!(writer, "\n→ {}", suggestion)?;
            }
            writeln!(writer)?;
        }

        let deep: Vec<&Issue> = filtered_issues
            .iter()
            .copied()
            .filter(|i| matches!(i.kind, IssueKind::DeepImport { .. }))
            .collect();
        self.write_rule_groups(writer, "🔴 Import Depth", &deep, result)?;

        let boundary: Vec<&Issue> = filtered_issues
            .iter()
            .copied()
            .filter(|i| matches!(i.kind, IssueKind::BoundaryViolation { .. }))
            .collect();
        self.write_rule_groups(writer, "🔴 Boundary Violations", &boundary, result)?;

        let orphans: Vec<_> = filtered_issues
            .iter()
            .filter(|i| matches!(i.kind, IssueKind::OrphanPackage))
            .collect();

        if !orphans.is_empty() {
            writeln!(writer, "### 🟡 Orphan Packages\n")?;
            for issue in &orphans {
                if let Some(loc) = issue.locations.first() {
                    writeln!(writer, "- `{}` - {}", loc.path.display(), issue.message)?;
                }
            }
            if let Some(suggestion) = orphans.first().and_then(|i| i.suggestion.as_ref()) {
                writeln!(writer, "\n→ {}", suggestion)?;
            }
            writeln!(writer)?;
        }

        self.write_summary(writer, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn result(issues: Vec<Issue>) -> AnalysisResult {
        AnalysisResult {
            project_name: "app".to_string(),
            root: PathBuf::from("/repo"),
            module_path: "example.com/app".to_string(),
            packages: Vec::new(),
            files_scanned: 3,
            files_skipped: 0,
            issues,
            dependencies: BTreeMap::new(),
        }
    }

    fn render(output: &MarkdownOutput, result: &AnalysisResult) -> String {
        let mut buffer = Vec::new();
        output.format(result, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_clean_report_passes() {
        let output = MarkdownOutput::new(IssueSeverity::Info, Budget::default());
        let text = render(&output, &result(Vec::new()));

        assert!(text.contains("## No Issues Found"));
        assert!(text.contains("**PASS**: 0 errors, 0 warnings"));
    }

    #[test]
    fn test_report_groups_by_rule_and_fails() {
        let issues = vec![
            Issue::circular_dependency(vec!["a".into(), "b".into()]),
            Issue::boundary_violation(
                "layer:domain->infrastructure".into(),
                PathBuf::from("/repo/pkg/domain/x.go"),
                7,
                "example.com/app/pkg/infrastructure/db",
                "Invert it".into(),
            ),
            Issue::boundary_violation(
                "layer:domain->infrastructure".into(),
                PathBuf::from("/repo/pkg/domain/y.go"),
                9,
                "example.com/app/pkg/infrastructure/db",
                "Invert it".into(),
            ),
            Issue::orphan_package("pkg/old"),
        ];
        let output = MarkdownOutput::new(IssueSeverity::Info, Budget::default());
        let text = render(&output, &result(issues));

        assert!(text.contains("- `a -> b -> a`"));
        assert!(text.contains("**layer:domain->infrastructure** violated in 2 locations:"));
        assert!(text.contains("- `pkg/domain/x.go:7` - `example.com/app/pkg/infrastructure/db`"));
        assert!(text.contains("- `pkg/old` - Not imported"));
        assert!(text.contains("**FAIL**: 3 errors, 1 warning"));
    }

    #[test]
    fn test_min_severity_hides_findings_but_not_summary() {
        let output = MarkdownOutput::new(IssueSeverity::Error, Budget::default());
        let text = render(&output, &result(vec![Issue::orphan_package("pkg/old")]));

        assert!(!text.contains("pkg/old"));
        assert!(text.contains("**PASS**: 0 errors, 1 warning"));
    }
}
