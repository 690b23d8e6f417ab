use crate::config::Budget;
use crate::model::{AnalysisResult, IssueKind, Verdict};
use crate::output::{OutputFormatter, relative_path};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

pub struct JsonOutput {
    budget: Budget,
}

impl JsonOutput {
    pub fn new(budget: Budget) -> Self {
        Self { budget }
    }
}

#[derive(Serialize)]
struct JsonResult<'a> {
    project_name: &'a str,
    module_path: &'a str,
    packages: Vec<JsonPackage<'a>>,
    dependencies: &'a BTreeMap<String, Vec<String>>,
    issues: Vec<JsonIssue<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonPackage<'a> {
    path: &'a str,
    name: &'a str,
    files: usize,
    imports: &'a [String],
}

#[derive(Serialize)]
struct JsonIssue<'a> {
    kind: &'static str,
    rule: &'a str,
    severity: String,
    message: &'a str,
    locations: Vec<JsonLocation<'a>>,
    suggestion: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonLocation<'a> {
    path: String,
    line: Option<usize>,
    context: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonSummary {
    files_scanned: usize,
    files_skipped: usize,
    errors: usize,
    warnings: usize,
    error_budget: usize,
    warning_budget: Option<usize>,
    verdict: Verdict,
    passed: bool,
}

impl OutputFormatter for JsonOutput {
    fn format<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> std::io::Result<()> {
        let errors = result.error_count();
        let warnings = result.warning_count();
        let verdict = self.budget.evaluate(errors, warnings);

        let json_result = JsonResult {
            project_name: &result.project_name,
            module_path: &result.module_path,
            packages: result
                .packages
                .iter()
                .map(|p| JsonPackage {
                    path: &p.path,
                    name: &p.name,
                    files: p.files.len(),
                    imports: &p.imports,
                })
                .collect(),
            dependencies: &result.dependencies,
            issues: result
                .issues
                .iter()
                .map(|i| JsonIssue {
                    kind: match i.kind {
                        IssueKind::CircularDependency { .. } => "circular_dependency",
                        IssueKind::DeepImport { .. } => "deep_import",
                        IssueKind::BoundaryViolation { .. } => "boundary_violation",
                        IssueKind::OrphanPackage => "orphan_package",
                    },
                    rule: i.kind.rule_name(),
                    severity: i.severity.to_string(),
                    message: &i.message,
                    locations: i
                        .locations
                        .iter()
                        .map(|l| JsonLocation {
                            path: relative_path(&l.path, &result.root),
                            line: l.line,
                            context: l.context.as_deref(),
                        })
                        .collect(),
                    suggestion: i.suggestion.as_deref(),
                })
                .collect(),
            summary: JsonSummary {
                files_scanned: result.files_scanned,
                files_skipped: result.files_skipped,
                errors,
                warnings,
                error_budget: self.budget.errors,
                warning_budget: self.budget.warnings,
                verdict,
                passed: verdict.passed(),
            },
        };

        let json = serde_json::to_string_pretty(&json_result).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)
    }
}
