use crate::analysis::analyze;
use crate::cli::{CheckArgs, OutputFormat};
use crate::config::{CheckKind, Checks, Config};
use crate::fs::default_fs;
use crate::model::{AnalysisResult, Verdict};
use crate::output::{JsonOutput, MarkdownOutput, OutputFormatter};
use crate::style;

use super::{CommandContext, emit};

/// Run the enabled checks, or only `only` when a single-check subcommand was used.
pub fn cmd_check(args: CheckArgs, only: Option<CheckKind>) -> i32 {
    let ctx = match CommandContext::new(&args.path, args.module.as_deref(), &args.exclude) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let config = apply_overrides(ctx.config, &args, only);

    let result = match analyze(&ctx.path, &config) {
        Ok(result) => result,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    if result.files_skipped > 0 {
        style::warning(&format!(
            "{} file(s) could not be parsed and were skipped (run with -v for details)",
            result.files_skipped
        ));
    }

    let mut buffer = Vec::new();
    let format_result = match args.format {
        OutputFormat::Markdown => {
            MarkdownOutput::new(args.min_severity, config.budget).format(&result, &mut buffer)
        }
        OutputFormat::Json => JsonOutput::new(config.budget).format(&result, &mut buffer),
    };

    if let Err(e) = format_result {
        style::error(&format!("Failed to format output: {}", e));
        return 1;
    }

    if let Err(code) = emit(
        &buffer,
        args.output.as_deref(),
        args.format == OutputFormat::Markdown,
        default_fs(),
    ) {
        return code;
    }

    let verdict = config
        .budget
        .evaluate(result.error_count(), result.warning_count());

    if let Some(output_path) = &args.output {
        print_summary(&result, verdict, output_path);
    }

    verdict.exit_code()
}

fn apply_overrides(mut config: Config, args: &CheckArgs, only: Option<CheckKind>) -> Config {
    if let Some(kind) = only {
        config.checks = Checks::only(kind);
    }
    if let Some(max_depth) = args.max_depth {
        config.thresholds.max_import_depth = max_depth;
    }
    if let Some(errors) = args.error_budget {
        config.budget.errors = errors;
    }
    if args.warning_budget.is_some() {
        config.budget.warnings = args.warning_budget;
    }
    config
}

/// Short terminal summary when the report itself went to a file.
fn print_summary(result: &AnalysisResult, verdict: Verdict, output_path: &std::path::Path) {
    style::success(&format!("Wrote report to {}", style::path(output_path)));
    style::section("Summary");
    println!("{}", style::metric("packages", result.packages.len()));
    println!("{}", style::metric("files scanned", result.files_scanned));
    println!("{}", style::metric("files skipped", result.files_skipped));
    println!("{}", style::metric("errors", result.error_count()));
    println!("{}", style::metric("warnings", result.warning_count()));

    match verdict {
        Verdict::ErrorBudgetExceeded => style::hint("error budget exceeded"),
        Verdict::WarningBudgetExceeded => style::hint("warning budget exceeded"),
        Verdict::Clean | Verdict::WithinBudget => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::GraphArgs;
    use crate::commands::cmd_graph;
    use std::path::Path;
    use tempfile::TempDir;

    fn module(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::Builder::new()
            .prefix("layercheck-cmd")
            .tempdir()
            .unwrap();
        std::fs::write(dir.path().join("go.mod"), "module example.com/m\n").unwrap();
        for (path, content) in files {
            let file = dir.path().join(path);
            std::fs::create_dir_all(file.parent().unwrap()).unwrap();
            std::fs::write(file, content).unwrap();
        }
        dir
    }

    fn cyclic_module() -> TempDir {
        module(&[
            ("main.go", "package main\n\nimport \"example.com/m/a\"\n"),
            ("a/a.go", "package a\n\nimport \"example.com/m/b\"\n"),
            ("b/b.go", "package b\n\nimport \"example.com/m/a\"\n"),
        ])
    }

    fn args(path: &Path) -> CheckArgs {
        CheckArgs {
            path: path.to_path_buf(),
            format: OutputFormat::Json,
            ..CheckArgs::default()
        }
    }

    #[test]
    fn test_cycle_fails_the_run() {
        let dir = cyclic_module();
        assert_eq!(cmd_check(args(dir.path()), None), 1);
        assert_eq!(cmd_check(args(dir.path()), Some(CheckKind::Cycles)), 1);
        assert_eq!(cmd_check(args(dir.path()), Some(CheckKind::Depth)), 0);
    }

    #[test]
    fn test_clean_module_passes() {
        let dir = module(&[
            ("main.go", "package main\n\nimport \"example.com/m/a\"\n"),
            ("a/a.go", "package a\n"),
        ]);
        assert_eq!(cmd_check(args(dir.path()), None), 0);
    }

    #[test]
    fn test_error_budget_absorbs_findings() {
        let dir = cyclic_module();
        let check_args = CheckArgs {
            error_budget: Some(1),
            ..args(dir.path())
        };
        assert_eq!(cmd_check(check_args, None), 0);
    }

    #[test]
    fn test_warning_budget_fails_on_orphans() {
        let dir = module(&[("lib/lib.go", "package lib\n")]);
        assert_eq!(cmd_check(args(dir.path()), None), 0);

        let check_args = CheckArgs {
            warning_budget: Some(0),
            ..args(dir.path())
        };
        assert_eq!(cmd_check(check_args, None), 1);
    }

    #[test]
    fn test_setup_failures_exit_1() {
        let dir = cyclic_module();
        assert_eq!(cmd_check(args(&dir.path().join("missing")), None), 1);

        std::fs::write(
            dir.path().join(".layercheck.toml"),
            "[[forbidden]]\nname = \"bad\"\npattern = \"(\"\n",
        )
        .unwrap();
        assert_eq!(cmd_check(args(dir.path()), None), 1);
    }

    #[test]
    fn test_report_written_to_file() {
        let dir = cyclic_module();
        let report = dir.path().join("report.json");
        let check_args = CheckArgs {
            output: Some(report.clone()),
            ..args(dir.path())
        };

        assert_eq!(cmd_check(check_args, None), 1);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(report).unwrap()).unwrap();
        assert_eq!(value["summary"]["verdict"], "error_budget_exceeded");
    }

    #[test]
    fn test_graph_is_informational() {
        let dir = cyclic_module();
        let graph_args = GraphArgs {
            path: dir.path().to_path_buf(),
            format: crate::cli::GraphFormat::Dot,
            output: None,
            module: None,
            exclude: Vec::new(),
        };
        assert_eq!(cmd_graph(graph_args.clone()), 0);

        let missing = GraphArgs {
            path: dir.path().join("missing"),
            ..graph_args
        };
        assert_eq!(cmd_graph(missing), 1);
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let args = CheckArgs {
            max_depth: Some(2),
            error_budget: Some(4),
            warning_budget: Some(1),
            ..CheckArgs::default()
        };

        let config = apply_overrides(Config::default(), &args, Some(CheckKind::Depth));

        assert_eq!(config.checks, Checks::only(CheckKind::Depth));
        assert_eq!(config.thresholds.max_import_depth, 2);
        assert_eq!(config.budget.errors, 4);
        assert_eq!(config.budget.warnings, Some(1));
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut base = Config::default();
        base.budget.warnings = Some(7);

        let config = apply_overrides(base, &CheckArgs::default(), None);

        assert_eq!(config.checks, Checks::all());
        assert_eq!(config.thresholds.max_import_depth, 5);
        assert_eq!(config.budget.warnings, Some(7));
    }
}
