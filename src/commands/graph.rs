use crate::analysis::analyze;
use crate::cli::{GraphArgs, GraphFormat};
use crate::config::{CheckKind, Checks};
use crate::fs::default_fs;
use crate::model::IssueKind;
use crate::output::{render_dot, render_graph_json, render_graph_text};
use crate::style;

use super::{CommandContext, emit};

/// Print the package dependency graph. Informational only: exits 0 even when it has cycles.
pub fn cmd_graph(args: GraphArgs) -> i32 {
    let ctx = match CommandContext::new(&args.path, args.module.as_deref(), &args.exclude) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let mut config = ctx.config;
    config.checks = Checks::only(CheckKind::Cycles);

    let result = match analyze(&ctx.path, &config) {
        Ok(result) => result,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let cycles: Vec<Vec<String>> = result
        .issues
        .iter()
        .filter_map(|issue| match &issue.kind {
            IssueKind::CircularDependency { cycle } => Some(cycle.clone()),
            _ => None,
        })
        .collect();

    let mut buffer = Vec::new();
    let render_result = match args.format {
        GraphFormat::Text => render_graph_text(&result.dependencies, &mut buffer),
        GraphFormat::Json => render_graph_json(&result.dependencies, &cycles, &mut buffer),
        GraphFormat::Dot => render_dot(&result.dependencies, &cycles, &mut buffer),
    };

    if let Err(e) = render_result {
        style::error(&format!("Failed to render graph: {}", e));
        return 1;
    }

    if args.output.is_none() && args.format == GraphFormat::Text && style::is_terminal() {
        style::header(&format!(
            "{} ({} packages, {} cycles)",
            result.module_path,
            result.dependencies.len(),
            cycles.len()
        ));
    }

    if let Err(code) = emit(&buffer, args.output.as_deref(), false, default_fs()) {
        return code;
    }

    if let Some(output_path) = &args.output {
        style::status(&format!("Graph written to {}", style::path(output_path)));
    }

    0
}
