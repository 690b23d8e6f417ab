mod boundary;
mod circular;
mod depth;
mod discover;
mod graph;
mod orphan;

pub use boundary::{RuleViolation, classify_import, detect_boundary_violations};
pub use circular::{canonicalize_cycle, detect_circular_dependencies, find_cycles};
pub use depth::{check_import_depth, detect_deep_imports, import_depth};
pub use discover::{Discovery, discover_packages, relative_slash_path};
pub use graph::DependencyGraph;
pub use orphan::detect_orphan_packages;

use crate::config::Config;
use crate::fs::{FileSystem, default_fs};
use crate::model::{AnalysisResult, ModulePath};
use crate::parser::parse_go_mod;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
    #[error("No module path: {0} has no go.mod with a module directive and none was configured")]
    ModuleNotFound(PathBuf),
    #[error("Failed to read go.mod: {0}")]
    Io(#[from] std::io::Error),
}

pub fn analyze(path: &Path, config: &Config) -> Result<AnalysisResult, AnalyzeError> {
    analyze_with_fs(path, config, default_fs())
}

pub fn analyze_with_fs(
    path: &Path,
    config: &Config,
    fs: &dyn FileSystem,
) -> Result<AnalysisResult, AnalyzeError> {
    if !path.is_dir() {
        return Err(AnalyzeError::PathNotFound(path.to_path_buf()));
    }

    let project_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("project")
        .to_string();

    let module = resolve_module_path(path, config, fs)?;
    info!(module = module.as_str(), "resolved module path");

    // Discover and parse all packages
    let discovery = discover_packages(path, &module, &config.exclude, fs);
    debug!(
        files = discovery.files.len(),
        packages = discovery.packages.len(),
        skipped = discovery.skipped,
        "discovery finished"
    );

    let dep_graph = DependencyGraph::build(&discovery.packages);

    let mut issues = Vec::new();

    if config.checks.cycles {
        issues.extend(detect_circular_dependencies(&dep_graph));
    }

    if config.checks.depth {
        issues.extend(detect_deep_imports(&discovery.files, &module, config));
    }

    if config.checks.boundaries {
        issues.extend(detect_boundary_violations(&discovery.files, &module, config));
    }

    if config.checks.orphans {
        issues.extend(detect_orphan_packages(&discovery.packages, &dep_graph, config));
    }

    issues.sort_by(|a, b| a.cmp_for_report(b));

    Ok(AnalysisResult {
        project_name,
        root: path.to_path_buf(),
        module_path: module.as_str().to_string(),
        files_scanned: discovery.files.len(),
        files_skipped: discovery.skipped,
        packages: discovery.packages,
        issues,
        dependencies: dep_graph.adjacency(),
    })
}

/// Configured module path, falling back to the `module` directive in `go.mod`.
pub fn resolve_module_path(
    root: &Path,
    config: &Config,
    fs: &dyn FileSystem,
) -> Result<ModulePath, AnalyzeError> {
    if let Some(module) = &config.module {
        return Ok(ModulePath::new(module.as_str()));
    }

    let go_mod = root.join("go.mod");
    if !fs.exists(&go_mod) {
        return Err(AnalyzeError::ModuleNotFound(root.to_path_buf()));
    }

    let source = fs.read_to_string(&go_mod)?;
    parse_go_mod(&source)
        .map(ModulePath::new)
        .ok_or_else(|| AnalyzeError::ModuleNotFound(root.to_path_buf()))
}
