//! Library API for layercheck.
//!
//! The CLI commands print reports and return exit codes. These functions return
//! the analysis itself so other tools can apply their own policy to it.
//!
//! # Example
//!
//! ```no_run
//! use layercheck::{check, CheckOptions};
//! use std::path::Path;
//!
//! let result = check(Path::new("."), CheckOptions::default())?;
//! println!("{} packages in {}", result.packages.len(), result.module_path);
//! for issue in &result.issues {
//!     println!("[{}] {}", issue.kind.rule_name(), issue.message);
//! }
//! # Ok::<(), layercheck::LayercheckError>(())
//! ```

use crate::analysis::{self, AnalyzeError};
use crate::config::{Checks, Config, ConfigError};
use crate::model::AnalysisResult;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during layercheck operations.
#[derive(Debug, Error)]
pub enum LayercheckError {
    /// The specified path could not be found or resolved.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// `.layercheck.toml` could not be read or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

/// Overrides applied on top of the project's `.layercheck.toml`.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Module path, instead of the one in `go.mod`.
    pub module: Option<String>,

    /// Maximum path segments in an internal import.
    pub max_depth: Option<usize>,

    /// Extra package globs to skip.
    pub exclude: Vec<String>,

    /// Which checks to run. `None` keeps the configured set.
    pub checks: Option<Checks>,
}

/// Check a Go module.
///
/// Loads `.layercheck.toml` from `path` if present, applies `options` and runs the
/// enabled checks. Findings are returned, not judged: use
/// [`Budget::evaluate`](crate::config::Budget::evaluate) for a pass/fail verdict.
///
/// # Example
///
/// ```no_run
/// use layercheck::{check, CheckOptions};
/// use layercheck::config::{CheckKind, Checks};
/// use std::path::Path;
///
/// let options = CheckOptions {
///     checks: Some(Checks::only(CheckKind::Cycles)),
///     ..CheckOptions::default()
/// };
/// let result = check(Path::new("."), options)?;
/// println!("{} cycles", result.issues.len());
/// # Ok::<(), layercheck::LayercheckError>(())
/// ```
pub fn check(path: &Path, options: CheckOptions) -> Result<AnalysisResult, LayercheckError> {
    let resolved_path = path
        .canonicalize()
        .map_err(|_| LayercheckError::PathNotFound(path.to_path_buf()))?;

    let mut config = Config::load(&resolved_path)?;

    if options.module.is_some() {
        config.module = options.module;
    }
    if let Some(max_depth) = options.max_depth {
        config.thresholds.max_import_depth = max_depth;
    }
    if let Some(checks) = options.checks {
        config.checks = checks;
    }
    config.extend_exclude(&options.exclude)?;

    Ok(analysis::analyze(&resolved_path, &config)?)
}

/// Package dependency adjacency of a Go module: package path -> sorted internal imports.
pub fn dependency_graph(
    path: &Path,
    module: Option<&str>,
) -> Result<BTreeMap<String, Vec<String>>, LayercheckError> {
    let options = CheckOptions {
        module: module.map(str::to_string),
        checks: Some(Checks {
            cycles: false,
            depth: false,
            boundaries: false,
            orphans: false,
        }),
        ..CheckOptions::default()
    };

    Ok(check(path, options)?.dependencies)
}
