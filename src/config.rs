use crate::fs::{FileSystem, default_fs};
use crate::model::{ForbiddenImport, Layer, PathMatcher, RuleSet, Verdict};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".layercheck.toml";

const DEFAULT_MAX_IMPORT_DEPTH: usize = 5;
const DEFAULT_ORPHAN_ROOTS: &[&str] = &["cmd/**", "tools/**"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid import pattern in rule '{rule}': {source}")]
    Regex { rule: String, source: regex::Error },
    #[error("Invalid glob in {context}: {source}")]
    Glob {
        context: String,
        source: globset::Error,
    },
    #[error("Layer '{layer}' allows unknown layer '{allowed}'")]
    UnknownLayer { layer: String, allowed: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Overrides the module path from `go.mod`.
    pub module: Option<String>,
    pub exclude: PathMatcher,
    pub thresholds: Thresholds,
    pub checks: Checks,
    pub budget: Budget,
    pub rules: RuleSet,
    /// Packages that are allowed to have no importers.
    pub orphan_roots: PathMatcher,
}

#[derive(Debug, Clone)]
pub struct Thresholds {
    pub max_import_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checks {
    pub cycles: bool,
    pub depth: bool,
    pub boundaries: bool,
    pub orphans: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Cycles,
    Depth,
    Boundaries,
    Orphans,
}

/// How many findings a run may have before it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub errors: usize,
    /// `None` means warnings never fail a run.
    pub warnings: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    module: Option<String>,
    exclude: Option<Vec<String>>,
    thresholds: Option<RawThresholds>,
    checks: Option<RawChecks>,
    budget: Option<RawBudget>,
    orphans: Option<RawOrphans>,
    layers: Option<Vec<RawLayer>>,
    forbidden: Option<Vec<RawForbidden>>,
}

#[derive(Debug, Deserialize)]
struct RawThresholds {
    max_import_depth: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawChecks {
    cycles: Option<bool>,
    depth: Option<bool>,
    boundaries: Option<bool>,
    orphans: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    errors: Option<usize>,
    warnings: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawOrphans {
    roots: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawLayer {
    name: String,
    patterns: Vec<String>,
    #[serde(default)]
    allow: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawForbidden {
    name: String,
    #[serde(default)]
    applies_to: Vec<String>,
    pattern: String,
    suggestion: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            module: None,
            exclude: PathMatcher::empty(),
            thresholds: Thresholds::default(),
            checks: Checks::all(),
            budget: Budget::default(),
            rules: RuleSet::default(),
            orphan_roots: PathMatcher::new(DEFAULT_ORPHAN_ROOTS)
                .unwrap_or_else(|_| PathMatcher::empty()),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_import_depth: DEFAULT_MAX_IMPORT_DEPTH,
        }
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            errors: 0,
            warnings: None,
        }
    }
}

impl Checks {
    pub fn all() -> Self {
        Self {
            cycles: true,
            depth: true,
            boundaries: true,
            orphans: true,
        }
    }

    pub fn only(kind: CheckKind) -> Self {
        Self {
            cycles: kind == CheckKind::Cycles,
            depth: kind == CheckKind::Depth,
            boundaries: kind == CheckKind::Boundaries,
            orphans: kind == CheckKind::Orphans,
        }
    }
}

impl Budget {
    pub fn evaluate(&self, errors: usize, warnings: usize) -> Verdict {
        if errors > self.errors {
            Verdict::ErrorBudgetExceeded
        } else if self.warnings.is_some_and(|allowed| warnings > allowed) {
            Verdict::WarningBudgetExceeded
        } else if errors > 0 || warnings > 0 {
            Verdict::WithinBudget
        } else {
            Verdict::Clean
        }
    }
}

impl Config {
    pub fn load(project_path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_fs(project_path, default_fs())
    }

    pub fn load_with_fs(project_path: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let config_path = project_path.join(CONFIG_FILE);

        if !fs.exists(&config_path) {
            return Ok(Self::default());
        }

        let content = fs.read_to_string(&config_path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let exclude = match raw.exclude {
            Some(patterns) => matcher(&patterns, "exclude")?,
            None => defaults.exclude,
        };

        let thresholds = match raw.thresholds {
            Some(t) => Thresholds {
                max_import_depth: t.max_import_depth.unwrap_or(DEFAULT_MAX_IMPORT_DEPTH),
            },
            None => defaults.thresholds,
        };

        let checks = match raw.checks {
            Some(c) => Checks {
                cycles: c.cycles.unwrap_or(true),
                depth: c.depth.unwrap_or(true),
                boundaries: c.boundaries.unwrap_or(true),
                orphans: c.orphans.unwrap_or(true),
            },
            None => defaults.checks,
        };

        let budget = match raw.budget {
            Some(b) => Budget {
                errors: b.errors.unwrap_or(0),
                warnings: b.warnings,
            },
            None => defaults.budget,
        };

        let orphan_roots = match raw.orphans {
            Some(o) => matcher(&o.roots, "[orphans] roots")?,
            None => defaults.orphan_roots,
        };

        let layers = match raw.layers {
            Some(raw_layers) => resolve_layers(raw_layers)?,
            None => RuleSet::default_layers(),
        };

        let forbidden = match raw.forbidden {
            Some(raw_rules) => raw_rules
                .into_iter()
                .map(resolve_forbidden)
                .collect::<Result<Vec<_>, _>>()?,
            None => RuleSet::default_forbidden(),
        };

        Ok(Self {
            module: raw.module,
            exclude,
            thresholds,
            checks,
            budget,
            rules: RuleSet { layers, forbidden },
            orphan_roots,
        })
    }

    /// Add exclusion globs on top of the configured ones.
    pub fn extend_exclude(&mut self, patterns: &[String]) -> Result<(), ConfigError> {
        if patterns.is_empty() {
            return Ok(());
        }
        let mut all = self.exclude.patterns().to_vec();
        all.extend(patterns.iter().cloned());
        self.exclude = matcher(&all, "exclude")?;
        Ok(())
    }
}

fn matcher(patterns: &[String], context: &str) -> Result<PathMatcher, ConfigError> {
    PathMatcher::new(patterns).map_err(|source| ConfigError::Glob {
        context: context.to_string(),
        source,
    })
}

fn resolve_layers(raw_layers: Vec<RawLayer>) -> Result<Vec<Layer>, ConfigError> {
    let names: HashSet<String> = raw_layers.iter().map(|l| l.name.clone()).collect();

    raw_layers
        .into_iter()
        .map(|raw| {
            if let Some(unknown) = raw.allow.iter().find(|a| !names.contains(*a)) {
                return Err(ConfigError::UnknownLayer {
                    layer: raw.name.clone(),
                    allowed: unknown.clone(),
                });
            }
            Ok(Layer {
                packages: matcher(&raw.patterns, &format!("layer '{}'", raw.name))?,
                name: raw.name,
                allow: raw.allow,
            })
        })
        .collect()
}

fn resolve_forbidden(raw: RawForbidden) -> Result<ForbiddenImport, ConfigError> {
    let pattern = Regex::new(&raw.pattern).map_err(|source| ConfigError::Regex {
        rule: raw.name.clone(),
        source,
    })?;

    Ok(ForbiddenImport {
        applies_to: matcher(&raw.applies_to, &format!("rule '{}'", raw.name))?,
        name: raw.name,
        pattern,
        suggestion: raw.suggestion,
    })
}

/// Starter configuration written by `layercheck init`.
pub fn generate_config_template() -> String {
    r#"# layercheck configuration
# Every key is optional; omitted keys use the defaults shown here.

# Module path. Read from go.mod when omitted.
# module = "github.com/acme/app"

# Package globs to skip entirely. vendor/, testdata/ and directories
# starting with "." or "_" are always skipped. "gen/**" skips gen itself too.
exclude = []

[thresholds]
# Maximum number of path segments in an internal import, relative to the module root.
max_import_depth = 5

[checks]
cycles = true
depth = true
boundaries = true
orphans = true

[budget]
# Errors allowed before the run fails.
errors = 0
# Warnings allowed before the run fails. Omit to never fail on warnings.
# warnings = 10

[orphans]
# Packages that may have no importers (entry points, tooling).
roots = ["cmd/**", "tools/**"]

# Layers: a package belongs to the first layer whose patterns match.
# A layer may import itself and the layers listed in `allow`.
[[layers]]
name = "domain"
patterns = ["**/domain", "**/domain/**"]
allow = []

[[layers]]
name = "application"
patterns = ["**/application", "**/application/**"]
allow = ["domain"]

[[layers]]
name = "infrastructure"
patterns = ["**/infrastructure", "**/infrastructure/**"]
allow = ["domain", "application"]

# Forbidden imports: `pattern` is a regex matched against the full import path.
[[forbidden]]
name = "domain-io"
applies_to = ["**/domain", "**/domain/**"]
pattern = '^(net/http|database/sql|os/exec)$|^github\.com/docker/|^k8s\.io/'

[[forbidden]]
name = "legacy-errors"
pattern = '^github\.com/pkg/errors$'
suggestion = "Use the standard errors package with fmt.Errorf and %w"
"#
    .to_string()
}
