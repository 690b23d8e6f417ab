use crate::analysis::DependencyGraph;
use crate::config::Config;
use crate::model::{Issue, Package};

/// Packages that no other package in the module imports.
///
/// `main` packages, the module root and configured roots are entry points
/// and are never orphans.
pub fn detect_orphan_packages(
    packages: &[Package],
    graph: &DependencyGraph,
    config: &Config,
) -> Vec<Issue> {
    packages
        .iter()
        .filter(|p| !p.is_main() && !p.is_root())
        .filter(|p| !config.orphan_roots.is_match(&p.path))
        .filter(|p| graph.fan_in(&p.path) == 0)
        .map(|p| Issue::orphan_package(&p.path))
        .collect()
}
