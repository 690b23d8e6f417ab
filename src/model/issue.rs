use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    pub locations: Vec<Location>,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum IssueKind {
    CircularDependency {
        cycle: Vec<String>,
    },
    DeepImport {
        depth: usize,
        max_depth: usize,
    },
    BoundaryViolation {
        rule: String,
    },
    /// Package that nothing else in the module imports.
    OrphanPackage,
}

impl IssueKind {
    /// Rule name used when grouping findings in reports.
    pub fn rule_name(&self) -> &str {
        match self {
            IssueKind::CircularDependency { .. } => "circular-dependency",
            IssueKind::DeepImport { .. } => "import-depth",
            IssueKind::BoundaryViolation { rule } => rule,
            IssueKind::OrphanPackage => "orphan-package",
        }
    }

    fn order(&self) -> u8 {
        match self {
            IssueKind::CircularDependency { .. } => 0,
            IssueKind::DeepImport { .. } => 1,
            IssueKind::BoundaryViolation { .. } => 2,
            IssueKind::OrphanPackage => 3,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum IssueSeverity {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub line: Option<usize>,
    pub context: Option<String>,
}

impl Location {
    pub fn package(path: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            line: None,
            context: None,
        }
    }
}

impl Issue {
    pub fn circular_dependency(cycle: Vec<String>) -> Self {
        let locations = cycle.iter().map(|p| Location::package(p)).collect();

        let mut rendered = cycle.clone();
        if let Some(first) = cycle.first() {
            rendered.push(first.clone());
        }

        Self {
            message: format!("Circular dependency: {}", rendered.join(" -> ")),
            kind: IssueKind::CircularDependency { cycle },
            severity: IssueSeverity::Error,
            locations,
            suggestion: Some(
                "Break the cycle by extracting shared types into a lower package or inverting the dependency with an interface"
                    .to_string(),
            ),
        }
    }

    pub fn deep_import(
        file: PathBuf,
        line: usize,
        import: &str,
        depth: usize,
        max_depth: usize,
    ) -> Self {
        Self {
            kind: IssueKind::DeepImport { depth, max_depth },
            severity: IssueSeverity::Error,
            locations: vec![Location {
                path: file,
                line: Some(line),
                context: Some(import.to_string()),
            }],
            message: format!(
                "Import path is {} levels deep (max {}): {}",
                depth, max_depth, import
            ),
            suggestion: Some(
                "Flatten the package hierarchy or import a higher-level facade package".to_string(),
            ),
        }
    }

    pub fn boundary_violation(
        rule: String,
        file: PathBuf,
        line: usize,
        import: &str,
        suggestion: String,
    ) -> Self {
        Self {
            message: format!("{} violated by import {}", rule, import),
            kind: IssueKind::BoundaryViolation { rule },
            severity: IssueSeverity::Error,
            locations: vec![Location {
                path: file,
                line: Some(line),
                context: Some(import.to_string()),
            }],
            suggestion: Some(suggestion),
        }
    }

    pub fn orphan_package(package: &str) -> Self {
        Self {
            kind: IssueKind::OrphanPackage,
            severity: IssueSeverity::Warn,
            locations: vec![Location::package(package)],
            message: "Not imported by any other package in the module".to_string(),
            suggestion: Some(
                "Delete the package if it is dead code, or list it under [orphans] roots".to_string(),
            ),
        }
    }

    /// Ordering used for stable reports: kind, rule, then location.
    pub fn cmp_for_report(&self, other: &Self) -> std::cmp::Ordering {
        let key = |issue: &Issue| {
            let location = issue.locations.first();
            (
                issue.kind.order(),
                issue.kind.rule_name().to_string(),
                location.map(|l| l.path.clone()),
                location.and_then(|l| l.line),
            )
        };
        key(self)
            .cmp(&key(other))
            .then_with(|| self.message.cmp(&other.message))
    }
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Info => write!(f, "info"),
            IssueSeverity::Warn => write!(f, "warn"),
            IssueSeverity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for IssueSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(IssueSeverity::Info),
            "warn" | "warning" => Ok(IssueSeverity::Warn),
            "error" => Ok(IssueSeverity::Error),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_message_closes_the_loop() {
        let issue = Issue::circular_dependency(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(issue.message, "Circular dependency: a -> b -> c -> a");
        assert_eq!(issue.locations.len(), 3);
        assert_eq!(issue.severity, IssueSeverity::Error);
    }

    #[test]
    fn test_severity_parsing() {
        assert_eq!("warning".parse::<IssueSeverity>(), Ok(IssueSeverity::Warn));
        assert_eq!("ERROR".parse::<IssueSeverity>(), Ok(IssueSeverity::Error));
        assert!("fatal".parse::<IssueSeverity>().is_err());
        assert!(IssueSeverity::Error > IssueSeverity::Warn);
    }

    #[test]
    fn test_report_ordering_groups_by_kind() {
        let mut issues = vec![
            Issue::orphan_package("pkg/a"),
            Issue::deep_import("z.go".into(), 3, "m/a/b", 2, 1),
            Issue::circular_dependency(vec!["x".into(), "y".into()]),
        ];
        issues.sort_by(|a, b| a.cmp_for_report(b));

        assert!(matches!(issues[0].kind, IssueKind::CircularDependency { .. }));
        assert!(matches!(issues[1].kind, IssueKind::DeepImport { .. }));
        assert!(matches!(issues[2].kind, IssueKind::OrphanPackage));
    }
}
