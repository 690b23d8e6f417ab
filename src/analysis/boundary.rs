use crate::config::Config;
use crate::model::{Issue, ModulePath, RuleSet, SourceFile};
use std::collections::HashSet;
use std::path::PathBuf;

/// A single rule broken by one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub rule: String,
    pub suggestion: String,
}

/// Classify one import made by the package at `package_dir`.
///
/// Returns every rule the import breaks, empty when it is compliant.
pub fn classify_import(
    package_dir: &str,
    import: &str,
    module: &ModulePath,
    rules: &RuleSet,
) -> Vec<RuleViolation> {
    let mut violations = Vec::new();

    if let Some(target_dir) = module.internal_package(import) {
        if let (Some(from), Some(to)) = (rules.layer_of(package_dir), rules.layer_of(&target_dir))
        {
            if !from.may_import(&to.name) {
                let rule = format!("layer:{}->{}", from.name, to.name);
                violations.push(RuleViolation {
                    suggestion: suggestion_for(&rule).to_string(),
                    rule,
                });
            }
        }
    }

    for forbidden in &rules.forbidden {
        if forbidden.applies(package_dir) && forbidden.pattern.is_match(import) {
            violations.push(RuleViolation {
                rule: forbidden.name.clone(),
                suggestion: forbidden
                    .suggestion
                    .clone()
                    .unwrap_or_else(|| suggestion_for(&forbidden.name).to_string()),
            });
        }
    }

    violations
}

/// Boundary findings across all files. A given (file, line, rule) appears once.
pub fn detect_boundary_violations(
    files: &[SourceFile],
    module: &ModulePath,
    config: &Config,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut reported: HashSet<(PathBuf, usize, String)> = HashSet::new();

    for file in files {
        for import in &file.imports {
            for violation in classify_import(&file.package_dir, &import.path, module, &config.rules)
            {
                let key = (file.path.clone(), import.line, violation.rule.clone());
                if !reported.insert(key) {
                    continue;
                }
                issues.push(Issue::boundary_violation(
                    violation.rule,
                    file.path.clone(),
                    import.line,
                    &import.path,
                    violation.suggestion,
                ));
            }
        }
    }

    issues
}

/// Fixed suggestions for the built-in rule names.
fn suggestion_for(rule: &str) -> &'static str {
    if let Some(edge) = rule.strip_prefix("layer:") {
        let (from, to) = edge.split_once("->").unwrap_or((edge, ""));
        return match (from, to) {
            ("domain", _) => {
                "Domain packages must not depend on outer layers; move the shared type into domain"
            }
            (_, "infrastructure") => {
                "Depend on an interface declared in an inner layer and inject the infrastructure implementation"
            }
            _ => "Invert the dependency: define an interface in the importing layer's allowed dependencies",
        };
    }

    match rule {
        "domain-io" => {
            "Keep I/O out of the domain; declare a port interface and implement it in infrastructure"
        }
        "legacy-errors" => "Use the standard errors package with fmt.Errorf and %w",
        _ => "Remove the import or move the code to a package where the rule allows it",
    }
}
