use crate::config::Config;
use crate::model::{Issue, ModulePath, SourceFile};

/// Number of path segments in a module-relative package path.
/// The module root (`.`) has depth 0.
pub fn import_depth(relative_path: &str) -> usize {
    relative_path
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .count()
}

/// `true` when the import is at most `max_depth` segments deep.
pub fn check_import_depth(relative_path: &str, max_depth: usize) -> bool {
    import_depth(relative_path) <= max_depth
}

/// One finding per internal import line that is nested too deeply.
pub fn detect_deep_imports(files: &[SourceFile], module: &ModulePath, config: &Config) -> Vec<Issue> {
    let max_depth = config.thresholds.max_import_depth;
    let mut issues = Vec::new();

    for file in files {
        for import in &file.imports {
            let Some(relative) = module.internal_package(&import.path) else {
                continue;
            };
            if check_import_depth(&relative, max_depth) {
                continue;
            }
            issues.push(Issue::deep_import(
                file.path.clone(),
                import.line,
                &import.path,
                import_depth(&relative),
                max_depth,
            ));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImportRef, IssueKind};
    use std::path::PathBuf;

    #[test]
    fn test_depth_counts_segments() {
        assert_eq!(import_depth("."), 0);
        assert_eq!(import_depth("pkg"), 1);
        assert_eq!(import_depth("pkg/mcp/domain/session"), 4);
        assert_eq!(import_depth("pkg//mcp/"), 2);
    }

    #[test]
    fn test_boundary_at_max_depth() {
        let max_depth = 3;
        assert!(check_import_depth("a/b/c", max_depth));
        assert!(!check_import_depth("a/b/c/d", max_depth));
        assert!(check_import_depth("a", max_depth));
    }

    #[test]
    fn test_detects_only_internal_deep_imports() {
        let module = ModulePath::new("github.com/acme/app");
        let mut config = Config::default();
        config.thresholds.max_import_depth = 2;

        let mut file = SourceFile::new(PathBuf::from("/repo/cmd/main.go"));
        file.imports = vec![
            ImportRef {
                path: "github.com/acme/app/pkg/api".into(),
                alias: None,
                line: 4,
            },
            ImportRef {
                path: "github.com/acme/app/pkg/mcp/domain".into(),
                alias: None,
                line: 5,
            },
            ImportRef {
                path: "github.com/other/very/deep/path/here".into(),
                alias: None,
                line: 6,
            },
        ];

        let issues = detect_deep_imports(&[file], &module, &config);

        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].kind,
            IssueKind::DeepImport {
                depth: 3,
                max_depth: 2
            }
        );
        assert_eq!(issues[0].locations[0].line, Some(5));
        assert_eq!(issues[0].kind.rule_name(), "import-depth");
    }
}
