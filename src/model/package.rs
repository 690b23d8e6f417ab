use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One import spec inside a Go file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRef {
    /// Import path with quotes removed, e.g. `github.com/acme/app/pkg/domain`.
    pub path: String,
    /// Explicit name, including `.` and `_`.
    pub alias: Option<String>,
    /// 1-based line of the import spec.
    pub line: usize,
}

/// The import header of a single non-test Go source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Directory of the file relative to the module root (`.` for the root).
    pub package_dir: String,
    pub package_name: String,
    pub lines: usize,
    pub imports: Vec<ImportRef>,
}

impl SourceFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            package_dir: ".".to_string(),
            package_name: String::new(),
            lines: 0,
            imports: Vec::new(),
        }
    }
}

/// A package node: every Go file that lives in one directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    /// Repository-relative directory, `/`-separated, `.` for the module root.
    pub path: String,
    /// Name from the `package` clause.
    pub name: String,
    pub files: Vec<PathBuf>,
    /// Distinct internal packages this package imports, sorted, never itself.
    pub imports: Vec<String>,
}

impl Package {
    pub fn is_main(&self) -> bool {
        self.name == "main"
    }

    pub fn is_root(&self) -> bool {
        self.path == "."
    }
}

/// The module's own import prefix, read from `go.mod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePath(String);

impl ModulePath {
    pub fn new(path: impl Into<String>) -> Self {
        let path: String = path.into();
        Self(path.trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map an import path to a package directory inside this module.
    /// Returns `None` for standard library and third-party imports.
    pub fn internal_package(&self, import: &str) -> Option<String> {
        if import == self.0 {
            return Some(".".to_string());
        }
        let rest = import.strip_prefix(&self.0)?.strip_prefix('/')?;
        if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }
    }
}
