mod common;
mod go;
mod gomod;

pub use go::GoParser;
pub use gomod::parse_go_mod;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to parse: {0}")]
    Parse(String),
    #[error("Missing package clause")]
    MissingPackageClause,
    #[error("Syntax error in import section at line {line}")]
    ImportSyntax { line: usize },
}

/// Go test files never take part in the import graph.
pub fn is_test_file(path: &std::path::Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_test.go"))
}

/// Non-test `.go` source file.
pub fn is_go_source(path: &std::path::Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("go") && !is_test_file(path)
}
