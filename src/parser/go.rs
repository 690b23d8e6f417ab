use crate::define_parser;
use crate::model::{ImportRef, SourceFile};
use crate::parser::ParseError;
use crate::parser::common::{node_text, unquote};
use std::path::Path;
use tree_sitter::Node;

define_parser!(GO_PARSER, tree_sitter_go::LANGUAGE);

/// Reads the `package` clause and import declarations of a Go file.
///
/// Only the file header matters. Syntax errors in declarations after the
/// imports are tolerated, the same way `go/parser` behaves in `ImportsOnly` mode.
pub struct GoParser;

impl GoParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file(&self, path: &Path, source: &str) -> Result<SourceFile, ParseError> {
        let mut file = SourceFile::new(path.to_path_buf());
        file.lines = source.lines().count();

        let tree = GO_PARSER
            .with(|parser| parser.borrow_mut().parse(source, None))
            .ok_or_else(|| ParseError::Parse("Failed to parse file".to_string()))?;

        let root = tree.root_node();
        let source_bytes = source.as_bytes();

        // An error node ahead of an import means the header itself is broken.
        let mut error_before = None;
        let mut cursor = root.walk();

        for node in root.children(&mut cursor) {
            match node.kind() {
                "package_clause" => {
                    if node.has_error() {
                        return Err(ParseError::MissingPackageClause);
                    }
                    let mut child_cursor = node.walk();
                    for child in node.children(&mut child_cursor) {
                        if child.kind() == "package_identifier" {
                            file.package_name = node_text(&child, source_bytes).to_string();
                        }
                    }
                }
                "import_declaration" => {
                    if node.has_error() {
                        return Err(ParseError::ImportSyntax {
                            line: node.start_position().row + 1,
                        });
                    }
                    if let Some(line) = error_before {
                        return Err(ParseError::ImportSyntax { line });
                    }
                    Self::collect_imports(&node, source_bytes, &mut file.imports);
                }
                "ERROR" => {
                    let line = node.start_position().row + 1;
                    if node_text(&node, source_bytes)
                        .trim_start()
                        .starts_with("import")
                    {
                        return Err(ParseError::ImportSyntax { line });
                    }
                    error_before.get_or_insert(line);
                }
                _ => {}
            }
        }

        if file.package_name.is_empty() {
            return Err(ParseError::MissingPackageClause);
        }

        Ok(file)
    }

    /// Walk an import declaration, handling both `import "x"` and `import ( ... )`.
    fn collect_imports(node: &Node, source_bytes: &[u8], imports: &mut Vec<ImportRef>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "import_spec" => {
                    if let Some(import) = Self::import_spec(&child, source_bytes) {
                        imports.push(import);
                    }
                }
                "import_spec_list" => Self::collect_imports(&child, source_bytes, imports),
                _ => {}
            }
        }
    }

    fn import_spec(node: &Node, source_bytes: &[u8]) -> Option<ImportRef> {
        let path_node = node.child_by_field_name("path")?;
        let path = unquote(node_text(&path_node, source_bytes));
        if path.is_empty() {
            return None;
        }

        let alias = node
            .child_by_field_name("name")
            .map(|name| node_text(&name, source_bytes).to_string());

        Some(ImportRef {
            path: path.to_string(),
            alias,
            line: node.start_position().row + 1,
        })
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<SourceFile, ParseError> {
        GoParser::new().parse_file(Path::new("pkg/a/a.go"), source)
    }

    #[test]
    fn test_parses_grouped_imports() {
        let source = r#"package session

import (
	"context"
	"fmt"

	"github.com/acme/app/pkg/domain"
	errs "github.com/acme/app/pkg/errors"
)

func Load(ctx context.Context) error { return nil }
"#;
        let file = parse(source).unwrap();

        assert_eq!(file.package_name, "session");
        let paths: Vec<_> = file.imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "context",
                "fmt",
                "github.com/acme/app/pkg/domain",
                "github.com/acme/app/pkg/errors"
            ]
        );

        let aliased = &file.imports[3];
        assert_eq!(aliased.alias.as_deref(), Some("errs"));
        assert_eq!(aliased.line, 8);
        assert_eq!(file.imports[0].line, 4);
    }

    #[test]
    fn test_parses_single_and_special_imports() {
        let source = r#"package main

import "os"
import _ "embed"
import . `strings`

func main() {}
"#;
        let file = parse(source).unwrap();

        assert_eq!(file.package_name, "main");
        assert_eq!(file.imports.len(), 3);
        assert_eq!(file.imports[0].path, "os");
        assert_eq!(file.imports[0].line, 3);
        assert_eq!(file.imports[1].alias.as_deref(), Some("_"));
        assert_eq!(file.imports[2].path, "strings");
        assert_eq!(file.imports[2].alias.as_deref(), Some("."));
    }

    #[test]
    fn test_file_without_imports() {
        let file = parse("package empty\n\nconst X = 1\n").unwrap();
        assert_eq!(file.package_name, "empty");
        assert!(file.imports.is_empty());
    }

    #[test]
    fn test_body_syntax_errors_are_tolerated() {
        let source = r#"package broken

import "fmt"

func oops() {
	x := )
	fmt.Println(x)
}
"#;
        let file = parse(source).unwrap();
        assert_eq!(file.imports.len(), 1);
        assert_eq!(file.imports[0].path, "fmt");
    }

    #[test]
    fn test_broken_import_block_is_an_error() {
        let source = "package broken\n\nimport (\n\t\"fmt\n)\n";
        assert!(parse(source).is_err());
    }

    #[test]
    fn test_missing_package_clause_is_an_error() {
        assert!(matches!(
            parse("import \"fmt\"\n"),
            Err(ParseError::MissingPackageClause) | Err(ParseError::ImportSyntax { .. })
        ));
    }
}
