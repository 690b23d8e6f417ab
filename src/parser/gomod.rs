/// Extract the module path from the contents of a `go.mod` file.
///
/// Accepts `module example.com/m`, a quoted path, and trailing `//` comments.
pub fn parse_go_mod(source: &str) -> Option<String> {
    for line in source.lines() {
        let line = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        let Some(rest) = line.strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }

        let path = rest.trim().trim_matches('"').trim_matches('`').trim();
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_module_directive() {
        let go_mod = r#"
// Module for the server
module github.com/acme/container-kit // trailing comment

go 1.22

require (
	github.com/spf13/cobra v1.8.0
)
"#;
        assert_eq!(
            parse_go_mod(go_mod),
            Some("github.com/acme/container-kit".to_string())
        );
    }

    #[test]
    fn test_parse_quoted_module() {
        assert_eq!(
            parse_go_mod("module \"example.com/m\"\n"),
            Some("example.com/m".to_string())
        );
    }

    #[test]
    fn test_missing_module_directive() {
        assert_eq!(parse_go_mod("go 1.21\n"), None);
        assert_eq!(parse_go_mod("modules are fun\n"), None);
        assert_eq!(parse_go_mod(""), None);
    }
}
