use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use regex::Regex;

/// A set of package-path globs, e.g. `["**/domain", "**/domain/**"]`.
///
/// `*` never crosses a `/`; use `**` to span directories.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    patterns: Vec<String>,
    set: GlobSet,
    /// `dir` for every `dir/**` pattern, so a subtree glob also covers its root.
    roots: GlobSet,
}

impl PathMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        let mut roots = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder.add(glob(pattern)?);
            if let Some(root) = pattern.strip_suffix("/**").filter(|r| !r.is_empty()) {
                roots.add(glob(root)?);
            }
        }
        Ok(Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            set: builder.build()?,
            roots: roots.build()?,
        })
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
            roots: GlobSet::empty(),
        }
    }

    pub fn is_match(&self, path: &str) -> bool {
        !self.patterns.is_empty() && self.set.is_match(path)
    }

    /// Like `is_match`, but `dir/**` also matches `dir` itself. Used for
    /// excludes, where skipping a subtree should skip its root package too.
    pub fn covers(&self, path: &str) -> bool {
        self.is_match(path) || self.roots.is_match(path)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn glob(pattern: &str) -> Result<globset::Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

/// An architectural layer and the layers it may depend on.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub packages: PathMatcher,
    pub allow: Vec<String>,
}

impl Layer {
    pub fn may_import(&self, other: &str) -> bool {
        self.name == other || self.allow.iter().any(|allowed| allowed == other)
    }
}

/// An import pattern that a set of packages must not use.
#[derive(Debug, Clone)]
pub struct ForbiddenImport {
    pub name: String,
    /// Packages the rule applies to. Empty means every package.
    pub applies_to: PathMatcher,
    pub pattern: Regex,
    pub suggestion: Option<String>,
}

impl ForbiddenImport {
    pub fn applies(&self, package_dir: &str) -> bool {
        self.applies_to.is_empty() || self.applies_to.is_match(package_dir)
    }
}

/// The static boundary rule table.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub layers: Vec<Layer>,
    pub forbidden: Vec<ForbiddenImport>,
}

impl RuleSet {
    /// First layer whose patterns match the package directory.
    pub fn layer_of(&self, package_dir: &str) -> Option<&Layer> {
        self.layers
            .iter()
            .find(|layer| layer.packages.is_match(package_dir))
    }

    /// Clean-architecture layering: domain <- application <- infrastructure.
    pub fn default_layers() -> Vec<Layer> {
        let layer = |name: &str, allow: &[&str]| Layer {
            name: name.to_string(),
            packages: PathMatcher::new(&[format!("**/{name}"), format!("**/{name}/**")])
                .unwrap_or_else(|_| PathMatcher::empty()),
            allow: allow.iter().map(|s| s.to_string()).collect(),
        };

        vec![
            layer("domain", &[]),
            layer("application", &["domain"]),
            layer("infrastructure", &["domain", "application"]),
        ]
    }

    pub fn default_forbidden() -> Vec<ForbiddenImport> {
        let mut rules = Vec::new();

        if let (Ok(applies_to), Ok(pattern)) = (
            PathMatcher::new(&["**/domain", "**/domain/**"]),
            Regex::new(r"^(net/http|database/sql|os/exec)$|^github\.com/docker/|^k8s\.io/"),
        ) {
            rules.push(ForbiddenImport {
                name: "domain-io".to_string(),
                applies_to,
                pattern,
                suggestion: None,
            });
        }

        if let Ok(pattern) = Regex::new(r"^github\.com/pkg/errors$") {
            rules.push(ForbiddenImport {
                name: "legacy-errors".to_string(),
                applies_to: PathMatcher::empty(),
                pattern,
                suggestion: None,
            });
        }

        rules
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            layers: Self::default_layers(),
            forbidden: Self::default_forbidden(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtree_glob_covers_its_root() {
        let matcher = PathMatcher::new(&["gen/**", "internal/*/mocks"]).unwrap();

        assert!(matcher.covers("gen"));
        assert!(matcher.covers("gen/proto"));
        assert!(matcher.covers("internal/user/mocks"));
        assert!(!matcher.covers("generated"));
        assert!(!matcher.covers("internal/user"));
        assert!(!PathMatcher::empty().covers("gen"));
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathMatcher::new(&["**/domain", "**/domain/**"]).unwrap();

        assert!(matcher.is_match("domain"));
        assert!(matcher.is_match("pkg/mcp/domain"));
        assert!(matcher.is_match("pkg/mcp/domain/session"));
        assert!(!matcher.is_match("pkg/mcp/subdomain"));
        assert!(!matcher.is_match("pkg/domainx/session"));

        let single = PathMatcher::new(&["cmd/*"]).unwrap();
        assert!(single.is_match("cmd/server"));
        assert!(!single.is_match("cmd/server/internal")); // * doesn't cross /
    }

    #[test]
    fn test_empty_matcher_matches_nothing() {
        assert!(!PathMatcher::empty().is_match("anything"));
    }

    #[test]
    fn test_default_layer_lookup() {
        let rules = RuleSet::default();

        assert_eq!(
            rules.layer_of("pkg/mcp/domain/errors").map(|l| l.name.as_str()),
            Some("domain")
        );
        assert_eq!(
            rules.layer_of("pkg/mcp/infrastructure/steps").map(|l| l.name.as_str()),
            Some("infrastructure")
        );
        assert!(rules.layer_of("cmd/server").is_none());

        let application = rules.layer_of("pkg/application").unwrap();
        assert!(application.may_import("domain"));
        assert!(application.may_import("application"));
        assert!(!application.may_import("infrastructure"));
    }
}
