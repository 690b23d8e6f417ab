use crate::model::IssueSeverity;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "layercheck")]
#[command(about = "Import graph linting for Go modules: cycles, depth and layer boundaries")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Module root to check when no subcommand is given
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run every enabled check (default behavior)
    Check(CheckArgs),

    /// Report dependency cycles between packages
    Cycles(CheckArgs),

    /// Report internal imports nested deeper than the threshold
    Depth(CheckArgs),

    /// Report layer and forbidden-import violations
    Boundaries(CheckArgs),

    /// Report packages nothing imports
    Orphans(CheckArgs),

    /// Print the package dependency graph
    Graph(GraphArgs),

    /// Generate a starter .layercheck.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Module root (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Minimum severity to report (does not affect the exit code)
    #[arg(long, default_value = "info")]
    pub min_severity: IssueSeverity,

    /// Module path, overriding go.mod and the config file
    #[arg(long)]
    pub module: Option<String>,

    /// Maximum path segments in an internal import
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Extra package globs to skip (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Errors allowed before the run fails
    #[arg(long)]
    pub error_budget: Option<usize>,

    /// Warnings allowed before the run fails
    #[arg(long)]
    pub warning_budget: Option<usize>,
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            format: OutputFormat::Markdown,
            output: None,
            min_severity: IssueSeverity::Info,
            module: None,
            max_depth: None,
            exclude: Vec::new(),
            error_budget: None,
            warning_budget: None,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct GraphArgs {
    /// Module root (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: GraphFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Module path, overriding go.mod and the config file
    #[arg(long)]
    pub module: Option<String>,

    /// Extra package globs to skip (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Directory where .layercheck.toml is created (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum GraphFormat {
    /// One line per package
    #[default]
    Text,
    Json,
    /// Graphviz, cycle edges in red
    Dot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_path_without_subcommand() {
        let cli = Cli::parse_from(["layercheck", "./svc"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.path, PathBuf::from("./svc"));
    }

    #[test]
    fn test_check_overrides() {
        let cli = Cli::parse_from([
            "layercheck",
            "check",
            "repo",
            "--format",
            "json",
            "--max-depth",
            "3",
            "--exclude",
            "gen/**,mocks/**",
            "--warning-budget",
            "2",
            "-v",
        ]);
        assert!(cli.verbose);
        let Some(Command::Check(args)) = cli.command else {
            panic!("expected check subcommand");
        };
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.max_depth, Some(3));
        assert_eq!(args.exclude, vec!["gen/**", "mocks/**"]);
        assert_eq!(args.warning_budget, Some(2));
        assert_eq!(args.error_budget, None);
    }

    #[test]
    fn test_graph_format() {
        let cli = Cli::parse_from(["layercheck", "graph", "--format", "dot"]);
        let Some(Command::Graph(args)) = cli.command else {
            panic!("expected graph subcommand");
        };
        assert_eq!(args.format, GraphFormat::Dot);
        assert_eq!(args.path, PathBuf::from("."));
    }

    #[test]
    fn test_min_severity_accepts_warning_alias() {
        let cli = Cli::parse_from(["layercheck", "cycles", "--min-severity", "warning"]);
        let Some(Command::Cycles(args)) = cli.command else {
            panic!("expected cycles subcommand");
        };
        assert_eq!(args.min_severity, IssueSeverity::Warn);
    }
}
