pub mod analysis;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fs;
pub mod model;
pub mod output;
pub mod parser;
pub mod style;

pub use analysis::{
    DependencyGraph, canonicalize_cycle, check_import_depth, classify_import, find_cycles,
};
pub use api::{CheckOptions, LayercheckError, check, dependency_graph};
pub use cli::Cli;
pub use commands::{cmd_check, cmd_graph, cmd_init};
pub use config::Config;
pub use model::AnalysisResult;
