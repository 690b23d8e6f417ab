mod check;
mod graph;
mod init;

pub use check::cmd_check;
pub use graph::cmd_graph;
pub use init::{cmd_init, cmd_init_with_fs};

use crate::config::Config;
use crate::fs::FileSystem;
use crate::style;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// Resolve the path, load `.layercheck.toml` and apply the CLI overrides shared by
    /// every analysing command.
    /// Returns Err(exit_code) if setup fails.
    pub fn new(path: &Path, module: Option<&str>, exclude: &[String]) -> Result<Self, i32> {
        let resolved_path = match path.canonicalize() {
            Ok(p) => p,
            Err(_) => {
                style::error(&format!("Could not resolve path: {}", style::path(path)));
                return Err(1);
            }
        };

        // A broken config must not silently fall back to the default rules.
        let mut config = match Config::load(&resolved_path) {
            Ok(config) => config,
            Err(e) => {
                style::error(&format!("Invalid configuration: {}", e));
                return Err(1);
            }
        };

        if let Some(module) = module {
            config.module = Some(module.to_string());
        }

        if let Err(e) = config.extend_exclude(exclude) {
            style::error(&e.to_string());
            return Err(1);
        }

        Ok(Self {
            path: resolved_path,
            config,
        })
    }
}

/// Write a rendered report to `output`, or to stdout when no file is given.
///
/// Markdown going to stdout is rendered for the terminal.
fn emit(
    rendered: &[u8],
    output: Option<&Path>,
    markdown: bool,
    fs: &dyn FileSystem,
) -> Result<(), i32> {
    let text = String::from_utf8_lossy(rendered);

    let result = match output {
        Some(output_path) => fs.write(output_path, &text),
        None => {
            let mut stdout = std::io::stdout();
            if markdown {
                style::render_markdown(&text, &mut stdout)
            } else {
                write!(stdout, "{}", text)
            }
        }
    };

    result.map_err(|e| {
        style::error(&format!("Failed to write output: {}", e));
        1
    })
}
